use bevy::camera::visibility::RenderLayers;
use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

use crate::config::AppConfig;
use crate::constants::{MAX_ZOOM_SCALE, MIN_ZOOM_SCALE};
use crate::features::{FeatureId, FeatureStore};
use crate::geometry::{compute_bounds, Bounds};

use super::params::CameraParams;
use super::projection::MapProjection;
use super::session::EditSession;

#[derive(Component)]
pub struct EditorCamera;

#[derive(Component)]
pub struct CameraZoom {
    pub scale: f32,
}

impl Default for CameraZoom {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

/// Ask the camera to fit features into the window.
///
/// Applied on the run after the one that reads it, never mid-frame.
#[derive(Message, Debug, Clone, Copy, Default, PartialEq)]
pub struct RecenterRequest {
    /// Fraction of the span added on each side; the configured value if unset
    pub padding: Option<f64>,
    /// Fit this feature instead of every visible one
    pub focus: Option<FeatureId>,
}

/// Recenter request waiting for its run
#[derive(Resource, Default)]
pub struct PendingRecenter(Option<RecenterRequest>);

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        EditorCamera,
        CameraZoom::default(),
        Transform::from_translation(Vec3::new(0.0, 0.0, 1000.0)),
        // Layer 0 = main content, Layer 1 = overlays
        RenderLayers::from_layers(&[0, 1]),
    ));
}

pub fn camera_pan(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    session: Res<EditSession>,
    mut camera_query: Query<(&mut Transform, &CameraZoom), With<EditorCamera>>,
) {
    if !mouse_button.pressed(MouseButton::Middle) || session.is_dragging() {
        mouse_motion.clear();
        return;
    }

    let Ok((mut transform, zoom)) = camera_query.single_mut() else {
        return;
    };

    for event in mouse_motion.read() {
        let delta = event.delta * zoom.scale;
        transform.translation.x -= delta.x;
        transform.translation.y += delta.y;
    }
}

pub fn camera_zoom(
    mut scroll_events: MessageReader<MouseWheel>,
    session: Res<EditSession>,
    mut camera_query: Query<&mut CameraZoom, With<EditorCamera>>,
) {
    if session.is_dragging() {
        scroll_events.clear();
        return;
    }

    let Ok(mut zoom) = camera_query.single_mut() else {
        return;
    };

    for event in scroll_events.read() {
        let scroll_amount = match event.unit {
            MouseScrollUnit::Line => event.y * 0.1,
            MouseScrollUnit::Pixel => event.y * 0.001,
        };

        // Multiplicative so a notch feels the same at street and country scale
        let factor = (1.0 - scroll_amount).clamp(0.5, 1.5);
        zoom.scale = (zoom.scale * factor).clamp(MIN_ZOOM_SCALE, MAX_ZOOM_SCALE);
    }
}

pub fn apply_camera_zoom(
    mut camera_query: Query<(&CameraZoom, &mut Projection), (With<EditorCamera>, Changed<CameraZoom>)>,
) {
    for (zoom, mut projection) in camera_query.iter_mut() {
        if let Projection::Orthographic(ref mut ortho) = *projection {
            ortho.scale = zoom.scale;
        }
    }
}

/// Camera centre and zoom scale that show `bounds` in a viewport of the given
/// pixel size
pub fn fit_view(bounds: &Bounds, projection: &MapProjection, viewport: Vec2) -> (Vec2, f32) {
    let center = projection.to_world(bounds.center());
    let width = projection.degrees_to_world(bounds.lon_span());
    let height = projection.degrees_to_world(bounds.lat_span());

    let scale = if viewport.x > 0.0 && viewport.y > 0.0 {
        (width / viewport.x).max(height / viewport.y)
    } else {
        1.0
    };
    (center, scale.clamp(MIN_ZOOM_SCALE, MAX_ZOOM_SCALE))
}

/// Applies the recenter request stored on the previous run, then stores the
/// newest one read this run.
pub fn apply_recenter(
    mut requests: MessageReader<RecenterRequest>,
    mut pending: ResMut<PendingRecenter>,
    store: Res<FeatureStore>,
    config: Res<AppConfig>,
    projection: Res<MapProjection>,
    camera: CameraParams,
    mut camera_query: Query<(&mut Transform, &mut CameraZoom), With<EditorCamera>>,
) {
    let incoming = requests.read().last().copied();

    if let Some(request) = pending.0.take() {
        let settings = &config.data.editor;
        let geometries: Vec<_> = match request.focus {
            Some(id) => store.feature(id).map(|f| &f.geometry).into_iter().collect(),
            None => store.visible().map(|layer| &layer.feature.geometry).collect(),
        };

        match compute_bounds(geometries) {
            Some(bounds) => {
                let padded = bounds.padded(
                    request.padding.unwrap_or(settings.bounds_padding),
                    settings.min_span_degrees,
                );
                let viewport = camera.window_size().unwrap_or(Vec2::ONE);
                let (center, scale) = fit_view(&padded, &projection, viewport);

                if let Ok((mut transform, mut zoom)) = camera_query.single_mut() {
                    transform.translation.x = center.x;
                    transform.translation.y = center.y;
                    zoom.scale = scale;
                    debug!("Recentered on {:?}", padded);
                }
            }
            None => debug!("Nothing to recenter on"),
        }
    }

    pending.0 = incoming;
}
