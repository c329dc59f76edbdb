use bevy::prelude::*;

use crate::geometry::Position;
use crate::theme;

use super::camera::CameraZoom;
use super::params::CameraParams;
use super::projection::MapProjection;
use super::EditorCamera;

/// Most graticule lines drawn along either axis
const MAX_LINES_PER_AXIS: f64 = 40.0;

#[derive(Resource)]
pub struct GraticuleSettings {
    pub visible: bool,
}

impl Default for GraticuleSettings {
    fn default() -> Self {
        Self { visible: true }
    }
}

/// Degree step between graticule lines: a power of ten small enough to give
/// detail, large enough to keep `span` under the line limit
pub fn graticule_step(span_degrees: f64) -> f64 {
    if !span_degrees.is_finite() || span_degrees <= 0.0 {
        return 1.0;
    }
    let step = 10f64.powf((span_degrees / MAX_LINES_PER_AXIS).log10().ceil());
    step.clamp(1e-6, 10.0)
}

/// South-west and north-east corners of the area a camera at `camera_pos`
/// shows in a `viewport` of pixels at `scale` world units per pixel
pub fn view_extent(
    camera_pos: Vec2,
    viewport: Vec2,
    scale: f32,
    projection: &MapProjection,
) -> (Position, Position) {
    let half_view = viewport * scale / 2.0;
    (
        projection.to_position(camera_pos - half_view),
        projection.to_position(camera_pos + half_view),
    )
}

pub fn draw_graticule(
    mut gizmos: Gizmos,
    settings: Res<GraticuleSettings>,
    projection: Res<MapProjection>,
    camera: CameraParams,
    camera_query: Query<(&Transform, &CameraZoom), With<EditorCamera>>,
) {
    if !settings.visible {
        return;
    }

    let Ok((camera_transform, zoom)) = camera_query.single() else {
        return;
    };
    let Some(viewport) = camera.window_size() else {
        return;
    };

    let (min, max) = view_extent(
        camera_transform.translation.truncate(),
        viewport,
        zoom.scale,
        &projection,
    );

    let step = graticule_step((max.lon - min.lon).max(max.lat - min.lat));
    let color = theme::GRATICULE_COLOR;

    let first_lon = (min.lon / step).floor() as i64;
    let last_lon = (max.lon / step).ceil() as i64;
    for i in first_lon..=last_lon {
        let lon = i as f64 * step;
        gizmos.line_2d(
            projection.to_world(Position::new(lon, min.lat)),
            projection.to_world(Position::new(lon, max.lat)),
            color,
        );
    }

    let first_lat = (min.lat / step).floor() as i64;
    let last_lat = (max.lat / step).ceil() as i64;
    for i in first_lat..=last_lat {
        let lat = i as f64 * step;
        gizmos.line_2d(
            projection.to_world(Position::new(min.lon, lat)),
            projection.to_world(Position::new(max.lon, lat)),
            color,
        );
    }
}
