//! Canvas overlays derived from the feature store and the edit session.
//!
//! [`overlay_set`] is a pure function of state; the gizmo system redraws its
//! output every frame, so nothing here needs reconciling by hand.

use bevy::camera::visibility::RenderLayers;
use bevy::gizmos::config::{GizmoConfigGroup, GizmoConfigStore};
use bevy::prelude::*;

use crate::constants::HANDLE_RADIUS_PX;
use crate::features::{FeatureId, FeatureStore, SelectedFeature};
use crate::geometry::{GeometryValue, Position};
use crate::theme;

use super::camera::{CameraZoom, EditorCamera};
use super::params::CameraParams;
use super::point_editor::{editable_points, is_closed_ring};
use super::projection::MapProjection;
use super::session::{DrawKind, EditSession};

/// One thing to draw on the canvas
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay<'a> {
    /// A visible feature's geometry in its identity color
    Shape {
        feature: FeatureId,
        geometry: &'a GeometryValue,
        color: Color,
        highlighted: bool,
    },
    /// A vertex handle of the feature being edited
    Handle {
        index: usize,
        position: Position,
        selected: bool,
        dragging: bool,
    },
    /// The feature being drawn
    Draft {
        kind: DrawKind,
        points: &'a [Position],
    },
}

/// Everything the canvas should show for the current state, back to front:
/// shapes in store order, then handles, then the drawing draft. Features
/// without coordinates have no shape.
pub fn overlay_set<'a>(
    store: &'a FeatureStore,
    session: &'a EditSession,
    picked: Option<FeatureId>,
) -> Vec<Overlay<'a>> {
    let mut overlays: Vec<Overlay> = store
        .visible()
        .filter(|layer| layer.feature.geometry.has_coordinates())
        .map(|layer| Overlay::Shape {
            feature: layer.id(),
            geometry: &layer.feature.geometry,
            color: layer.color,
            highlighted: picked == Some(layer.id()),
        })
        .collect();

    if let (Some(id), Some(selection)) = (session.editing_feature(), session.selection())
        && let Some(feature) = store.feature(id)
        && let Ok(mut points) = editable_points(&feature.geometry)
    {
        // The closing position shares vertex 0's handle
        if matches!(feature.geometry, GeometryValue::Polygon(_)) && is_closed_ring(&points) {
            points.pop();
        }
        let drag_target = session.drag().map(|drag| drag.index);
        overlays.extend(points.into_iter().enumerate().map(|(index, position)| {
            Overlay::Handle {
                index,
                position,
                selected: selection.contains(index),
                dragging: drag_target == Some(index),
            }
        }));
    }

    if let Some((kind, points)) = session.draft() {
        overlays.push(Overlay::Draft { kind, points });
    }

    overlays
}

/// Gizmo group for canvas overlays
#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct OverlayGizmoGroup;

pub fn configure_overlay_gizmos(mut config_store: ResMut<GizmoConfigStore>) {
    let (config, _) = config_store.config_mut::<OverlayGizmoGroup>();
    config.render_layers = RenderLayers::layer(1);
    config.line.width = 2.0;
}

fn draw_geometry(
    gizmos: &mut Gizmos<OverlayGizmoGroup>,
    geometry: &GeometryValue,
    projection: &MapProjection,
    point_radius: f32,
    color: Color,
) {
    let strip = |gizmos: &mut Gizmos<OverlayGizmoGroup>, coords: &[Position]| {
        gizmos.linestrip_2d(coords.iter().map(|&p| projection.to_world(p)), color);
    };
    match geometry {
        GeometryValue::Point(p) => {
            gizmos.circle_2d(
                Isometry2d::from_translation(projection.to_world(*p)),
                point_radius,
                color,
            );
        }
        GeometryValue::MultiPoint(points) => {
            for p in points {
                gizmos.circle_2d(
                    Isometry2d::from_translation(projection.to_world(*p)),
                    point_radius,
                    color,
                );
            }
        }
        GeometryValue::LineString(coords) => strip(gizmos, coords),
        GeometryValue::MultiLineString(lines) => {
            for line in lines {
                strip(gizmos, line);
            }
        }
        GeometryValue::Polygon(rings) => {
            for ring in rings {
                strip(gizmos, ring);
            }
        }
        GeometryValue::MultiPolygon(polygons) => {
            for ring in polygons.iter().flatten() {
                strip(gizmos, ring);
            }
        }
        GeometryValue::GeometryCollection(children) => {
            for child in children {
                draw_geometry(gizmos, child, projection, point_radius, color);
            }
        }
    }
}

pub fn draw_overlays(
    mut gizmos: Gizmos<OverlayGizmoGroup>,
    store: Res<FeatureStore>,
    session: Res<EditSession>,
    picked: Res<SelectedFeature>,
    projection: Res<MapProjection>,
    camera: CameraParams,
    zoom_query: Query<&CameraZoom, With<EditorCamera>>,
) {
    // Handle sizes stay constant on screen
    let scale = zoom_query.single().map(|zoom| zoom.scale).unwrap_or(1.0);
    let radius = HANDLE_RADIUS_PX * scale;

    for overlay in overlay_set(&store, &session, picked.id) {
        match overlay {
            Overlay::Shape {
                geometry,
                color,
                highlighted,
                ..
            } => {
                if highlighted {
                    draw_geometry(&mut gizmos, geometry, &projection, radius * 1.6, theme::PICKED_OUTLINE);
                }
                draw_geometry(&mut gizmos, geometry, &projection, radius, color);
            }
            Overlay::Handle {
                position,
                selected,
                dragging,
                ..
            } => {
                let color = if dragging {
                    theme::HANDLE_DRAGGING
                } else if selected {
                    theme::HANDLE_SELECTED
                } else {
                    theme::HANDLE_COLOR
                };
                let center = Isometry2d::from_translation(projection.to_world(position));
                gizmos.circle_2d(center, radius, color);
                if selected || dragging {
                    gizmos.circle_2d(center, radius * 0.5, color);
                }
            }
            Overlay::Draft { kind, points } => {
                let world: Vec<Vec2> = points.iter().map(|&p| projection.to_world(p)).collect();
                gizmos.linestrip_2d(world.iter().copied(), theme::DRAFT_COLOR);
                for &point in &world {
                    gizmos.circle_2d(Isometry2d::from_translation(point), radius, theme::DRAFT_COLOR);
                }

                // Rubber band to the cursor, closing back to the start for polygons
                if let (Some(&last), Some(cursor)) = (world.last(), camera.cursor_world_pos()) {
                    gizmos.line_2d(last, cursor, theme::DRAFT_PREVIEW);
                    if kind == DrawKind::Polygon && world.len() > 1 {
                        gizmos.line_2d(cursor, world[0], theme::DRAFT_PREVIEW);
                    }
                }
            }
        }
    }
}
