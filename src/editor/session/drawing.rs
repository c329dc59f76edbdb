use bevy::prelude::*;

use crate::editor::error::EditError;
use crate::features::{Feature, FeatureId, FeatureStore};
use crate::geometry::{GeometryValue, Position};

use super::{DrawKind, EditMode, EditSession};

/// Placed points that count toward the minimum: a polygon click landing back
/// on the first point closes the ring instead of adding a vertex
fn counted_points(kind: DrawKind, points: &[Position]) -> usize {
    match kind {
        DrawKind::Polygon if points.len() > 1 && points.first() == points.last() => {
            points.len() - 1
        }
        _ => points.len(),
    }
}

impl EditSession {
    /// Begin drawing a new feature. Restarting while drawing discards the
    /// points placed so far.
    pub fn start_drawing(&mut self, kind: DrawKind) -> Result<(), EditError> {
        if self.editing_feature().is_some() {
            return Err(EditError::Busy);
        }
        self.mode = EditMode::Drawing {
            kind,
            points: Vec::new(),
        };
        info!("Started drawing {}", kind.display_name());
        Ok(())
    }

    /// Append a clicked position. Returns the number of points placed.
    pub fn add_draw_point(&mut self, position: Position) -> Result<usize, EditError> {
        match &mut self.mode {
            EditMode::Drawing { points, .. } => {
                points.push(position);
                Ok(points.len())
            }
            _ => Err(EditError::NotDrawing),
        }
    }

    pub fn can_finish(&self) -> bool {
        self.draft()
            .is_some_and(|(kind, points)| counted_points(kind, points) >= kind.min_points())
    }

    /// Commit the drawing as a new feature and return to Idle.
    ///
    /// Below the kind's minimum nothing happens and drawing continues.
    pub fn finish_drawing(&mut self, store: &mut FeatureStore) -> Result<FeatureId, EditError> {
        let Some((kind, points)) = self.draft() else {
            return Err(EditError::NotDrawing);
        };

        let min = kind.min_points();
        if counted_points(kind, points) < min {
            return Err(EditError::TooFewPoints {
                kind: kind.geometry_kind(),
                min,
            });
        }

        let geometry = match kind {
            DrawKind::Point => GeometryValue::Point(points[0]),
            DrawKind::LineString => GeometryValue::LineString(points.to_vec()),
            DrawKind::Polygon => {
                let mut ring = points.to_vec();
                if ring.first() != ring.last() {
                    ring.push(ring[0]);
                }
                GeometryValue::Polygon(vec![ring])
            }
        };

        let id = store.add(Feature::new(geometry));
        self.mode = EditMode::Idle;
        info!("Finished drawing {} {}", kind.display_name(), id);
        Ok(id)
    }

    pub fn cancel_drawing(&mut self) -> Result<(), EditError> {
        if !self.is_drawing() {
            return Err(EditError::NotDrawing);
        }
        self.mode = EditMode::Idle;
        info!("Cancelled drawing");
        Ok(())
    }
}
