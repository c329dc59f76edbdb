//! The edit session: what is being drawn or point-edited right now.
//!
//! The session never owns committed feature data. It holds an identity, a
//! point selection and, while editing, a snapshot of the pre-edit geometry
//! used only to cancel. Every mutation goes through [`FeatureStore`].
//!
//! [`FeatureStore`]: crate::features::FeatureStore

mod drawing;
mod editing;
mod selection;
mod throttle;

#[cfg(test)]
mod tests;

pub use selection::{PointSelection, SelectionMode};
pub use throttle::DragThrottle;

use std::time::Duration;

use bevy::prelude::*;

use crate::config::EditorSettings;
use crate::constants::{
    DEFAULT_DRAG_INTERVAL_SECS, DEFAULT_HIT_THRESHOLD_PX, DEFAULT_NOTIFY_QUIET_MS,
};
use crate::features::FeatureId;
use crate::geometry::{GeometryKind, GeometryValue, Position};

/// Geometry kinds that can be drawn from scratch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawKind {
    Point,
    LineString,
    Polygon,
}

impl DrawKind {
    pub const ALL: [DrawKind; 3] = [DrawKind::Point, DrawKind::LineString, DrawKind::Polygon];

    /// Clicks needed before the drawing can be finished
    pub fn min_points(&self) -> usize {
        match self {
            DrawKind::Point => 1,
            DrawKind::LineString => 2,
            DrawKind::Polygon => 3,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DrawKind::Point => "Point",
            DrawKind::LineString => "Line",
            DrawKind::Polygon => "Polygon",
        }
    }

    pub fn geometry_kind(&self) -> GeometryKind {
        match self {
            DrawKind::Point => GeometryKind::Point,
            DrawKind::LineString => GeometryKind::LineString,
            DrawKind::Polygon => GeometryKind::Polygon,
        }
    }
}

/// A vertex drag in progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointDrag {
    pub index: usize,
    /// Latest pointer position, applied even if the throttle dropped it
    pub last_position: Position,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum EditMode {
    #[default]
    Idle,
    Drawing {
        kind: DrawKind,
        points: Vec<Position>,
    },
    Editing {
        feature: FeatureId,
        selection: PointSelection,
        drag: Option<PointDrag>,
    },
}

/// Drawing and point-editing state machine.
///
/// Idle, Drawing and Editing are exclusive, and at most one feature is edited
/// at a time.
#[derive(Resource, Debug)]
pub struct EditSession {
    mode: EditMode,
    /// Geometry of the edited feature as it was on entry
    snapshot: Option<GeometryValue>,
    throttle: DragThrottle,
    hit_threshold_px: f32,
}

impl Default for EditSession {
    fn default() -> Self {
        Self {
            mode: EditMode::Idle,
            snapshot: None,
            throttle: DragThrottle::new(
                Duration::from_secs_f64(DEFAULT_DRAG_INTERVAL_SECS),
                Duration::from_millis(DEFAULT_NOTIFY_QUIET_MS),
            ),
            hit_threshold_px: DEFAULT_HIT_THRESHOLD_PX,
        }
    }
}

impl EditSession {
    pub fn configure(&mut self, settings: &EditorSettings) {
        self.hit_threshold_px = settings.hit_threshold_px;
        self.throttle.configure(
            Duration::from_secs_f64(settings.drag_interval_secs.max(0.0)),
            Duration::from_millis(settings.notify_quiet_ms),
        );
    }

    /// Drop everything back to Idle without touching the store
    pub fn reset(&mut self) {
        self.mode = EditMode::Idle;
        self.snapshot = None;
        self.throttle.reset();
    }

    pub fn mode(&self) -> &EditMode {
        &self.mode
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.mode, EditMode::Idle)
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.mode, EditMode::Drawing { .. })
    }

    /// The feature being point-edited, if any
    pub fn editing_feature(&self) -> Option<FeatureId> {
        match self.mode {
            EditMode::Editing { feature, .. } => Some(feature),
            _ => None,
        }
    }

    pub fn is_editing_feature(&self, id: FeatureId) -> bool {
        self.editing_feature() == Some(id)
    }

    pub fn selection(&self) -> Option<&PointSelection> {
        match &self.mode {
            EditMode::Editing { selection, .. } => Some(selection),
            _ => None,
        }
    }

    pub fn drag(&self) -> Option<PointDrag> {
        match self.mode {
            EditMode::Editing { drag, .. } => drag,
            _ => None,
        }
    }

    /// Pan and zoom stay off while this is true
    pub fn is_dragging(&self) -> bool {
        self.drag().is_some()
    }

    /// The drawing in progress and the points placed so far
    pub fn draft(&self) -> Option<(DrawKind, &[Position])> {
        match &self.mode {
            EditMode::Drawing { kind, points } => Some((*kind, points.as_slice())),
            _ => None,
        }
    }

    pub fn has_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn hit_threshold_px(&self) -> f32 {
        self.hit_threshold_px
    }

    pub fn drag_interval(&self) -> Duration {
        self.throttle.min_interval()
    }

    /// True once per finished drag, after the quiet period has passed
    pub fn poll_notification(&mut self, now: Duration) -> bool {
        self.throttle.poll(now)
    }
}
