use thiserror::Error;

use crate::features::FeatureId;
use crate::geometry::GeometryKind;

/// Why an in-session mutation was refused.
///
/// None of these are fatal: the caller leaves state unchanged and the UI shows
/// the unchanged model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("point index {index} is out of range for {len} points")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("{kind} needs at least {min} points")]
    TooFewPoints { kind: GeometryKind, min: usize },
    #[error("{0} geometries cannot be point-edited")]
    Unsupported(GeometryKind),
    #[error("feature {0} not found")]
    FeatureNotFound(FeatureId),
    #[error("no feature is being edited")]
    NotEditing,
    #[error("no feature is being drawn")]
    NotDrawing,
    #[error("no points are selected")]
    EmptySelection,
    #[error("finish or leave the current edit first")]
    Busy,
}
