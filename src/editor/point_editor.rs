//! Vertex-level edits on a single feature's coordinates.
//!
//! Point, LineString and Polygon (exterior ring) are editable. Every other kind
//! is reported as unsupported rather than touched. Closed polygon rings keep
//! their first and last positions equal through every edit.

use crate::features::Feature;
use crate::geometry::{GeometryKind, GeometryValue, Position, NAME_KEY};

use super::error::EditError;

/// Fewest positions a LineString may keep
pub const MIN_LINE_POINTS: usize = 2;
/// Fewest distinct vertices a polygon exterior ring may keep (closure excluded)
pub const MIN_RING_VERTICES: usize = 3;
/// Name given to features split off from a point selection
pub const SEGMENT_NAME: &str = "Unnamed segment";

/// True when a ring has at least two positions and its ends coincide
pub fn is_closed_ring(ring: &[Position]) -> bool {
    ring.len() >= 2 && ring.first() == ring.last()
}

/// The positions the editor exposes as vertices for `geometry`
pub fn editable_points(geometry: &GeometryValue) -> Result<Vec<Position>, EditError> {
    match geometry {
        GeometryValue::Point(p) => Ok(vec![*p]),
        GeometryValue::LineString(points) => Ok(points.clone()),
        GeometryValue::Polygon(rings) => Ok(rings.first().cloned().unwrap_or_default()),
        other => Err(EditError::Unsupported(other.kind())),
    }
}

fn check_index(coords: &[Position], index: usize) -> Result<(), EditError> {
    if index < coords.len() {
        Ok(())
    } else {
        Err(EditError::IndexOutOfRange {
            index,
            len: coords.len(),
        })
    }
}

/// Insert the midpoint of `coords[index]` and its successor right after
/// `index`. At the last index the successor is the point itself.
pub fn insert_after(coords: &[Position], index: usize) -> Result<Vec<Position>, EditError> {
    check_index(coords, index)?;
    let next = (index + 1).min(coords.len() - 1);
    let midpoint = coords[index].midpoint(coords[next]);

    let mut result = coords.to_vec();
    result.insert(index + 1, midpoint);
    Ok(result)
}

/// Remove `coords[index]` unless fewer than `min_len` positions would remain
pub fn delete(
    coords: &[Position],
    index: usize,
    min_len: usize,
    kind: GeometryKind,
) -> Result<Vec<Position>, EditError> {
    check_index(coords, index)?;
    if coords.len() - 1 < min_len {
        return Err(EditError::TooFewPoints {
            kind,
            min: min_len,
        });
    }

    let mut result = coords.to_vec();
    result.remove(index);
    Ok(result)
}

fn exterior(rings: &[Vec<Position>]) -> Result<&[Position], EditError> {
    rings
        .first()
        .map(Vec::as_slice)
        .ok_or(EditError::IndexOutOfRange { index: 0, len: 0 })
}

fn with_exterior(rings: &[Vec<Position>], exterior: Vec<Position>) -> GeometryValue {
    let mut rings = rings.to_vec();
    rings[0] = exterior;
    GeometryValue::Polygon(rings)
}

/// Insert a midpoint vertex after `index`. Returns the new geometry and the
/// index the inserted vertex landed on.
pub fn insert_point(
    geometry: &GeometryValue,
    index: usize,
) -> Result<(GeometryValue, usize), EditError> {
    match geometry {
        GeometryValue::LineString(points) => {
            let points = insert_after(points, index)?;
            Ok((GeometryValue::LineString(points), index + 1))
        }
        GeometryValue::Polygon(rings) => {
            let ring = exterior(rings)?;
            check_index(ring, index)?;
            // The closing position is vertex 0 seen from the other end
            let index = if is_closed_ring(ring) && index == ring.len() - 1 {
                0
            } else {
                index
            };
            let ring = insert_after(ring, index)?;
            Ok((with_exterior(rings, ring), index + 1))
        }
        other => Err(EditError::Unsupported(other.kind())),
    }
}

/// Delete the vertex at `index`, refusing to go below the kind's minimum
pub fn delete_point(geometry: &GeometryValue, index: usize) -> Result<GeometryValue, EditError> {
    match geometry {
        GeometryValue::Point(_) => {
            check_index(&[Position::default()], index)?;
            Err(EditError::TooFewPoints {
                kind: GeometryKind::Point,
                min: 1,
            })
        }
        GeometryValue::LineString(points) => {
            let points = delete(points, index, MIN_LINE_POINTS, GeometryKind::LineString)?;
            Ok(GeometryValue::LineString(points))
        }
        GeometryValue::Polygon(rings) => {
            let ring = exterior(rings)?;
            check_index(ring, index)?;

            if !is_closed_ring(ring) {
                let ring = delete(ring, index, MIN_RING_VERTICES, GeometryKind::Polygon)?;
                return Ok(with_exterior(rings, ring));
            }

            let min_len = MIN_RING_VERTICES + 1;
            if index == 0 || index == ring.len() - 1 {
                // Dropping the shared endpoint: the next vertex becomes both ends
                let mut ring = delete(ring, 0, min_len, GeometryKind::Polygon)?;
                let last = ring.len() - 1;
                ring[last] = ring[0];
                Ok(with_exterior(rings, ring))
            } else {
                let ring = delete(ring, index, min_len, GeometryKind::Polygon)?;
                Ok(with_exterior(rings, ring))
            }
        }
        other => Err(EditError::Unsupported(other.kind())),
    }
}

/// Move the vertex at `index` to `position`. Moving either end of a closed
/// exterior ring moves both.
pub fn update_drag(
    geometry: &GeometryValue,
    index: usize,
    position: Position,
) -> Result<GeometryValue, EditError> {
    match geometry {
        GeometryValue::Point(_) => {
            check_index(&[Position::default()], index)?;
            Ok(GeometryValue::Point(position))
        }
        GeometryValue::LineString(points) => {
            check_index(points, index)?;
            let mut points = points.clone();
            points[index] = position;
            Ok(GeometryValue::LineString(points))
        }
        GeometryValue::Polygon(rings) => {
            let ring = exterior(rings)?;
            check_index(ring, index)?;

            let last = ring.len() - 1;
            let closed = is_closed_ring(ring);
            let mut ring = ring.to_vec();
            if closed && (index == 0 || index == last) {
                ring[0] = position;
                ring[last] = position;
            } else {
                ring[index] = position;
            }
            Ok(with_exterior(rings, ring))
        }
        other => Err(EditError::Unsupported(other.kind())),
    }
}

/// Build a LineString feature from the selected vertices, in selection order.
///
/// The new feature copies the source's properties and is renamed
/// "Unnamed segment".
pub fn duplicate_selection(source: &Feature, selection: &[usize]) -> Result<Feature, EditError> {
    if selection.is_empty() {
        return Err(EditError::EmptySelection);
    }

    let points = editable_points(&source.geometry)?;
    let coords = selection
        .iter()
        .map(|&index| {
            points
                .get(index)
                .copied()
                .ok_or(EditError::IndexOutOfRange {
                    index,
                    len: points.len(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if coords.len() < MIN_LINE_POINTS {
        return Err(EditError::TooFewPoints {
            kind: GeometryKind::LineString,
            min: MIN_LINE_POINTS,
        });
    }

    let mut feature = Feature::new(GeometryValue::LineString(coords));
    feature.properties = source.properties.clone();
    feature.properties.insert(NAME_KEY.to_string(), SEGMENT_NAME.into());
    Ok(feature)
}
