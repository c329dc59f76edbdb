use std::fmt;

use serde::{Deserialize, Serialize};

use super::Position;

/// Closed sequence of positions. For a polygon, ring 0 is the exterior and
/// the rest are holes.
pub type Ring = Vec<Position>;

/// Tag of a [`GeometryValue`] without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryKind {
    /// The GeoJSON `type` string
    pub fn type_name(&self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::MultiPoint => "MultiPoint",
            GeometryKind::LineString => "LineString",
            GeometryKind::MultiLineString => "MultiLineString",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPolygon => "MultiPolygon",
            GeometryKind::GeometryCollection => "GeometryCollection",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A vector geometry with its coordinate payload.
///
/// Values are never mutated in place by the editor; edits build a new value
/// from the old coordinates and the caller swaps it into the owning feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "GeometryRecord", into = "GeometryRecord")]
pub enum GeometryValue {
    Point(Position),
    MultiPoint(Vec<Position>),
    LineString(Vec<Position>),
    MultiLineString(Vec<Vec<Position>>),
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
    GeometryCollection(Vec<GeometryValue>),
}

impl GeometryValue {
    pub fn point(position: Position) -> Self {
        GeometryValue::Point(position)
    }

    pub fn multi_point(positions: Vec<Position>) -> Self {
        GeometryValue::MultiPoint(positions)
    }

    pub fn line_string(positions: Vec<Position>) -> Self {
        GeometryValue::LineString(positions)
    }

    pub fn multi_line_string(lines: Vec<Vec<Position>>) -> Self {
        GeometryValue::MultiLineString(lines)
    }

    pub fn polygon(rings: Vec<Ring>) -> Self {
        GeometryValue::Polygon(rings)
    }

    pub fn multi_polygon(polygons: Vec<Vec<Ring>>) -> Self {
        GeometryValue::MultiPolygon(polygons)
    }

    pub fn collection(geometries: Vec<GeometryValue>) -> Self {
        GeometryValue::GeometryCollection(geometries)
    }

    pub fn kind(&self) -> GeometryKind {
        match self {
            GeometryValue::Point(_) => GeometryKind::Point,
            GeometryValue::MultiPoint(_) => GeometryKind::MultiPoint,
            GeometryValue::LineString(_) => GeometryKind::LineString,
            GeometryValue::MultiLineString(_) => GeometryKind::MultiLineString,
            GeometryValue::Polygon(_) => GeometryKind::Polygon,
            GeometryValue::MultiPolygon(_) => GeometryKind::MultiPolygon,
            GeometryValue::GeometryCollection(_) => GeometryKind::GeometryCollection,
        }
    }
}

// Typed accessors; editing code matches on the enum directly
#[allow(dead_code)]
impl GeometryValue {
    pub fn as_point(&self) -> Option<Position> {
        match self {
            GeometryValue::Point(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_multi_point(&self) -> Option<&[Position]> {
        match self {
            GeometryValue::MultiPoint(points) => Some(points),
            _ => None,
        }
    }

    pub fn as_line_string(&self) -> Option<&[Position]> {
        match self {
            GeometryValue::LineString(points) => Some(points),
            _ => None,
        }
    }

    pub fn as_multi_line_string(&self) -> Option<&[Vec<Position>]> {
        match self {
            GeometryValue::MultiLineString(lines) => Some(lines),
            _ => None,
        }
    }

    pub fn as_polygon(&self) -> Option<&[Ring]> {
        match self {
            GeometryValue::Polygon(rings) => Some(rings),
            _ => None,
        }
    }

    pub fn as_multi_polygon(&self) -> Option<&[Vec<Ring>]> {
        match self {
            GeometryValue::MultiPolygon(polygons) => Some(polygons),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&[GeometryValue]> {
        match self {
            GeometryValue::GeometryCollection(children) => Some(children),
            _ => None,
        }
    }
}

impl GeometryValue {
    /// True when the geometry holds at least one position.
    ///
    /// Collections are searched through every child, so an empty first child
    /// does not hide coordinates further along.
    pub fn has_coordinates(&self) -> bool {
        match self {
            GeometryValue::Point(_) => true,
            GeometryValue::MultiPoint(points) | GeometryValue::LineString(points) => {
                !points.is_empty()
            }
            GeometryValue::MultiLineString(lines) | GeometryValue::Polygon(lines) => {
                lines.iter().any(|l| !l.is_empty())
            }
            GeometryValue::MultiPolygon(polygons) => polygons
                .iter()
                .any(|rings| rings.iter().any(|r| !r.is_empty())),
            GeometryValue::GeometryCollection(children) => {
                children.iter().any(GeometryValue::has_coordinates)
            }
        }
    }

    /// Visit every position, recursing into rings, parts and children
    pub fn for_each_position(&self, f: &mut impl FnMut(Position)) {
        match self {
            GeometryValue::Point(p) => f(*p),
            GeometryValue::MultiPoint(points) | GeometryValue::LineString(points) => {
                points.iter().copied().for_each(&mut *f)
            }
            GeometryValue::MultiLineString(lines) | GeometryValue::Polygon(lines) => lines
                .iter()
                .flatten()
                .copied()
                .for_each(&mut *f),
            GeometryValue::MultiPolygon(polygons) => polygons
                .iter()
                .flatten()
                .flatten()
                .copied()
                .for_each(&mut *f),
            GeometryValue::GeometryCollection(children) => {
                for child in children {
                    child.for_each_position(f);
                }
            }
        }
    }

    pub fn position_count(&self) -> usize {
        let mut count = 0;
        self.for_each_position(&mut |_| count += 1);
        count
    }
}

/// GeoJSON wire shape of a geometry
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
enum GeometryRecord {
    Point { coordinates: Position },
    MultiPoint { coordinates: Vec<Position> },
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    Polygon { coordinates: Vec<Ring> },
    MultiPolygon { coordinates: Vec<Vec<Ring>> },
    GeometryCollection { geometries: Vec<GeometryValue> },
}

impl From<GeometryRecord> for GeometryValue {
    fn from(record: GeometryRecord) -> Self {
        match record {
            GeometryRecord::Point { coordinates } => GeometryValue::Point(coordinates),
            GeometryRecord::MultiPoint { coordinates } => GeometryValue::MultiPoint(coordinates),
            GeometryRecord::LineString { coordinates } => GeometryValue::LineString(coordinates),
            GeometryRecord::MultiLineString { coordinates } => {
                GeometryValue::MultiLineString(coordinates)
            }
            GeometryRecord::Polygon { coordinates } => GeometryValue::Polygon(coordinates),
            GeometryRecord::MultiPolygon { coordinates } => {
                GeometryValue::MultiPolygon(coordinates)
            }
            GeometryRecord::GeometryCollection { geometries } => {
                GeometryValue::GeometryCollection(geometries)
            }
        }
    }
}

impl From<GeometryValue> for GeometryRecord {
    fn from(value: GeometryValue) -> Self {
        match value {
            GeometryValue::Point(coordinates) => GeometryRecord::Point { coordinates },
            GeometryValue::MultiPoint(coordinates) => GeometryRecord::MultiPoint { coordinates },
            GeometryValue::LineString(coordinates) => GeometryRecord::LineString { coordinates },
            GeometryValue::MultiLineString(coordinates) => {
                GeometryRecord::MultiLineString { coordinates }
            }
            GeometryValue::Polygon(coordinates) => GeometryRecord::Polygon { coordinates },
            GeometryValue::MultiPolygon(coordinates) => {
                GeometryRecord::MultiPolygon { coordinates }
            }
            GeometryValue::GeometryCollection(geometries) => {
                GeometryRecord::GeometryCollection { geometries }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(lon: f64, lat: f64) -> Position {
        Position::new(lon, lat)
    }

    #[test]
    fn test_accessors_match_tag_only() {
        let line = GeometryValue::line_string(vec![p(0.0, 0.0), p(1.0, 1.0)]);
        assert_eq!(line.as_line_string().map(|c| c.len()), Some(2));
        assert!(line.as_polygon().is_none());
        assert!(line.as_point().is_none());
        assert!(line.as_multi_point().is_none());
        assert_eq!(line.kind(), GeometryKind::LineString);
    }

    #[test]
    fn test_has_coordinates() {
        assert!(GeometryValue::point(p(0.0, 0.0)).has_coordinates());
        assert!(!GeometryValue::line_string(vec![]).has_coordinates());
        assert!(!GeometryValue::polygon(vec![vec![]]).has_coordinates());
        assert!(!GeometryValue::collection(vec![]).has_coordinates());
    }

    #[test]
    fn test_collection_with_empty_first_child_has_coordinates() {
        let collection = GeometryValue::collection(vec![
            GeometryValue::line_string(vec![]),
            GeometryValue::point(p(3.0, 4.0)),
        ]);
        assert!(collection.has_coordinates());
    }

    #[test]
    fn test_position_count_recurses() {
        let collection = GeometryValue::collection(vec![
            GeometryValue::point(p(0.0, 0.0)),
            GeometryValue::polygon(vec![
                vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 0.0)],
                vec![p(0.2, 0.2), p(0.4, 0.2), p(0.4, 0.4), p(0.2, 0.2)],
            ]),
        ]);
        assert_eq!(collection.position_count(), 9);
    }

    #[test]
    fn test_geojson_shape() {
        let line = GeometryValue::line_string(vec![p(1.0, 2.0), p(3.0, 4.0)]);
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "type": "LineString", "coordinates": [[1.0, 2.0], [3.0, 4.0]] })
        );
    }

    #[test]
    fn test_collection_uses_geometries_key() {
        let json = serde_json::json!({
            "type": "GeometryCollection",
            "geometries": [{ "type": "Point", "coordinates": [5.0, 6.0] }]
        });
        let value: GeometryValue = serde_json::from_value(json).unwrap();
        assert_eq!(
            value,
            GeometryValue::collection(vec![GeometryValue::point(p(5.0, 6.0))])
        );
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let json = serde_json::json!({ "type": "Circle", "coordinates": [0.0, 0.0] });
        assert!(serde_json::from_value::<GeometryValue>(json).is_err());
    }

    #[test]
    fn test_payload_shape_mismatch_is_rejected() {
        // A Point carrying a LineString payload
        let json = serde_json::json!({ "type": "Point", "coordinates": [[0.0, 0.0]] });
        assert!(serde_json::from_value::<GeometryValue>(json).is_err());
    }
}
