use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// A longitude/latitude pair in degrees. Altitude is not carried.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub lon: f64,
    pub lat: f64,
}

impl Position {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Arithmetic mean of both axes
    pub fn midpoint(self, other: Position) -> Position {
        Position::new((self.lon + other.lon) / 2.0, (self.lat + other.lat) / 2.0)
    }

    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }
}

impl From<[f64; 2]> for Position {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Position::new(lon, lat)
    }
}

impl From<Position> for [f64; 2] {
    fn from(pos: Position) -> Self {
        [pos.lon, pos.lat]
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.lon, self.lat].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<f64>::deserialize(deserializer)?;
        match values.as_slice() {
            // A trailing altitude is accepted and dropped
            [lon, lat] | [lon, lat, _] => Ok(Position::new(*lon, *lat)),
            _ => Err(de::Error::invalid_length(
                values.len(),
                &"a position of 2 or 3 numbers",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint() {
        let a = Position::new(10.0, 50.0);
        let b = Position::new(12.0, 52.0);
        assert_eq!(a.midpoint(b), Position::new(11.0, 51.0));
    }

    #[test]
    fn test_serializes_as_lon_lat_array() {
        let json = serde_json::to_string(&Position::new(8.5, 47.25)).unwrap();
        assert_eq!(json, "[8.5,47.25]");
    }

    #[test]
    fn test_altitude_is_dropped() {
        let pos: Position = serde_json::from_str("[8.5, 47.25, 412.0]").unwrap();
        assert_eq!(pos, Position::new(8.5, 47.25));
    }

    #[test]
    fn test_wrong_arity_is_rejected() {
        assert!(serde_json::from_str::<Position>("[8.5]").is_err());
        assert!(serde_json::from_str::<Position>("[1.0, 2.0, 3.0, 4.0]").is_err());
    }

    #[test]
    fn test_is_finite() {
        assert!(Position::new(1.0, 2.0).is_finite());
        assert!(!Position::new(f64::NAN, 2.0).is_finite());
        assert!(!Position::new(1.0, f64::INFINITY).is_finite());
    }
}
