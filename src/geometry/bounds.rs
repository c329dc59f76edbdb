//! Bounding boxes over geometries, used to fit the viewport on import,
//! recenter and feature focus.

use super::{GeometryValue, Position};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    pub fn from_position(pos: Position) -> Self {
        Self {
            min_lat: pos.lat,
            max_lat: pos.lat,
            min_lon: pos.lon,
            max_lon: pos.lon,
        }
    }

    pub fn include(&mut self, pos: Position) {
        self.min_lat = self.min_lat.min(pos.lat);
        self.max_lat = self.max_lat.max(pos.lat);
        self.min_lon = self.min_lon.min(pos.lon);
        self.max_lon = self.max_lon.max(pos.lon);
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.lat >= self.min_lat
            && pos.lat <= self.max_lat
            && pos.lon >= self.min_lon
            && pos.lon <= self.max_lon
    }

    pub fn center(&self) -> Position {
        Position::new(
            (self.min_lon + self.max_lon) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }

    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Grow each side by `padding_factor` of the span on that axis, then widen
    /// any axis narrower than `min_span` around the center.
    pub fn padded(&self, padding_factor: f64, min_span: f64) -> Bounds {
        let center = self.center();
        let lat_span = (self.lat_span() * (1.0 + 2.0 * padding_factor)).max(min_span);
        let lon_span = (self.lon_span() * (1.0 + 2.0 * padding_factor)).max(min_span);

        Bounds {
            min_lat: center.lat - lat_span / 2.0,
            max_lat: center.lat + lat_span / 2.0,
            min_lon: center.lon - lon_span / 2.0,
            max_lon: center.lon + lon_span / 2.0,
        }
    }
}

/// Box covering every finite position in `geometries`, including polygon holes
/// and every collection child. `None` when no finite position exists.
pub fn compute_bounds<'a>(
    geometries: impl IntoIterator<Item = &'a GeometryValue>,
) -> Option<Bounds> {
    let mut bounds: Option<Bounds> = None;

    for geometry in geometries {
        geometry.for_each_position(&mut |pos| {
            if !pos.is_finite() {
                return;
            }
            bounds = Some(match bounds {
                Some(mut b) => {
                    b.include(pos);
                    b
                }
                None => Bounds::from_position(pos),
            });
        });
    }

    bounds
}
