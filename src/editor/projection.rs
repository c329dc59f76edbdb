use bevy::prelude::*;

use crate::constants::WORLD_UNITS_PER_DEGREE;
use crate::geometry::Position;

/// Equirectangular mapping between geographic positions and world units.
///
/// World coordinates are f32, so positions are taken relative to `origin`,
/// which import moves to the centre of the loaded data.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct MapProjection {
    pub origin: Position,
    pub units_per_degree: f64,
}

impl Default for MapProjection {
    fn default() -> Self {
        Self {
            origin: Position::default(),
            units_per_degree: WORLD_UNITS_PER_DEGREE,
        }
    }
}

impl MapProjection {
    pub fn to_world(&self, position: Position) -> Vec2 {
        Vec2::new(
            ((position.lon - self.origin.lon) * self.units_per_degree) as f32,
            ((position.lat - self.origin.lat) * self.units_per_degree) as f32,
        )
    }

    pub fn to_position(&self, world: Vec2) -> Position {
        Position::new(
            self.origin.lon + world.x as f64 / self.units_per_degree,
            self.origin.lat + world.y as f64 / self.units_per_degree,
        )
    }

    /// World length of a span given in degrees
    pub fn degrees_to_world(&self, degrees: f64) -> f32 {
        (degrees * self.units_per_degree) as f32
    }
}
