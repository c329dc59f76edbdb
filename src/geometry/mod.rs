//! Geometry model: positions, the geometry sum type, property values and
//! bounds. Pure data with no Bevy dependencies.

mod bounds;
mod position;
mod property;
mod value;

pub use bounds::{compute_bounds, Bounds};
pub use position::Position;
pub use property::{Properties, PropertyValue, NAME_KEY};
pub use value::{GeometryKind, GeometryValue, Ring};
