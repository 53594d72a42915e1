mod detection;
mod geom;
mod settings;

pub mod math;

pub use detection::*;
pub use geom::*;
pub use settings::*;

/// A point or vector in the reference frame, in pixels.
pub type Vector2 = nalgebra::Vector2<f64>;
