//! Basic geometric primitives consumed by the contour and mesh algorithms.

pub mod line;
pub mod plane;

pub use line::{Line, LineSegment};
pub use plane::Plane;
