//! Crate-wide error type

use crate::float_types::Real;
use nalgebra::Point3;

/// Convenience alias used by every fallible operation in the crate.
pub type Result<T> = std::result::Result<T, GeometryError>;

/// All the hard failures an operation can report.
///
/// Recoverable, per-element problems (duplicate point repair, per-vertex
/// simplification skips) never surface as a `GeometryError`; they are logged
/// and handled where they occur.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// A closed contour crossed a plane an odd number of times
    #[error("(OddCrossingCount) Contour crosses the plane an odd number of times ({0})")]
    OddCrossingCount(usize),
    /// An edge was classified as crossing the plane but no intersection could be computed
    #[error("(IntersectionNotFound) Edge {start} -> {end} should cross the plane but does not")]
    IntersectionNotFound { start: Point3<Real>, end: Point3<Real> },
    /// Caller supplied an argument outside the accepted domain
    #[error("(InvalidArgument) {0}")]
    InvalidArgument(String),
    /// Optional per-vertex arrays do not match the vertex count
    #[error("(MismatchedArrayLength) {name} has {len} entries but the mesh has {expected} vertices")]
    MismatchedArrayLength { name: &'static str, len: usize, expected: usize },
    /// A face references a vertex that does not exist
    #[error("(IndexOutOfRange) Face {face} references vertex {index} (vertex count {count})")]
    IndexOutOfRange { face: usize, index: usize, count: usize },
    /// A geometric input is too degenerate for the requested computation
    #[error("(Degenerate) {0}")]
    Degenerate(String),
    /// An internal invariant was violated
    #[error("(Logic) {0}")]
    Logic(String),
    /// The convex hull backend rejected the input
    #[error("(ConvexHull) {0}")]
    ConvexHull(String),
}
