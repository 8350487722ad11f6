//! Planar **contour** manipulation and triangulated **surface mesh** editing.
//!
//! - [`Contour`]s can be cut by a [`Plane`](geometry::Plane) into pieces lying on
//!   either side of it, split into a core and a peel, and grouped into a
//!   [`ContourCollection`] whose total area can be bisected by a moving plane.
//! - [`SurfaceMesh`]es carry a vertex→face adjacency index, a per-vertex face
//!   circulator, and [`simplify_inner_triangles`](SurfaceMesh::simplify_inner_triangles),
//!   which removes interior vertices of flat patches and re-triangulates them.
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//! - **chull-io**: convex hull of a point set as a `SurfaceMesh`
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **parallel**: use rayon to split the contours of a collection in parallel

#![forbid(unsafe_code)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod contour;
pub mod errors;
pub mod float_types;
pub mod geometry;
pub mod mesh;
pub mod traits;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use contour::{AreaBisection, BisectionOptions, Contour, ContourCollection, Metadata};
pub use errors::{GeometryError, Result};
pub use float_types::Real;
pub use geometry::{Line, LineSegment, Plane};
pub use mesh::{EdgeAnalysis, MeshIndex, SimplificationReport, SurfaceMesh};
pub use traits::TransformOps;
