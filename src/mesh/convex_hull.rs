//! Convex hull of a point set as a triangulated `SurfaceMesh`.
//!
//! Uses the chull library for the 3D hull computation.

use crate::errors::{GeometryError, Result};
use crate::float_types::Real;
use crate::mesh::{MeshIndex, SurfaceMesh};
use chull::ConvexHullWrapper;
use nalgebra::{Point3, Vector3};

impl<I: MeshIndex> SurfaceMesh<I> {
    /// Triangulated convex hull of `points`, with every face wound outward.
    ///
    /// Only hull vertices are kept. Fewer than 4 points, or a point set the
    /// hull backend rejects (e.g. coplanar points), is a `ConvexHull` error.
    pub fn convex_hull(points: &[Point3<Real>]) -> Result<Self> {
        if points.len() < 4 {
            return Err(GeometryError::ConvexHull(format!(
                "need at least 4 points for a 3D convex hull, got {}",
                points.len()
            )));
        }

        let input: Vec<Vec<Real>> = points.iter().map(|p| vec![p.x, p.y, p.z]).collect();
        let hull = ConvexHullWrapper::try_new(&input, None)
            .map_err(|e| GeometryError::ConvexHull(format!("convex hull computation failed: {e:?}")))?;
        let (hull_vertices, hull_indices) = hull.vertices_indices();

        let vertices: Vec<Point3<Real>> = hull_vertices
            .iter()
            .map(|v| Point3::new(v[0], v[1], v[2]))
            .collect();
        let centre = Point3::from(
            vertices.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords) / vertices.len().max(1) as Real,
        );

        let mut faces = Vec::with_capacity(hull_indices.len() / 3);
        for tri in hull_indices.chunks_exact(3) {
            let (a, b, c) = (tri[0], tri[1], tri[2]);
            let (pa, pb, pc) = (
                vertices.get(a).copied(),
                vertices.get(b).copied(),
                vertices.get(c).copied(),
            );
            let (Some(pa), Some(pb), Some(pc)) = (pa, pb, pc) else {
                return Err(GeometryError::ConvexHull(format!(
                    "hull face ({a}, {b}, {c}) references a missing vertex"
                )));
            };
            let outward = (pb - pa).cross(&(pc - pa)).dot(&(pa - centre)) >= 0.0;
            faces.push(if outward { vec![a, b, c] } else { vec![a, c, b] });
        }

        Self::from_parts(vertices, faces)
    }
}
