//! `SurfaceMesh` struct: a face-vertex surface mesh with a cached vertex→face index.
//!
//! Vertices and faces live in flat arrays addressed by integer indices. The
//! `involved_faces` index is derived data: every structural edit leaves it
//! empty and [`SurfaceMesh::recreate_involved_face_index`] rebuilds it.

use crate::contour::{Metadata, vector_area_of};
use crate::errors::{GeometryError, Result};
use crate::float_types::Real;
use crate::traits::TransformOps;
use hashbrown::HashMap;
use log::warn;
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};
use std::fmt::Debug;
use std::hash::Hash;

pub mod adjacency;
pub mod cleanup;
pub mod manifold;
pub mod simplify;

/// Convex hull construction for SurfaceMesh
#[cfg(feature = "chull-io")]
pub mod convex_hull;

pub use adjacency::{Circulator, CirculatorFailure, CirculatorRecord};
pub use manifold::EdgeAnalysis;
pub use simplify::{SimplificationReport, SimplifyFailure};

/// Unsigned integer type used to store vertex indices inside faces.
pub trait MeshIndex: Copy + Eq + Ord + Hash + Debug + Send + Sync + 'static {
    /// `None` if `index` does not fit in this index type.
    fn from_usize(index: usize) -> Option<Self>;
    fn to_usize(self) -> usize;
}

macro_rules! impl_mesh_index {
    ($($t:ty),*) => {
        $(
            impl MeshIndex for $t {
                #[inline]
                fn from_usize(index: usize) -> Option<Self> {
                    <$t>::try_from(index).ok()
                }

                #[inline]
                fn to_usize(self) -> usize {
                    self as usize
                }
            }
        )*
    };
}

impl_mesh_index!(u16, u32, u64, usize);

/// Face-vertex surface mesh.
///
/// `vertex_normals` and `vertex_colours` are optional: each is either empty or
/// exactly as long as `vertices`. Faces are ordered index lists; most
/// algorithms expect triangles, and a face with fewer than 3 indices is
/// degenerate.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceMesh<I: MeshIndex = u32> {
    pub vertices: Vec<Point3<Real>>,
    pub vertex_normals: Vec<Vector3<Real>>,
    /// Packed colours, one per vertex (format left to the caller)
    pub vertex_colours: Vec<u32>,
    pub faces: Vec<Vec<I>>,
    /// For each vertex, the faces that reference it. Stale after any edit.
    pub involved_faces: Vec<Vec<usize>>,
    pub metadata: Metadata,
}

impl<I: MeshIndex> Default for SurfaceMesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> SurfaceMesh<I> {
    pub fn new() -> Self {
        SurfaceMesh {
            vertices: Vec::new(),
            vertex_normals: Vec::new(),
            vertex_colours: Vec::new(),
            faces: Vec::new(),
            involved_faces: Vec::new(),
            metadata: Metadata::new(),
        }
    }

    /// Build a mesh from positions and `usize` faces, checking every index.
    pub fn from_parts(vertices: Vec<Point3<Real>>, faces: Vec<Vec<usize>>) -> Result<Self> {
        let count = vertices.len();
        let faces = faces
            .into_iter()
            .enumerate()
            .map(|(face, indices)| {
                indices
                    .into_iter()
                    .map(|index| {
                        if index >= count {
                            return Err(GeometryError::IndexOutOfRange { face, index, count });
                        }
                        I::from_usize(index).ok_or_else(|| {
                            GeometryError::InvalidArgument(format!(
                                "vertex index {index} does not fit the mesh index type"
                            ))
                        })
                    })
                    .collect::<Result<Vec<I>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(SurfaceMesh {
            vertices,
            faces,
            ..Self::new()
        })
    }

    /// Check that the optional per-vertex arrays are empty or match the vertex count.
    pub fn validate_attribute_arrays(&self) -> Result<()> {
        let expected = self.vertices.len();
        if !self.vertex_normals.is_empty() && self.vertex_normals.len() != expected {
            return Err(GeometryError::MismatchedArrayLength {
                name: "vertex_normals",
                len: self.vertex_normals.len(),
                expected,
            });
        }
        if !self.vertex_colours.is_empty() && self.vertex_colours.len() != expected {
            return Err(GeometryError::MismatchedArrayLength {
                name: "vertex_colours",
                len: self.vertex_colours.len(),
                expected,
            });
        }
        Ok(())
    }

    /// Check that every face index refers to an existing vertex.
    pub fn check_face_indices(&self) -> Result<()> {
        let count = self.vertices.len();
        for (face, indices) in self.faces.iter().enumerate() {
            if let Some(index) = indices.iter().map(|i| i.to_usize()).find(|&i| i >= count) {
                return Err(GeometryError::IndexOutOfRange { face, index, count });
            }
        }
        Ok(())
    }

    /// Positions of the vertices of face `face`, or `None` if it does not exist
    /// or references a missing vertex.
    pub fn face_points(&self, face: usize) -> Option<Vec<Point3<Real>>> {
        self.faces
            .get(face)?
            .iter()
            .map(|i| self.vertices.get(i.to_usize()).copied())
            .collect()
    }

    /// Unit normal of a face following its winding; `None` for degenerate faces.
    pub fn face_normal(&self, face: usize) -> Option<Vector3<Real>> {
        let va = vector_area_of(&self.face_points(face)?);
        let len = va.norm();
        (len.is_finite() && len > Real::EPSILON).then(|| va / len)
    }

    /// Area of a (planar) face; 0 for degenerate or missing faces.
    pub fn face_area(&self, face: usize) -> Real {
        self.face_points(face)
            .map(|pts| vector_area_of(&pts).norm())
            .unwrap_or(0.0)
    }

    pub fn surface_area(&self) -> Real {
        (0..self.faces.len()).map(|f| self.face_area(f)).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.iter().filter(|f| f.len() == 3).count()
    }

    /// Number of faces using each undirected edge, keyed by `(min, max)` vertex index.
    pub fn edge_multiplicity(&self) -> HashMap<(usize, usize), usize> {
        let mut counts = HashMap::new();
        for face in &self.faces {
            for (a, b) in face_edges(face) {
                *counts.entry(edge_key(a, b)).or_insert(0) += 1;
            }
        }
        counts
    }
}

/// Undirected edge key with the smaller index first.
#[inline]
pub(crate) const fn edge_key(a: usize, b: usize) -> (usize, usize) {
    if a < b { (a, b) } else { (b, a) }
}

/// Directed edges of a face, including the closing edge. Degenerate faces
/// (fewer than 3 indices) have none.
pub(crate) fn face_edges<I: MeshIndex>(face: &[I]) -> impl Iterator<Item = (usize, usize)> + '_ {
    let n = face.len();
    let count = if n < 3 { 0 } else { n };
    (0..count).map(move |i| (face[i].to_usize(), face[(i + 1) % n].to_usize()))
}

impl<I: MeshIndex> TransformOps for SurfaceMesh<I> {
    /// Transform positions by `matrix` and normals by its inverse transpose.
    fn transform(&self, matrix: &Matrix4<Real>) -> Self {
        let normal_matrix: Matrix3<Real> = match matrix.fixed_view::<3, 3>(0, 0).into_owned().try_inverse() {
            Some(inv) => inv.transpose(),
            None => {
                warn!("Singular transform applied to mesh; vertex normals left unchanged");
                Matrix3::identity()
            },
        };

        let mut mesh = self.clone();
        for v in &mut mesh.vertices {
            *v = matrix.transform_point(v);
        }
        for n in &mut mesh.vertex_normals {
            let t = normal_matrix * *n;
            let len = t.norm();
            if len > Real::EPSILON {
                *n = t / len;
            }
        }
        mesh
    }
}
