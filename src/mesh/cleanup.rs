//! Garbage collection and vertex welding for `SurfaceMesh`.
//!
//! Every operation here renumbers vertices or faces, so each one leaves
//! `involved_faces` empty when it changes anything.

use crate::errors::{GeometryError, Result};
use crate::float_types::Real;
use crate::mesh::{MeshIndex, SurfaceMesh};

impl<I: MeshIndex> SurfaceMesh<I> {
    /// Drop vertices that no face references and renumber the faces.
    ///
    /// Normals and colours are compacted alongside the vertices. Returns the
    /// number of vertices removed.
    pub fn remove_disconnected_vertices(&mut self) -> Result<usize> {
        self.validate_attribute_arrays()?;
        self.check_face_indices()?;

        let mut used = vec![false; self.vertices.len()];
        for face in &self.faces {
            for v in face {
                used[v.to_usize()] = true;
            }
        }

        let mut remap = vec![None; self.vertices.len()];
        let mut kept = 0;
        for (old, &is_used) in used.iter().enumerate() {
            if is_used {
                remap[old] = Some(kept);
                kept += 1;
            }
        }
        let removed = self.vertices.len() - kept;
        if removed == 0 {
            return Ok(0);
        }

        self.vertices = retain_used(std::mem::take(&mut self.vertices), &used);
        if !self.vertex_normals.is_empty() {
            self.vertex_normals = retain_used(std::mem::take(&mut self.vertex_normals), &used);
        }
        if !self.vertex_colours.is_empty() {
            self.vertex_colours = retain_used(std::mem::take(&mut self.vertex_colours), &used);
        }

        for face in &mut self.faces {
            for v in face.iter_mut() {
                *v = remap[v.to_usize()]
                    .and_then(I::from_usize)
                    .ok_or_else(|| GeometryError::Logic("referenced vertex was not kept".to_string()))?;
            }
        }

        self.involved_faces.clear();
        Ok(removed)
    }

    /// Drop faces with fewer than 3 indices, returning how many were removed.
    pub fn remove_degenerate_faces(&mut self) -> usize {
        let before = self.faces.len();
        self.faces.retain(|f| f.len() >= 3);
        let removed = before - self.faces.len();
        if removed > 0 {
            self.involved_faces.clear();
        }
        removed
    }

    /// Weld vertices lying within `distance` of an earlier vertex.
    ///
    /// Clusters are grown greedily from the lowest index, which keeps its
    /// position and attributes. Faces are remapped, repeated consecutive
    /// indices collapsed, and faces left with fewer than 3 indices removed
    /// along with the welded-away vertices. A `distance` of 0 welds only
    /// exact duplicates. Returns the number of vertices merged away.
    pub fn merge_duplicate_vertices(&mut self, distance: Real) -> Result<usize> {
        if !(distance.is_finite() && distance >= 0.0) {
            return Err(GeometryError::InvalidArgument(format!(
                "merge distance must be non-negative and finite, got {distance}"
            )));
        }
        self.validate_attribute_arrays()?;
        self.check_face_indices()?;

        let n = self.vertices.len();
        let mut representative: Vec<usize> = (0..n).collect();
        for i in 0..n {
            if representative[i] != i {
                continue;
            }
            for j in (i + 1)..n {
                if representative[j] == j && (self.vertices[i] - self.vertices[j]).norm() <= distance {
                    representative[j] = i;
                }
            }
        }
        let merged = representative.iter().enumerate().filter(|&(i, &r)| r != i).count();
        if merged == 0 {
            return Ok(0);
        }

        for face in &mut self.faces {
            let mut remapped = Vec::with_capacity(face.len());
            for v in face.iter() {
                let r = I::from_usize(representative[v.to_usize()])
                    .ok_or_else(|| GeometryError::Logic("representative index does not fit".to_string()))?;
                remapped.push(r);
            }
            remapped.dedup();
            while remapped.len() > 1 && remapped.first() == remapped.last() {
                remapped.pop();
            }
            *face = remapped;
        }

        self.remove_degenerate_faces();
        self.remove_disconnected_vertices()?;
        self.involved_faces.clear();
        Ok(merged)
    }
}

fn retain_used<T>(items: Vec<T>, used: &[bool]) -> Vec<T> {
    items
        .into_iter()
        .zip(used)
        .filter_map(|(item, &keep)| keep.then_some(item))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point3, Vector3};

    #[test]
    fn disconnected_vertices_are_compacted_with_attributes() {
        let mut mesh: SurfaceMesh = SurfaceMesh::from_parts(
            vec![
                Point3::new(9.0, 9.0, 9.0),
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![vec![1, 2, 3]],
        )
        .unwrap();
        mesh.vertex_colours = vec![0, 1, 2, 3];
        mesh.vertex_normals = vec![Vector3::z(); 4];
        assert_eq!(mesh.remove_disconnected_vertices().unwrap(), 1);
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.vertex_colours, vec![1, 2, 3]);
        assert_eq!(mesh.vertex_normals.len(), 3);
        assert_eq!(mesh.faces, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn welding_collapses_sliver() {
        let mut mesh: SurfaceMesh = SurfaceMesh::from_parts(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(1.0, 1e-9, 0.0),
            ],
            vec![vec![0, 1, 2], vec![0, 3, 1]],
        )
        .unwrap();
        assert_eq!(mesh.merge_duplicate_vertices(1e-6).unwrap(), 1);
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.faces, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn negative_weld_distance_is_rejected() {
        let mut mesh: SurfaceMesh = SurfaceMesh::new();
        assert!(mesh.merge_duplicate_vertices(-1.0).is_err());
    }
}
