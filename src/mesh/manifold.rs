//! Edge-manifold analysis and structural validation for `SurfaceMesh`

use crate::float_types::Real;
use crate::mesh::{MeshIndex, SurfaceMesh};
use hashbrown::HashSet;

/// Edge classification of a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EdgeAnalysis {
    /// Edges used by exactly one face
    pub boundary_edges: usize,
    /// Edges shared by exactly two faces
    pub manifold_edges: usize,
    /// Edges shared by more than two faces
    pub non_manifold_edges: usize,
    /// Vertices not referenced by any face
    pub isolated_vertices: usize,
}

impl EdgeAnalysis {
    /// No edge is shared by more than two faces.
    pub const fn is_manifold(&self) -> bool {
        self.non_manifold_edges == 0
    }

    /// Manifold and without boundary.
    pub const fn is_closed(&self) -> bool {
        self.is_manifold() && self.boundary_edges == 0
    }
}

impl<I: MeshIndex> SurfaceMesh<I> {
    /// Count boundary, manifold and non-manifold edges, plus isolated vertices.
    pub fn analyze_edges(&self) -> EdgeAnalysis {
        let mut analysis = EdgeAnalysis::default();
        for count in self.edge_multiplicity().into_values() {
            match count {
                1 => analysis.boundary_edges += 1,
                2 => analysis.manifold_edges += 1,
                _ => analysis.non_manifold_edges += 1,
            }
        }

        let used: HashSet<usize> = self
            .faces
            .iter()
            .flatten()
            .map(|v| v.to_usize())
            .collect();
        analysis.isolated_vertices = (0..self.vertices.len()).filter(|v| !used.contains(v)).count();
        analysis
    }

    /// Human-readable list of structural problems; empty if none were found.
    ///
    /// Reports attribute array mismatches, faces with fewer than 3 indices,
    /// repeated or out-of-range indices, zero-area faces, non-manifold edges and
    /// isolated vertices.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if let Err(e) = self.validate_attribute_arrays() {
            issues.push(e.to_string());
        }

        let count = self.vertices.len();
        for (i, face) in self.faces.iter().enumerate() {
            if face.len() < 3 {
                issues.push(format!("Face {i} has fewer than 3 vertices"));
            }
            let mut seen = HashSet::new();
            for idx in face.iter().map(|v| v.to_usize()) {
                if !seen.insert(idx) {
                    issues.push(format!("Face {i} has duplicate vertex index {idx}"));
                }
                if idx >= count {
                    issues.push(format!("Face {i} references out-of-bounds vertex index {idx}"));
                }
            }
            if face.len() >= 3 && self.face_points(i).is_some() && self.face_area(i) < Real::EPSILON {
                issues.push(format!("Face {i} has zero area"));
            }
        }

        let mut non_manifold: Vec<_> = self
            .edge_multiplicity()
            .into_iter()
            .filter(|&(_, c)| c > 2)
            .collect();
        non_manifold.sort_unstable();
        for ((a, b), c) in non_manifold {
            issues.push(format!(
                "Non-manifold edge between vertices {a} and {b} (shared by {c} faces)"
            ));
        }

        let used: HashSet<usize> = self.faces.iter().flatten().map(|v| v.to_usize()).collect();
        for v in (0..count).filter(|v| !used.contains(v)) {
            issues.push(format!("Vertex {v} is isolated (no adjacent faces)"));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn tetrahedron() -> SurfaceMesh {
        SurfaceMesh::from_parts(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(0.0, 0.0, 1.0),
            ],
            vec![vec![0, 2, 1], vec![0, 1, 3], vec![1, 2, 3], vec![0, 3, 2]],
        )
        .unwrap()
    }

    #[test]
    fn tetrahedron_is_closed() {
        let mesh = tetrahedron();
        let analysis = mesh.analyze_edges();
        assert_eq!(analysis.manifold_edges, 6);
        assert!(analysis.is_closed());
        assert!(mesh.validate().is_empty());
    }

    #[test]
    fn fin_is_non_manifold() {
        let mut mesh = tetrahedron();
        mesh.vertices.push(Point3::new(-1.0, -1.0, 0.0));
        mesh.vertices.push(Point3::new(5.0, 5.0, 5.0));
        mesh.faces.push(vec![0, 1, 4]);
        let analysis = mesh.analyze_edges();
        assert_eq!(analysis.non_manifold_edges, 1);
        assert_eq!(analysis.boundary_edges, 2);
        assert_eq!(analysis.isolated_vertices, 1);
        let issues = mesh.validate();
        assert!(issues.iter().any(|s| s.contains("Non-manifold edge between vertices 0 and 1")));
        assert!(issues.iter().any(|s| s.contains("Vertex 5 is isolated")));
    }
}
