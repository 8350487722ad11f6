//! Test support library
//! Provides shape builders and comparison helpers shared by the integration tests.

use contourmesh::{Contour, Real, SurfaceMesh, float_types::PI};
use nalgebra::Point3;

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Closed, counter-clockwise unit square `[(0,0),(1,0),(1,1),(0,1)]` at z = 0.
pub fn unit_square() -> Contour {
    Contour::from_xy(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]])
}

/// Axis-aligned square of side `size` with its lower-left corner at `(x, y)`.
pub fn square_at(x: Real, y: Real, size: Real) -> Contour {
    Contour::from_xy(&[[x, y], [x + size, y], [x + size, y + size], [x, y + size]])
}

/// Counter-clockwise "U": a 3×3 square with a 1×2 notch cut from the top middle.
/// Area 7.
pub fn u_shape() -> Contour {
    Contour::from_xy(&[
        [0.0, 0.0],
        [3.0, 0.0],
        [3.0, 3.0],
        [2.0, 3.0],
        [2.0, 1.0],
        [1.0, 1.0],
        [1.0, 3.0],
        [0.0, 3.0],
    ])
}

/// Points of a regular hexagon of circumradius 1 in the z = `z` plane.
pub fn hexagon_points(z: Real) -> Vec<Point3<Real>> {
    (0..6)
        .map(|k| {
            let a = k as Real * PI / 3.0;
            Point3::new(a.cos(), a.sin(), z)
        })
        .collect()
}

/// Flat hexagonal fan: centre vertex 0 at `(0, 0, centre_z)`, rim vertices 1..=6, six triangles.
pub fn hex_fan(centre_z: Real) -> SurfaceMesh {
    let mut vertices = vec![Point3::new(0.0, 0.0, centre_z)];
    vertices.extend(hexagon_points(0.0));
    let faces = (1..=6).map(|k| vec![0, k, k % 6 + 1]).collect();
    SurfaceMesh::from_parts(vertices, faces).expect("valid fan")
}

/// Closed hexagonal bipyramid whose top apex (vertex 0) is flush with the rim
/// and whose bottom apex (vertex 7) sits at z = -1.
pub fn half_flat_bipyramid() -> SurfaceMesh {
    let mut vertices = vec![Point3::origin()];
    vertices.extend(hexagon_points(0.0));
    vertices.push(Point3::new(0.0, 0.0, -1.0));
    let mut faces: Vec<Vec<usize>> = (1..=6).map(|k| vec![0, k, k % 6 + 1]).collect();
    faces.extend((1..=6).map(|k| vec![7, k % 6 + 1, k]));
    SurfaceMesh::from_parts(vertices, faces).expect("valid bipyramid")
}

/// Two open square pyramids touching only at their shared apex (vertex 0).
pub fn glued_pyramids() -> SurfaceMesh {
    let mut vertices = vec![Point3::origin()];
    for z in [1.0, -1.0] {
        vertices.extend([
            Point3::new(-1.0, -1.0, z),
            Point3::new(1.0, -1.0, z),
            Point3::new(1.0, 1.0, z),
            Point3::new(-1.0, 1.0, z),
        ]);
    }
    let mut faces = Vec::new();
    for base in [1, 5] {
        for k in 0..4 {
            faces.push(vec![0, base + k, base + (k + 1) % 4]);
        }
    }
    SurfaceMesh::from_parts(vertices, faces).expect("valid pyramids")
}

/// Flat `n × n` grid of unit quads at z = 0, each split along its rising diagonal.
pub fn flat_grid(n: usize) -> SurfaceMesh {
    let idx = |i: usize, j: usize| j * (n + 1) + i;
    let mut vertices = Vec::new();
    for j in 0..=n {
        for i in 0..=n {
            vertices.push(Point3::new(i as Real, j as Real, 0.0));
        }
    }
    let mut faces = Vec::new();
    for j in 0..n {
        for i in 0..n {
            let (a, b, c, d) = (idx(i, j), idx(i + 1, j), idx(i + 1, j + 1), idx(i, j + 1));
            faces.push(vec![a, b, c]);
            faces.push(vec![a, c, d]);
        }
    }
    SurfaceMesh::from_parts(vertices, faces).expect("valid grid")
}

/// Largest number of faces sharing a single undirected edge.
pub fn max_edge_multiplicity(mesh: &SurfaceMesh) -> usize {
    mesh.edge_multiplicity().into_values().max().unwrap_or(0)
}

/// Whether every point of `contour` lies on one side of the plane (within `eps`).
pub fn lies_on_one_side(contour: &Contour, plane: &contourmesh::Plane, eps: Real) -> bool {
    let above = contour.points.iter().any(|p| plane.signed_distance(p) > eps);
    let below = contour.points.iter().any(|p| plane.signed_distance(p) < -eps);
    !(above && below)
}
