mod support;

use contourmesh::{GeometryError, SurfaceMesh, TransformOps};
use nalgebra::{Point3, Vector3};
use support::{approx_eq, half_flat_bipyramid, hex_fan};

#[test]
fn triangle_soup_is_welded() {
    // two triangles sharing an edge, each with its own copy of the shared vertices
    let mut mesh: SurfaceMesh = SurfaceMesh::from_parts(
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ],
        vec![vec![0, 1, 2], vec![3, 4, 5]],
    )
    .unwrap();
    mesh.vertex_colours = vec![1, 2, 3, 4, 5, 6];

    assert_eq!(mesh.analyze_edges().boundary_edges, 6);
    assert_eq!(mesh.merge_duplicate_vertices(0.0).unwrap(), 2);
    assert_eq!(mesh.vertices.len(), 4);
    assert_eq!(mesh.vertex_colours, vec![1, 2, 3, 6]);
    assert_eq!(mesh.faces[1], vec![0, 2, 3]);

    let analysis = mesh.analyze_edges();
    assert_eq!(analysis.manifold_edges, 1);
    assert_eq!(analysis.boundary_edges, 4);
    assert!(mesh.validate().is_empty());
    assert!(approx_eq(mesh.surface_area(), 1.0, 1e-12));
}

#[test]
fn closed_mesh_circulator_finds_opposite_faces() {
    let mut mesh = half_flat_bipyramid();
    assert!(mesh.analyze_edges().is_closed());
    mesh.recreate_involved_face_index();
    assert!(mesh.involved_face_index_is_fresh());

    // rim vertex: two top faces, two bottom faces
    let mut circ = mesh.circulate(1).unwrap();
    assert_eq!(circ.len(), 4);
    let mut ring = circ.ring();
    ring.sort_unstable();
    assert_eq!(ring, vec![0, 2, 6, 7]);

    mesh.populate_opposite_faces(&mut circ);
    for record in &circ.records {
        assert_eq!(record.opp_faces.len(), 1);
        assert!(!circ.faces().contains(&record.opp_faces[0]));
    }
}

#[test]
fn degenerate_faces_are_dropped() {
    let mut mesh = hex_fan(0.0);
    mesh.faces.push(vec![1, 2]);
    mesh.faces.push(Vec::new());
    assert_eq!(mesh.validate().len(), 2);
    assert_eq!(mesh.remove_degenerate_faces(), 2);
    assert_eq!(mesh.faces.len(), 6);
    assert!(mesh.validate().is_empty());
}

#[test]
fn validation_reports_attribute_mismatch() {
    let mut mesh = hex_fan(0.0);
    mesh.vertex_normals = vec![Vector3::z(); 2];
    let issues = mesh.validate();
    assert_eq!(issues.len(), 1);
    assert!(issues[0].contains("vertex_normals"));
    assert!(matches!(
        mesh.remove_disconnected_vertices(),
        Err(GeometryError::MismatchedArrayLength { .. })
    ));
}

#[test]
fn mesh_transform_moves_vertices() {
    let mesh = hex_fan(0.0);
    let moved = mesh.translate(0.0, 0.0, 2.0).rotate(90.0, 0.0, 0.0);
    for v in &moved.vertices {
        assert!(approx_eq(v.y, -2.0, 1e-12));
    }
    assert!(approx_eq(moved.surface_area(), mesh.surface_area(), 1e-12));
    assert_eq!(moved.faces, mesh.faces);
}

#[cfg(feature = "chull-io")]
#[test]
fn convex_hull_of_octahedron() {
    let points = [
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(-1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(0.0, -1.0, 0.0),
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(0.0, 0.0, -1.0),
    ];
    let hull: SurfaceMesh = SurfaceMesh::convex_hull(&points).unwrap();
    assert_eq!(hull.faces.len(), 8);
    assert!(hull.analyze_edges().is_closed());
    // 8 equilateral triangles with side sqrt(2)
    assert!(approx_eq(hull.surface_area(), 4.0 * (3.0_f64.sqrt() as contourmesh::Real), 1e-9));
}
