mod support;

use contourmesh::{Contour, GeometryError, Plane, Real};
use nalgebra::{Point3, Vector3};
use support::{approx_eq, lies_on_one_side, u_shape, unit_square};

fn sorted_areas(pieces: &[Contour]) -> Vec<Real> {
    let mut areas: Vec<Real> = pieces.iter().map(Contour::unsigned_area).collect();
    areas.sort_by(|a, b| a.total_cmp(b));
    areas
}

#[test]
fn unit_square_split_in_half() {
    let plane = Plane::new(Vector3::x(), Point3::new(0.5, 0.0, 0.0));
    let pieces = unit_square().split_along_plane(&plane).unwrap();

    assert_eq!(pieces.len(), 2);
    for piece in &pieces {
        assert!(approx_eq(piece.unsigned_area(), 0.5, 1e-12));
        assert_eq!(piece.len(), 4);
        assert!(piece.closed);
        assert!(piece.is_counter_clockwise());
        assert!(lies_on_one_side(piece, &plane, 1e-12));
    }
}

#[test]
fn plane_outside_bounds_returns_original() {
    let square = unit_square();
    let plane = Plane::new(Vector3::x(), Point3::new(5.0, 0.0, 0.0));
    let pieces = square.split_along_plane(&plane).unwrap();
    assert_eq!(pieces, vec![square]);
}

#[test]
fn clockwise_contour_on_one_side_comes_back_counter_clockwise() {
    let mut square = unit_square();
    square.reverse_orientation();
    let plane = Plane::new(Vector3::x(), Point3::new(-1.0, 0.0, 0.0));
    let pieces = square.split_along_plane(&plane).unwrap();
    assert_eq!(pieces.len(), 1);
    assert!(pieces[0].is_counter_clockwise());
    let mut expected = pieces[0].points.clone();
    expected.reverse();
    assert_eq!(expected, square.points);
}

#[test]
fn concave_split_conserves_area() {
    let u = u_shape();
    let plane = Plane::new(Vector3::y(), Point3::new(0.0, 2.0, 0.0));
    let pieces = u.split_along_plane(&plane).unwrap();

    assert_eq!(pieces.len(), 3);
    let areas = sorted_areas(&pieces);
    assert!(approx_eq(areas[0], 1.0, 1e-12));
    assert!(approx_eq(areas[1], 1.0, 1e-12));
    assert!(approx_eq(areas[2], 5.0, 1e-12));

    let total: Real = areas.iter().sum();
    assert!(approx_eq(total, u.unsigned_area(), 1e-12));
    for piece in &pieces {
        assert!(piece.is_counter_clockwise());
        assert!(lies_on_one_side(piece, &plane, 1e-12));
    }
}

#[test]
fn oblique_cut_conserves_area() {
    let u = u_shape();
    let plane = Plane::new(Vector3::new(1.0, 2.0, 0.0), Point3::new(1.5, 1.5, 0.0));
    let pieces = u.split_along_plane(&plane).unwrap();
    let total: Real = pieces.iter().map(Contour::unsigned_area).sum();
    assert!(approx_eq(total, 7.0, 1e-9));
    for piece in &pieces {
        assert!(lies_on_one_side(piece, &plane, 1e-9));
    }
}

#[test]
fn metadata_is_copied_to_every_piece() {
    let square = unit_square()
        .with_metadata("ROIName", "Body")
        .with_metadata("Slice", "12");
    let plane = Plane::new(Vector3::x(), Point3::new(0.25, 0.0, 0.0));
    for piece in square.split_along_plane(&plane).unwrap() {
        assert_eq!(piece.metadata, square.metadata);
    }
}

#[test]
fn adjacent_duplicates_are_repaired() {
    let square = Contour::from_xy(&[[0.0, 0.0], [1.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]);
    let plane = Plane::new(Vector3::x(), Point3::new(0.5, 0.0, 0.0));
    let pieces = square.split_along_plane(&plane).unwrap();
    assert_eq!(pieces.len(), 2);
    for piece in &pieces {
        assert_eq!(piece.len(), 4);
        assert!(approx_eq(piece.unsigned_area(), 0.5, 1e-12));
    }
}

#[test]
fn vertex_on_plane_does_not_leave_duplicates() {
    let triangle = Contour::from_xy(&[[0.0, 0.0], [1.0, 0.0], [0.5, 1.0]]);
    let plane = Plane::new(Vector3::x(), Point3::new(0.5, 0.0, 0.0));
    let pieces = triangle.split_along_plane(&plane).unwrap();
    assert_eq!(pieces.len(), 2);
    for piece in &pieces {
        assert_eq!(piece.len(), 3);
        assert!(approx_eq(piece.unsigned_area(), 0.25, 1e-12));
        let mut check = piece.clone();
        assert_eq!(check.remove_sequential_duplicate_points(), 0);
    }
}

#[test]
fn two_point_contour_splits_at_intersection() {
    let segment = Contour::new(vec![Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)], false);
    let plane = Plane::new(Vector3::x(), Point3::new(0.5, 0.0, 0.0));
    let pieces = segment.split_along_plane(&plane).unwrap();
    assert_eq!(pieces.len(), 2);
    assert_eq!(pieces[0].points, vec![Point3::new(0.0, 0.0, 0.0), Point3::new(0.5, 0.0, 0.0)]);
    assert_eq!(pieces[1].points, vec![Point3::new(0.5, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)]);

    let far = Plane::new(Vector3::x(), Point3::new(3.0, 0.0, 0.0));
    assert_eq!(segment.split_along_plane(&far).unwrap(), vec![segment]);
}

#[test]
fn tiny_contours_are_returned_unchanged() {
    let plane = Plane::new(Vector3::x(), Point3::origin());
    let empty = Contour::default();
    assert_eq!(empty.split_along_plane(&plane).unwrap(), vec![empty.clone()]);
    let single = Contour::new(vec![Point3::new(1.0, 1.0, 1.0)], true);
    assert_eq!(single.split_along_plane(&plane).unwrap(), vec![single.clone()]);
}

#[test]
fn split_against_ray_cuts_in_plane() {
    let pieces = unit_square()
        .split_against_ray(Point3::new(0.5, 0.0, 0.0), Vector3::y())
        .unwrap();
    assert_eq!(pieces.len(), 2);
    for piece in &pieces {
        assert!(approx_eq(piece.unsigned_area(), 0.5, 1e-12));
    }
}

#[test]
fn split_against_ray_needs_a_normal() {
    let line = Contour::new(
        vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)],
        true,
    );
    let result = line.split_against_ray(Point3::origin(), Vector3::y());
    assert!(matches!(result, Err(GeometryError::Degenerate(_))));
}

#[test]
fn tilted_contour_split() {
    // unit square rotated into the x = z plane
    let tilted = Contour::new(
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(0.0, 1.0, 0.0),
        ],
        true,
    );
    let plane = Plane::new(Vector3::y(), Point3::new(0.0, 0.5, 0.0));
    let pieces = tilted.split_along_plane(&plane).unwrap();
    assert_eq!(pieces.len(), 2);
    let expected = tilted.unsigned_area() / 2.0;
    for piece in &pieces {
        assert!(approx_eq(piece.unsigned_area(), expected, 1e-12));
        assert!(piece.is_counter_clockwise());
    }
}
