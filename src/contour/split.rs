//! Splitting a single planar contour with a cutting plane.
//!
//! ## **Algorithm**
//! 1. **Repair**: exact adjacent duplicate points are removed (with a warning) and the
//!    split restarts on the repaired contour.
//! 2. **Dual list**: every point is copied into a list of `(point, is_crossing)` entries
//!    and an intersection entry is inserted between every pair of neighbours lying on
//!    opposite sides of the plane.
//! 3. **Pairing**: all crossings lie on the line where the contour's plane meets the
//!    cutting plane. Sorted by distance from the crossing farthest from the average
//!    point, crossings `(0,1)`, `(2,3)`, ... bound the gaps where the contour interior
//!    touches the cutting plane.
//! 4. **Reconstruction**: walk the dual list from an unused ordinary point, copying points
//!    until a crossing is reached, then jump to its partner and keep walking. Each walk
//!    that returns to its starting point is one output contour.
//! 5. **Post-processing**: adjacent duplicates created by the cut are removed, outputs are
//!    reoriented counter-clockwise and inherit the parent's metadata.
//!
//! Only planar, non-self-intersecting contours are supported. Planarity is not
//! checked; non-planar input yields unreliable pairings.

use crate::contour::Contour;
use crate::errors::{GeometryError, Result};
use crate::float_types::Real;
use crate::geometry::{LineSegment, Plane};
use hashbrown::HashMap;
use log::{debug, warn};
use nalgebra::{Point3, Vector3};

/// One entry of the dual point list.
#[derive(Debug, Clone, Copy)]
struct DualEntry {
    point: Point3<Real>,
    crossing: bool,
}

/// Where the reconstruction walk currently stands.
enum Walk {
    /// On an ordinary point of the original contour
    Ordinary(usize),
    /// On a crossing, about to jump to its partner
    Crossing(usize),
    /// Back at the starting point
    Closed,
}

impl Contour {
    /// Cut this contour with `plane`, returning pieces that each lie on one side of it.
    ///
    /// - 0 or 1 points: returned unchanged.
    /// - 2 points: returned unchanged if both lie on the same side, otherwise split into
    ///   two 2-point contours sharing the intersection point.
    /// - 3 or more points: see the [module documentation](self). A contour lying
    ///   entirely on one side is returned as a single counter-clockwise contour.
    ///
    /// Every piece of a 3+ point contour is closed, counter-clockwise and carries the
    /// parent's metadata. An odd number of crossings, or a crossing whose intersection
    /// cannot be computed, is an error.
    pub fn split_along_plane(&self, plane: &Plane) -> Result<Vec<Contour>> {
        match self.points.len() {
            0 | 1 => Ok(vec![self.clone()]),
            2 => self.split_segment_along_plane(plane),
            _ => self.split_polygon_along_plane(plane),
        }
    }

    /// Split along the plane that contains the ray `origin + t·direction` and the
    /// contour's own normal, i.e. cut the contour along a line lying in its plane.
    pub fn split_against_ray(&self, origin: Point3<Real>, direction: Vector3<Real>) -> Result<Vec<Contour>> {
        let contour_normal = self.estimate_planar_normal().ok_or_else(|| {
            GeometryError::Degenerate("cannot split a contour without a planar normal".to_string())
        })?;
        let plane = Plane::try_new(direction.cross(&contour_normal), origin)?;
        self.split_along_plane(&plane)
    }

    fn split_segment_along_plane(&self, plane: &Plane) -> Result<Vec<Contour>> {
        let (a, b) = (self.points[0], self.points[1]);
        if plane.is_point_above_plane(&a) == plane.is_point_above_plane(&b) {
            return Ok(vec![self.clone()]);
        }
        let p = plane
            .intersect_line_segment(&LineSegment::new(a, b))
            .ok_or(GeometryError::IntersectionNotFound { start: a, end: b })?;
        Ok(vec![
            self.derive(vec![a, p], self.closed),
            self.derive(vec![p, b], self.closed),
        ])
    }

    fn split_polygon_along_plane(&self, plane: &Plane) -> Result<Vec<Contour>> {
        if let Some(i) = self.find_sequential_duplicate(true) {
            let n = self.points.len();
            warn!(
                "Removing adjacent duplicate point {:?} (index {}) before splitting contour",
                self.points[(i + 1) % n],
                (i + 1) % n
            );
            let mut repaired = self.clone();
            repaired.points.remove((i + 1) % n);
            return repaired.split_along_plane(plane);
        }

        let Some(centre) = self.average_point() else {
            return Ok(vec![self.clone()]);
        };

        let (mut dual, first_crossing, crossings) = build_dual_list(&self.points, plane)?;
        debug!("Contour with {} points crosses plane {} times", self.points.len(), crossings);

        let Some(first_crossing) = first_crossing else {
            let mut whole = self.clone();
            whole.reorient_counter_clockwise();
            return Ok(vec![whole]);
        };
        if crossings % 2 != 0 {
            return Err(GeometryError::OddCrossingCount(crossings));
        }

        // Fix the start so pairing and reconstruction are deterministic.
        dual.rotate_left(first_crossing);

        let partners = pair_crossings(&dual, &centre)?;
        let pieces = reconstruct(&dual, &partners)?;

        let mut out = Vec::with_capacity(pieces.len());
        for points in pieces {
            let mut piece = self.derive(points, true);
            while let Some(i) = piece.find_sequential_duplicate(true) {
                let n = piece.points.len();
                warn!(
                    "Removing adjacent duplicate point {:?} produced while splitting a contour",
                    piece.points[(i + 1) % n]
                );
                piece.points.remove((i + 1) % n);
            }
            piece.reorient_counter_clockwise();
            out.push(piece);
        }
        Ok(out)
    }
}

/// Interleave crossing points into the contour's ring.
///
/// Returns the dual list, the position of the first crossing (if any) and the
/// number of crossings.
fn build_dual_list(points: &[Point3<Real>], plane: &Plane) -> Result<(Vec<DualEntry>, Option<usize>, usize)> {
    let n = points.len();
    let mut dual = Vec::with_capacity(n + 4);
    let mut first_crossing = None;
    let mut crossings = 0;

    for i in 0..n {
        let (a, b) = (points[i], points[(i + 1) % n]);
        dual.push(DualEntry { point: a, crossing: false });

        if plane.is_point_above_plane(&a) != plane.is_point_above_plane(&b) {
            let p = plane
                .intersect_line_segment(&LineSegment::new(a, b))
                .ok_or(GeometryError::IntersectionNotFound { start: a, end: b })?;
            first_crossing.get_or_insert(dual.len());
            dual.push(DualEntry { point: p, crossing: true });
            crossings += 1;
        }
    }
    Ok((dual, first_crossing, crossings))
}

/// Pair each crossing with the crossing across the gap from it.
///
/// Returns a symmetric map between dual-list positions.
fn pair_crossings(dual: &[DualEntry], centre: &Point3<Real>) -> Result<HashMap<usize, usize>> {
    let mut crossing_positions: Vec<usize> = dual
        .iter()
        .enumerate()
        .filter(|(_, e)| e.crossing)
        .map(|(i, _)| i)
        .collect();

    let edge = crossing_positions
        .iter()
        .map(|&i| dual[i].point)
        .max_by(|a, b| (a - centre).norm_squared().total_cmp(&(b - centre).norm_squared()))
        .ok_or_else(|| GeometryError::Logic("no crossings to pair".to_string()))?;

    crossing_positions.sort_by(|&a, &b| {
        (dual[a].point - edge)
            .norm_squared()
            .total_cmp(&(dual[b].point - edge).norm_squared())
    });

    let mut partners = HashMap::with_capacity(crossing_positions.len());
    for pair in crossing_positions.chunks_exact(2) {
        partners.insert(pair[0], pair[1]);
        partners.insert(pair[1], pair[0]);
    }
    Ok(partners)
}

/// Walk the dual list, jumping across paired crossings, until every ordinary point is used.
fn reconstruct(dual: &[DualEntry], partners: &HashMap<usize, usize>) -> Result<Vec<Vec<Point3<Real>>>> {
    let m = dual.len();
    let mut consumed = vec![false; m];
    let mut pieces = Vec::new();

    while let Some(start) = (0..m).find(|&i| !dual[i].crossing && !consumed[i]) {
        let mut points = Vec::new();
        let mut state = Walk::Ordinary(start);
        // Each ordinary point is visited once and each crossing at most once per walk.
        let mut budget = 2 * m;

        loop {
            if budget == 0 {
                return Err(GeometryError::Logic(
                    "contour reconstruction did not return to its starting point".to_string(),
                ));
            }
            budget -= 1;

            let next = match state {
                Walk::Closed => break,
                Walk::Ordinary(idx) => {
                    if consumed[idx] {
                        return Err(GeometryError::Logic(format!(
                            "contour reconstruction revisited point {idx}"
                        )));
                    }
                    consumed[idx] = true;
                    points.push(dual[idx].point);
                    (idx + 1) % m
                },
                Walk::Crossing(idx) => {
                    let jump = *partners.get(&idx).ok_or_else(|| {
                        GeometryError::Logic(format!("crossing {idx} has no partner"))
                    })?;
                    points.push(dual[idx].point);
                    points.push(dual[jump].point);
                    (jump + 1) % m
                },
            };

            state = if next == start {
                Walk::Closed
            } else if dual[next].crossing {
                Walk::Crossing(next)
            } else {
                Walk::Ordinary(next)
            };
        }
        pieces.push(points);
    }
    Ok(pieces)
}
