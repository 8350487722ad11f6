//! `ContourCollection`: a logical group of independent contours (e.g. one slice).

use crate::contour::Contour;
use crate::errors::Result;
use crate::float_types::Real;
use crate::geometry::Plane;
use crate::traits::TransformOps;
use nalgebra::{Matrix4, Point3, Vector3};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Insertion-ordered set of contours. No invariants are enforced across members.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContourCollection {
    pub contours: Vec<Contour>,
}

impl ContourCollection {
    pub fn new() -> Self {
        ContourCollection {
            contours: Vec::new(),
        }
    }

    pub fn from_contours(contours: Vec<Contour>) -> Self {
        ContourCollection { contours }
    }

    pub fn push(&mut self, contour: Contour) {
        self.contours.push(contour);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.contours.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contour> {
        self.contours.iter()
    }

    /// Move every contour of `other` to the end of this collection.
    pub fn merge(&mut self, other: ContourCollection) {
        self.contours.extend(other.contours);
    }

    /// Total number of points across all contours.
    pub fn point_count(&self) -> usize {
        self.contours.iter().map(Contour::len).sum()
    }

    pub fn total_unsigned_area(&self) -> Real {
        self.contours.iter().map(Contour::unsigned_area).sum()
    }

    pub fn total_perimeter(&self) -> Real {
        self.contours.iter().map(Contour::perimeter).sum()
    }

    /// Mean of every point in every contour.
    pub fn average_point(&self) -> Option<Point3<Real>> {
        let count = self.point_count();
        if count == 0 {
            return None;
        }
        let sum = self
            .contours
            .iter()
            .flat_map(|c| c.points.iter())
            .fold(Vector3::zeros(), |acc, p| acc + p.coords);
        Some(Point3::from(sum / count as Real))
    }

    pub fn remove_empty_contours(&mut self) {
        self.contours.retain(|c| !c.is_empty());
    }

    pub fn reorient_counter_clockwise(&mut self) {
        self.contours
            .iter_mut()
            .for_each(Contour::reorient_counter_clockwise);
    }

    pub fn is_point_in_any_polygon_projected_orthogonally(&self, plane: &Plane, point: &Point3<Real>) -> bool {
        self.contours
            .iter()
            .any(|c| c.is_point_in_polygon_projected_orthogonally(plane, point))
    }

    /// Points with the smallest and largest projection onto `direction`.
    pub fn extreme_points_along(&self, direction: &Vector3<Real>) -> Option<(Point3<Real>, Point3<Real>)> {
        let mut points = self.contours.iter().flat_map(|c| c.points.iter());
        let first = *points.next()?;
        let (mut lo, mut hi) = (first, first);
        for p in points {
            if p.coords.dot(direction) < lo.coords.dot(direction) {
                lo = *p;
            }
            if p.coords.dot(direction) > hi.coords.dot(direction) {
                hi = *p;
            }
        }
        Some((lo, hi))
    }

    /// Split every contour with `plane` and sort the pieces by side.
    ///
    /// A piece whose average point is above the plane lands in the second
    /// collection; all other pieces land in the first. Returns `(below, above)`.
    pub fn split_along_plane(&self, plane: &Plane) -> Result<(ContourCollection, ContourCollection)> {
        #[cfg(not(feature = "parallel"))]
        let pieces: Vec<Vec<Contour>> = self
            .contours
            .iter()
            .map(|c| c.split_along_plane(plane))
            .collect::<Result<_>>()?;

        #[cfg(feature = "parallel")]
        let pieces: Vec<Vec<Contour>> = self
            .contours
            .par_iter()
            .map(|c| c.split_along_plane(plane))
            .collect::<Result<_>>()?;

        let mut below = ContourCollection::new();
        let mut above = ContourCollection::new();
        for piece in pieces.into_iter().flatten() {
            match piece.average_point() {
                Some(p) if plane.is_point_above_plane(&p) => above.push(piece),
                _ => below.push(piece),
            }
        }
        Ok((below, above))
    }
}

impl FromIterator<Contour> for ContourCollection {
    fn from_iter<T: IntoIterator<Item = Contour>>(iter: T) -> Self {
        ContourCollection {
            contours: iter.into_iter().collect(),
        }
    }
}

impl TransformOps for ContourCollection {
    fn transform(&self, matrix: &Matrix4<Real>) -> Self {
        self.contours.iter().map(|c| c.transform(matrix)).collect()
    }
}
