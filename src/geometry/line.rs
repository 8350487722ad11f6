//! Infinite lines and finite segments.

use crate::float_types::{Real, tolerance};
use nalgebra::{Point3, Vector3};

/// An infinite line through `origin` along the unit vector `direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub origin: Point3<Real>,
    pub direction: Vector3<Real>,
}

impl Line {
    /// Line through two points. Returns `None` when they (nearly) coincide.
    pub fn through(a: Point3<Real>, b: Point3<Real>) -> Option<Self> {
        Self::new(a, b - a)
    }

    /// Returns `None` for a zero-length direction.
    pub fn new(origin: Point3<Real>, direction: Vector3<Real>) -> Option<Self> {
        let len = direction.norm();
        (len.is_finite() && len >= tolerance()).then(|| Line {
            origin,
            direction: direction / len,
        })
    }

    pub fn closest_point_to(&self, p: &Point3<Real>) -> Point3<Real> {
        self.origin + self.direction * self.direction.dot(&(p - self.origin))
    }

    pub fn distance_to_point(&self, p: &Point3<Real>) -> Real {
        (p - self.closest_point_to(p)).norm()
    }

    /// Closest pair of points `(on self, on other)` between two lines.
    ///
    /// Parallel lines have no unique pair; `None` is returned for them.
    pub fn closest_points_between(&self, other: &Line) -> Option<(Point3<Real>, Point3<Real>)> {
        let w0 = self.origin - other.origin;
        let b = self.direction.dot(&other.direction);
        let d = self.direction.dot(&w0);
        let e = other.direction.dot(&w0);
        // directions are unit length, so a = c = 1
        let denom = 1.0 - b * b;
        if denom.abs() < tolerance() {
            return None;
        }
        let s = (b * e - d) / denom;
        let t = (e - b * d) / denom;
        Some((
            self.origin + self.direction * s,
            other.origin + other.direction * t,
        ))
    }
}

/// A finite segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: Point3<Real>,
    pub end: Point3<Real>,
}

impl LineSegment {
    pub const fn new(start: Point3<Real>, end: Point3<Real>) -> Self {
        LineSegment { start, end }
    }

    pub fn length(&self) -> Real {
        (self.end - self.start).norm()
    }

    pub fn midpoint(&self) -> Point3<Real> {
        nalgebra::center(&self.start, &self.end)
    }

    /// Closest point on the segment, clamped to its endpoints.
    pub fn closest_point_to(&self, p: &Point3<Real>) -> Point3<Real> {
        let d = self.end - self.start;
        let len2 = d.norm_squared();
        if len2 < tolerance() * tolerance() {
            return self.start;
        }
        let t = (d.dot(&(p - self.start)) / len2).clamp(0.0, 1.0);
        self.start + d * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skew_lines_closest_points() {
        let l1 = Line::new(Point3::origin(), Vector3::x()).unwrap();
        let l2 = Line::new(Point3::new(0.0, 0.0, 1.0), Vector3::y()).unwrap();
        let (a, b) = l1.closest_points_between(&l2).unwrap();
        assert!((a - Point3::origin()).norm() < 1e-12);
        assert!((b - Point3::new(0.0, 0.0, 1.0)).norm() < 1e-12);
    }

    #[test]
    fn parallel_lines_have_no_unique_pair() {
        let l1 = Line::new(Point3::origin(), Vector3::x()).unwrap();
        let l2 = Line::new(Point3::new(0.0, 1.0, 0.0), Vector3::x()).unwrap();
        assert!(l1.closest_points_between(&l2).is_none());
    }

    #[test]
    fn segment_clamps() {
        let seg = LineSegment::new(Point3::origin(), Point3::new(1.0, 0.0, 0.0));
        assert_eq!(seg.closest_point_to(&Point3::new(2.0, 1.0, 0.0)), Point3::new(1.0, 0.0, 0.0));
        assert_eq!(seg.closest_point_to(&Point3::new(0.5, 1.0, 0.0)), Point3::new(0.5, 0.0, 0.0));
    }
}
