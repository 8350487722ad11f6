//! Plane primitive used by the contour splitter and the mesh simplifier.

use crate::errors::{GeometryError, Result};
use crate::float_types::{Real, tolerance};
use crate::geometry::line::{Line, LineSegment};
use nalgebra::{Matrix3, Point3, SymmetricEigen, Vector3};

/// A plane described by a unit normal `normal` and any point `point` lying on it.
///
/// The signed distance of `p` is `normal · (p - point)`; the half-space with
/// positive signed distance is "above" the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal vector of the plane
    pub normal: Vector3<Real>,
    /// A point on the plane
    pub point: Point3<Real>,
}

impl Plane {
    /// Create a plane from a normal (normalized here) and a point on the plane.
    ///
    /// A zero-length normal falls back to +Z so the result is always usable;
    /// use [`Plane::try_new`] when that must be rejected instead.
    pub fn new(normal: Vector3<Real>, point: Point3<Real>) -> Self {
        Self::try_new(normal, point).unwrap_or(Plane {
            normal: Vector3::z(),
            point,
        })
    }

    /// Create a plane, rejecting zero-length or non-finite normals.
    pub fn try_new(normal: Vector3<Real>, point: Point3<Real>) -> Result<Self> {
        let len = normal.norm();
        if !len.is_finite() || len < tolerance() {
            return Err(GeometryError::Degenerate(format!(
                "plane normal {normal:?} cannot be normalized"
            )));
        }
        Ok(Plane {
            normal: normal / len,
            point,
        })
    }

    pub const fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    pub const fn point(&self) -> Point3<Real> {
        self.point
    }

    /// Distance from the origin along the normal (plane equation: n·p = w)
    pub fn offset(&self) -> Real {
        self.normal.dot(&self.point.coords)
    }

    #[inline]
    pub fn signed_distance(&self, p: &Point3<Real>) -> Real {
        self.normal.dot(&(p - self.point))
    }

    #[inline]
    pub fn distance(&self, p: &Point3<Real>) -> Real {
        self.signed_distance(p).abs()
    }

    /// Strictly above: a point exactly on the plane is *not* above it.
    #[inline]
    pub fn is_point_above_plane(&self, p: &Point3<Real>) -> bool {
        self.signed_distance(p) > 0.0
    }

    /// Orthogonal projection of `p` onto the plane.
    pub fn project_onto_plane(&self, p: &Point3<Real>) -> Point3<Real> {
        p - self.normal * self.signed_distance(p)
    }

    /// Intersection of the (infinite) line with this plane, if they are not parallel.
    pub fn intersect_line(&self, line: &Line) -> Option<Point3<Real>> {
        let denom = self.normal.dot(&line.direction);
        if denom.abs() < tolerance() {
            return None;
        }
        let t = self.normal.dot(&(self.point - line.origin)) / denom;
        let p = line.origin + line.direction * t;
        p.coords.iter().all(|c| c.is_finite()).then_some(p)
    }

    /// Intersection of a segment with this plane.
    ///
    /// Works from the endpoint signed distances so that a segment whose
    /// endpoints are classified on opposite sides always yields a point inside
    /// the segment, however shallow the crossing angle is.
    pub fn intersect_line_segment(&self, segment: &LineSegment) -> Option<Point3<Real>> {
        let d0 = self.signed_distance(&segment.start);
        let d1 = self.signed_distance(&segment.end);
        if d0 == 0.0 {
            return Some(segment.start);
        }
        if d1 == 0.0 {
            return Some(segment.end);
        }
        if (d0 > 0.0) == (d1 > 0.0) {
            return None;
        }
        let t = d0 / (d0 - d1);
        if !t.is_finite() || !(0.0..=1.0).contains(&t) {
            return None;
        }
        Some(segment.start + (segment.end - segment.start) * t)
    }

    /// Orthonormal in-plane axes `(u, v)` with `u × v = normal`.
    pub fn basis(&self) -> (Vector3<Real>, Vector3<Real>) {
        let n = self.normal;
        // normal closer to ±Z ⇒ cross with X, otherwise cross with Z
        let mut u = if n.z.abs() > n.x.abs() || n.z.abs() > n.y.abs() {
            Vector3::x().cross(&n)
        } else {
            Vector3::z().cross(&n)
        };
        u.normalize_mut();
        let v = n.cross(&u).normalize();
        (u, v)
    }

    /// 2D coordinates of `p` (projected) in the plane's [`basis`](Plane::basis).
    pub fn project_to_2d(&self, p: &Point3<Real>) -> (Real, Real) {
        let (u, v) = self.basis();
        let d = p - self.point;
        (d.dot(&u), d.dot(&v))
    }

    /// Least-squares plane through `points`, minimizing orthogonal distances.
    ///
    /// The normal is the eigenvector of the scatter matrix with the smallest
    /// eigenvalue; the plane passes through the centroid. Its sign is arbitrary.
    pub fn orthogonal_regression(points: &[Point3<Real>]) -> Result<Self> {
        if points.len() < 3 {
            return Err(GeometryError::Degenerate(format!(
                "plane regression needs at least 3 points, got {}",
                points.len()
            )));
        }
        let n = points.len() as Real;
        let centroid = Point3::from(points.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords) / n);

        let scatter = points.iter().fold(Matrix3::zeros(), |acc, p| {
            let d = p - centroid;
            acc + d * d.transpose()
        });
        if scatter.iter().any(|c| !c.is_finite()) {
            return Err(GeometryError::Degenerate(
                "plane regression input contains non-finite coordinates".to_string(),
            ));
        }

        let eigen = SymmetricEigen::new(scatter);
        let (min_idx, _) = eigen
            .eigenvalues
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .ok_or_else(|| GeometryError::Degenerate("empty eigen decomposition".to_string()))?;
        let normal: Vector3<Real> = eigen.eigenvectors.column(min_idx).into_owned();

        Self::try_new(normal, centroid)
    }
}
