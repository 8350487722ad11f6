//! `Contour` struct: an ordered, optionally closed polyline carrying string metadata.
//!
//! Contours are the unit of work for the plane-splitter ([`split`]), the core/peel
//! decomposition ([`peel`]) and, grouped into a [`ContourCollection`], for the
//! area-bisection search ([`bisection`]).

use crate::float_types::{Real, tolerance};
use crate::geometry::Plane;
use crate::traits::TransformOps;
use geo::{Contains, LineString, Polygon as GeoPolygon};
use nalgebra::{Matrix4, Point3, Vector3};
use std::collections::BTreeMap;

pub mod bisection;
pub mod collection;
pub mod peel;
pub mod split;

pub use bisection::{AreaBisection, BisectionOptions};
pub use collection::ContourCollection;

/// Flat string-keyed metadata carried through every contour transformation.
pub type Metadata = BTreeMap<String, String>;

/// An ordered sequence of points tracing a polygon boundary.
///
/// Point order is geometrically meaningful. When `closed` is set, the last
/// point implicitly connects back to the first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Contour {
    pub points: Vec<Point3<Real>>,
    pub closed: bool,
    pub metadata: Metadata,
}

impl Contour {
    pub fn new(points: Vec<Point3<Real>>, closed: bool) -> Self {
        Contour {
            points,
            closed,
            metadata: Metadata::new(),
        }
    }

    /// Closed contour from 2D coordinates placed at z = 0.
    pub fn from_xy(coords: &[[Real; 2]]) -> Self {
        Self::new(
            coords.iter().map(|&[x, y]| Point3::new(x, y, 0.0)).collect(),
            true,
        )
    }

    /// Builder-style metadata insertion.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterator over `(start, end)` edges, including the closing edge for closed contours.
    pub fn edges(&self) -> impl Iterator<Item = (Point3<Real>, Point3<Real>)> + '_ {
        let n = self.points.len();
        let count = match (self.closed, n) {
            (_, 0 | 1) => 0,
            (true, _) => n,
            (false, _) => n - 1,
        };
        (0..count).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Plain arithmetic mean of the points (not the area-weighted centroid).
    pub fn average_point(&self) -> Option<Point3<Real>> {
        if self.points.is_empty() {
            return None;
        }
        let sum = self
            .points
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords);
        Some(Point3::from(sum / self.points.len() as Real))
    }

    pub fn perimeter(&self) -> Real {
        self.edges().map(|(a, b)| (b - a).norm()).sum()
    }

    /// Vector area via Newell's method: half the sum of `p_i × p_{i+1}` around the ring.
    ///
    /// Its length is the enclosed area of a planar contour and its direction is
    /// the normal given by the right-hand rule on the point order.
    pub fn vector_area(&self) -> Vector3<Real> {
        vector_area_of(&self.points)
    }

    /// Unit normal of the (assumed planar) contour, following its winding.
    pub fn estimate_planar_normal(&self) -> Option<Vector3<Real>> {
        let va = self.vector_area();
        let len = va.norm();
        (len.is_finite() && len > tolerance()).then(|| va / len)
    }

    /// Signed area of a planar contour.
    ///
    /// The sign is taken against the positive coordinate axis along which the
    /// contour's normal has its largest component (ties resolve to z, then y),
    /// so counter-clockwise as seen from that axis is positive. Contours with
    /// fewer than 3 points have zero area.
    pub fn signed_area(&self) -> Real {
        if self.points.len() < 3 {
            return 0.0;
        }
        let va = self.vector_area();
        let area = va.norm();
        if va.dot(&reference_axis(&va)) < 0.0 {
            -area
        } else {
            area
        }
    }

    pub fn unsigned_area(&self) -> Real {
        self.signed_area().abs()
    }

    pub fn is_counter_clockwise(&self) -> bool {
        self.signed_area() > 0.0
    }

    pub fn reverse_orientation(&mut self) {
        self.points.reverse();
    }

    /// Reverse the point order if the contour is clockwise. Zero-area contours are left alone.
    pub fn reorient_counter_clockwise(&mut self) {
        if self.signed_area() < 0.0 {
            self.reverse_orientation();
        }
    }

    /// Area-weighted centroid of a planar contour.
    ///
    /// Falls back to [`Contour::average_point`] for contours with (near-)zero area.
    pub fn centroid(&self) -> Option<Point3<Real>> {
        let origin = *self.points.first()?;
        let Some(normal) = self.estimate_planar_normal() else {
            return self.average_point();
        };

        let mut weighted = Vector3::zeros();
        let mut total = 0.0;
        for w in self.points.windows(2).skip(1) {
            let (b, c) = (w[0], w[1]);
            let area = 0.5 * (b - origin).cross(&(c - origin)).dot(&normal);
            weighted += (origin.coords + b.coords + c.coords) * (area / 3.0);
            total += area;
        }
        if total.abs() < tolerance() {
            return self.average_point();
        }
        Some(Point3::from(weighted / total))
    }

    /// Position of the first point whose successor is exactly equal to it.
    ///
    /// Equality is bitwise on the coordinates, not tolerance based. When `wrap`
    /// is set, the last→first pair is checked too.
    pub(crate) fn find_sequential_duplicate(&self, wrap: bool) -> Option<usize> {
        let n = self.points.len();
        if n < 2 {
            return None;
        }
        let last = if wrap && n > 2 { n } else { n - 1 };
        (0..last).find(|&i| self.points[i] == self.points[(i + 1) % n])
    }

    /// Drop points that exactly equal their predecessor, returning how many were removed.
    ///
    /// Closed contours also compare the last point against the first.
    pub fn remove_sequential_duplicate_points(&mut self) -> usize {
        let mut removed = 0;
        while let Some(i) = self.find_sequential_duplicate(self.closed) {
            let n = self.points.len();
            self.points.remove((i + 1) % n);
            removed += 1;
        }
        removed
    }

    /// Project the contour into `plane`'s 2D basis as a `geo` polygon.
    pub fn to_geo_polygon(&self, plane: &Plane) -> GeoPolygon<Real> {
        let coords: Vec<(Real, Real)> = self.points.iter().map(|p| plane.project_to_2d(p)).collect();
        GeoPolygon::new(LineString::from(coords), vec![])
    }

    /// Whether `point` falls strictly inside the contour after both are
    /// projected orthogonally onto `plane`.
    pub fn is_point_in_polygon_projected_orthogonally(&self, plane: &Plane, point: &Point3<Real>) -> bool {
        if self.points.len() < 3 {
            return false;
        }
        let (x, y) = plane.project_to_2d(point);
        self.to_geo_polygon(plane).contains(&geo::Point::new(x, y))
    }

    /// Copy of `self` holding `points` instead of the current ones; metadata is inherited.
    pub(crate) fn derive(&self, points: Vec<Point3<Real>>, closed: bool) -> Self {
        Contour {
            points,
            closed,
            metadata: self.metadata.clone(),
        }
    }
}

impl TransformOps for Contour {
    fn transform(&self, matrix: &Matrix4<Real>) -> Self {
        let points = self.points.iter().map(|p| matrix.transform_point(p)).collect();
        self.derive(points, self.closed)
    }
}

/// Half of Σ p_i × p_{i+1} over the closed ring of `points`.
pub(crate) fn vector_area_of(points: &[Point3<Real>]) -> Vector3<Real> {
    let n = points.len();
    if n < 3 {
        return Vector3::zeros();
    }
    (0..n).fold(Vector3::zeros(), |acc, i| {
        acc + points[i].coords.cross(&points[(i + 1) % n].coords)
    }) * 0.5
}

/// Positive unit axis along which `v` has its largest absolute component.
fn reference_axis(v: &Vector3<Real>) -> Vector3<Real> {
    let (ax, ay, az) = (v.x.abs(), v.y.abs(), v.z.abs());
    if az >= ax && az >= ay {
        Vector3::z()
    } else if ay >= ax {
        Vector3::y()
    } else {
        Vector3::x()
    }
}
