//! Area bisection: find the plane offset that leaves a target fraction of area above it.

use crate::contour::ContourCollection;
use crate::errors::{GeometryError, Result};
use crate::float_types::{Real, tolerance};
use crate::geometry::Plane;
use log::debug;
use nalgebra::{Point3, Vector3};

/// Tuning for [`ContourCollection::total_area_bisection_along_plane`].
#[derive(Debug, Clone)]
pub struct BisectionOptions {
    /// Stop once the measured fraction is within this distance of the target. Default: 1e-3
    pub acceptable_deviation: Real,
    /// Upper bound on the number of split evaluations. Default: 50
    pub max_iters: usize,
    /// Points bracketing the search along the normal. If `None` (or non-finite),
    /// the extreme contour points along the normal plus a 10% margin are used.
    pub bounds: Option<(Point3<Real>, Point3<Real>)>,
}

impl Default for BisectionOptions {
    fn default() -> Self {
        Self {
            acceptable_deviation: 1e-3,
            max_iters: 50,
            bounds: None,
        }
    }
}

impl BisectionOptions {
    /// Options with a given tolerance and iteration cap, automatic bounds.
    pub fn with_tolerance(acceptable_deviation: Real, max_iters: usize) -> Self {
        Self {
            acceptable_deviation,
            max_iters,
            ..Default::default()
        }
    }
}

/// Result of an area bisection: the best split seen during the search.
#[derive(Debug, Clone)]
pub struct AreaBisection {
    pub below: ContourCollection,
    pub above: ContourCollection,
    /// The cutting plane that produced `below`/`above`
    pub plane: Plane,
    /// Number of splits evaluated during the search, including ones worse than the result
    pub iterations: usize,
    /// Measured fraction of the total unsigned area lying above `plane`
    pub area_fraction_above: Real,
}

impl ContourCollection {
    /// Bisection search over the offset of a plane with fixed `normal` so that
    /// `target_fraction_above` of the total unsigned area lies above it.
    ///
    /// Each iteration splits at the midpoint of the current bracket, measures
    /// the fraction above, and moves whichever bound undershoots or overshoots.
    /// The search stops when the fraction is within
    /// `options.acceptable_deviation` of the target or after `options.max_iters`
    /// splits. Because the measured fraction need not be monotonic for
    /// non-convex input, the split with the smallest deviation seen is returned,
    /// not necessarily the last one.
    pub fn total_area_bisection_along_plane(
        &self,
        normal: &Vector3<Real>,
        target_fraction_above: Real,
        options: &BisectionOptions,
    ) -> Result<AreaBisection> {
        if !(0.0..=1.0).contains(&target_fraction_above) {
            return Err(GeometryError::InvalidArgument(format!(
                "target area fraction must lie in [0, 1], got {target_fraction_above}"
            )));
        }
        if self.point_count() == 0 {
            return Err(GeometryError::InvalidArgument(
                "cannot bisect an empty contour collection".to_string(),
            ));
        }
        let n = Plane::try_new(*normal, Point3::origin())?.normal();

        let total_area = self.total_unsigned_area();
        if !(total_area.is_finite() && total_area > tolerance()) {
            return Err(GeometryError::Degenerate(format!(
                "contour collection has no usable area ({total_area})"
            )));
        }

        let (mut lower, mut upper) = self.bisection_bounds(&n, options.bounds)?;
        if lower.coords.dot(&n) > upper.coords.dot(&n) {
            std::mem::swap(&mut lower, &mut upper);
        }

        let mut best: Option<(Real, AreaBisection)> = None;
        let mut evaluated = 0;
        for iteration in 1..=options.max_iters.max(1) {
            evaluated = iteration;
            let plane = Plane::new(n, nalgebra::center(&lower, &upper));
            let (below, above) = self.split_along_plane(&plane)?;
            let fraction = above.total_unsigned_area() / total_area;
            let deviation = (fraction - target_fraction_above).abs();
            debug!("Bisection iteration {iteration}: offset {} gives area fraction {fraction}", plane.offset());

            if fraction > target_fraction_above {
                // too much area above: raise the plane
                lower = plane.point();
            } else {
                upper = plane.point();
            }

            if best.as_ref().is_none_or(|(d, _)| deviation < *d) {
                best = Some((
                    deviation,
                    AreaBisection {
                        below,
                        above,
                        plane,
                        iterations: 0,
                        area_fraction_above: fraction,
                    },
                ));
            }
            if deviation < options.acceptable_deviation {
                break;
            }
        }

        best.map(|(_, result)| AreaBisection {
            iterations: evaluated,
            ..result
        })
        .ok_or_else(|| GeometryError::Logic("bisection evaluated no splits".to_string()))
    }

    /// Search bracket: the supplied bounds if finite, otherwise the extreme
    /// points along `n` widened by 10% of their separation on each side.
    fn bisection_bounds(
        &self,
        n: &Vector3<Real>,
        bounds: Option<(Point3<Real>, Point3<Real>)>,
    ) -> Result<(Point3<Real>, Point3<Real>)> {
        let finite = |p: &Point3<Real>| p.coords.iter().all(|c| c.is_finite());
        if let Some((lo, hi)) = bounds {
            if finite(&lo) && finite(&hi) {
                return Ok((lo, hi));
            }
        }

        let (lo, hi) = self
            .extreme_points_along(n)
            .ok_or_else(|| GeometryError::InvalidArgument("cannot bound an empty collection".to_string()))?;
        let span = hi.coords.dot(n) - lo.coords.dot(n);
        let margin = (0.1 * span).max(tolerance());
        Ok((lo - n * margin, hi + n * margin))
    }
}
