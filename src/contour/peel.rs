//! Core/peel decomposition of a contour.

use crate::contour::Contour;
use crate::errors::{GeometryError, Result};
use crate::float_types::Real;

impl Contour {
    /// Split the contour into a shrunken **core** and the surrounding **peel**.
    ///
    /// The core is every point pulled toward the average point so that its
    /// distance shrinks by `radial_factor`; its area is `radial_factor²` times
    /// the original. The peel is a single keyhole contour running around the
    /// outer ring, across a bridge to the core, around the core in the opposite
    /// direction and back, so its area is what remains: `(1 - radial_factor²)·A`.
    ///
    /// Both outputs inherit the parent's metadata and the outer ring's
    /// orientation. Returns `(core, peel)`.
    pub fn split_into_core_peel(&self, radial_factor: Real) -> Result<(Contour, Contour)> {
        if !(radial_factor > 0.0 && radial_factor < 1.0) {
            return Err(GeometryError::InvalidArgument(format!(
                "core/peel radial factor must lie in (0, 1), got {radial_factor}"
            )));
        }
        if self.points.len() < 3 {
            return Err(GeometryError::InvalidArgument(format!(
                "core/peel split needs at least 3 points, got {}",
                self.points.len()
            )));
        }
        let centre = self
            .average_point()
            .ok_or_else(|| GeometryError::Logic("non-empty contour has no average point".to_string()))?;

        let core_points: Vec<_> = self
            .points
            .iter()
            .map(|p| centre + (p - centre) * radial_factor)
            .collect();

        // outer ring, bridge back to the first point, then the core backwards
        let n = self.points.len();
        let mut peel_points = Vec::with_capacity(2 * n + 2);
        peel_points.extend_from_slice(&self.points);
        peel_points.push(self.points[0]);
        peel_points.push(core_points[0]);
        peel_points.extend(core_points[1..].iter().rev());
        peel_points.push(core_points[0]);

        Ok((
            self.derive(core_points, true),
            self.derive(peel_points, true),
        ))
    }
}
