// Our Real scalar type:
#[cfg(feature = "f32")]
pub type Real = f32;
#[cfg(feature = "f64")]
pub type Real = f64;

use core::str::FromStr;
use std::sync::OnceLock;

/// Lazily-initialized tolerance used across the crate.
/// Defaults to `sqrt(10 * Real::EPSILON)`, but can be overridden:
///  1) **Build-time**: set env var `CONTOURMESH_TOLERANCE` (e.g. `CONTOURMESH_TOLERANCE=1e-9 cargo build`)
///  2) **Runtime**: call [`set_tolerance`] once before using the library
static TOLERANCE_CELL: OnceLock<Real> = OnceLock::new();

#[inline]
fn default_tolerance() -> Real {
    (10.0 * Real::EPSILON).sqrt()
}

/// Returns the current tolerance.
///
/// Gates near-zero distances, areas and cross products in the contour and mesh
/// algorithms. If not set yet, it tries `CONTOURMESH_TOLERANCE` (parsed as the
/// active `Real`) and falls back to [`default_tolerance`].
pub fn tolerance() -> Real {
    *TOLERANCE_CELL.get_or_init(|| {
        if let Some(environment_variable) = option_env!("CONTOURMESH_TOLERANCE") {
            if let Ok(value) = Real::from_str(environment_variable) {
                return value.max(Real::EPSILON);
            }
        }
        default_tolerance()
    })
}

/// Set the tolerance programmatically once (subsequent calls are ignored).
/// Call near program start: `contourmesh::float_types::set_tolerance(1e-9);`
pub fn set_tolerance(value: Real) {
    let _ = TOLERANCE_CELL.set(value.max(Real::EPSILON));
}

// Pi
/// Archimedes' constant (π)
#[cfg(feature = "f32")]
pub const PI: Real = core::f32::consts::PI;
/// Archimedes' constant (π)
#[cfg(feature = "f64")]
pub const PI: Real = core::f64::consts::PI;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_is_small_and_positive() {
        let tol = tolerance();
        assert!(tol > 0.0);
        assert!(tol < 1e-3);
        assert!(tol >= Real::EPSILON);
    }
}
