use crate::CoreError;

/// Floating point type used throughout the solver
pub type Real = f64;

/// Absolute/relative tolerance pair for float comparisons.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Finite and strictly positive.
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, CoreError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(CoreError::InvalidArg {
            what: format!("{what} must be positive (got {v})"),
        })
    }
}

/// Finite and not zero.
pub fn ensure_nonzero(v: Real, what: &'static str) -> Result<Real, CoreError> {
    let v = ensure_finite(v, what)?;
    if v != 0.0 {
        Ok(v)
    } else {
        Err(CoreError::InvalidArg {
            what: format!("{what} must be non-zero"),
        })
    }
}

/// Square root of a difference of squares, `None` when the radicand is negative.
///
/// A radicand that is negative only by rounding noise (relative to `a^2`) is
/// clamped to zero.
pub fn sqrt_diff_squares(a: Real, b: Real) -> Option<Real> {
    let radicand = a * a - b * b;
    if radicand >= 0.0 {
        Some(radicand.sqrt())
    } else if radicand > -4.0 * Real::EPSILON * a * a {
        Some(0.0)
    } else {
        None
    }
}
