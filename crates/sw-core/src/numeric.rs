use crate::CoreError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
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

/// Reject zero, negative and non-finite values.
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, CoreError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(CoreError::InvalidArg { what })
    }
}

pub fn ensure_dim(expected: usize, found: usize, what: &'static str) -> Result<(), CoreError> {
    if expected == found {
        Ok(())
    } else {
        Err(CoreError::DimensionMismatch {
            what,
            expected,
            found,
        })
    }
}

/// Largest number of samples a single run or grid may hold.
pub const MAX_SAMPLES: usize = 50_000_000;

fn bounded_count(n: Real) -> Result<usize, CoreError> {
    if n.is_finite() && (0.0..=MAX_SAMPLES as Real).contains(&n) {
        Ok(n as usize)
    } else {
        Err(CoreError::InvalidArg {
            what: "sample count exceeds MAX_SAMPLES",
        })
    }
}

/// Number of fixed steps of size `h` that fit in `total`.
///
/// Truncates like an integer cast, so `total = 13.0, h = 0.75` gives 17.
pub fn step_count(total: Real, h: Real) -> Result<usize, CoreError> {
    bounded_count((total / h).floor())
}

/// Number of points `start + i * dt` strictly below `start + span`.
pub fn interval_count(span: Real, dt: Real) -> Result<usize, CoreError> {
    bounded_count((span / dt).ceil())
}

/// Largest absolute value in a series, NaN-propagating.
pub fn max_abs(values: &[Real]) -> Real {
    values.iter().fold(0.0, |acc: Real, v| {
        if v.is_nan() || acc.is_nan() {
            Real::NAN
        } else {
            acc.max(v.abs())
        }
    })
}
