//! Scalar checks shared by parameter and option validation.

use crate::{CoreError, CoreResult};

/// Scalar type of every state, parameter and time value.
pub type Real = f64;

/// Pass `v` through unless it is NaN or infinite.
pub fn ensure_finite(v: Real, what: &'static str) -> CoreResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Require a strictly positive, finite value.
pub fn ensure_positive(v: Real, what: &'static str) -> CoreResult<Real> {
    if ensure_finite(v, what)? > 0.0 {
        Ok(v)
    } else {
        Err(CoreError::InvalidArg { what })
    }
}

/// Require `lo < v <= hi`.
pub fn ensure_in_half_open(v: Real, lo: Real, hi: Real, what: &'static str) -> CoreResult<Real> {
    if ensure_finite(v, what)? > lo && v <= hi {
        Ok(v)
    } else {
        Err(CoreError::InvalidArg { what })
    }
}
