use crate::{CoreError, CoreResult};

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

pub fn ensure_finite(v: Real, what: &'static str) -> CoreResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Check that `v` is a finite value in `[0, 1]`.
///
/// Values are reported, never clamped.
pub fn ensure_fraction(v: Real, what: &'static str) -> CoreResult<Real> {
    let v = ensure_finite(v, what)?;
    if (0.0..=1.0).contains(&v) {
        Ok(v)
    } else {
        Err(CoreError::OutOfUnitInterval { what, value: v })
    }
}

/// Check that `v` is finite and non-negative.
pub fn ensure_non_negative(v: Real, what: &'static str) -> CoreResult<Real> {
    let v = ensure_finite(v, what)?;
    if v < 0.0 {
        return Err(CoreError::Invariant { what });
    }
    Ok(v)
}

/// Bounds-check a zero-based index against a sequence length.
#[inline]
pub fn check_index(index: usize, len: usize, what: &'static str) -> CoreResult<usize> {
    if index < len {
        Ok(index)
    } else {
        Err(CoreError::IndexOob { what, index, len })
    }
}

/// Scale a vector so its entries sum to one.
///
/// Fails if any entry is non-finite or negative, or if the sum is not positive.
pub fn normalized(values: &[Real]) -> CoreResult<Vec<Real>> {
    let mut sum = 0.0;
    for &v in values {
        ensure_non_negative(v, "normalized component")?;
        sum += v;
    }
    if sum <= 0.0 || !sum.is_finite() {
        return Err(CoreError::InvalidArg {
            what: "values sum to zero or non-finite",
        });
    }
    Ok(values.iter().map(|v| v / sum).collect())
}
