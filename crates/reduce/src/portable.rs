//! Scalar reduction baselines.
//!
//! Straightforward left-to-right loops. These are both the fallback for
//! buffers shorter than one vector block and the reference every vector
//! kernel is tested against.
//!
//! Callers validate inputs (non-empty, equal lengths for dot) before these
//! run; the kernels themselves add no checks.

/// Left-to-right `i32` summation with wrapping arithmetic.
///
/// Wrapping matches the lanewise adds of the vector kernels, so every width
/// agrees bit-for-bit even when the sum overflows.
#[inline]
#[must_use]
pub fn sum_i32(data: &[i32]) -> i32 {
  data.iter().fold(0i32, |acc, &x| acc.wrapping_add(x))
}

/// Left-to-right `f64` summation.
#[inline]
#[must_use]
pub fn sum_f64(data: &[f64]) -> f64 {
  data.iter().fold(0.0f64, |acc, &x| acc + x)
}

/// Left-to-right `f64` dot product.
#[inline]
#[must_use]
pub fn dot_f64(a: &[f64], b: &[f64]) -> f64 {
  a.iter().zip(b).fold(0.0f64, |acc, (&x, &y)| acc + x * y)
}

/// Scalar `i32` minimum.
#[inline]
#[must_use]
pub fn min_i32(data: &[i32]) -> i32 {
  data.iter().copied().fold(i32::MAX, i32::min)
}

/// Scalar `f64` minimum.
///
/// NaN inputs are outside the contract (lanewise-minimum NaN semantics
/// differ between instruction sets).
#[inline]
#[must_use]
pub fn min_f64(data: &[f64]) -> f64 {
  data.iter().copied().fold(f64::INFINITY, |acc, x| if x < acc { x } else { acc })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sums() {
    assert_eq!(sum_i32(&[1, 2, 3, 4]), 10);
    assert_eq!(sum_i32(&[i32::MAX, 1]), i32::MIN); // wraps
    assert_eq!(sum_f64(&[0.5, 0.25, 0.25]), 1.0);
  }

  #[test]
  fn dot() {
    assert_eq!(dot_f64(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]), 32.0);
  }

  #[test]
  fn minimum() {
    assert_eq!(min_i32(&[3, -7, 12, 0]), -7);
    assert_eq!(min_f64(&[3.5, -0.5, 2.0]), -0.5);
    assert_eq!(min_f64(&[f64::NEG_INFINITY, 1.0]), f64::NEG_INFINITY);
  }
}
