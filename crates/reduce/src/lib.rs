//! Width-generic SIMD reductions with hardware dispatch.
//!
//! This crate provides three reductions over borrowed numeric buffers:
//!
//! - **sum** (`i32` with wrapping arithmetic, `f64`)
//! - **dot product** (`f64`, two equal-length buffers)
//! - **minimum** (`i32`, `f64`)
//!
//! Each operation has one kernel per supported vector width (64-bit NEON
//! lanes, 128-bit SSE2/NEON, 256-bit AVX, 512-bit AVX-512) plus a scalar
//! baseline. The auto entry points select the best kernel once per process
//! from the detected capability snapshot; the `_with` variants pin an
//! explicit [`LaneWidth`] and fail with
//! [`KernelError::UnsupportedOperation`] when the machine lacks it.
//!
//! # Example
//!
//! ```
//! use reduce::{LaneWidth, sum_i32, sum_i32_with};
//!
//! let data = [1, 2, 3, 4, 5];
//! assert_eq!(sum_i32(&data), Ok(15));
//! assert_eq!(sum_i32_with(LaneWidth::Native, &data), Ok(15));
//! ```
//!
//! # Numeric Contract
//!
//! Integer results are identical across every width. Floating-point sums
//! and dot products reassociate additions across lanes, so results may
//! differ from the left-to-right scalar order in low-order bits; tests
//! bound this with a relative tolerance of 1e-9. `f64` minimum assumes
//! NaN-free input.
//!
//! # Errors
//!
//! All validation happens here, before any kernel runs; kernels assume
//! validated input and no partial result is ever produced.
//!
//! - empty buffer: [`KernelError::InvalidInput`] (the reduction is
//!   undefined)
//! - mismatched dot-product lengths: [`KernelError::InvalidInput`]
//! - unavailable lane width: [`KernelError::UnsupportedOperation`]

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

#[cfg(target_arch = "aarch64")]
mod aarch64;
mod dispatch;
mod lanes;
mod portable;
#[cfg(target_arch = "x86_64")]
mod x86_64;

pub use dispatch::{SelectedKernels, selected_kernels};
pub use lanes::LaneWidth;
pub use traits::KernelError;

/// Sum an `i32` buffer (wrapping arithmetic), auto-selected width.
///
/// # Errors
///
/// [`KernelError::InvalidInput`] if `data` is empty.
#[inline]
pub fn sum_i32(data: &[i32]) -> Result<i32, KernelError> {
  if data.is_empty() {
    return Err(KernelError::InvalidInput);
  }
  Ok(dispatch::sum_i32_auto(data))
}

/// Sum an `i32` buffer with an explicit lane width.
///
/// # Errors
///
/// [`KernelError::InvalidInput`] if `data` is empty;
/// [`KernelError::UnsupportedOperation`] if the width is unavailable on
/// this machine.
#[inline]
pub fn sum_i32_with(width: LaneWidth, data: &[i32]) -> Result<i32, KernelError> {
  if data.is_empty() {
    return Err(KernelError::InvalidInput);
  }
  match dispatch::sum_i32_kernel(width) {
    Some(kernel) => Ok(kernel(data)),
    None => Err(KernelError::UnsupportedOperation),
  }
}

/// Sum an `f64` buffer, auto-selected width.
///
/// # Errors
///
/// [`KernelError::InvalidInput`] if `data` is empty.
#[inline]
pub fn sum_f64(data: &[f64]) -> Result<f64, KernelError> {
  if data.is_empty() {
    return Err(KernelError::InvalidInput);
  }
  Ok(dispatch::sum_f64_auto(data))
}

/// Sum an `f64` buffer with an explicit lane width.
///
/// # Errors
///
/// [`KernelError::InvalidInput`] if `data` is empty;
/// [`KernelError::UnsupportedOperation`] if the width is unavailable on
/// this machine (64-bit lanes never hold `f64`).
#[inline]
pub fn sum_f64_with(width: LaneWidth, data: &[f64]) -> Result<f64, KernelError> {
  if data.is_empty() {
    return Err(KernelError::InvalidInput);
  }
  match dispatch::sum_f64_kernel(width) {
    Some(kernel) => Ok(kernel(data)),
    None => Err(KernelError::UnsupportedOperation),
  }
}

/// Dot product of two equal-length `f64` buffers, auto-selected width.
///
/// # Errors
///
/// [`KernelError::InvalidInput`] if the lengths differ or the buffers are
/// empty.
#[inline]
pub fn dot_f64(a: &[f64], b: &[f64]) -> Result<f64, KernelError> {
  if a.len() != b.len() || a.is_empty() {
    return Err(KernelError::InvalidInput);
  }
  Ok(dispatch::dot_f64_auto(a, b))
}

/// Dot product with an explicit lane width.
///
/// # Errors
///
/// [`KernelError::InvalidInput`] if the lengths differ or the buffers are
/// empty; [`KernelError::UnsupportedOperation`] if the width is
/// unavailable on this machine.
#[inline]
pub fn dot_f64_with(width: LaneWidth, a: &[f64], b: &[f64]) -> Result<f64, KernelError> {
  if a.len() != b.len() || a.is_empty() {
    return Err(KernelError::InvalidInput);
  }
  match dispatch::dot_f64_kernel(width) {
    Some(kernel) => Ok(kernel(a, b)),
    None => Err(KernelError::UnsupportedOperation),
  }
}

/// Minimum of an `i32` buffer, auto-selected width.
///
/// # Errors
///
/// [`KernelError::InvalidInput`] if `data` is empty.
#[inline]
pub fn min_i32(data: &[i32]) -> Result<i32, KernelError> {
  if data.is_empty() {
    return Err(KernelError::InvalidInput);
  }
  Ok(dispatch::min_i32_auto(data))
}

/// Minimum of an `i32` buffer with an explicit lane width.
///
/// # Errors
///
/// [`KernelError::InvalidInput`] if `data` is empty;
/// [`KernelError::UnsupportedOperation`] if the width is unavailable on
/// this machine.
#[inline]
pub fn min_i32_with(width: LaneWidth, data: &[i32]) -> Result<i32, KernelError> {
  if data.is_empty() {
    return Err(KernelError::InvalidInput);
  }
  match dispatch::min_i32_kernel(width) {
    Some(kernel) => Ok(kernel(data)),
    None => Err(KernelError::UnsupportedOperation),
  }
}

/// Minimum of an `f64` buffer (NaN-free input), auto-selected width.
///
/// # Errors
///
/// [`KernelError::InvalidInput`] if `data` is empty.
#[inline]
pub fn min_f64(data: &[f64]) -> Result<f64, KernelError> {
  if data.is_empty() {
    return Err(KernelError::InvalidInput);
  }
  Ok(dispatch::min_f64_auto(data))
}

/// Minimum of an `f64` buffer with an explicit lane width.
///
/// # Errors
///
/// [`KernelError::InvalidInput`] if `data` is empty;
/// [`KernelError::UnsupportedOperation`] if the width is unavailable on
/// this machine.
#[inline]
pub fn min_f64_with(width: LaneWidth, data: &[f64]) -> Result<f64, KernelError> {
  if data.is_empty() {
    return Err(KernelError::InvalidInput);
  }
  match dispatch::min_f64_kernel(width) {
    Some(kernel) => Ok(kernel(data)),
    None => Err(KernelError::UnsupportedOperation),
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  extern crate std;

  use std::vec;
  use std::vec::Vec;

  use super::*;

  const FIXED_WIDTHS: &[LaneWidth] = &[LaneWidth::W64, LaneWidth::W128, LaneWidth::W256, LaneWidth::W512];

  /// Comparison for reassociated floating-point reductions.
  ///
  /// The error of a reassociated sum scales with the sum of absolute
  /// terms, not with the (possibly cancelled) result, so that is the
  /// scale the tolerance applies to.
  fn assert_rel_close(actual: f64, expected: f64, magnitude: f64) {
    let scale = magnitude.max(1.0);
    assert!(
      (actual - expected).abs() <= 1e-9 * scale,
      "{actual} and {expected} differ beyond tolerance (scale {scale})"
    );
  }

  fn gen_i32(len: usize, seed: u64) -> Vec<i32> {
    let mut out = Vec::with_capacity(len);
    let mut x = seed | 1;
    for _ in 0..len {
      x ^= x << 13;
      x ^= x >> 7;
      x ^= x << 17;
      // Byte-sized values, like the original workload.
      out.push((x & 0xFF) as i32);
    }
    out
  }

  fn gen_f64(len: usize, seed: u64) -> Vec<f64> {
    let mut out = Vec::with_capacity(len);
    let mut x = seed | 1;
    for _ in 0..len {
      x ^= x << 13;
      x ^= x >> 7;
      x ^= x << 17;
      // Uniform-ish in [-1, 1).
      out.push((x >> 11) as f64 / (1u64 << 52) as f64 - 1.0);
    }
    out
  }

  #[test]
  fn empty_buffers_are_rejected() {
    assert_eq!(sum_i32(&[]), Err(KernelError::InvalidInput));
    assert_eq!(sum_f64(&[]), Err(KernelError::InvalidInput));
    assert_eq!(min_i32(&[]), Err(KernelError::InvalidInput));
    assert_eq!(min_f64(&[]), Err(KernelError::InvalidInput));
    assert_eq!(dot_f64(&[], &[]), Err(KernelError::InvalidInput));

    for &width in FIXED_WIDTHS {
      assert_eq!(sum_i32_with(width, &[]), Err(KernelError::InvalidInput));
      assert_eq!(min_i32_with(width, &[]), Err(KernelError::InvalidInput));
    }
  }

  #[test]
  fn dot_length_mismatch_is_rejected() {
    assert_eq!(dot_f64(&[1.0, 2.0], &[1.0]), Err(KernelError::InvalidInput));
    assert_eq!(
      dot_f64_with(LaneWidth::Native, &[1.0], &[1.0, 2.0]),
      Err(KernelError::InvalidInput)
    );
  }

  #[test]
  fn single_element_buffers() {
    assert_eq!(sum_i32(&[7]), Ok(7));
    assert_eq!(min_i32(&[7]), Ok(7));
    assert_eq!(sum_f64(&[0.5]), Ok(0.5));
    assert_eq!(min_f64(&[0.5]), Ok(0.5));
    assert_eq!(dot_f64(&[3.0], &[4.0]), Ok(12.0));
  }

  /// Overlapping-tail boundary rule: for every width W and length N with
  /// N % W != 0, an all-ones buffer must sum to exactly N (nothing
  /// double-counted, nothing skipped).
  #[test]
  fn all_ones_sums_to_length_at_every_width() {
    for n in 1usize..=140 {
      let ones = vec![1i32; n];
      assert_eq!(sum_i32(&ones), Ok(n as i32), "auto width at n={n}");

      for &width in FIXED_WIDTHS {
        if let Ok(total) = sum_i32_with(width, &ones) {
          assert_eq!(total, n as i32, "width {width} at n={n}");
        }
      }
    }
  }

  #[test]
  fn sum_i32_matches_scalar_at_every_width() {
    for n in [1usize, 2, 3, 4, 5, 7, 8, 9, 15, 16, 17, 31, 33, 63, 65, 100, 128, 1000] {
      let data = gen_i32(n, n as u64 ^ 0x9E37_79B9_7F4A_7C15);
      let expected: i32 = data.iter().fold(0i32, |acc, &x| acc.wrapping_add(x));

      assert_eq!(sum_i32(&data), Ok(expected), "auto at n={n}");
      for &width in FIXED_WIDTHS {
        if let Ok(total) = sum_i32_with(width, &data) {
          assert_eq!(total, expected, "width {width} at n={n}");
        }
      }
    }
  }

  #[test]
  fn sum_i32_wrapping_matches_scalar() {
    // Large values so lane sums overflow; every path must wrap identically.
    let data = vec![i32::MAX; 64];
    let expected = data.iter().fold(0i32, |acc, &x| acc.wrapping_add(x));
    assert_eq!(sum_i32(&data), Ok(expected));
    for &width in FIXED_WIDTHS {
      if let Ok(total) = sum_i32_with(width, &data) {
        assert_eq!(total, expected, "width {width}");
      }
    }
  }

  #[test]
  fn sum_f64_matches_scalar_within_tolerance() {
    for n in [1usize, 2, 3, 5, 8, 9, 16, 17, 33, 100, 1000] {
      let data = gen_f64(n, n as u64 ^ 0xD1B5_4A32_D192_ED03);
      let expected: f64 = data.iter().sum();
      let magnitude: f64 = data.iter().map(|x| x.abs()).sum();

      let auto = sum_f64(&data).expect("non-empty buffer");
      assert_rel_close(auto, expected, magnitude);

      for &width in FIXED_WIDTHS {
        if let Ok(total) = sum_f64_with(width, &data) {
          assert_rel_close(total, expected, magnitude);
        }
      }
    }
  }

  #[test]
  fn dot_f64_matches_scalar_within_tolerance() {
    for n in [1usize, 2, 3, 4, 7, 8, 9, 16, 31, 100, 1000] {
      let a = gen_f64(n, n as u64 ^ 0xA076_1D64_78BD_642F);
      let b = gen_f64(n, n as u64 ^ 0x2545_F491_4F6C_DD1D);
      let expected: f64 = a.iter().zip(&b).map(|(&x, &y)| x * y).sum();
      let magnitude: f64 = a.iter().zip(&b).map(|(&x, &y)| (x * y).abs()).sum();

      let auto = dot_f64(&a, &b).expect("equal-length buffers");
      assert_rel_close(auto, expected, magnitude);

      for &width in FIXED_WIDTHS {
        if let Ok(total) = dot_f64_with(width, &a, &b) {
          assert_rel_close(total, expected, magnitude);
        }
      }
    }
  }

  #[test]
  fn min_i32_matches_scalar_at_every_width() {
    for n in [1usize, 2, 3, 4, 5, 7, 8, 9, 15, 16, 17, 31, 33, 63, 65, 100, 1000] {
      let mut data = gen_i32(n, n as u64 ^ 0x2545_F491_4F6C_DD1D);
      // Plant the minimum in the tail so the overlapping final block matters.
      data[n - 1] = -1000;
      let expected = *data.iter().min().expect("non-empty buffer");

      assert_eq!(min_i32(&data), Ok(expected), "auto at n={n}");
      for &width in FIXED_WIDTHS {
        if let Ok(m) = min_i32_with(width, &data) {
          assert_eq!(m, expected, "width {width} at n={n}");
        }
      }
    }
  }

  #[test]
  fn min_f64_matches_scalar_at_every_width() {
    for n in [1usize, 2, 3, 5, 8, 9, 16, 17, 33, 100, 1000] {
      let mut data = gen_f64(n, n as u64 ^ 0x9E37_79B9_7F4A_7C15);
      data[n / 2] = -2.5;
      let expected = data.iter().copied().fold(f64::INFINITY, f64::min);

      assert_eq!(min_f64(&data), Ok(expected), "auto at n={n}");
      for &width in FIXED_WIDTHS {
        if let Ok(m) = min_f64_with(width, &data) {
          assert_eq!(m, expected, "width {width} at n={n}");
        }
      }
    }
  }

  #[test]
  fn native_width_equals_auto() {
    let data = gen_i32(97, 42);
    assert_eq!(sum_i32_with(LaneWidth::Native, &data), sum_i32(&data));
    assert_eq!(min_i32_with(LaneWidth::Native, &data), min_i32(&data));

    let f = gen_f64(97, 43);
    assert_eq!(sum_f64_with(LaneWidth::Native, &f), sum_f64(&f));
    assert_eq!(min_f64_with(LaneWidth::Native, &f), min_f64(&f));
    assert_eq!(dot_f64_with(LaneWidth::Native, &f, &f), dot_f64(&f, &f));
  }

  #[test]
  fn unsupported_widths_fail_cleanly() {
    let data = [1i32, 2, 3];
    for &width in FIXED_WIDTHS {
      match sum_i32_with(width, &data) {
        Ok(total) => assert_eq!(total, 6),
        Err(err) => assert_eq!(err, KernelError::UnsupportedOperation),
      }
    }

    // f64 never fits a 64-bit lane.
    assert_eq!(
      sum_f64_with(LaneWidth::W64, &[1.0, 2.0]),
      Err(KernelError::UnsupportedOperation)
    );
  }
}
