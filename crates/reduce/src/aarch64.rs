//! aarch64 NEON reduction kernels.
//!
//! NEON provides two vector shapes: 64-bit `Dn` registers (two `i32` lanes)
//! and 128-bit `Qn` registers (four `i32` / two `f64` lanes). The kernel
//! shape matches the x86_64 module: scalar fallback below one block, full
//! blocks plus a scalar epilogue for sum/dot, and an overlapping final
//! block anchored at `n - lanes` for minimum.
//!
//! Safety:
//! - This file is allowed to use `unsafe` for ISA-specific intrinsics.
//! - All unsafe is contained within this module; the safe wrappers at the
//!   bottom are only ever selected when the capability snapshot reports
//!   NEON.

#![allow(unsafe_code)]

use core::arch::aarch64::*;

use crate::portable;

// ─────────────────────────────────────────────────────────────────────────────
// 64-bit kernels (Dn registers, integer lanes only)
// ─────────────────────────────────────────────────────────────────────────────

/// # Safety
/// Caller must ensure the CPU supports `neon`.
#[target_feature(enable = "neon")]
unsafe fn sum_i32_v64_unchecked(data: &[i32]) -> i32 {
  const LANES: usize = 2;
  if data.len() < LANES {
    return portable::sum_i32(data);
  }

  let mut acc = vdup_n_s32(0);
  let mut chunks = data.chunks_exact(LANES);
  for chunk in chunks.by_ref() {
    // SAFETY: chunks_exact yields exactly LANES contiguous elements.
    let v = unsafe { vld1_s32(chunk.as_ptr()) };
    acc = vadd_s32(acc, v);
  }

  let mut total = vget_lane_s32::<0>(acc).wrapping_add(vget_lane_s32::<1>(acc));

  for &x in chunks.remainder() {
    total = total.wrapping_add(x);
  }
  total
}

/// # Safety
/// Caller must ensure the CPU supports `neon`.
#[target_feature(enable = "neon")]
unsafe fn min_i32_v64_unchecked(data: &[i32]) -> i32 {
  const LANES: usize = 2;
  let n = data.len();
  if n < LANES {
    return portable::min_i32(data);
  }

  let mut acc = vdup_n_s32(i32::MAX);
  let last = n - LANES;
  let mut i = 0;
  while i < last {
    // SAFETY: i + LANES <= n inside the loop.
    let v = unsafe { vld1_s32(data.as_ptr().add(i)) };
    acc = vmin_s32(acc, v);
    i += LANES;
  }
  // Final block anchored at n - LANES covers the tail; overlap is harmless
  // for an idempotent operation.
  // SAFETY: last + LANES == n.
  let v = unsafe { vld1_s32(data.as_ptr().add(last)) };
  acc = vmin_s32(acc, v);

  let a = vget_lane_s32::<0>(acc);
  let b = vget_lane_s32::<1>(acc);
  if b < a { b } else { a }
}

// ─────────────────────────────────────────────────────────────────────────────
// 128-bit kernels (Qn registers)
// ─────────────────────────────────────────────────────────────────────────────

/// # Safety
/// Caller must ensure the CPU supports `neon`.
#[target_feature(enable = "neon")]
unsafe fn sum_i32_v128_unchecked(data: &[i32]) -> i32 {
  const LANES: usize = 4;
  if data.len() < LANES {
    return portable::sum_i32(data);
  }

  let mut acc = vdupq_n_s32(0);
  let mut chunks = data.chunks_exact(LANES);
  for chunk in chunks.by_ref() {
    // SAFETY: chunks_exact yields exactly LANES contiguous elements.
    let v = unsafe { vld1q_s32(chunk.as_ptr()) };
    acc = vaddq_s32(acc, v);
  }

  let mut total = vaddvq_s32(acc);

  for &x in chunks.remainder() {
    total = total.wrapping_add(x);
  }
  total
}

/// # Safety
/// Caller must ensure the CPU supports `neon`.
#[target_feature(enable = "neon")]
unsafe fn sum_f64_v128_unchecked(data: &[f64]) -> f64 {
  const LANES: usize = 2;
  if data.len() < LANES {
    return portable::sum_f64(data);
  }

  let mut acc = vdupq_n_f64(0.0);
  let mut chunks = data.chunks_exact(LANES);
  for chunk in chunks.by_ref() {
    // SAFETY: chunks_exact yields exactly LANES contiguous elements.
    let v = unsafe { vld1q_f64(chunk.as_ptr()) };
    acc = vaddq_f64(acc, v);
  }

  let mut total = vgetq_lane_f64::<0>(acc) + vgetq_lane_f64::<1>(acc);

  for &x in chunks.remainder() {
    total += x;
  }
  total
}

/// # Safety
/// Caller must ensure the CPU supports `neon`.
#[target_feature(enable = "neon")]
unsafe fn dot_f64_v128_unchecked(a: &[f64], b: &[f64]) -> f64 {
  const LANES: usize = 2;
  if a.len() < LANES {
    return portable::dot_f64(a, b);
  }

  let mut acc = vdupq_n_f64(0.0);
  let mut ca = a.chunks_exact(LANES);
  let mut cb = b.chunks_exact(LANES);
  for (x, y) in ca.by_ref().zip(cb.by_ref()) {
    // SAFETY: both chunks hold exactly LANES contiguous elements.
    let vx = unsafe { vld1q_f64(x.as_ptr()) };
    let vy = unsafe { vld1q_f64(y.as_ptr()) };
    acc = vfmaq_f64(acc, vx, vy);
  }

  let mut total = vgetq_lane_f64::<0>(acc) + vgetq_lane_f64::<1>(acc);

  for (&x, &y) in ca.remainder().iter().zip(cb.remainder()) {
    total += x * y;
  }
  total
}

/// # Safety
/// Caller must ensure the CPU supports `neon`.
#[target_feature(enable = "neon")]
unsafe fn min_i32_v128_unchecked(data: &[i32]) -> i32 {
  const LANES: usize = 4;
  let n = data.len();
  if n < LANES {
    return portable::min_i32(data);
  }

  let mut acc = vdupq_n_s32(i32::MAX);
  let last = n - LANES;
  let mut i = 0;
  while i < last {
    // SAFETY: i + LANES <= n inside the loop.
    let v = unsafe { vld1q_s32(data.as_ptr().add(i)) };
    acc = vminq_s32(acc, v);
    i += LANES;
  }
  // SAFETY: last + LANES == n.
  let v = unsafe { vld1q_s32(data.as_ptr().add(last)) };
  acc = vminq_s32(acc, v);

  vminvq_s32(acc)
}

/// # Safety
/// Caller must ensure the CPU supports `neon`.
#[target_feature(enable = "neon")]
unsafe fn min_f64_v128_unchecked(data: &[f64]) -> f64 {
  const LANES: usize = 2;
  let n = data.len();
  if n < LANES {
    return portable::min_f64(data);
  }

  let mut acc = vdupq_n_f64(f64::INFINITY);
  let last = n - LANES;
  let mut i = 0;
  while i < last {
    // SAFETY: i + LANES <= n inside the loop.
    let v = unsafe { vld1q_f64(data.as_ptr().add(i)) };
    acc = vminq_f64(acc, v);
    i += LANES;
  }
  // SAFETY: last + LANES == n.
  let v = unsafe { vld1q_f64(data.as_ptr().add(last)) };
  acc = vminq_f64(acc, v);

  let a = vgetq_lane_f64::<0>(acc);
  let b = vgetq_lane_f64::<1>(acc);
  if b < a { b } else { a }
}

// ─────────────────────────────────────────────────────────────────────────────
// Safe wrappers
// ─────────────────────────────────────────────────────────────────────────────
//
// Each wrapper is only ever selected when the capability snapshot reports
// NEON; the snapshot is the dispatch gatekeeper.

macro_rules! reduce_wrapper {
  ($name:ident, $inner:ident, $elem:ty, $out:ty) => {
    #[inline]
    pub(crate) fn $name(data: &[$elem]) -> $out {
      // SAFETY: selection is gated on the capability snapshot.
      unsafe { $inner(data) }
    }
  };
}

reduce_wrapper!(sum_i32_v64, sum_i32_v64_unchecked, i32, i32);
reduce_wrapper!(sum_i32_v128, sum_i32_v128_unchecked, i32, i32);
reduce_wrapper!(sum_f64_v128, sum_f64_v128_unchecked, f64, f64);
reduce_wrapper!(min_i32_v64, min_i32_v64_unchecked, i32, i32);
reduce_wrapper!(min_i32_v128, min_i32_v128_unchecked, i32, i32);
reduce_wrapper!(min_f64_v128, min_f64_v128_unchecked, f64, f64);

#[inline]
pub(crate) fn dot_f64_v128(a: &[f64], b: &[f64]) -> f64 {
  // SAFETY: selection is gated on the capability snapshot.
  unsafe { dot_f64_v128_unchecked(a, b) }
}
