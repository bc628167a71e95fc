//! x86_64 vector reduction kernels.
//!
//! One kernel per (operation, width) pair: 128-bit SSE lanes, 256-bit AVX
//! lanes, and 512-bit AVX-512 lanes. Every kernel follows the same shape:
//!
//! 1. Buffers shorter than one vector block take the scalar baseline.
//! 2. A vector accumulator starts at the operation's identity.
//! 3. The cursor is plain index/slice arithmetic; loads are unaligned.
//! 4. Tail rule: sum and dot walk full blocks and finish with a scalar
//!    epilogue (no element combined twice); minimum re-loads one final
//!    block anchored at `n - lanes`, which may overlap already-processed
//!    elements, harmless for an idempotent operation.
//! 5. The accumulator is horizontally reduced to a scalar.
//!
//! Safety:
//! - This file is allowed to use `unsafe` for ISA-specific intrinsics.
//! - All unsafe is contained within this module; the safe wrappers at the
//!   bottom are only ever selected when the capability snapshot reports the
//!   matching feature.

#![allow(unsafe_code)]

use core::arch::x86_64::*;

use crate::portable;

// ─────────────────────────────────────────────────────────────────────────────
// 128-bit kernels (SSE2 / SSE4.1)
// ─────────────────────────────────────────────────────────────────────────────

/// # Safety
/// Caller must ensure the CPU supports `sse2`.
#[target_feature(enable = "sse2")]
unsafe fn sum_i32_v128_unchecked(data: &[i32]) -> i32 {
  const LANES: usize = 4;
  if data.len() < LANES {
    return portable::sum_i32(data);
  }

  let mut acc = _mm_setzero_si128();
  let mut chunks = data.chunks_exact(LANES);
  for chunk in chunks.by_ref() {
    // SAFETY: chunks_exact yields exactly LANES contiguous elements.
    let v = unsafe { _mm_loadu_si128(chunk.as_ptr().cast()) };
    acc = _mm_add_epi32(acc, v);
  }

  let mut lanes = [0i32; LANES];
  // SAFETY: `lanes` provides LANES contiguous i32 slots.
  unsafe { _mm_storeu_si128(lanes.as_mut_ptr().cast(), acc) };
  let mut total = 0i32;
  for &lane in &lanes {
    total = total.wrapping_add(lane);
  }

  for &x in chunks.remainder() {
    total = total.wrapping_add(x);
  }
  total
}

/// # Safety
/// Caller must ensure the CPU supports `sse2`.
#[target_feature(enable = "sse2")]
unsafe fn sum_f64_v128_unchecked(data: &[f64]) -> f64 {
  const LANES: usize = 2;
  if data.len() < LANES {
    return portable::sum_f64(data);
  }

  let mut acc = _mm_setzero_pd();
  let mut chunks = data.chunks_exact(LANES);
  for chunk in chunks.by_ref() {
    // SAFETY: chunks_exact yields exactly LANES contiguous elements.
    let v = unsafe { _mm_loadu_pd(chunk.as_ptr()) };
    acc = _mm_add_pd(acc, v);
  }

  let mut lanes = [0.0f64; LANES];
  // SAFETY: `lanes` provides LANES contiguous f64 slots.
  unsafe { _mm_storeu_pd(lanes.as_mut_ptr(), acc) };
  let mut total = lanes[0] + lanes[1];

  for &x in chunks.remainder() {
    total += x;
  }
  total
}

/// # Safety
/// Caller must ensure the CPU supports `sse2`.
#[target_feature(enable = "sse2")]
unsafe fn dot_f64_v128_unchecked(a: &[f64], b: &[f64]) -> f64 {
  const LANES: usize = 2;
  if a.len() < LANES {
    return portable::dot_f64(a, b);
  }

  let mut acc = _mm_setzero_pd();
  let mut ca = a.chunks_exact(LANES);
  let mut cb = b.chunks_exact(LANES);
  for (x, y) in ca.by_ref().zip(cb.by_ref()) {
    // SAFETY: both chunks hold exactly LANES contiguous elements.
    let vx = unsafe { _mm_loadu_pd(x.as_ptr()) };
    let vy = unsafe { _mm_loadu_pd(y.as_ptr()) };
    acc = _mm_add_pd(acc, _mm_mul_pd(vx, vy));
  }

  let mut lanes = [0.0f64; LANES];
  // SAFETY: `lanes` provides LANES contiguous f64 slots.
  unsafe { _mm_storeu_pd(lanes.as_mut_ptr(), acc) };
  let mut total = lanes[0] + lanes[1];

  for (&x, &y) in ca.remainder().iter().zip(cb.remainder()) {
    total += x * y;
  }
  total
}

/// # Safety
/// Caller must ensure the CPU supports `sse4.1` (`pminsd`).
#[target_feature(enable = "sse4.1")]
unsafe fn min_i32_v128_unchecked(data: &[i32]) -> i32 {
  const LANES: usize = 4;
  let n = data.len();
  if n < LANES {
    return portable::min_i32(data);
  }

  let mut acc = _mm_set1_epi32(i32::MAX);
  let last = n - LANES;
  let mut i = 0;
  while i < last {
    // SAFETY: i + LANES <= n inside the loop.
    let v = unsafe { _mm_loadu_si128(data.as_ptr().add(i).cast()) };
    acc = _mm_min_epi32(acc, v);
    i += LANES;
  }
  // Final block anchored at n - LANES covers the tail; overlap is harmless
  // for an idempotent operation.
  // SAFETY: last + LANES == n.
  let v = unsafe { _mm_loadu_si128(data.as_ptr().add(last).cast()) };
  acc = _mm_min_epi32(acc, v);

  let mut lanes = [0i32; LANES];
  // SAFETY: `lanes` provides LANES contiguous i32 slots.
  unsafe { _mm_storeu_si128(lanes.as_mut_ptr().cast(), acc) };
  let mut m = lanes[0];
  for &lane in &lanes[1..] {
    if lane < m {
      m = lane;
    }
  }
  m
}

/// # Safety
/// Caller must ensure the CPU supports `sse2`.
#[target_feature(enable = "sse2")]
unsafe fn min_f64_v128_unchecked(data: &[f64]) -> f64 {
  const LANES: usize = 2;
  let n = data.len();
  if n < LANES {
    return portable::min_f64(data);
  }

  let mut acc = _mm_set1_pd(f64::INFINITY);
  let last = n - LANES;
  let mut i = 0;
  while i < last {
    // SAFETY: i + LANES <= n inside the loop.
    let v = unsafe { _mm_loadu_pd(data.as_ptr().add(i)) };
    acc = _mm_min_pd(acc, v);
    i += LANES;
  }
  // SAFETY: last + LANES == n.
  let v = unsafe { _mm_loadu_pd(data.as_ptr().add(last)) };
  acc = _mm_min_pd(acc, v);

  let mut lanes = [0.0f64; LANES];
  // SAFETY: `lanes` provides LANES contiguous f64 slots.
  unsafe { _mm_storeu_pd(lanes.as_mut_ptr(), acc) };
  if lanes[1] < lanes[0] { lanes[1] } else { lanes[0] }
}

// ─────────────────────────────────────────────────────────────────────────────
// 256-bit kernels (AVX / AVX2 / FMA)
// ─────────────────────────────────────────────────────────────────────────────

/// # Safety
/// Caller must ensure the CPU supports `avx2`.
#[target_feature(enable = "avx2")]
unsafe fn sum_i32_v256_unchecked(data: &[i32]) -> i32 {
  const LANES: usize = 8;
  if data.len() < LANES {
    return portable::sum_i32(data);
  }

  let mut acc = _mm256_setzero_si256();
  let mut chunks = data.chunks_exact(LANES);
  for chunk in chunks.by_ref() {
    // SAFETY: chunks_exact yields exactly LANES contiguous elements.
    let v = unsafe { _mm256_loadu_si256(chunk.as_ptr().cast()) };
    acc = _mm256_add_epi32(acc, v);
  }

  let mut lanes = [0i32; LANES];
  // SAFETY: `lanes` provides LANES contiguous i32 slots.
  unsafe { _mm256_storeu_si256(lanes.as_mut_ptr().cast(), acc) };
  let mut total = 0i32;
  for &lane in &lanes {
    total = total.wrapping_add(lane);
  }

  for &x in chunks.remainder() {
    total = total.wrapping_add(x);
  }
  total
}

/// # Safety
/// Caller must ensure the CPU supports `avx`.
#[target_feature(enable = "avx")]
unsafe fn sum_f64_v256_unchecked(data: &[f64]) -> f64 {
  const LANES: usize = 4;
  if data.len() < LANES {
    return portable::sum_f64(data);
  }

  let mut acc = _mm256_setzero_pd();
  let mut chunks = data.chunks_exact(LANES);
  for chunk in chunks.by_ref() {
    // SAFETY: chunks_exact yields exactly LANES contiguous elements.
    let v = unsafe { _mm256_loadu_pd(chunk.as_ptr()) };
    acc = _mm256_add_pd(acc, v);
  }

  let mut lanes = [0.0f64; LANES];
  // SAFETY: `lanes` provides LANES contiguous f64 slots.
  unsafe { _mm256_storeu_pd(lanes.as_mut_ptr(), acc) };
  let mut total = lanes[0] + lanes[1] + lanes[2] + lanes[3];

  for &x in chunks.remainder() {
    total += x;
  }
  total
}

/// # Safety
/// Caller must ensure the CPU supports `avx`.
#[target_feature(enable = "avx")]
unsafe fn dot_f64_v256_unchecked(a: &[f64], b: &[f64]) -> f64 {
  const LANES: usize = 4;
  if a.len() < LANES {
    return portable::dot_f64(a, b);
  }

  let mut acc = _mm256_setzero_pd();
  let mut ca = a.chunks_exact(LANES);
  let mut cb = b.chunks_exact(LANES);
  for (x, y) in ca.by_ref().zip(cb.by_ref()) {
    // SAFETY: both chunks hold exactly LANES contiguous elements.
    let vx = unsafe { _mm256_loadu_pd(x.as_ptr()) };
    let vy = unsafe { _mm256_loadu_pd(y.as_ptr()) };
    acc = _mm256_add_pd(acc, _mm256_mul_pd(vx, vy));
  }

  let mut lanes = [0.0f64; LANES];
  // SAFETY: `lanes` provides LANES contiguous f64 slots.
  unsafe { _mm256_storeu_pd(lanes.as_mut_ptr(), acc) };
  let mut total = lanes[0] + lanes[1] + lanes[2] + lanes[3];

  for (&x, &y) in ca.remainder().iter().zip(cb.remainder()) {
    total += x * y;
  }
  total
}

/// # Safety
/// Caller must ensure the CPU supports `avx` and `fma`.
#[target_feature(enable = "avx", enable = "fma")]
unsafe fn dot_f64_v256fma_unchecked(a: &[f64], b: &[f64]) -> f64 {
  const LANES: usize = 4;
  if a.len() < LANES {
    return portable::dot_f64(a, b);
  }

  let mut acc = _mm256_setzero_pd();
  let mut ca = a.chunks_exact(LANES);
  let mut cb = b.chunks_exact(LANES);
  for (x, y) in ca.by_ref().zip(cb.by_ref()) {
    // SAFETY: both chunks hold exactly LANES contiguous elements.
    let vx = unsafe { _mm256_loadu_pd(x.as_ptr()) };
    let vy = unsafe { _mm256_loadu_pd(y.as_ptr()) };
    acc = _mm256_fmadd_pd(vx, vy, acc);
  }

  let mut lanes = [0.0f64; LANES];
  // SAFETY: `lanes` provides LANES contiguous f64 slots.
  unsafe { _mm256_storeu_pd(lanes.as_mut_ptr(), acc) };
  let mut total = lanes[0] + lanes[1] + lanes[2] + lanes[3];

  for (&x, &y) in ca.remainder().iter().zip(cb.remainder()) {
    total += x * y;
  }
  total
}

/// # Safety
/// Caller must ensure the CPU supports `avx2`.
#[target_feature(enable = "avx2")]
unsafe fn min_i32_v256_unchecked(data: &[i32]) -> i32 {
  const LANES: usize = 8;
  let n = data.len();
  if n < LANES {
    return portable::min_i32(data);
  }

  let mut acc = _mm256_set1_epi32(i32::MAX);
  let last = n - LANES;
  let mut i = 0;
  while i < last {
    // SAFETY: i + LANES <= n inside the loop.
    let v = unsafe { _mm256_loadu_si256(data.as_ptr().add(i).cast()) };
    acc = _mm256_min_epi32(acc, v);
    i += LANES;
  }
  // SAFETY: last + LANES == n.
  let v = unsafe { _mm256_loadu_si256(data.as_ptr().add(last).cast()) };
  acc = _mm256_min_epi32(acc, v);

  let mut lanes = [0i32; LANES];
  // SAFETY: `lanes` provides LANES contiguous i32 slots.
  unsafe { _mm256_storeu_si256(lanes.as_mut_ptr().cast(), acc) };
  let mut m = lanes[0];
  for &lane in &lanes[1..] {
    if lane < m {
      m = lane;
    }
  }
  m
}

/// # Safety
/// Caller must ensure the CPU supports `avx`.
#[target_feature(enable = "avx")]
unsafe fn min_f64_v256_unchecked(data: &[f64]) -> f64 {
  const LANES: usize = 4;
  let n = data.len();
  if n < LANES {
    return portable::min_f64(data);
  }

  let mut acc = _mm256_set1_pd(f64::INFINITY);
  let last = n - LANES;
  let mut i = 0;
  while i < last {
    // SAFETY: i + LANES <= n inside the loop.
    let v = unsafe { _mm256_loadu_pd(data.as_ptr().add(i)) };
    acc = _mm256_min_pd(acc, v);
    i += LANES;
  }
  // SAFETY: last + LANES == n.
  let v = unsafe { _mm256_loadu_pd(data.as_ptr().add(last)) };
  acc = _mm256_min_pd(acc, v);

  let mut lanes = [0.0f64; LANES];
  // SAFETY: `lanes` provides LANES contiguous f64 slots.
  unsafe { _mm256_storeu_pd(lanes.as_mut_ptr(), acc) };
  let mut m = lanes[0];
  for &lane in &lanes[1..] {
    if lane < m {
      m = lane;
    }
  }
  m
}

// ─────────────────────────────────────────────────────────────────────────────
// 512-bit kernels (AVX-512F)
// ─────────────────────────────────────────────────────────────────────────────

/// # Safety
/// Caller must ensure the CPU supports `avx512f`.
#[target_feature(enable = "avx512f")]
unsafe fn sum_i32_v512_unchecked(data: &[i32]) -> i32 {
  const LANES: usize = 16;
  if data.len() < LANES {
    return portable::sum_i32(data);
  }

  let mut acc = _mm512_setzero_si512();
  let mut chunks = data.chunks_exact(LANES);
  for chunk in chunks.by_ref() {
    // SAFETY: chunks_exact yields exactly LANES contiguous elements.
    let v = unsafe { _mm512_loadu_epi32(chunk.as_ptr()) };
    acc = _mm512_add_epi32(acc, v);
  }

  let mut total = _mm512_reduce_add_epi32(acc);

  for &x in chunks.remainder() {
    total = total.wrapping_add(x);
  }
  total
}

/// # Safety
/// Caller must ensure the CPU supports `avx512f`.
#[target_feature(enable = "avx512f")]
unsafe fn sum_f64_v512_unchecked(data: &[f64]) -> f64 {
  const LANES: usize = 8;
  if data.len() < LANES {
    return portable::sum_f64(data);
  }

  let mut acc = _mm512_setzero_pd();
  let mut chunks = data.chunks_exact(LANES);
  for chunk in chunks.by_ref() {
    // SAFETY: chunks_exact yields exactly LANES contiguous elements.
    let v = unsafe { _mm512_loadu_pd(chunk.as_ptr()) };
    acc = _mm512_add_pd(acc, v);
  }

  let mut total = _mm512_reduce_add_pd(acc);

  for &x in chunks.remainder() {
    total += x;
  }
  total
}

/// # Safety
/// Caller must ensure the CPU supports `avx512f`.
#[target_feature(enable = "avx512f")]
unsafe fn dot_f64_v512_unchecked(a: &[f64], b: &[f64]) -> f64 {
  const LANES: usize = 8;
  if a.len() < LANES {
    return portable::dot_f64(a, b);
  }

  let mut acc = _mm512_setzero_pd();
  let mut ca = a.chunks_exact(LANES);
  let mut cb = b.chunks_exact(LANES);
  for (x, y) in ca.by_ref().zip(cb.by_ref()) {
    // SAFETY: both chunks hold exactly LANES contiguous elements.
    let vx = unsafe { _mm512_loadu_pd(x.as_ptr()) };
    let vy = unsafe { _mm512_loadu_pd(y.as_ptr()) };
    acc = _mm512_fmadd_pd(vx, vy, acc);
  }

  let mut total = _mm512_reduce_add_pd(acc);

  for (&x, &y) in ca.remainder().iter().zip(cb.remainder()) {
    total += x * y;
  }
  total
}

/// # Safety
/// Caller must ensure the CPU supports `avx512f`.
#[target_feature(enable = "avx512f")]
unsafe fn min_i32_v512_unchecked(data: &[i32]) -> i32 {
  const LANES: usize = 16;
  let n = data.len();
  if n < LANES {
    return portable::min_i32(data);
  }

  let mut acc = _mm512_set1_epi32(i32::MAX);
  let last = n - LANES;
  let mut i = 0;
  while i < last {
    // SAFETY: i + LANES <= n inside the loop.
    let v = unsafe { _mm512_loadu_epi32(data.as_ptr().add(i)) };
    acc = _mm512_min_epi32(acc, v);
    i += LANES;
  }
  // SAFETY: last + LANES == n.
  let v = unsafe { _mm512_loadu_epi32(data.as_ptr().add(last)) };
  acc = _mm512_min_epi32(acc, v);

  _mm512_reduce_min_epi32(acc)
}

/// # Safety
/// Caller must ensure the CPU supports `avx512f`.
#[target_feature(enable = "avx512f")]
unsafe fn min_f64_v512_unchecked(data: &[f64]) -> f64 {
  const LANES: usize = 8;
  let n = data.len();
  if n < LANES {
    return portable::min_f64(data);
  }

  let mut acc = _mm512_set1_pd(f64::INFINITY);
  let last = n - LANES;
  let mut i = 0;
  while i < last {
    // SAFETY: i + LANES <= n inside the loop.
    let v = unsafe { _mm512_loadu_pd(data.as_ptr().add(i)) };
    acc = _mm512_min_pd(acc, v);
    i += LANES;
  }
  // SAFETY: last + LANES == n.
  let v = unsafe { _mm512_loadu_pd(data.as_ptr().add(last)) };
  acc = _mm512_min_pd(acc, v);

  _mm512_reduce_min_pd(acc)
}

// ─────────────────────────────────────────────────────────────────────────────
// Safe wrappers
// ─────────────────────────────────────────────────────────────────────────────
//
// Each wrapper is only ever selected when the capability snapshot reports
// the feature its kernel enables; the snapshot is the dispatch gatekeeper.

macro_rules! reduce_wrapper {
  ($name:ident, $inner:ident, $elem:ty, $out:ty) => {
    #[inline]
    pub(crate) fn $name(data: &[$elem]) -> $out {
      // SAFETY: selection is gated on the capability snapshot.
      unsafe { $inner(data) }
    }
  };
}

reduce_wrapper!(sum_i32_v128, sum_i32_v128_unchecked, i32, i32);
reduce_wrapper!(sum_i32_v256, sum_i32_v256_unchecked, i32, i32);
reduce_wrapper!(sum_i32_v512, sum_i32_v512_unchecked, i32, i32);
reduce_wrapper!(sum_f64_v128, sum_f64_v128_unchecked, f64, f64);
reduce_wrapper!(sum_f64_v256, sum_f64_v256_unchecked, f64, f64);
reduce_wrapper!(sum_f64_v512, sum_f64_v512_unchecked, f64, f64);
reduce_wrapper!(min_i32_v128, min_i32_v128_unchecked, i32, i32);
reduce_wrapper!(min_i32_v256, min_i32_v256_unchecked, i32, i32);
reduce_wrapper!(min_i32_v512, min_i32_v512_unchecked, i32, i32);
reduce_wrapper!(min_f64_v128, min_f64_v128_unchecked, f64, f64);
reduce_wrapper!(min_f64_v256, min_f64_v256_unchecked, f64, f64);
reduce_wrapper!(min_f64_v512, min_f64_v512_unchecked, f64, f64);

#[inline]
pub(crate) fn dot_f64_v128(a: &[f64], b: &[f64]) -> f64 {
  // SAFETY: selection is gated on the capability snapshot.
  unsafe { dot_f64_v128_unchecked(a, b) }
}

#[inline]
pub(crate) fn dot_f64_v256(a: &[f64], b: &[f64]) -> f64 {
  // SAFETY: selection is gated on the capability snapshot.
  unsafe { dot_f64_v256_unchecked(a, b) }
}

#[inline]
pub(crate) fn dot_f64_v256fma(a: &[f64], b: &[f64]) -> f64 {
  // SAFETY: selection is gated on the capability snapshot.
  unsafe { dot_f64_v256fma_unchecked(a, b) }
}

#[inline]
pub(crate) fn dot_f64_v512(a: &[f64], b: &[f64]) -> f64 {
  // SAFETY: selection is gated on the capability snapshot.
  unsafe { dot_f64_v512_unchecked(a, b) }
}
