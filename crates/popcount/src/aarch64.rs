//! aarch64 SIMD population count.
//!
//! NEON has no scalar popcount; instead the `cnt` instruction counts bits
//! per byte lane. The word is placed in a vector, counted byte-wise, then
//! the lanes are summed horizontally. Both the 64-bit and 128-bit vector
//! shapes are provided (the 128-bit form carries the word in its low half).
//!
//! Safety:
//! - This file is allowed to use `unsafe` for ISA-specific intrinsics.
//! - All unsafe is contained within this module.

#![allow(unsafe_code)]

use core::arch::aarch64::*;

/// # Safety
/// Caller must ensure the CPU supports `neon`.
#[target_feature(enable = "neon")]
unsafe fn cnt_v64_unchecked(word: u64) -> u32 {
  let v = vcreate_u8(word);
  let counts = vcnt_u8(v);
  vaddv_u8(counts) as u32
}

/// # Safety
/// Caller must ensure the CPU supports `neon`.
#[target_feature(enable = "neon")]
unsafe fn cnt_v128_unchecked(word: u64) -> u32 {
  // Word in the low half, zeroes above; the upper lanes contribute nothing.
  let v = vcombine_u8(vcreate_u8(word), vcreate_u8(0));
  let counts = vcntq_u8(v);
  vaddvq_u8(counts) as u32
}

#[inline]
pub(crate) fn cnt_v64(word: u64) -> u32 {
  // SAFETY: selection is gated on the capability snapshot.
  unsafe { cnt_v64_unchecked(word) }
}

#[inline]
pub(crate) fn cnt_v128(word: u64) -> u32 {
  // SAFETY: selection is gated on the capability snapshot.
  unsafe { cnt_v128_unchecked(word) }
}
