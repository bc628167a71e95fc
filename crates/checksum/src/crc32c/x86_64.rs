//! x86_64-accelerated CRC32-C (Castagnoli).
//!
//! Uses the SSE4.2 `crc32` instruction family, which is hardwired to the
//! Castagnoli polynomial (it cannot compute ISO-HDLC CRC-32). The buffer is
//! walked in descending chunk sizes: 8 bytes through the 64-bit form, then
//! 4 bytes through the 32-bit form, then byte at a time.
//!
//! Safety:
//! - This file is allowed to use `unsafe` for ISA-specific intrinsics.
//! - All unsafe is contained within this module.

#![allow(unsafe_code)]

#[cfg(any(target_feature = "sse4.2", feature = "std"))]
use core::arch::x86_64::{_mm_crc32_u8, _mm_crc32_u32, _mm_crc32_u64};

/// Compute CRC-32C using SSE4.2 `crc32` instructions.
///
/// # Safety
/// Caller must ensure the CPU supports the `sse4.2` target feature.
#[cfg(any(target_feature = "sse4.2", feature = "std"))]
#[target_feature(enable = "sse4.2")]
pub(crate) unsafe fn compute_sse42_unchecked(crc: u32, data: &[u8]) -> u32 {
  let mut current = crc;

  let mut eights = data.chunks_exact(8);
  for chunk in eights.by_ref() {
    let mut word = [0u8; 8];
    word.copy_from_slice(chunk);
    current = _mm_crc32_u64(current as u64, u64::from_le_bytes(word)) as u32;
  }

  let mut fours = eights.remainder().chunks_exact(4);
  for chunk in fours.by_ref() {
    let mut word = [0u8; 4];
    word.copy_from_slice(chunk);
    current = _mm_crc32_u32(current, u32::from_le_bytes(word));
  }

  for &byte in fours.remainder() {
    current = _mm_crc32_u8(current, byte);
  }

  current
}

/// Compute CRC-32C using SSE4.2 when it is enabled at compile time.
#[cfg(target_feature = "sse4.2")]
#[inline]
pub(crate) fn compute_sse42_enabled(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: this function is only compiled when `target_feature="sse4.2"`.
  unsafe { compute_sse42_unchecked(crc, data) }
}

#[cfg(feature = "std")]
#[inline]
pub(crate) fn compute_sse42_runtime(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: selected only when the capability snapshot reports sse4.2.
  unsafe { compute_sse42_unchecked(crc, data) }
}
