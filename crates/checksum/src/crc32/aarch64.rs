//! aarch64-accelerated CRC-32 (ISO-HDLC).
//!
//! Uses the ARMv8 CRC32 extension (`crc32*` instructions, the ISO-HDLC
//! variants, distinct from the `crc32c*` Castagnoli forms). The buffer is
//! walked in descending chunk sizes: 8, then 4, then 1 byte.
//!
//! Safety:
//! - This file is allowed to use `unsafe` for ISA-specific intrinsics.
//! - All unsafe is contained within this module.

#![allow(unsafe_code)]

#[cfg(any(target_feature = "crc", feature = "std"))]
use core::arch::aarch64::{__crc32b, __crc32d, __crc32w};

/// Compute CRC-32 using the ARMv8 CRC32 extension.
///
/// # Safety
/// Caller must ensure the CPU supports the `crc` target feature.
#[cfg(any(target_feature = "crc", feature = "std"))]
#[target_feature(enable = "crc")]
pub(crate) unsafe fn compute_crc_unchecked(crc: u32, data: &[u8]) -> u32 {
  let mut current = crc;

  let mut eights = data.chunks_exact(8);
  for chunk in eights.by_ref() {
    let mut word = [0u8; 8];
    word.copy_from_slice(chunk);
    current = __crc32d(current, u64::from_le_bytes(word));
  }

  let mut fours = eights.remainder().chunks_exact(4);
  for chunk in fours.by_ref() {
    let mut word = [0u8; 4];
    word.copy_from_slice(chunk);
    current = __crc32w(current, u32::from_le_bytes(word));
  }

  for &byte in fours.remainder() {
    current = __crc32b(current, byte);
  }

  current
}

/// Compute CRC-32 using the `crc` target feature when enabled at compile time.
#[cfg(target_feature = "crc")]
#[inline]
pub(crate) fn compute_crc_enabled(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: this function is only compiled when `target_feature="crc"`.
  unsafe { compute_crc_unchecked(crc, data) }
}

#[cfg(feature = "std")]
#[inline]
pub(crate) fn compute_crc_runtime(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: selected only when the capability snapshot reports the crc extension.
  unsafe { compute_crc_unchecked(crc, data) }
}
