//! SIMD reduction, checksum, and popcount kernels with hardware dispatch.
//!
//! `rsimd` provides a small set of numeric and bit-manipulation primitives
//! (summation, dot product, minimum-finding, CRC-32/CRC-32C, population
//! count), each with a scalar baseline and hardware-accelerated kernels
//! selected once per process from the detected CPU capabilities. Every
//! accelerated path returns the same result as the baseline (bit-for-bit
//! for integer, bit, and checksum kernels; within a documented relative
//! tolerance for reassociated floating-point sums).
//!
//! # Quick Start
//!
//! ```
//! use rsimd::{Crc32Variant, checksum_crc32, popcount, reduce_min, reduce_sum};
//!
//! let data = [3i32, 1, 4, 1, 5, 9, 2, 6];
//! assert_eq!(reduce_sum(&data), Ok(31));
//! assert_eq!(reduce_min(&data), Ok(1));
//!
//! assert_eq!(checksum_crc32(b"123456789", Crc32Variant::Crc32), 0xCBF43926);
//! assert_eq!(checksum_crc32(b"123456789", Crc32Variant::Crc32c), 0xE3069283);
//!
//! assert_eq!(popcount(0b1011), 3);
//! ```
//!
//! # Capability Detection
//!
//! [`detect_capabilities`] probes the processor once and caches the
//! snapshot for the lifetime of the process; repeated calls return
//! identical flags. Kernel selection never routes to an instruction family
//! the snapshot does not report.
//!
//! ```
//! let caps = rsimd::detect_capabilities();
//! println!("{caps}");
//! ```
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `std` | Yes | Runtime CPU detection and cached dispatch |
//!
//! Without `std`, hardware acceleration uses compile-time target features
//! only.
#![cfg_attr(not(feature = "std"), no_std)]

// =============================================================================
// Capability detection
// =============================================================================

pub use platform::{Arch, Bits256, CpuCaps, Tune};

/// Detect the processor's capability snapshot (idempotent, process-wide
/// cache).
#[inline]
#[must_use]
pub fn detect_capabilities() -> CpuCaps {
  platform::caps()
}

// =============================================================================
// Checksums
// =============================================================================

pub use checksum::{Checksum, Crc32, Crc32Variant, Crc32c, CrcBackend, checksum_crc32};

// =============================================================================
// Reductions
// =============================================================================

pub use reduce::{
  LaneWidth, SelectedKernels, dot_f64, dot_f64_with, min_f64, min_f64_with, min_i32, min_i32_with, selected_kernels,
  sum_f64, sum_f64_with, sum_i32, sum_i32_with,
};
// The language-agnostic operation names, for callers porting from the
// original surface.
pub use reduce::{dot_f64 as reduce_dot, min_i32 as reduce_min, sum_i32 as reduce_sum};

// =============================================================================
// Population count
// =============================================================================

pub use popcount::{PopcountBackend, popcount, popcount_with};

// =============================================================================
// Errors
// =============================================================================

pub use traits::KernelError;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn facade_surface() {
    assert_eq!(reduce_sum(&[1, 2, 3]), Ok(6));
    assert_eq!(reduce_min(&[4, 2, 8]), Ok(2));
    assert_eq!(reduce_dot(&[1.0, 2.0], &[3.0, 4.0]), Ok(11.0));
    assert_eq!(popcount(u64::MAX), 64);
    assert_eq!(checksum_crc32(b"", Crc32Variant::Crc32), 0);
  }

  #[test]
  fn detect_capabilities_is_idempotent() {
    assert_eq!(detect_capabilities(), detect_capabilities());
  }
}
