//! CRC-32 family checksums with hardware acceleration.
//!
//! This crate provides the two common 32-bit CRC polynomials with automatic
//! hardware acceleration on supported platforms.
//!
//! # Supported Algorithms
//!
//! | Type | Polynomial | Output | Use Cases |
//! |------|------------|--------|-----------|
//! | [`Crc32`] | 0x04C11DB7 | `u32` | Ethernet, gzip, zip, PNG |
//! | [`Crc32c`] | 0x1EDC6F41 | `u32` | iSCSI, SCTP, ext4, Btrfs |
//!
//! The two polynomials are not interchangeable; hardware CRC instructions
//! are hardwired to one of them.
//!
//! # Hardware Acceleration
//!
//! | Platform | Feature | Algorithms |
//! |----------|---------|------------|
//! | x86_64 | SSE4.2 `crc32` | CRC-32C only |
//! | aarch64 | CRC extension | CRC-32 and CRC-32C |
//!
//! Kernel selection happens once per process against the detected
//! capability snapshot; an instruction family is never invoked on a machine
//! that lacks it.
//!
//! # Example
//!
//! ```rust
//! use checksum::{Checksum, Crc32, Crc32c};
//!
//! // One-shot computation (fastest for complete data)
//! assert_eq!(Crc32::checksum(b"123456789"), 0xCBF4_3926);
//! assert_eq!(Crc32c::checksum(b"123456789"), 0xE306_9283);
//!
//! // Streaming computation
//! let mut hasher = Crc32::new();
//! hasher.update(b"1234");
//! hasher.update(b"56789");
//! assert_eq!(hasher.finalize(), 0xCBF4_3926);
//! ```
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the `std` feature for
//! embedded use; dispatch then relies on compile-time target features only.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod bitwise;
mod config;
mod constants;
mod crc32;
mod crc32c;

pub use config::CrcBackend;
pub use crc32::Crc32;
pub use crc32c::Crc32c;
// Re-export traits for convenience
pub use traits::{Checksum, KernelError};

/// Which generator polynomial [`checksum_crc32`] should use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Crc32Variant {
  /// ISO-HDLC (0x04C11DB7), the archive-format CRC.
  Crc32,
  /// Castagnoli (0x1EDC6F41), the storage/network CRC.
  Crc32c,
}

/// Compute a 32-bit CRC over `data` with the selected polynomial.
///
/// Convenience wrapper over [`Crc32::checksum`] / [`Crc32c::checksum`].
///
/// # Example
///
/// ```
/// use checksum::{Crc32Variant, checksum_crc32};
///
/// assert_eq!(checksum_crc32(b"123456789", Crc32Variant::Crc32), 0xCBF4_3926);
/// assert_eq!(checksum_crc32(b"123456789", Crc32Variant::Crc32c), 0xE306_9283);
/// ```
#[inline]
#[must_use]
pub fn checksum_crc32(data: &[u8], variant: Crc32Variant) -> u32 {
  match variant {
    Crc32Variant::Crc32 => Crc32::checksum(data),
    Crc32Variant::Crc32c => Crc32c::checksum(data),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn variant_selects_polynomial() {
    assert_eq!(checksum_crc32(b"123456789", Crc32Variant::Crc32), 0xCBF4_3926);
    assert_eq!(checksum_crc32(b"123456789", Crc32Variant::Crc32c), 0xE306_9283);
    assert_eq!(checksum_crc32(b"", Crc32Variant::Crc32), 0);
    assert_eq!(checksum_crc32(b"", Crc32Variant::Crc32c), 0);
  }
}
