//! Checksum backend selection.
//!
//! The auto selector picks the fastest legal kernel for the running
//! machine. A forced backend bypasses it, either to pin the portable
//! baseline (reference runs, differential tests) or to insist on the
//! hardware path, which fails with
//! [`UnsupportedOperation`](traits::KernelError::UnsupportedOperation)
//! rather than silently falling back when the instruction family is absent.

/// Forced backend selection for the CRC-32 family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum CrcBackend {
  /// Use the default auto selector.
  #[default]
  Auto,
  /// Force hardware CRC instructions.
  ///
  /// - x86_64: SSE4.2 `crc32` (CRC-32C only; the instruction cannot compute
  ///   ISO-HDLC CRC-32)
  /// - aarch64: ARMv8 CRC extension (both polynomials)
  HwCrc,
  /// Force the bit-at-a-time portable baseline.
  Bitwise,
}

impl CrcBackend {
  /// Stable textual name, for diagnostics.
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Auto => "auto",
      Self::HwCrc => "hwcrc",
      Self::Bitwise => "bitwise",
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn names() {
    assert_eq!(CrcBackend::Auto.as_str(), "auto");
    assert_eq!(CrcBackend::HwCrc.as_str(), "hwcrc");
    assert_eq!(CrcBackend::Bitwise.as_str(), "bitwise");
    assert_eq!(CrcBackend::default(), CrcBackend::Auto);
  }
}
