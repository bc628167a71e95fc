//! Vector lane widths.

/// How many bits a single vector operation processes at once.
///
/// A kernel instantiated for width `W` only executes its vector path when
/// the buffer holds at least `W / (8 * size_of::<T>())` elements; shorter
/// buffers take the scalar path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LaneWidth {
  /// 64-bit vectors (aarch64 NEON `Dn` registers; integer lanes only).
  W64,
  /// 128-bit vectors (SSE2 / NEON `Qn`).
  W128,
  /// 256-bit vectors (AVX/AVX2).
  W256,
  /// 512-bit vectors (AVX-512).
  W512,
  /// The widest width the detected capabilities support, resolved once per
  /// process.
  #[default]
  Native,
}

impl LaneWidth {
  /// Width in bits, or `None` for [`Native`](Self::Native).
  #[inline]
  #[must_use]
  pub const fn bits(self) -> Option<usize> {
    match self {
      Self::W64 => Some(64),
      Self::W128 => Some(128),
      Self::W256 => Some(256),
      Self::W512 => Some(512),
      Self::Native => None,
    }
  }

  /// Number of lanes for elements of the given byte size, or `None` for
  /// [`Native`](Self::Native).
  #[inline]
  #[must_use]
  pub const fn lanes(self, elem_bytes: usize) -> Option<usize> {
    match self.bits() {
      Some(bits) => Some(bits / (8 * elem_bytes)),
      None => None,
    }
  }

  /// Stable textual name, for diagnostics.
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::W64 => "64",
      Self::W128 => "128",
      Self::W256 => "256",
      Self::W512 => "512",
      Self::Native => "native",
    }
  }
}

impl core::fmt::Display for LaneWidth {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_str(self.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn lane_counts() {
    assert_eq!(LaneWidth::W128.lanes(4), Some(4)); // i32
    assert_eq!(LaneWidth::W128.lanes(8), Some(2)); // f64
    assert_eq!(LaneWidth::W256.lanes(4), Some(8));
    assert_eq!(LaneWidth::W256.lanes(8), Some(4));
    assert_eq!(LaneWidth::W512.lanes(4), Some(16));
    assert_eq!(LaneWidth::W512.lanes(8), Some(8));
    assert_eq!(LaneWidth::W64.lanes(4), Some(2));
    assert_eq!(LaneWidth::Native.lanes(4), None);
  }

  #[test]
  fn default_is_native() {
    assert_eq!(LaneWidth::default(), LaneWidth::Native);
  }

  #[test]
  fn display_names() {
    assert_eq!(LaneWidth::W64.as_str(), "64");
    assert_eq!(LaneWidth::Native.as_str(), "native");
  }
}
