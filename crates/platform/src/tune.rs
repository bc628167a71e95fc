//! Capability-derived tuning hints.
//!
//! `Tune` answers: "What should I *prefer* on this machine?"
//!
//! Unlike [`CpuCaps`](crate::CpuCaps) (which describes what's *possible*),
//! `Tune` describes what's *optimal*:
//!
//! - the buffer size below which vector setup overhead outweighs its benefit
//! - whether the widest (512-bit) lanes actually pay off, or whether the
//!   machine downclocks enough that 256-bit lanes win

// ─────────────────────────────────────────────────────────────────────────────
// TuneKind: Identity discriminant for O(1) name lookup
// ─────────────────────────────────────────────────────────────────────────────

/// Identifies which tuning preset is in use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TuneKind {
  Default = 0,
  Portable,
  /// x86_64 with full-throughput 512-bit lanes (Zen 4/5, newer Xeons).
  WideVector,
  /// x86_64 where 256-bit lanes are preferred (ZMM warmup/downclocking).
  NarrowVector,
  /// aarch64 with NEON.
  Neon,
}

impl TuneKind {
  /// Returns the human-readable name for this tuning preset.
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::Default => "default",
      Self::Portable => "portable",
      Self::WideVector => "wide-vector",
      Self::NarrowVector => "narrow-vector",
      Self::Neon => "neon",
    }
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tune: tuning hints
// ─────────────────────────────────────────────────────────────────────────────

/// Tuning hints guiding kernel selection.
///
/// Derived once from the detected capabilities; read-only thereafter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tune {
  /// Which preset this tuning came from.
  pub kind: TuneKind,

  /// Minimum buffer length (elements for reductions, bytes for checksums)
  /// where vector kernels become faster than scalar ones.
  ///
  /// This is a preference, not a legality constraint. The hard rule (a
  /// width-W kernel needs at least W/element-size elements for its vector
  /// path) is enforced by the kernels themselves.
  pub simd_threshold: usize,

  /// Whether 512-bit lanes run at full throughput on this machine.
  ///
  /// When false, `LaneWidth::Native` resolves to 256-bit lanes even if
  /// AVX-512 is present.
  pub fast_wide_vectors: bool,
}

impl Tune {
  /// Conservative defaults for unknown CPUs.
  pub const DEFAULT: Self = Self {
    kind: TuneKind::Default,
    simd_threshold: 64,
    fast_wide_vectors: false,
  };

  /// Scalar-only environments (wasm without simd128, Miri, unknown arches).
  pub const PORTABLE: Self = Self {
    kind: TuneKind::Portable,
    simd_threshold: usize::MAX,
    fast_wide_vectors: false,
  };

  /// x86_64 where ZMM registers run at full clock.
  pub const WIDE_VECTOR: Self = Self {
    kind: TuneKind::WideVector,
    simd_threshold: 32,
    fast_wide_vectors: true,
  };

  /// x86_64 where 256-bit lanes are the sweet spot.
  pub const NARROW_VECTOR: Self = Self {
    kind: TuneKind::NarrowVector,
    simd_threshold: 32,
    fast_wide_vectors: false,
  };

  /// aarch64 with NEON (128-bit lanes, no wider option).
  pub const NEON: Self = Self {
    kind: TuneKind::Neon,
    simd_threshold: 16,
    fast_wide_vectors: false,
  };

  /// Returns the preset name.
  #[inline]
  #[must_use]
  pub const fn name(self) -> &'static str {
    self.kind.name()
  }
}

impl Default for Tune {
  #[inline]
  fn default() -> Self {
    Self::DEFAULT
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn presets_are_sane() {
    for tune in [Tune::DEFAULT, Tune::WIDE_VECTOR, Tune::NARROW_VECTOR, Tune::NEON] {
      assert!(tune.simd_threshold > 0);
      assert!(tune.simd_threshold < usize::MAX);
    }
    assert_eq!(Tune::PORTABLE.simd_threshold, usize::MAX);
    assert!(!Tune::PORTABLE.fast_wide_vectors);
  }

  #[test]
  fn names_are_distinct() {
    let names = [
      TuneKind::Default.name(),
      TuneKind::Portable.name(),
      TuneKind::WideVector.name(),
      TuneKind::NarrowVector.name(),
      TuneKind::Neon.name(),
    ];
    for (i, a) in names.iter().enumerate() {
      for b in names.iter().skip(i + 1) {
        assert_ne!(a, b);
      }
    }
  }

  #[test]
  fn default_impl() {
    assert_eq!(Tune::default(), Tune::DEFAULT);
  }
}
