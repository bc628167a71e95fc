//! CPU capability representation.
//!
//! This module provides a unified capability model for all supported
//! architectures. It answers the question: "Which kernel variants can I
//! legally run on this machine?"
//!
//! # Design
//!
//! [`Bits256`] is a 256-bit bitset of ISA extensions. [`CpuCaps`] pairs the
//! bitset with the active [`Arch`]. The bits are architecture-specific but
//! the API is uniform across all targets.
//!
//! # Bit Layout
//!
//! - Bits 0-63: x86/x86_64 features
//! - Bits 64-127: aarch64 features
//! - Bits 192-255: WebAssembly and other architectures

// ─────────────────────────────────────────────────────────────────────────────
// Core Bitset Type
// ─────────────────────────────────────────────────────────────────────────────

/// CPU feature bitset: 256 bits of ISA extensions.
///
/// This is the core type for capability-based dispatch. Use
/// [`contains()`](Bits256::contains) to check that a required feature set is
/// available.
///
/// # Thread Safety
///
/// `Bits256` is `Copy`, `Send`, and `Sync`. It can be freely shared across
/// threads.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Bits256(pub(crate) [u64; 4]);

impl Bits256 {
  /// Empty feature set.
  pub const NONE: Self = Self([0; 4]);

  /// Create a feature set from raw words.
  ///
  /// Primarily useful for testing and fuzzing. Normal usage should prefer
  /// the predefined constants.
  #[cfg(any(test, feature = "testing"))]
  #[inline]
  #[must_use]
  pub const fn from_raw(words: [u64; 4]) -> Self {
    Self(words)
  }

  /// Check if all features in `required` are present.
  ///
  /// This is the core dispatch check, marked `#[inline(always)]` for zero
  /// overhead.
  #[inline(always)]
  #[must_use]
  pub const fn contains(self, required: Self) -> bool {
    (self.0[0] & required.0[0]) == required.0[0]
      && (self.0[1] & required.0[1]) == required.0[1]
      && (self.0[2] & required.0[2]) == required.0[2]
      && (self.0[3] & required.0[3]) == required.0[3]
  }

  /// Union of two feature sets.
  #[inline]
  #[must_use]
  pub const fn union(self, other: Self) -> Self {
    Self([
      self.0[0] | other.0[0],
      self.0[1] | other.0[1],
      self.0[2] | other.0[2],
      self.0[3] | other.0[3],
    ])
  }

  /// Intersection of two feature sets.
  #[inline]
  #[must_use]
  pub const fn intersection(self, other: Self) -> Self {
    Self([
      self.0[0] & other.0[0],
      self.0[1] & other.0[1],
      self.0[2] & other.0[2],
      self.0[3] & other.0[3],
    ])
  }

  /// Check if the feature set is empty.
  #[inline]
  #[must_use]
  pub const fn is_empty(self) -> bool {
    self.0[0] == 0 && self.0[1] == 0 && self.0[2] == 0 && self.0[3] == 0
  }

  /// Count the number of features present.
  #[inline]
  #[must_use]
  pub const fn count(self) -> u32 {
    self.0[0].count_ones() + self.0[1].count_ones() + self.0[2].count_ones() + self.0[3].count_ones()
  }

  /// Create a feature set with a single bit set.
  #[inline]
  #[must_use]
  pub const fn bit(bit: u8) -> Self {
    let word = (bit / 64) as usize;
    let bit_in_word = bit % 64;
    // Use match instead of indexing to satisfy const evaluation.
    let mut bits = [0u64; 4];
    match word {
      0 => bits[0] = 1u64 << bit_in_word,
      1 => bits[1] = 1u64 << bit_in_word,
      2 => bits[2] = 1u64 << bit_in_word,
      _ => bits[3] = 1u64 << bit_in_word,
    }
    Self(bits)
  }

  /// Check if a specific bit is set.
  #[inline]
  #[must_use]
  pub const fn has_bit(self, bit: u8) -> bool {
    let word = (bit / 64) as usize;
    let bit_in_word = bit % 64;
    let bits_word = match word {
      0 => self.0[0],
      1 => self.0[1],
      2 => self.0[2],
      _ => self.0[3],
    };
    (bits_word & (1u64 << bit_in_word)) != 0
  }
}

impl core::ops::BitOr for Bits256 {
  type Output = Self;

  #[inline]
  fn bitor(self, rhs: Self) -> Self::Output {
    self.union(rhs)
  }
}

impl core::ops::BitAnd for Bits256 {
  type Output = Self;

  #[inline]
  fn bitand(self, rhs: Self) -> Self::Output {
    self.intersection(rhs)
  }
}

impl core::ops::BitOrAssign for Bits256 {
  #[inline]
  fn bitor_assign(&mut self, rhs: Self) {
    *self = self.union(rhs);
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Architecture Identification
// ─────────────────────────────────────────────────────────────────────────────

/// Target architecture enumeration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Arch {
  X86_64,
  X86,
  Aarch64,
  Arm,
  Wasm32,
  #[default]
  Other,
}

impl Arch {
  /// Get the architecture for the current compilation target.
  #[inline]
  #[must_use]
  pub const fn current() -> Self {
    #[cfg(target_arch = "x86_64")]
    {
      Self::X86_64
    }
    #[cfg(target_arch = "x86")]
    {
      Self::X86
    }
    #[cfg(target_arch = "aarch64")]
    {
      Self::Aarch64
    }
    #[cfg(target_arch = "arm")]
    {
      Self::Arm
    }
    #[cfg(target_arch = "wasm32")]
    {
      Self::Wasm32
    }
    #[cfg(not(any(
      target_arch = "x86_64",
      target_arch = "x86",
      target_arch = "aarch64",
      target_arch = "arm",
      target_arch = "wasm32"
    )))]
    {
      Self::Other
    }
  }

  /// Returns the human-readable name for this architecture.
  #[inline]
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::X86_64 => "x86_64",
      Self::X86 => "x86",
      Self::Aarch64 => "aarch64",
      Self::Arm => "arm",
      Self::Wasm32 => "wasm32",
      Self::Other => "other",
    }
  }
}

impl core::fmt::Display for Arch {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_str(self.name())
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Capability Snapshot
// ─────────────────────────────────────────────────────────────────────────────

/// Process-wide CPU capability snapshot.
///
/// Pairs the detected architecture with its feature bitset. Constructed once
/// by the detector (or injected via an override) and read-only thereafter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CpuCaps {
  /// Active processor architecture family.
  pub arch: Arch,
  /// Detected ISA extensions.
  pub bits: Bits256,
}

impl CpuCaps {
  /// Portable-only snapshot (no hardware acceleration).
  pub const NONE: Self = Self {
    arch: Arch::Other,
    bits: Bits256::NONE,
  };

  /// Create a snapshot for the current compilation target with the given bits.
  #[inline]
  #[must_use]
  pub const fn new(bits: Bits256) -> Self {
    Self {
      arch: Arch::current(),
      bits,
    }
  }

  /// Check if all features in `required` are available.
  #[inline(always)]
  #[must_use]
  pub const fn has(self, required: Bits256) -> bool {
    self.bits.contains(required)
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// x86/x86_64 Features (bits 0-63)
// ─────────────────────────────────────────────────────────────────────────────

/// x86/x86_64 CPU features.
///
/// Covers the vector widths, the `crc32` instruction family (SSE4.2), and
/// the `popcnt` instruction this library dispatches on.
pub mod x86 {
  use super::Bits256;

  // ─── SSE Family ───
  pub const SSE2: Bits256 = Bits256::bit(0);
  pub const SSE41: Bits256 = Bits256::bit(1);
  pub const SSE42: Bits256 = Bits256::bit(2);

  // ─── AVX Family ───
  pub const AVX: Bits256 = Bits256::bit(3);
  pub const AVX2: Bits256 = Bits256::bit(4);
  pub const FMA: Bits256 = Bits256::bit(5);

  // ─── Bit Manipulation ───
  pub const POPCNT: Bits256 = Bits256::bit(6);

  // ─── AVX-512 Foundation ───
  pub const AVX512F: Bits256 = Bits256::bit(7);
  pub const AVX512VL: Bits256 = Bits256::bit(8);
  pub const AVX512BW: Bits256 = Bits256::bit(9);
  pub const AVX512DQ: Bits256 = Bits256::bit(10);

  // ─── Combined Capability Masks ───
  // Common feature combinations for dispatch decisions.

  /// 128-bit integer/f64 lanes (baseline on x86_64).
  pub const V128_READY: Bits256 = SSE2;

  /// 128-bit lanewise `i32` minimum (`pminsd` is SSE4.1).
  pub const V128_MIN_READY: Bits256 = Bits256([SSE2.0[0] | SSE41.0[0], 0, 0, 0]);

  /// 256-bit lanes: AVX + AVX2.
  pub const V256_READY: Bits256 = Bits256([AVX.0[0] | AVX2.0[0], 0, 0, 0]);

  /// 256-bit fused multiply-add: AVX + AVX2 + FMA.
  pub const V256_FMA_READY: Bits256 = Bits256([AVX.0[0] | AVX2.0[0] | FMA.0[0], 0, 0, 0]);

  /// 512-bit lanes: AVX-512 foundation.
  pub const V512_READY: Bits256 = AVX512F;

  /// Hardware CRC32-C: the SSE4.2 `crc32` instruction family.
  pub const HWCRC_READY: Bits256 = SSE42;

  /// Hardware population count.
  pub const POPCNT_READY: Bits256 = POPCNT;
}

// ─────────────────────────────────────────────────────────────────────────────
// aarch64 Features (bits 64-127)
// ─────────────────────────────────────────────────────────────────────────────

/// aarch64 CPU features.
pub mod aarch64 {
  use super::Bits256;

  /// Advanced SIMD (baseline on AArch64; provides both 64- and 128-bit lanes
  /// and the byte-wise `cnt` population count).
  pub const NEON: Bits256 = Bits256::bit(64);

  /// ARMv8 CRC32 extension (`crc32*` + `crc32c*` instructions).
  pub const CRC: Bits256 = Bits256::bit(65);

  // ─── Combined Capability Masks ───

  /// 64-bit vector lanes.
  pub const V64_READY: Bits256 = NEON;

  /// 128-bit vector lanes.
  pub const V128_READY: Bits256 = NEON;

  /// Hardware CRC32/CRC32-C.
  pub const HWCRC_READY: Bits256 = CRC;

  /// Byte-wise SIMD population count.
  pub const POPCNT_READY: Bits256 = NEON;
}

// ─────────────────────────────────────────────────────────────────────────────
// WebAssembly Features (bits 192-255)
// ─────────────────────────────────────────────────────────────────────────────

/// WebAssembly CPU features.
pub mod wasm {
  use super::Bits256;

  pub const SIMD128: Bits256 = Bits256::bit(192);
}

// ─────────────────────────────────────────────────────────────────────────────
// Feature Name Lookup (for diagnostics)
// ─────────────────────────────────────────────────────────────────────────────

/// Feature name entry: (bit_index, name).
type FeatureEntry = (u8, &'static str);

/// x86/x86_64 feature names.
const X86_FEATURES: &[FeatureEntry] = &[
  (0, "sse2"),
  (1, "sse4.1"),
  (2, "sse4.2"),
  (3, "avx"),
  (4, "avx2"),
  (5, "fma"),
  (6, "popcnt"),
  (7, "avx512f"),
  (8, "avx512vl"),
  (9, "avx512bw"),
  (10, "avx512dq"),
];

/// aarch64 feature names.
const AARCH64_FEATURES: &[FeatureEntry] = &[(64, "neon"), (65, "crc")];

/// WebAssembly feature names.
const WASM_FEATURES: &[FeatureEntry] = &[(192, "simd128")];

impl Bits256 {
  /// Returns an iterator over the names of all set feature bits.
  pub fn feature_names(self) -> impl Iterator<Item = &'static str> {
    X86_FEATURES
      .iter()
      .chain(AARCH64_FEATURES.iter())
      .chain(WASM_FEATURES.iter())
      .filter_map(move |(bit, name)| if self.has_bit(*bit) { Some(*name) } else { None })
  }
}

impl core::fmt::Debug for Bits256 {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    let mut iter = self.feature_names().peekable();
    if iter.peek().is_none() {
      return f.write_str("Bits256(none)");
    }
    write!(f, "Bits256([")?;
    let mut first = true;
    for name in iter {
      if !first {
        write!(f, ", ")?;
      }
      first = false;
      write!(f, "{name}")?;
    }
    write!(f, "])")
  }
}

impl core::fmt::Display for CpuCaps {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    write!(f, "{}: {:?}", self.arch, self.bits)
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bits_basic() {
    let empty = Bits256::NONE;
    assert!(empty.is_empty());
    assert_eq!(empty.count(), 0);

    let bit0 = Bits256::bit(0);
    assert!(!bit0.is_empty());
    assert_eq!(bit0.count(), 1);
    assert!(bit0.has_bit(0));
    assert!(!bit0.has_bit(1));
  }

  #[test]
  fn bits_union_intersection() {
    let a = Bits256::bit(0);
    let b = Bits256::bit(1);
    let ab = a.union(b);

    assert!(ab.has_bit(0));
    assert!(ab.has_bit(1));
    assert_eq!(ab.count(), 2);

    assert!(ab.contains(a));
    assert!(ab.contains(b));
    assert!(!a.contains(ab));
    assert_eq!(ab & a, a);
  }

  #[test]
  fn bits_all_words() {
    let w0 = Bits256::bit(0);
    let w1 = Bits256::bit(64);
    let w2 = Bits256::bit(128);
    let w3 = Bits256::bit(192);

    assert_eq!(w0.0[0], 1);
    assert_eq!(w1.0[1], 1);
    assert_eq!(w2.0[2], 1);
    assert_eq!(w3.0[3], 1);

    let all = w0 | w1 | w2 | w3;
    assert!(all.contains(w0));
    assert!(all.contains(w1));
    assert!(all.contains(w2));
    assert!(all.contains(w3));
    assert_eq!(all.count(), 4);
  }

  #[test]
  fn x86_combined_masks() {
    assert!(x86::V256_READY.contains(x86::AVX));
    assert!(x86::V256_READY.contains(x86::AVX2));
    assert!(x86::V256_FMA_READY.contains(x86::V256_READY));
    assert!(x86::V256_FMA_READY.contains(x86::FMA));
    assert!(x86::V128_MIN_READY.contains(x86::SSE41));
    assert!(x86::V512_READY.contains(x86::AVX512F));
  }

  #[test]
  fn aarch64_combined_masks() {
    assert!(aarch64::HWCRC_READY.contains(aarch64::CRC));
    assert!(aarch64::POPCNT_READY.contains(aarch64::NEON));
  }

  #[test]
  fn feature_names_lookup() {
    let caps = x86::SSE42 | x86::POPCNT;
    assert!(caps.feature_names().any(|n| n == "sse4.2"));
    assert!(caps.feature_names().any(|n| n == "popcnt"));
    assert!(!caps.feature_names().any(|n| n == "avx512f"));
  }

  #[test]
  fn arch_current_matches_target() {
    let arch = Arch::current();
    #[cfg(target_arch = "x86_64")]
    assert_eq!(arch, Arch::X86_64);
    #[cfg(target_arch = "aarch64")]
    assert_eq!(arch, Arch::Aarch64);
  }

  #[test]
  fn cpucaps_has() {
    let caps = CpuCaps::new(x86::SSE2 | x86::SSE42);
    assert!(caps.has(x86::SSE42));
    assert!(!caps.has(x86::AVX512F));
    assert!(caps.has(Bits256::NONE));
  }

  #[test]
  fn word_boundaries() {
    for &bit in &[0u8, 63, 64, 127, 128, 191, 192, 255] {
      let single = Bits256::bit(bit);
      assert_eq!(single.count(), 1, "Bits256::bit({bit}) should set exactly 1 bit");
      assert!(single.has_bit(bit));
    }

    let bit63 = Bits256::bit(63);
    let bit64 = Bits256::bit(64);
    assert!((bit63 & bit64).is_empty());
    assert_eq!((bit63 | bit64).count(), 2);
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Property-Based Tests (proptest)
// Note: proptest uses the filesystem for failure persistence, which Miri
// doesn't support.
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(all(test, not(miri)))]
mod proptests {
  use proptest::prelude::*;

  use super::*;

  fn arb_bits() -> impl Strategy<Value = Bits256> {
    prop::array::uniform4(any::<u64>()).prop_map(Bits256::from_raw)
  }

  proptest! {
    /// Union is commutative: a | b == b | a
    #[test]
    fn union_commutative(a in arb_bits(), b in arb_bits()) {
      prop_assert_eq!(a | b, b | a);
    }

    /// Union is associative: (a | b) | c == a | (b | c)
    #[test]
    fn union_associative(a in arb_bits(), b in arb_bits(), c in arb_bits()) {
      prop_assert_eq!((a | b) | c, a | (b | c));
    }

    /// Union identity: a | NONE == a
    #[test]
    fn union_identity(a in arb_bits()) {
      prop_assert_eq!(a | Bits256::NONE, a);
    }

    /// Self-containment: bits.contains(bits) is always true
    #[test]
    fn self_containment(bits in arb_bits()) {
      prop_assert!(bits.contains(bits));
    }

    /// After union, both operands are subsets of the result
    #[test]
    fn union_superset(a in arb_bits(), b in arb_bits()) {
      let union = a | b;
      prop_assert!(union.contains(a));
      prop_assert!(union.contains(b));
    }

    /// After intersection, the result is a subset of both operands
    #[test]
    fn intersection_subset(a in arb_bits(), b in arb_bits()) {
      let intersection = a & b;
      prop_assert!(a.contains(intersection));
      prop_assert!(b.contains(intersection));
    }

    /// Distributive law: a & (b | c) == (a & b) | (a & c)
    #[test]
    fn distributive(a in arb_bits(), b in arb_bits(), c in arb_bits()) {
      prop_assert_eq!(a & (b | c), (a & b) | (a & c));
    }

    /// Idempotence: a | a == a and a & a == a
    #[test]
    fn idempotent(a in arb_bits()) {
      prop_assert_eq!(a | a, a);
      prop_assert_eq!(a & a, a);
    }

    /// Count equals the sum of per-word popcounts
    #[test]
    fn count_accuracy(bits in arb_bits()) {
      let expected: u32 = bits.0.iter().map(|w| w.count_ones()).sum();
      prop_assert_eq!(bits.count(), expected);
    }

    /// Bit setting: Bits256::bit(n) sets exactly one bit at position n
    #[test]
    fn bit_sets_exactly_one(n in 0u8..=255) {
      let bits = Bits256::bit(n);
      prop_assert_eq!(bits.count(), 1);
      prop_assert!(bits.has_bit(n));
    }
  }
}
