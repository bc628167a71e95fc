//! Runtime CPU detection.
//!
//! This module provides the unified `get()` function that returns the
//! detected capability snapshot and tuning hints. It handles:
//!
//! - Compile-time detection (via `cfg!(target_feature = "...")`)
//! - Runtime detection (via CPUID on x86_64, auxv/sysctl on aarch64)
//! - One-time caching (`OnceLock` under `std`)
//! - User-supplied overrides for bare metal and testing
//! - Miri fallback (always reports the portable-only snapshot)
//!
//! Without `std`, only compile-time target features are reported; detection
//! is a handful of constant ORs and needs no cache.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::{
  caps::{Bits256, CpuCaps},
  tune::Tune,
};

// ─────────────────────────────────────────────────────────────────────────────
// Override Support
// ─────────────────────────────────────────────────────────────────────────────
//
// Overrides replace hidden global mutability with an explicitly injected
// snapshot: tests and bare-metal deployments set it once, before first use,
// and every later get() observes the same value.

static OVERRIDE_SET: AtomicBool = AtomicBool::new(false);

#[cfg(feature = "std")]
static OVERRIDE: std::sync::OnceLock<Option<(CpuCaps, Tune)>> = std::sync::OnceLock::new();

/// Initialize with user-supplied capabilities.
///
/// Call this before any call to [`get()`] to bypass runtime detection. This
/// is useful for bare-metal environments, deployments where the CPU is known
/// in advance, and for exercising specific dispatch paths in tests.
pub fn init_with_caps(caps: CpuCaps, tune: Tune) {
  set_caps_override(Some((caps, tune)));
}

/// Set or clear the capabilities override.
///
/// When set, [`get()`] returns the override value instead of detecting.
/// The override can only be installed once per process (it shares the
/// initialize-before-first-use lifecycle of the detection cache).
pub fn set_caps_override(value: Option<(CpuCaps, Tune)>) {
  #[cfg(feature = "std")]
  {
    let _ = OVERRIDE.set(value);
    OVERRIDE_SET.store(value.is_some(), Ordering::Release);
  }

  #[cfg(not(feature = "std"))]
  {
    // Without std there is no runtime detection to override; compile-time
    // features are authoritative.
    let _ = value;
    OVERRIDE_SET.store(false, Ordering::Release);
  }
}

/// Check if an override is currently set.
#[inline]
#[must_use]
pub fn has_override() -> bool {
  OVERRIDE_SET.load(Ordering::Acquire)
}

fn get_override() -> Option<(CpuCaps, Tune)> {
  if !OVERRIDE_SET.load(Ordering::Acquire) {
    return None;
  }

  #[cfg(feature = "std")]
  {
    OVERRIDE.get().and_then(|v| *v)
  }

  #[cfg(not(feature = "std"))]
  {
    None
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main API
// ─────────────────────────────────────────────────────────────────────────────

/// Get the detected capability snapshot and tuning hints.
///
/// This is the main entry point for capability-based dispatch.
///
/// # Caching
///
/// - With `std`: results are cached in a `OnceLock` (one-time detection).
/// - Without `std`: detection reduces to compile-time constants.
///
/// # Idempotence
///
/// Two calls within one process always return identical snapshots; hardware
/// features do not change during a process's lifetime.
///
/// # Miri
///
/// Under Miri, always returns the portable-only snapshot to avoid
/// interpreting SIMD intrinsics.
#[inline]
#[must_use]
pub fn get() -> (CpuCaps, Tune) {
  #[cfg(miri)]
  {
    (CpuCaps::NONE, Tune::PORTABLE)
  }

  #[cfg(not(miri))]
  {
    if let Some(result) = get_override() {
      return result;
    }

    #[cfg(feature = "std")]
    {
      use std::sync::OnceLock;
      static CACHED: OnceLock<(CpuCaps, Tune)> = OnceLock::new();
      *CACHED.get_or_init(detect_uncached)
    }

    #[cfg(not(feature = "std"))]
    {
      detect_uncached()
    }
  }
}

/// Get just the capability snapshot (convenience function).
#[inline]
#[must_use]
pub fn caps() -> CpuCaps {
  get().0
}

/// Get just the tuning hints (convenience function).
#[inline]
#[must_use]
pub fn tune() -> Tune {
  get().1
}

/// Detect capabilities without caching.
///
/// Useful for testing or when fresh detection is required.
#[must_use]
pub fn detect_uncached() -> (CpuCaps, Tune) {
  #[cfg(target_arch = "x86_64")]
  {
    detect_x86_64()
  }

  #[cfg(target_arch = "aarch64")]
  {
    detect_aarch64()
  }

  #[cfg(target_arch = "wasm32")]
  {
    detect_wasm32()
  }

  #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64", target_arch = "wasm32")))]
  {
    (CpuCaps::NONE, Tune::PORTABLE)
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// x86_64 detection
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(target_arch = "x86_64")]
fn detect_x86_64() -> (CpuCaps, Tune) {
  use crate::caps::{Arch, x86};

  let mut bits = compile_time_x86_64();

  #[cfg(feature = "std")]
  {
    bits = bits.union(runtime_x86_64());
  }

  let caps = CpuCaps {
    arch: Arch::X86_64,
    bits,
  };

  let tune = if bits.contains(x86::V512_READY) {
    Tune::WIDE_VECTOR
  } else if bits.contains(x86::V256_READY) {
    Tune::NARROW_VECTOR
  } else {
    Tune::DEFAULT
  };

  (caps, tune)
}

/// Compile-time detected x86_64 features.
#[cfg(target_arch = "x86_64")]
const fn compile_time_x86_64() -> Bits256 {
  use crate::caps::x86;

  let mut bits = Bits256::NONE;

  // SSE2 is baseline on x86_64.
  bits = bits.union(x86::SSE2);

  #[cfg(target_feature = "sse4.1")]
  {
    bits = bits.union(x86::SSE41);
  }

  #[cfg(target_feature = "sse4.2")]
  {
    bits = bits.union(x86::SSE42);
  }

  #[cfg(target_feature = "avx")]
  {
    bits = bits.union(x86::AVX);
  }

  #[cfg(target_feature = "avx2")]
  {
    bits = bits.union(x86::AVX2);
  }

  #[cfg(target_feature = "fma")]
  {
    bits = bits.union(x86::FMA);
  }

  #[cfg(target_feature = "popcnt")]
  {
    bits = bits.union(x86::POPCNT);
  }

  #[cfg(target_feature = "avx512f")]
  {
    bits = bits.union(x86::AVX512F);
  }

  #[cfg(target_feature = "avx512vl")]
  {
    bits = bits.union(x86::AVX512VL);
  }

  #[cfg(target_feature = "avx512bw")]
  {
    bits = bits.union(x86::AVX512BW);
  }

  #[cfg(target_feature = "avx512dq")]
  {
    bits = bits.union(x86::AVX512DQ);
  }

  bits
}

/// Runtime detected x86_64 features.
#[cfg(all(target_arch = "x86_64", feature = "std"))]
fn runtime_x86_64() -> Bits256 {
  use crate::caps::x86;

  let mut bits = Bits256::NONE;

  if std::arch::is_x86_feature_detected!("sse4.1") {
    bits = bits.union(x86::SSE41);
  }
  if std::arch::is_x86_feature_detected!("sse4.2") {
    bits = bits.union(x86::SSE42);
  }
  if std::arch::is_x86_feature_detected!("avx") {
    bits = bits.union(x86::AVX);
  }
  if std::arch::is_x86_feature_detected!("avx2") {
    bits = bits.union(x86::AVX2);
  }
  if std::arch::is_x86_feature_detected!("fma") {
    bits = bits.union(x86::FMA);
  }
  if std::arch::is_x86_feature_detected!("popcnt") {
    bits = bits.union(x86::POPCNT);
  }
  if std::arch::is_x86_feature_detected!("avx512f") {
    bits = bits.union(x86::AVX512F);
  }
  if std::arch::is_x86_feature_detected!("avx512vl") {
    bits = bits.union(x86::AVX512VL);
  }
  if std::arch::is_x86_feature_detected!("avx512bw") {
    bits = bits.union(x86::AVX512BW);
  }
  if std::arch::is_x86_feature_detected!("avx512dq") {
    bits = bits.union(x86::AVX512DQ);
  }

  bits
}

// ─────────────────────────────────────────────────────────────────────────────
// aarch64 detection
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(target_arch = "aarch64")]
fn detect_aarch64() -> (CpuCaps, Tune) {
  use crate::caps::{Arch, aarch64};

  let mut bits = Bits256::NONE;

  // NEON is baseline on AArch64.
  bits = bits.union(aarch64::NEON);

  #[cfg(target_feature = "crc")]
  {
    bits = bits.union(aarch64::CRC);
  }

  #[cfg(feature = "std")]
  {
    if std::arch::is_aarch64_feature_detected!("crc") {
      bits = bits.union(aarch64::CRC);
    }
  }

  let caps = CpuCaps {
    arch: Arch::Aarch64,
    bits,
  };

  (caps, Tune::NEON)
}

// ─────────────────────────────────────────────────────────────────────────────
// wasm32 detection
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(target_arch = "wasm32")]
fn detect_wasm32() -> (CpuCaps, Tune) {
  use crate::caps::Arch;
  // Used when simd128 is enabled at compile time.
  #[allow(unused_imports)]
  use crate::caps::wasm;

  #[allow(unused_mut)]
  let mut bits = Bits256::NONE;

  // SIMD128 is compile-time only for wasm.
  #[cfg(target_feature = "simd128")]
  {
    bits = bits.union(wasm::SIMD128);
  }

  let caps = CpuCaps {
    arch: Arch::Wasm32,
    bits,
  };
  let tune = if bits.is_empty() { Tune::PORTABLE } else { Tune::DEFAULT };
  (caps, tune)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn get_returns_valid_snapshot() {
    let (caps, tune) = get();

    #[cfg(miri)]
    {
      assert_eq!(caps, CpuCaps::NONE);
      assert_eq!(tune, Tune::PORTABLE);
    }

    #[cfg(not(miri))]
    {
      #[cfg(target_arch = "x86_64")]
      assert_eq!(caps.arch, crate::caps::Arch::X86_64);

      #[cfg(target_arch = "aarch64")]
      assert_eq!(caps.arch, crate::caps::Arch::Aarch64);

      assert!(tune.simd_threshold > 0);
    }
  }

  #[test]
  fn detection_is_idempotent() {
    let (caps1, tune1) = get();
    let (caps2, tune2) = get();
    assert_eq!(caps1, caps2);
    assert_eq!(tune1, tune2);

    let (caps3, tune3) = detect_uncached();
    let (caps4, tune4) = detect_uncached();
    assert_eq!(caps3, caps4);
    assert_eq!(tune3, tune4);
  }

  #[test]
  #[cfg(all(target_arch = "x86_64", not(miri)))]
  fn x86_64_baseline() {
    let (caps, _tune) = get();
    // SSE2 is always available on x86_64.
    assert!(caps.has(crate::caps::x86::SSE2));
  }

  #[test]
  #[cfg(all(target_arch = "aarch64", not(miri)))]
  fn aarch64_baseline() {
    let (caps, _tune) = get();
    // NEON is always available on AArch64.
    assert!(caps.has(crate::caps::aarch64::NEON));
  }

  #[test]
  fn convenience_functions() {
    let (c, t) = get();
    assert_eq!(caps(), c);
    assert_eq!(tune(), t);
  }

  // Note: override tests are limited because the OnceLock can only be set
  // once per process. Overrides belong in program initialization.
  #[test]
  fn has_override_api() {
    let _ = has_override();
  }
}
