//! CPU detection, capabilities, and tuning for rsimd.
//!
//! This crate is the **single source of truth** for CPU feature detection
//! and kernel selection hints across the rsimd workspace.
//!
//! # Core Types
//!
//! - [`CpuCaps`]: what instructions can run on this machine (capabilities)
//! - [`Tune`]: what strategies are optimal on this machine (tuning hints)
//!
//! # Main Entry Point
//!
//! ```
//! let (caps, tune) = platform::get();
//!
//! if caps.has(platform::caps::x86::HWCRC_READY) {
//!     // Use the SSE4.2 crc32 kernel
//! }
//!
//! # let data = [0u8; 16];
//! if data.len() < tune.simd_threshold {
//!     // Use the scalar path
//! }
//! ```
//!
//! # Design Philosophy
//!
//! 1. **One API**: kernels query `platform::get()` instead of doing ad-hoc
//!    detection.
//! 2. **Capabilities vs tuning**: `CpuCaps` says what's *possible*; `Tune`
//!    says what's *optimal*.
//! 3. **Zero-cost when possible**: compile-time features are detected via
//!    `cfg!`, avoiding runtime overhead.
//! 4. **Cached otherwise**: runtime detection happens once and is cached in
//!    a `OnceLock`; the snapshot is read-only for the rest of the process.
//! 5. **Miri-safe**: under Miri, always reports portable-only capabilities.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

// ─────────────────────────────────────────────────────────────────────────────
// Core modules
// ─────────────────────────────────────────────────────────────────────────────

pub mod caps;
mod detect;
pub mod tune;

// ─────────────────────────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────────────────────────

pub use caps::{Arch, Bits256, CpuCaps};
pub use tune::Tune;

/// Get the detected capability snapshot and tuning hints.
///
/// This is the main entry point for capability-based dispatch. Detection
/// runs once per process and is cached; the snapshot never changes
/// afterwards.
#[inline]
#[must_use]
pub fn get() -> (CpuCaps, Tune) {
  detect::get()
}

/// Get just the CPU capabilities.
///
/// Convenience wrapper around [`get()`]. Idempotent: repeated calls return
/// identical flags.
#[inline]
#[must_use]
pub fn caps() -> CpuCaps {
  detect::caps()
}

/// Get just the tuning hints.
///
/// Convenience wrapper around [`get()`].
#[inline]
#[must_use]
pub fn tune() -> Tune {
  detect::tune()
}

/// Detect capabilities without consulting the cache.
#[inline]
#[must_use]
pub fn detect_uncached() -> (CpuCaps, Tune) {
  detect::detect_uncached()
}

/// Initialize with user-supplied capabilities.
///
/// Call this before any call to [`get()`] to bypass runtime detection:
/// for bare metal, known deployment targets, or testing specific dispatch
/// paths.
#[inline]
pub fn init_with_caps(caps: CpuCaps, tune: Tune) {
  detect::init_with_caps(caps, tune);
}

/// Set or clear the capabilities override.
///
/// When set, [`get()`] returns the override value instead of detecting.
#[inline]
pub fn set_caps_override(value: Option<(CpuCaps, Tune)>) {
  detect::set_caps_override(value);
}

/// Check if an override is currently set.
#[inline]
#[must_use]
pub fn has_override() -> bool {
  detect::has_override()
}
