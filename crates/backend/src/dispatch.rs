//! Kernel dispatch: selection and caching.
//!
//! This module provides the core dispatch primitives for rsimd:
//!
//! - [`Candidate`]: a kernel with capability requirements
//! - [`Selected`]: the result of kernel selection
//! - [`select`]: choose the best kernel from a candidate list
//! - [`Dispatcher`]: a call-site cache for the selected kernel
//!
//! # Design
//!
//! The dispatch system has two paths:
//!
//! 1. **Compile-time selection** (zero-cost): when target features are known
//!    at compile time, dispatch resolves to a direct call inside the
//!    algorithm crate's dispatch function using `cfg!` guards.
//! 2. **Runtime selection** (cached): for generic binaries, the dispatcher
//!    consults the detected capability snapshot once and caches the selected
//!    kernel. Subsequent calls are a single indirect call.
//!
//! The selection rule makes the dispatcher the sole gatekeeper for hardware
//! paths: a candidate is only eligible when its required capability mask is
//! a subset of the detected bits, so an unsupported kernel is never invoked.
//!
//! # Usage
//!
//! Algorithm crates register kernels as an ordered list of `Candidate`s,
//! best first, with a portable fallback (empty requirements) last:
//!
//! ```
//! use backend::dispatch::{Candidate, Dispatcher, Selected, select};
//! use platform::Bits256;
//!
//! type SumFn = fn(&[i32]) -> i32;
//!
//! fn scalar(data: &[i32]) -> i32 { data.iter().sum() }
//!
//! fn select_sum() -> Selected<SumFn> {
//!     let caps = platform::caps();
//!     select(caps, &[
//!         // hardware candidates would go here, best first
//!         Candidate::new("portable", Bits256::NONE, scalar),
//!     ])
//! }
//!
//! static SUM: Dispatcher<SumFn> = Dispatcher::new(select_sum);
//! assert_eq!((SUM.get().func)(&[1, 2, 3]), 6);
//! ```

use platform::{Bits256, CpuCaps};

// ─────────────────────────────────────────────────────────────────────────────
// Core Types
// ─────────────────────────────────────────────────────────────────────────────

/// A candidate kernel with capability requirements.
///
/// Candidates are ordered from best to worst. The dispatcher selects the
/// first candidate whose requirements are satisfied by the detected
/// capabilities.
#[derive(Clone, Copy, Debug)]
pub struct Candidate<F> {
  /// Human-readable name for diagnostics (e.g., "x86_64/avx2").
  pub name: &'static str,
  /// Required CPU capabilities. Must be a subset of detected caps.
  pub requires: Bits256,
  /// The kernel function pointer.
  pub func: F,
}

impl<F> Candidate<F> {
  /// Create a new candidate.
  #[inline]
  #[must_use]
  pub const fn new(name: &'static str, requires: Bits256, func: F) -> Self {
    Self { name, requires, func }
  }
}

/// The result of kernel selection.
#[derive(Clone, Copy, Debug)]
pub struct Selected<F> {
  /// Human-readable name of the selected kernel.
  pub name: &'static str,
  /// The selected kernel function.
  pub func: F,
}

impl<F> Selected<F> {
  /// Create a new selected result.
  #[inline]
  #[must_use]
  pub const fn new(name: &'static str, func: F) -> Self {
    Self { name, func }
  }
}

/// Select the best kernel from a candidate list.
///
/// Returns the first candidate whose `requires` is satisfied by `caps`.
/// The last candidate should always have `requires = Bits256::NONE` as a
/// portable fallback.
///
/// # Panics
///
/// Panics if `candidates` is empty or no candidate matches.
#[inline]
#[must_use]
pub fn select<F: Copy>(caps: CpuCaps, candidates: &[Candidate<F>]) -> Selected<F> {
  for candidate in candidates {
    if caps.has(candidate.requires) {
      return Selected::new(candidate.name, candidate.func);
    }
  }

  panic!("no matching kernel; candidate lists must end with a portable fallback");
}

// ─────────────────────────────────────────────────────────────────────────────
// Cached Dispatcher
// ─────────────────────────────────────────────────────────────────────────────

/// A call-site cache for a selected kernel.
///
/// The selector runs once on first access; every later call is a cached
/// load plus an indirect call. Under `std` this uses `OnceLock`; without
/// `std` the selector re-runs per call (it is a handful of constant
/// comparisons when detection is compile-time only).
///
/// # Example
///
/// ```ignore
/// static DISPATCH: Dispatcher<SumFn> = Dispatcher::new(select_sum);
///
/// fn sum(data: &[i32]) -> i32 {
///     (DISPATCH.get().func)(data)
/// }
/// ```
pub struct Dispatcher<F: Copy + 'static> {
  #[cfg(feature = "std")]
  inner: std::sync::OnceLock<Selected<F>>,

  /// The selector function that chooses the best kernel.
  selector: fn() -> Selected<F>,
}

impl<F: Copy + 'static> Dispatcher<F> {
  /// Create a new dispatcher with the given selector function.
  ///
  /// The selector is called once on first access to choose the best kernel.
  #[must_use]
  pub const fn new(selector: fn() -> Selected<F>) -> Self {
    Self {
      #[cfg(feature = "std")]
      inner: std::sync::OnceLock::new(),
      selector,
    }
  }

  /// Get the selected kernel, initializing on first call.
  #[inline]
  #[must_use]
  pub fn get(&self) -> Selected<F> {
    #[cfg(feature = "std")]
    {
      *self.inner.get_or_init(|| (self.selector)())
    }

    #[cfg(not(feature = "std"))]
    {
      (self.selector)()
    }
  }

  /// Get the name of the selected backend.
  #[inline]
  #[must_use]
  pub fn backend_name(&self) -> &'static str {
    self.get().name
  }
}

// SAFETY: the OnceLock (std) is thread-safe, and the stored function
// pointers are read-only after initialization. Without std the dispatcher
// holds only the selector fn pointer.
#[allow(unsafe_code)]
unsafe impl<F: Copy + 'static> Sync for Dispatcher<F> {}
#[allow(unsafe_code)]
unsafe impl<F: Copy + 'static> Send for Dispatcher<F> {}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  type TestFn = fn(&[u8]) -> u32;

  fn portable(_data: &[u8]) -> u32 {
    0xDEAD_BEEF
  }

  fn fast(_data: &[u8]) -> u32 {
    0xCAFE_BABE
  }

  #[test]
  fn candidate_creation() {
    let c: Candidate<TestFn> = Candidate::new("test", Bits256::NONE, portable);
    assert_eq!(c.name, "test");
    assert!(c.requires.is_empty());
  }

  #[test]
  fn select_portable_fallback() {
    let caps = CpuCaps::NONE;
    let candidates: &[Candidate<TestFn>] = &[
      Candidate::new("fast", Bits256::bit(0), fast),
      Candidate::new("portable", Bits256::NONE, portable),
    ];

    let selected = select(caps, candidates);
    assert_eq!(selected.name, "portable");
    assert_eq!((selected.func)(&[]), 0xDEAD_BEEF);
  }

  #[test]
  fn select_best_match() {
    let caps = CpuCaps::new(Bits256::bit(0));
    let candidates: &[Candidate<TestFn>] = &[
      Candidate::new("fast", Bits256::bit(0), fast),
      Candidate::new("portable", Bits256::NONE, portable),
    ];

    let selected = select(caps, candidates);
    assert_eq!(selected.name, "fast");
    assert_eq!((selected.func)(&[]), 0xCAFE_BABE);
  }

  #[test]
  fn select_skips_unavailable() {
    // Caps have bit 0, but not bit 1.
    let caps = CpuCaps::new(Bits256::bit(0));
    let candidates: &[Candidate<TestFn>] = &[
      Candidate::new("needs_bit1", Bits256::bit(1), fast),
      Candidate::new("needs_bit0", Bits256::bit(0), fast),
      Candidate::new("portable", Bits256::NONE, portable),
    ];

    let selected = select(caps, candidates);
    assert_eq!(selected.name, "needs_bit0");
  }

  fn test_selector() -> Selected<TestFn> {
    Selected::new("test", portable)
  }

  #[test]
  fn dispatcher_caches_selection() {
    static DISPATCH: Dispatcher<TestFn> = Dispatcher::new(test_selector);

    let selected = DISPATCH.get();
    assert_eq!(selected.name, "test");

    // Second call returns the cached result.
    let selected2 = DISPATCH.get();
    assert_eq!(selected2.name, "test");
    assert_eq!((selected2.func)(&[]), 0xDEAD_BEEF);

    assert_eq!(DISPATCH.backend_name(), "test");
  }
}
