//! 64-bit population count with hardware dispatch.
//!
//! Counts set bits in a `u64` (0-64). Four paths exist:
//!
//! - [`PopcountBackend::Bits`]: the parallel bit-count baseline
//!   (hierarchical 2-bit / 4-bit / byte-wide group sums)
//! - [`PopcountBackend::Naive`]: 64 shift-and-test rounds, a reference only
//! - [`PopcountBackend::Hardware`]: the x86_64 `popcnt` instruction
//! - [`PopcountBackend::Simd64`] / [`PopcountBackend::Simd128`]: aarch64
//!   NEON byte-wise counts at the two vector shapes
//!
//! Every path agrees exactly; population count has no tolerance for
//! divergence. The auto selector picks the best kernel once per process
//! from the capability snapshot.
//!
//! # Example
//!
//! ```
//! assert_eq!(popcount::popcount(0), 0);
//! assert_eq!(popcount::popcount(u64::MAX), 64);
//! assert_eq!(popcount::popcount(0b1011), 3);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

#[cfg(target_arch = "aarch64")]
mod aarch64;
pub mod portable;
#[cfg(target_arch = "x86_64")]
mod x86_64;

use backend::{Candidate, Dispatcher, Selected};
pub use traits::KernelError;

type PopcountFn = fn(u64) -> u32;

mod names {
  #![allow(dead_code)] // Each name is referenced only on its own target.

  pub const PORTABLE: &str = "portable/bits";
  pub const X86_POPCNT: &str = "x86_64/popcnt";
  pub const ARM_CNT64: &str = "aarch64/cnt64";
  pub const ARM_CNT128: &str = "aarch64/cnt128";
}

/// Forced backend selection for [`popcount_with`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum PopcountBackend {
  /// Use the default auto selector.
  #[default]
  Auto,
  /// The x86_64 `popcnt` instruction.
  Hardware,
  /// aarch64 NEON byte-wise count on a 64-bit vector.
  Simd64,
  /// aarch64 NEON byte-wise count on a 128-bit vector.
  Simd128,
  /// The parallel bit-count baseline.
  Bits,
  /// The shift-and-test reference.
  Naive,
}

impl PopcountBackend {
  /// Stable textual name, for diagnostics.
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Auto => "auto",
      Self::Hardware => "hardware",
      Self::Simd64 => "simd64",
      Self::Simd128 => "simd128",
      Self::Bits => "bits",
      Self::Naive => "naive",
    }
  }
}

fn select_kernel() -> Selected<PopcountFn> {
  #[cfg(target_arch = "x86_64")]
  {
    use platform::{Bits256, caps::x86};

    backend::select(
      platform::caps(),
      &[
        Candidate::new(names::X86_POPCNT, x86::POPCNT_READY, x86_64::popcnt as PopcountFn),
        Candidate::new(names::PORTABLE, Bits256::NONE, portable::bits as PopcountFn),
      ],
    )
  }

  #[cfg(target_arch = "aarch64")]
  {
    use platform::{Bits256, caps::aarch64 as arm};

    backend::select(
      platform::caps(),
      &[
        Candidate::new(names::ARM_CNT64, arm::POPCNT_READY, aarch64::cnt_v64 as PopcountFn),
        Candidate::new(names::PORTABLE, Bits256::NONE, portable::bits as PopcountFn),
      ],
    )
  }

  #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
  {
    Selected::new(names::PORTABLE, portable::bits as PopcountFn)
  }
}

static DISPATCH: Dispatcher<PopcountFn> = Dispatcher::new(select_kernel);

/// Count set bits in a 64-bit word (0-64), auto-selected kernel.
///
/// Total function: never fails.
#[inline]
#[must_use]
pub fn popcount(word: u64) -> u32 {
  (DISPATCH.get().func)(word)
}

/// Count set bits with an explicitly selected backend.
///
/// # Errors
///
/// Returns [`KernelError::UnsupportedOperation`] when the requested
/// backend's instruction is absent on the current processor (or does not
/// exist on this architecture).
pub fn popcount_with(backend: PopcountBackend, word: u64) -> Result<u32, KernelError> {
  match backend {
    PopcountBackend::Auto => Ok(popcount(word)),
    PopcountBackend::Bits => Ok(portable::bits(word)),
    PopcountBackend::Naive => Ok(portable::naive(word)),
    PopcountBackend::Hardware => {
      #[cfg(target_arch = "x86_64")]
      if platform::caps().has(platform::caps::x86::POPCNT_READY) {
        return Ok(x86_64::popcnt(word));
      }
      Err(KernelError::UnsupportedOperation)
    }
    PopcountBackend::Simd64 => {
      #[cfg(target_arch = "aarch64")]
      if platform::caps().has(platform::caps::aarch64::POPCNT_READY) {
        return Ok(aarch64::cnt_v64(word));
      }
      Err(KernelError::UnsupportedOperation)
    }
    PopcountBackend::Simd128 => {
      #[cfg(target_arch = "aarch64")]
      if platform::caps().has(platform::caps::aarch64::POPCNT_READY) {
        return Ok(aarch64::cnt_v128(word));
      }
      Err(KernelError::UnsupportedOperation)
    }
  }
}

/// Returns the name of the kernel the auto selector uses on this machine.
///
/// Intended for diagnostics and tests.
#[inline]
#[must_use]
pub fn backend_name() -> &'static str {
  DISPATCH.backend_name()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────


#[cfg(all(test, not(miri)))]
mod proptests {
  use proptest::prelude::*;

  use super::*;

  proptest! {
    /// Every path agrees with the standard library's count for any word.
    #[test]
    fn agrees_with_count_ones(word in any::<u64>()) {
      prop_assert_eq!(popcount(word), word.count_ones());
      prop_assert_eq!(portable::bits(word), word.count_ones());
      prop_assert_eq!(portable::naive(word), word.count_ones());

      for backend in [
        PopcountBackend::Hardware,
        PopcountBackend::Simd64,
        PopcountBackend::Simd128,
      ] {
        if let Ok(count) = popcount_with(backend, word) {
          prop_assert_eq!(count, word.count_ones());
        }
      }
    }

    /// The count is always in 0..=64.
    #[test]
    fn count_is_bounded(word in any::<u64>()) {
      prop_assert!(popcount(word) <= 64);
    }
  }
}
