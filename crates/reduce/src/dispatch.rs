//! Kernel selection for the reduction operations.
//!
//! Each operation gets an ordered candidate list (best first, portable
//! last) evaluated once against the capability snapshot and cached per
//! call site. Explicit lane widths resolve through the same snapshot; a
//! width the machine cannot execute yields `None`, which the public API
//! surfaces as an unsupported-operation error.

#[cfg(target_arch = "aarch64")]
use crate::aarch64;
use crate::lanes::LaneWidth;
use crate::portable;
#[cfg(target_arch = "x86_64")]
use crate::x86_64;
use backend::{Candidate, Dispatcher, Selected};

type SumI32Fn = fn(&[i32]) -> i32;
type SumF64Fn = fn(&[f64]) -> f64;
type DotF64Fn = fn(&[f64], &[f64]) -> f64;
type MinI32Fn = fn(&[i32]) -> i32;
type MinF64Fn = fn(&[f64]) -> f64;

mod names {
  #![allow(dead_code)] // Each name is referenced only on its own target.

  pub const PORTABLE: &str = "portable/scalar";
  pub const X86_SSE2: &str = "x86_64/sse2";
  pub const X86_SSE41: &str = "x86_64/sse4.1";
  pub const X86_AVX: &str = "x86_64/avx";
  pub const X86_AVX2: &str = "x86_64/avx2";
  pub const X86_AVX_FMA: &str = "x86_64/avx+fma";
  pub const X86_AVX512: &str = "x86_64/avx512";
  pub const ARM_NEON: &str = "aarch64/neon";
}

// ─────────────────────────────────────────────────────────────────────────────
// Auto selectors
// ─────────────────────────────────────────────────────────────────────────────
//
// 512-bit candidates are additionally gated on `tune.fast_wide_vectors`:
// the width is legal whenever AVX-512 is present (explicit-width requests
// honor that), but the auto selector only prefers it where it pays off.

fn select_sum_i32() -> Selected<SumI32Fn> {
  #[cfg(target_arch = "x86_64")]
  {
    use platform::{Bits256, caps::x86};

    let (caps, tune) = platform::get();
    if tune.fast_wide_vectors && caps.has(x86::V512_READY) {
      return Selected::new(names::X86_AVX512, x86_64::sum_i32_v512 as SumI32Fn);
    }
    backend::select(
      caps,
      &[
        Candidate::new(names::X86_AVX2, x86::V256_READY, x86_64::sum_i32_v256 as SumI32Fn),
        Candidate::new(names::X86_SSE2, x86::V128_READY, x86_64::sum_i32_v128 as SumI32Fn),
        Candidate::new(names::PORTABLE, Bits256::NONE, portable::sum_i32 as SumI32Fn),
      ],
    )
  }

  #[cfg(target_arch = "aarch64")]
  {
    use platform::{Bits256, caps::aarch64 as arm};

    backend::select(
      platform::caps(),
      &[
        Candidate::new(names::ARM_NEON, arm::V128_READY, aarch64::sum_i32_v128 as SumI32Fn),
        Candidate::new(names::PORTABLE, Bits256::NONE, portable::sum_i32 as SumI32Fn),
      ],
    )
  }

  #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
  {
    Selected::new(names::PORTABLE, portable::sum_i32 as SumI32Fn)
  }
}

fn select_sum_f64() -> Selected<SumF64Fn> {
  #[cfg(target_arch = "x86_64")]
  {
    use platform::{Bits256, caps::x86};

    let (caps, tune) = platform::get();
    if tune.fast_wide_vectors && caps.has(x86::V512_READY) {
      return Selected::new(names::X86_AVX512, x86_64::sum_f64_v512 as SumF64Fn);
    }
    backend::select(
      caps,
      &[
        Candidate::new(names::X86_AVX, x86::AVX, x86_64::sum_f64_v256 as SumF64Fn),
        Candidate::new(names::X86_SSE2, x86::V128_READY, x86_64::sum_f64_v128 as SumF64Fn),
        Candidate::new(names::PORTABLE, Bits256::NONE, portable::sum_f64 as SumF64Fn),
      ],
    )
  }

  #[cfg(target_arch = "aarch64")]
  {
    use platform::{Bits256, caps::aarch64 as arm};

    backend::select(
      platform::caps(),
      &[
        Candidate::new(names::ARM_NEON, arm::V128_READY, aarch64::sum_f64_v128 as SumF64Fn),
        Candidate::new(names::PORTABLE, Bits256::NONE, portable::sum_f64 as SumF64Fn),
      ],
    )
  }

  #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
  {
    Selected::new(names::PORTABLE, portable::sum_f64 as SumF64Fn)
  }
}

fn select_dot_f64() -> Selected<DotF64Fn> {
  #[cfg(target_arch = "x86_64")]
  {
    use platform::{Bits256, caps::x86};

    let (caps, tune) = platform::get();
    if tune.fast_wide_vectors && caps.has(x86::V512_READY) {
      return Selected::new(names::X86_AVX512, x86_64::dot_f64_v512 as DotF64Fn);
    }
    backend::select(
      caps,
      &[
        Candidate::new(names::X86_AVX_FMA, x86::V256_FMA_READY, x86_64::dot_f64_v256fma as DotF64Fn),
        Candidate::new(names::X86_AVX, x86::AVX, x86_64::dot_f64_v256 as DotF64Fn),
        Candidate::new(names::X86_SSE2, x86::V128_READY, x86_64::dot_f64_v128 as DotF64Fn),
        Candidate::new(names::PORTABLE, Bits256::NONE, portable::dot_f64 as DotF64Fn),
      ],
    )
  }

  #[cfg(target_arch = "aarch64")]
  {
    use platform::{Bits256, caps::aarch64 as arm};

    backend::select(
      platform::caps(),
      &[
        Candidate::new(names::ARM_NEON, arm::V128_READY, aarch64::dot_f64_v128 as DotF64Fn),
        Candidate::new(names::PORTABLE, Bits256::NONE, portable::dot_f64 as DotF64Fn),
      ],
    )
  }

  #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
  {
    Selected::new(names::PORTABLE, portable::dot_f64 as DotF64Fn)
  }
}

fn select_min_i32() -> Selected<MinI32Fn> {
  #[cfg(target_arch = "x86_64")]
  {
    use platform::{Bits256, caps::x86};

    let (caps, tune) = platform::get();
    if tune.fast_wide_vectors && caps.has(x86::V512_READY) {
      return Selected::new(names::X86_AVX512, x86_64::min_i32_v512 as MinI32Fn);
    }
    backend::select(
      caps,
      &[
        Candidate::new(names::X86_AVX2, x86::V256_READY, x86_64::min_i32_v256 as MinI32Fn),
        Candidate::new(names::X86_SSE41, x86::V128_MIN_READY, x86_64::min_i32_v128 as MinI32Fn),
        Candidate::new(names::PORTABLE, Bits256::NONE, portable::min_i32 as MinI32Fn),
      ],
    )
  }

  #[cfg(target_arch = "aarch64")]
  {
    use platform::{Bits256, caps::aarch64 as arm};

    backend::select(
      platform::caps(),
      &[
        Candidate::new(names::ARM_NEON, arm::V128_READY, aarch64::min_i32_v128 as MinI32Fn),
        Candidate::new(names::PORTABLE, Bits256::NONE, portable::min_i32 as MinI32Fn),
      ],
    )
  }

  #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
  {
    Selected::new(names::PORTABLE, portable::min_i32 as MinI32Fn)
  }
}

fn select_min_f64() -> Selected<MinF64Fn> {
  #[cfg(target_arch = "x86_64")]
  {
    use platform::{Bits256, caps::x86};

    let (caps, tune) = platform::get();
    if tune.fast_wide_vectors && caps.has(x86::V512_READY) {
      return Selected::new(names::X86_AVX512, x86_64::min_f64_v512 as MinF64Fn);
    }
    backend::select(
      caps,
      &[
        Candidate::new(names::X86_AVX, x86::AVX, x86_64::min_f64_v256 as MinF64Fn),
        Candidate::new(names::X86_SSE2, x86::V128_READY, x86_64::min_f64_v128 as MinF64Fn),
        Candidate::new(names::PORTABLE, Bits256::NONE, portable::min_f64 as MinF64Fn),
      ],
    )
  }

  #[cfg(target_arch = "aarch64")]
  {
    use platform::{Bits256, caps::aarch64 as arm};

    backend::select(
      platform::caps(),
      &[
        Candidate::new(names::ARM_NEON, arm::V128_READY, aarch64::min_f64_v128 as MinF64Fn),
        Candidate::new(names::PORTABLE, Bits256::NONE, portable::min_f64 as MinF64Fn),
      ],
    )
  }

  #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
  {
    Selected::new(names::PORTABLE, portable::min_f64 as MinF64Fn)
  }
}

static SUM_I32: Dispatcher<SumI32Fn> = Dispatcher::new(select_sum_i32);
static SUM_F64: Dispatcher<SumF64Fn> = Dispatcher::new(select_sum_f64);
static DOT_F64: Dispatcher<DotF64Fn> = Dispatcher::new(select_dot_f64);
static MIN_I32: Dispatcher<MinI32Fn> = Dispatcher::new(select_min_i32);
static MIN_F64: Dispatcher<MinF64Fn> = Dispatcher::new(select_min_f64);

// ─────────────────────────────────────────────────────────────────────────────
// Auto entry points (validated input)
// ─────────────────────────────────────────────────────────────────────────────

#[inline]
pub(crate) fn sum_i32_auto(data: &[i32]) -> i32 {
  (SUM_I32.get().func)(data)
}

#[inline]
pub(crate) fn sum_f64_auto(data: &[f64]) -> f64 {
  (SUM_F64.get().func)(data)
}

#[inline]
pub(crate) fn dot_f64_auto(a: &[f64], b: &[f64]) -> f64 {
  (DOT_F64.get().func)(a, b)
}

#[inline]
pub(crate) fn min_i32_auto(data: &[i32]) -> i32 {
  (MIN_I32.get().func)(data)
}

#[inline]
pub(crate) fn min_f64_auto(data: &[f64]) -> f64 {
  (MIN_F64.get().func)(data)
}

// ─────────────────────────────────────────────────────────────────────────────
// Explicit-width resolution
// ─────────────────────────────────────────────────────────────────────────────

pub(crate) fn sum_i32_kernel(width: LaneWidth) -> Option<SumI32Fn> {
  match width {
    LaneWidth::Native => Some(SUM_I32.get().func),
    LaneWidth::W64 => {
      #[cfg(target_arch = "aarch64")]
      if platform::caps().has(platform::caps::aarch64::V64_READY) {
        return Some(aarch64::sum_i32_v64 as SumI32Fn);
      }
      None
    }
    LaneWidth::W128 => {
      #[cfg(target_arch = "x86_64")]
      if platform::caps().has(platform::caps::x86::V128_READY) {
        return Some(x86_64::sum_i32_v128 as SumI32Fn);
      }
      #[cfg(target_arch = "aarch64")]
      if platform::caps().has(platform::caps::aarch64::V128_READY) {
        return Some(aarch64::sum_i32_v128 as SumI32Fn);
      }
      None
    }
    LaneWidth::W256 => {
      #[cfg(target_arch = "x86_64")]
      if platform::caps().has(platform::caps::x86::V256_READY) {
        return Some(x86_64::sum_i32_v256 as SumI32Fn);
      }
      None
    }
    LaneWidth::W512 => {
      #[cfg(target_arch = "x86_64")]
      if platform::caps().has(platform::caps::x86::V512_READY) {
        return Some(x86_64::sum_i32_v512 as SumI32Fn);
      }
      None
    }
  }
}

pub(crate) fn sum_f64_kernel(width: LaneWidth) -> Option<SumF64Fn> {
  match width {
    LaneWidth::Native => Some(SUM_F64.get().func),
    // f64 does not fit 64-bit lanes.
    LaneWidth::W64 => None,
    LaneWidth::W128 => {
      #[cfg(target_arch = "x86_64")]
      if platform::caps().has(platform::caps::x86::V128_READY) {
        return Some(x86_64::sum_f64_v128 as SumF64Fn);
      }
      #[cfg(target_arch = "aarch64")]
      if platform::caps().has(platform::caps::aarch64::V128_READY) {
        return Some(aarch64::sum_f64_v128 as SumF64Fn);
      }
      None
    }
    LaneWidth::W256 => {
      #[cfg(target_arch = "x86_64")]
      if platform::caps().has(platform::caps::x86::AVX) {
        return Some(x86_64::sum_f64_v256 as SumF64Fn);
      }
      None
    }
    LaneWidth::W512 => {
      #[cfg(target_arch = "x86_64")]
      if platform::caps().has(platform::caps::x86::V512_READY) {
        return Some(x86_64::sum_f64_v512 as SumF64Fn);
      }
      None
    }
  }
}

pub(crate) fn dot_f64_kernel(width: LaneWidth) -> Option<DotF64Fn> {
  match width {
    LaneWidth::Native => Some(DOT_F64.get().func),
    LaneWidth::W64 => None,
    LaneWidth::W128 => {
      #[cfg(target_arch = "x86_64")]
      if platform::caps().has(platform::caps::x86::V128_READY) {
        return Some(x86_64::dot_f64_v128 as DotF64Fn);
      }
      #[cfg(target_arch = "aarch64")]
      if platform::caps().has(platform::caps::aarch64::V128_READY) {
        return Some(aarch64::dot_f64_v128 as DotF64Fn);
      }
      None
    }
    LaneWidth::W256 => {
      #[cfg(target_arch = "x86_64")]
      {
        let caps = platform::caps();
        if caps.has(platform::caps::x86::V256_FMA_READY) {
          return Some(x86_64::dot_f64_v256fma as DotF64Fn);
        }
        if caps.has(platform::caps::x86::AVX) {
          return Some(x86_64::dot_f64_v256 as DotF64Fn);
        }
      }
      None
    }
    LaneWidth::W512 => {
      #[cfg(target_arch = "x86_64")]
      if platform::caps().has(platform::caps::x86::V512_READY) {
        return Some(x86_64::dot_f64_v512 as DotF64Fn);
      }
      None
    }
  }
}

pub(crate) fn min_i32_kernel(width: LaneWidth) -> Option<MinI32Fn> {
  match width {
    LaneWidth::Native => Some(MIN_I32.get().func),
    LaneWidth::W64 => {
      #[cfg(target_arch = "aarch64")]
      if platform::caps().has(platform::caps::aarch64::V64_READY) {
        return Some(aarch64::min_i32_v64 as MinI32Fn);
      }
      None
    }
    LaneWidth::W128 => {
      #[cfg(target_arch = "x86_64")]
      if platform::caps().has(platform::caps::x86::V128_MIN_READY) {
        return Some(x86_64::min_i32_v128 as MinI32Fn);
      }
      #[cfg(target_arch = "aarch64")]
      if platform::caps().has(platform::caps::aarch64::V128_READY) {
        return Some(aarch64::min_i32_v128 as MinI32Fn);
      }
      None
    }
    LaneWidth::W256 => {
      #[cfg(target_arch = "x86_64")]
      if platform::caps().has(platform::caps::x86::V256_READY) {
        return Some(x86_64::min_i32_v256 as MinI32Fn);
      }
      None
    }
    LaneWidth::W512 => {
      #[cfg(target_arch = "x86_64")]
      if platform::caps().has(platform::caps::x86::V512_READY) {
        return Some(x86_64::min_i32_v512 as MinI32Fn);
      }
      None
    }
  }
}

pub(crate) fn min_f64_kernel(width: LaneWidth) -> Option<MinF64Fn> {
  match width {
    LaneWidth::Native => Some(MIN_F64.get().func),
    LaneWidth::W64 => None,
    LaneWidth::W128 => {
      #[cfg(target_arch = "x86_64")]
      if platform::caps().has(platform::caps::x86::V128_READY) {
        return Some(x86_64::min_f64_v128 as MinF64Fn);
      }
      #[cfg(target_arch = "aarch64")]
      if platform::caps().has(platform::caps::aarch64::V128_READY) {
        return Some(aarch64::min_f64_v128 as MinF64Fn);
      }
      None
    }
    LaneWidth::W256 => {
      #[cfg(target_arch = "x86_64")]
      if platform::caps().has(platform::caps::x86::AVX) {
        return Some(x86_64::min_f64_v256 as MinF64Fn);
      }
      None
    }
    LaneWidth::W512 => {
      #[cfg(target_arch = "x86_64")]
      if platform::caps().has(platform::caps::x86::V512_READY) {
        return Some(x86_64::min_f64_v512 as MinF64Fn);
      }
      None
    }
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Introspection
// ─────────────────────────────────────────────────────────────────────────────

/// The kernels the auto selector uses on this machine, per operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectedKernels {
  pub sum_i32: &'static str,
  pub sum_f64: &'static str,
  pub dot_f64: &'static str,
  pub min_i32: &'static str,
  pub min_f64: &'static str,
}

/// Names of the auto-selected kernels. Intended for diagnostics and tests.
#[must_use]
pub fn selected_kernels() -> SelectedKernels {
  SelectedKernels {
    sum_i32: SUM_I32.backend_name(),
    sum_f64: SUM_F64.backend_name(),
    dot_f64: DOT_F64.backend_name(),
    min_i32: MIN_I32.backend_name(),
    min_f64: MIN_F64.backend_name(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn selection_is_idempotent() {
    assert_eq!(selected_kernels(), selected_kernels());
  }

  #[test]
  fn native_kernel_always_resolves() {
    assert!(sum_i32_kernel(LaneWidth::Native).is_some());
    assert!(sum_f64_kernel(LaneWidth::Native).is_some());
    assert!(dot_f64_kernel(LaneWidth::Native).is_some());
    assert!(min_i32_kernel(LaneWidth::Native).is_some());
    assert!(min_f64_kernel(LaneWidth::Native).is_some());
  }

  #[test]
  fn w64_f64_is_never_a_vector_width() {
    assert!(sum_f64_kernel(LaneWidth::W64).is_none());
    assert!(dot_f64_kernel(LaneWidth::W64).is_none());
    assert!(min_f64_kernel(LaneWidth::W64).is_none());
  }

  #[test]
  #[cfg(all(target_arch = "x86_64", not(miri)))]
  fn x86_64_baseline_widths_resolve() {
    // SSE2 is baseline on x86_64.
    assert!(sum_i32_kernel(LaneWidth::W128).is_some());
    assert!(sum_f64_kernel(LaneWidth::W128).is_some());
    assert!(dot_f64_kernel(LaneWidth::W128).is_some());
    assert!(min_f64_kernel(LaneWidth::W128).is_some());
    // 64-bit lanes do not exist on x86_64.
    assert!(sum_i32_kernel(LaneWidth::W64).is_none());
    assert!(min_i32_kernel(LaneWidth::W64).is_none());
  }

  #[test]
  #[cfg(all(target_arch = "aarch64", not(miri)))]
  fn aarch64_baseline_widths_resolve() {
    assert!(sum_i32_kernel(LaneWidth::W64).is_some());
    assert!(sum_i32_kernel(LaneWidth::W128).is_some());
    assert!(min_i32_kernel(LaneWidth::W64).is_some());
    assert!(dot_f64_kernel(LaneWidth::W128).is_some());
    // Wider lanes do not exist on aarch64.
    assert!(sum_i32_kernel(LaneWidth::W256).is_none());
    assert!(sum_i32_kernel(LaneWidth::W512).is_none());
  }
}
