//! CRC-32 (ISO-HDLC) checksum.
//!
//! CRC-32 uses polynomial 0x04C11DB7 (reflected 0xEDB88320), the variant
//! used by common archive formats (gzip, zip, PNG, Ethernet).
//!
//! # Usage
//!
//! ```
//! use checksum::Crc32;
//!
//! assert_eq!(Crc32::checksum(b"123456789"), 0xCBF4_3926);
//!
//! let mut hasher = Crc32::new();
//! hasher.update(b"1234");
//! hasher.update(b"56789");
//! assert_eq!(hasher.finalize(), 0xCBF4_3926);
//! ```
//!
//! # Hardware Acceleration
//!
//! Only the ARMv8 CRC extension implements this polynomial in hardware
//! (`crc32*` instructions). The x86_64 SSE4.2 `crc32` instruction is
//! hardwired to the Castagnoli polynomial and would be a configuration
//! error here, so on x86_64 the auto selector uses the portable baseline
//! and [`CrcBackend::HwCrc`] always fails.

#[cfg(target_arch = "aarch64")]
pub(crate) mod aarch64;

use traits::{Checksum, KernelError};

use crate::config::CrcBackend;

/// Kernel signature shared by every CRC-32 variant.
#[allow(dead_code)] // Unused on targets where only the baseline exists.
type CrcFn = fn(u32, &[u8]) -> u32;

// Backend names reported by [`Crc32::backend_name`]. Each is referenced
// only on the target it belongs to.
#[allow(dead_code)]
const BACKEND_ARM_CRC: &str = "aarch64/crc";
#[allow(dead_code)]
const BACKEND_BITWISE: &str = "portable/bitwise";

/// CRC-32 (ISO-HDLC) checksum.
///
/// Implements streaming CRC-32 computation with automatic hardware
/// acceleration where the polynomial is supported in hardware.
///
/// # Thread Safety
///
/// `Crc32` is `Send` and `Sync`. State is call-local; concurrent hashers
/// never share anything but the read-only capability snapshot.
#[derive(Clone, Debug)]
pub struct Crc32 {
  /// Current CRC state (inverted - XOR applied on finalize).
  state: u32,
  /// Initial value for reset.
  initial: u32,
}

impl Crc32 {
  /// Initial value for CRC-32 (all ones).
  const INIT: u32 = 0xFFFF_FFFF;

  /// Create a new hasher with the default initial value.
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self {
      state: Self::INIT,
      initial: Self::INIT,
    }
  }

  /// Create a new hasher that resumes from a previous CRC.
  #[inline]
  #[must_use]
  pub const fn resume(crc: u32) -> Self {
    Self {
      // Invert back to internal state.
      state: crc ^ Self::INIT,
      initial: crc ^ Self::INIT,
    }
  }

  /// Compute CRC-32 of data in one shot.
  ///
  /// A zero-length buffer yields `0x0000_0000` (the complement of the
  /// initial state).
  ///
  /// # Example
  ///
  /// ```
  /// use checksum::Crc32;
  ///
  /// assert_eq!(Crc32::checksum(b"123456789"), 0xCBF43926);
  /// assert_eq!(Crc32::checksum(b""), 0x00000000);
  /// ```
  #[inline]
  #[must_use]
  pub fn checksum(data: &[u8]) -> u32 {
    dispatch(Self::INIT, data) ^ Self::INIT
  }

  /// Compute CRC-32 with an explicitly selected backend.
  ///
  /// # Errors
  ///
  /// Returns [`KernelError::UnsupportedOperation`] when
  /// [`CrcBackend::HwCrc`] is requested on a machine without an ISO-HDLC
  /// CRC instruction (including every x86_64 machine).
  pub fn checksum_with(backend: CrcBackend, data: &[u8]) -> Result<u32, KernelError> {
    match backend {
      CrcBackend::Auto => Ok(Self::checksum(data)),
      CrcBackend::Bitwise => Ok(crate::bitwise::crc32::compute(Self::INIT, data) ^ Self::INIT),
      CrcBackend::HwCrc => match hw_kernel() {
        Some(kernel) => Ok(kernel(Self::INIT, data) ^ Self::INIT),
        None => Err(KernelError::UnsupportedOperation),
      },
    }
  }

  /// Update the hasher with additional data.
  #[inline]
  pub fn update(&mut self, data: &[u8]) {
    self.state = dispatch(self.state, data);
  }

  /// Finalize and return the checksum.
  ///
  /// Does not consume the hasher, allowing further updates.
  #[inline]
  #[must_use]
  pub const fn finalize(&self) -> u32 {
    self.state ^ Self::INIT
  }

  /// Reset the hasher to its initial state.
  #[inline]
  pub fn reset(&mut self) {
    self.state = self.initial;
  }

  /// Returns the name of the kernel the auto selector uses on this machine.
  ///
  /// Intended for diagnostics and tests.
  #[must_use]
  pub fn backend_name() -> &'static str {
    #[cfg(all(target_arch = "aarch64", target_feature = "crc"))]
    {
      BACKEND_ARM_CRC
    }

    #[cfg(all(feature = "std", target_arch = "aarch64", not(target_feature = "crc")))]
    {
      DISPATCH.backend_name()
    }

    #[cfg(not(any(
      all(target_arch = "aarch64", target_feature = "crc"),
      all(feature = "std", target_arch = "aarch64", not(target_feature = "crc")),
    )))]
    {
      BACKEND_BITWISE
    }
  }
}

impl Default for Crc32 {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl Checksum for Crc32 {
  const OUTPUT_SIZE: usize = 4;
  type Output = u32;

  #[inline]
  fn new() -> Self {
    Crc32::new()
  }

  #[inline]
  fn with_initial(initial: Self::Output) -> Self {
    Crc32::resume(initial)
  }

  #[inline]
  fn update(&mut self, data: &[u8]) {
    Crc32::update(self, data);
  }

  #[inline]
  fn finalize(&self) -> Self::Output {
    Crc32::finalize(self)
  }

  #[inline]
  fn reset(&mut self) {
    Crc32::reset(self);
  }

  #[inline]
  fn checksum(data: &[u8]) -> Self::Output {
    Crc32::checksum(data)
  }
}

#[cfg(feature = "std")]
impl std::io::Write for Crc32 {
  #[inline]
  fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
    self.update(buf);
    Ok(buf.len())
  }

  #[inline]
  fn flush(&mut self) -> std::io::Result<()> {
    Ok(())
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Dispatch
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(all(feature = "std", target_arch = "aarch64", not(target_feature = "crc")))]
static DISPATCH: backend::Dispatcher<CrcFn> = backend::Dispatcher::new(select_kernel);

#[cfg(all(feature = "std", target_arch = "aarch64", not(target_feature = "crc")))]
fn select_kernel() -> backend::Selected<CrcFn> {
  use platform::{Bits256, caps::aarch64 as arm};

  backend::select(
    platform::caps(),
    &[
      backend::Candidate::new(BACKEND_ARM_CRC, arm::HWCRC_READY, aarch64::compute_crc_runtime as CrcFn),
      backend::Candidate::new(BACKEND_BITWISE, Bits256::NONE, crate::bitwise::crc32::compute as CrcFn),
    ],
  )
}

/// Dispatch to the fastest available implementation.
///
/// Tier 1 resolves at compile time when the CRC extension is enabled; tier 2
/// consults the cached capability snapshot; tier 3 is the portable baseline
/// (always the case on x86_64, which has no ISO-HDLC CRC instruction).
#[inline]
fn dispatch(crc: u32, data: &[u8]) -> u32 {
  #[cfg(all(target_arch = "aarch64", target_feature = "crc"))]
  {
    aarch64::compute_crc_enabled(crc, data)
  }

  #[cfg(all(feature = "std", target_arch = "aarch64", not(target_feature = "crc")))]
  {
    (DISPATCH.get().func)(crc, data)
  }

  #[cfg(not(any(
    all(target_arch = "aarch64", target_feature = "crc"),
    all(feature = "std", target_arch = "aarch64", not(target_feature = "crc")),
  )))]
  {
    crate::bitwise::crc32::compute(crc, data)
  }
}

/// Returns the hardware kernel when the current machine supports it.
///
/// This is the gate behind [`CrcBackend::HwCrc`]: `None` means the request
/// must fail rather than fall back.
fn hw_kernel() -> Option<CrcFn> {
  #[cfg(all(target_arch = "aarch64", target_feature = "crc"))]
  {
    Some(aarch64::compute_crc_enabled as CrcFn)
  }

  #[cfg(all(feature = "std", target_arch = "aarch64", not(target_feature = "crc")))]
  {
    if platform::caps().has(platform::caps::aarch64::HWCRC_READY) {
      Some(aarch64::compute_crc_runtime as CrcFn)
    } else {
      None
    }
  }

  #[cfg(not(any(
    all(target_arch = "aarch64", target_feature = "crc"),
    all(feature = "std", target_arch = "aarch64", not(target_feature = "crc")),
  )))]
  {
    None
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  extern crate std;

  use std::vec::Vec;

  use super::*;

  #[test]
  fn test_checksum() {
    assert_eq!(Crc32::checksum(b"123456789"), 0xCBF4_3926);
  }

  #[test]
  fn test_empty() {
    assert_eq!(Crc32::checksum(b""), 0x0000_0000);
  }

  #[test]
  fn test_single_zero_byte() {
    assert_eq!(Crc32::checksum(&[0x00]), 0xD202_EF8D);
  }

  #[test]
  fn test_incremental() {
    let mut hasher = Crc32::new();
    hasher.update(b"1234");
    hasher.update(b"56789");
    assert_eq!(hasher.finalize(), 0xCBF4_3926);
  }

  #[test]
  fn test_resume() {
    let data = b"hello world";
    let (first, second) = data.split_at(6);

    let crc1 = Crc32::checksum(first);
    let mut hasher = Crc32::resume(crc1);
    hasher.update(second);

    assert_eq!(hasher.finalize(), Crc32::checksum(data));
  }

  #[test]
  fn test_reset() {
    let mut hasher = Crc32::new();
    hasher.update(b"garbage");
    hasher.reset();
    hasher.update(b"123456789");
    assert_eq!(hasher.finalize(), 0xCBF4_3926);
  }

  #[test]
  fn test_clone() {
    let mut hasher = Crc32::new();
    hasher.update(b"1234");

    let mut clone = hasher.clone();
    hasher.update(b"56789");
    clone.update(b"56789");

    assert_eq!(hasher.finalize(), clone.finalize());
  }

  #[test]
  fn test_trait_impl() {
    fn check_trait<T: Checksum>() {}
    check_trait::<Crc32>();
  }

  fn gen_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(len);
    let mut x = seed | 1;
    for _ in 0..len {
      // xorshift64*
      x ^= x << 13;
      x ^= x >> 7;
      x ^= x << 17;
      out.push((x as u8).wrapping_add((x >> 8) as u8));
    }
    out
  }

  /// Every chunk-boundary remainder of the 8/4/1 descending walk.
  const BOUNDARY_LENGTHS: &[usize] = &[0, 1, 2, 3, 4, 5, 7, 8, 9, 12, 13, 15, 16, 63, 64, 255, 256, 1024, 4096];

  #[test]
  fn test_dispatch_matches_bitwise() {
    for &len in BOUNDARY_LENGTHS {
      let data = gen_bytes(len, len as u64 ^ 0x2545_F491_4F6C_DD1D);
      let expected = crate::bitwise::crc32::compute(0xFFFF_FFFF, &data) ^ 0xFFFF_FFFF;
      assert_eq!(Crc32::checksum(&data), expected, "dispatch mismatch at len={}", len);
    }
  }

  #[test]
  fn test_forced_bitwise() {
    for &len in BOUNDARY_LENGTHS {
      let data = gen_bytes(len, len as u64 ^ 0x9E37_79B9_7F4A_7C15);
      let forced = Crc32::checksum_with(CrcBackend::Bitwise, &data).expect("bitwise backend is always available");
      assert_eq!(forced, Crc32::checksum(&data));
    }
  }

  #[test]
  fn test_forced_hwcrc() {
    let supported = hw_kernel().is_some();

    #[cfg(target_arch = "x86_64")]
    assert!(!supported, "x86_64 has no ISO-HDLC CRC instruction");

    for &len in BOUNDARY_LENGTHS {
      let data = gen_bytes(len, len as u64 ^ 0xD1B5_4A32_D192_ED03);
      match Crc32::checksum_with(CrcBackend::HwCrc, &data) {
        Ok(crc) => {
          assert!(supported, "hwcrc succeeded on an unsupported machine");
          assert_eq!(crc, Crc32::checksum(&data), "hwcrc mismatch at len={}", len);
        }
        Err(err) => {
          assert!(!supported, "hwcrc failed on a supported machine");
          assert_eq!(err, KernelError::UnsupportedOperation);
        }
      }
    }
  }
}

#[cfg(all(test, not(miri)))]
mod proptests {
  extern crate std;

  use proptest::prelude::*;

  use super::*;

  proptest! {
    /// The auto selector always matches the bit-at-a-time baseline.
    #[test]
    fn dispatch_matches_bitwise(data in proptest::collection::vec(any::<u8>(), 0..2048)) {
      let expected = crate::bitwise::crc32::compute(0xFFFF_FFFF, &data) ^ 0xFFFF_FFFF;
      prop_assert_eq!(Crc32::checksum(&data), expected);
    }

    /// Any split across update calls yields the one-shot value.
    #[test]
    fn split_updates_compose(data in proptest::collection::vec(any::<u8>(), 0..512), split in 0usize..512) {
      let split = split.min(data.len());
      let (a, b) = data.split_at(split);

      let mut hasher = Crc32::new();
      hasher.update(a);
      hasher.update(b);

      prop_assert_eq!(hasher.finalize(), Crc32::checksum(&data));
    }
  }
}
