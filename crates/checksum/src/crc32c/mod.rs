//! CRC-32C (Castagnoli) checksum.
//!
//! CRC-32C uses polynomial 0x1EDC6F41 (reflected 0x82F63B78), designed for
//! strong error detection in storage and network protocols (iSCSI, SCTP,
//! ext4, Btrfs).
//!
//! # Usage
//!
//! ```
//! use checksum::Crc32c;
//!
//! // One-shot computation (fastest for single buffers)
//! assert_eq!(Crc32c::checksum(b"123456789"), 0xE306_9283);
//!
//! // Incremental computation (for streaming)
//! let mut hasher = Crc32c::new();
//! hasher.update(b"1234");
//! hasher.update(b"56789");
//! assert_eq!(hasher.finalize(), 0xE306_9283);
//! ```
//!
//! # Hardware Acceleration
//!
//! The auto selector uses the fastest instruction family the capability
//! snapshot reports:
//!
//! - **x86_64**: SSE4.2 `crc32` → bit-at-a-time portable
//! - **aarch64**: CRC extension (`crc32c*`) → bit-at-a-time portable

#[cfg(target_arch = "aarch64")]
pub(crate) mod aarch64;

#[cfg(target_arch = "x86_64")]
pub(crate) mod x86_64;

use traits::{Checksum, KernelError};

use crate::config::CrcBackend;

/// Kernel signature shared by every CRC-32C variant.
type CrcFn = fn(u32, &[u8]) -> u32;

// Backend names reported by [`Crc32c::backend_name`]. Each is referenced
// only on the target it belongs to.
#[allow(dead_code)]
const BACKEND_SSE42: &str = "x86_64/sse4.2";
#[allow(dead_code)]
const BACKEND_ARM_CRC: &str = "aarch64/crc";
#[allow(dead_code)]
const BACKEND_BITWISE: &str = "portable/bitwise";

/// CRC-32C (Castagnoli) checksum.
///
/// Implements streaming CRC-32C computation with automatic hardware
/// acceleration when available.
///
/// # Thread Safety
///
/// `Crc32c` is `Send` and `Sync`. State is call-local; concurrent hashers
/// never share anything but the read-only capability snapshot.
#[derive(Clone, Debug)]
pub struct Crc32c {
  /// Current CRC state (inverted - XOR applied on finalize).
  state: u32,
  /// Initial value for reset.
  initial: u32,
}

impl Crc32c {
  /// Initial value for CRC-32C (all ones).
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
  ///
  /// # Example
  ///
  /// ```
  /// use checksum::Crc32c;
  ///
  /// let data = b"hello world";
  /// let (first, second) = data.split_at(6);
  ///
  /// let crc1 = Crc32c::checksum(first);
  /// let mut hasher = Crc32c::resume(crc1);
  /// hasher.update(second);
  ///
  /// assert_eq!(hasher.finalize(), Crc32c::checksum(data));
  /// ```
  #[inline]
  #[must_use]
  pub const fn resume(crc: u32) -> Self {
    Self {
      // Invert back to internal state.
      state: crc ^ Self::INIT,
      initial: crc ^ Self::INIT,
    }
  }

  /// Compute CRC-32C of data in one shot.
  ///
  /// A zero-length buffer yields `0x0000_0000` (the complement of the
  /// initial state).
  ///
  /// # Example
  ///
  /// ```
  /// use checksum::Crc32c;
  ///
  /// assert_eq!(Crc32c::checksum(b"123456789"), 0xE3069283);
  /// assert_eq!(Crc32c::checksum(b""), 0x00000000);
  /// ```
  #[inline]
  #[must_use]
  pub fn checksum(data: &[u8]) -> u32 {
    dispatch(Self::INIT, data) ^ Self::INIT
  }

  /// Compute CRC-32C with an explicitly selected backend.
  ///
  /// # Errors
  ///
  /// Returns [`KernelError::UnsupportedOperation`] when
  /// [`CrcBackend::HwCrc`] is requested on a machine without the CRC
  /// instruction family.
  pub fn checksum_with(backend: CrcBackend, data: &[u8]) -> Result<u32, KernelError> {
    match backend {
      CrcBackend::Auto => Ok(Self::checksum(data)),
      CrcBackend::Bitwise => Ok(crate::bitwise::crc32c::compute(Self::INIT, data) ^ Self::INIT),
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
    #[cfg(all(target_arch = "x86_64", target_feature = "sse4.2"))]
    {
      BACKEND_SSE42
    }

    #[cfg(all(target_arch = "aarch64", target_feature = "crc"))]
    {
      BACKEND_ARM_CRC
    }

    #[cfg(all(feature = "std", target_arch = "x86_64", not(target_feature = "sse4.2")))]
    {
      DISPATCH.backend_name()
    }

    #[cfg(all(feature = "std", target_arch = "aarch64", not(target_feature = "crc")))]
    {
      DISPATCH.backend_name()
    }

    #[cfg(not(any(
      all(target_arch = "x86_64", target_feature = "sse4.2"),
      all(target_arch = "aarch64", target_feature = "crc"),
      all(feature = "std", target_arch = "x86_64", not(target_feature = "sse4.2")),
      all(feature = "std", target_arch = "aarch64", not(target_feature = "crc")),
    )))]
    {
      BACKEND_BITWISE
    }
  }
}

impl Default for Crc32c {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl Checksum for Crc32c {
  const OUTPUT_SIZE: usize = 4;
  type Output = u32;

  #[inline]
  fn new() -> Self {
    Crc32c::new()
  }

  #[inline]
  fn with_initial(initial: Self::Output) -> Self {
    Crc32c::resume(initial)
  }

  #[inline]
  fn update(&mut self, data: &[u8]) {
    Crc32c::update(self, data);
  }

  #[inline]
  fn finalize(&self) -> Self::Output {
    Crc32c::finalize(self)
  }

  #[inline]
  fn reset(&mut self) {
    Crc32c::reset(self);
  }

  #[inline]
  fn checksum(data: &[u8]) -> Self::Output {
    Crc32c::checksum(data)
  }
}

#[cfg(feature = "std")]
impl std::io::Write for Crc32c {
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

#[cfg(all(feature = "std", target_arch = "x86_64", not(target_feature = "sse4.2")))]
static DISPATCH: backend::Dispatcher<CrcFn> = backend::Dispatcher::new(select_kernel);

#[cfg(all(feature = "std", target_arch = "x86_64", not(target_feature = "sse4.2")))]
fn select_kernel() -> backend::Selected<CrcFn> {
  use platform::{Bits256, caps::x86};

  backend::select(
    platform::caps(),
    &[
      backend::Candidate::new(BACKEND_SSE42, x86::HWCRC_READY, x86_64::compute_sse42_runtime as CrcFn),
      backend::Candidate::new(BACKEND_BITWISE, Bits256::NONE, crate::bitwise::crc32c::compute as CrcFn),
    ],
  )
}

#[cfg(all(feature = "std", target_arch = "aarch64", not(target_feature = "crc")))]
static DISPATCH: backend::Dispatcher<CrcFn> = backend::Dispatcher::new(select_kernel);

#[cfg(all(feature = "std", target_arch = "aarch64", not(target_feature = "crc")))]
fn select_kernel() -> backend::Selected<CrcFn> {
  use platform::{Bits256, caps::aarch64 as arm};

  backend::select(
    platform::caps(),
    &[
      backend::Candidate::new(BACKEND_ARM_CRC, arm::HWCRC_READY, aarch64::compute_crc_runtime as CrcFn),
      backend::Candidate::new(BACKEND_BITWISE, Bits256::NONE, crate::bitwise::crc32c::compute as CrcFn),
    ],
  )
}

/// Dispatch to the fastest available implementation.
///
/// Tier 1 resolves at compile time when target features are enabled; tier 2
/// consults the cached capability snapshot; tier 3 is the portable baseline.
#[inline]
fn dispatch(crc: u32, data: &[u8]) -> u32 {
  #[cfg(all(target_arch = "x86_64", target_feature = "sse4.2"))]
  {
    x86_64::compute_sse42_enabled(crc, data)
  }

  #[cfg(all(target_arch = "aarch64", target_feature = "crc"))]
  {
    aarch64::compute_crc_enabled(crc, data)
  }

  #[cfg(all(feature = "std", target_arch = "x86_64", not(target_feature = "sse4.2")))]
  {
    (DISPATCH.get().func)(crc, data)
  }

  #[cfg(all(feature = "std", target_arch = "aarch64", not(target_feature = "crc")))]
  {
    (DISPATCH.get().func)(crc, data)
  }

  #[cfg(not(any(
    all(target_arch = "x86_64", target_feature = "sse4.2"),
    all(target_arch = "aarch64", target_feature = "crc"),
    all(feature = "std", target_arch = "x86_64", not(target_feature = "sse4.2")),
    all(feature = "std", target_arch = "aarch64", not(target_feature = "crc")),
  )))]
  {
    crate::bitwise::crc32c::compute(crc, data)
  }
}

/// Returns the hardware kernel when the current machine supports it.
///
/// This is the gate behind [`CrcBackend::HwCrc`]: `None` means the request
/// must fail rather than fall back.
fn hw_kernel() -> Option<CrcFn> {
  #[cfg(all(target_arch = "x86_64", target_feature = "sse4.2"))]
  {
    Some(x86_64::compute_sse42_enabled as CrcFn)
  }

  #[cfg(all(target_arch = "aarch64", target_feature = "crc"))]
  {
    Some(aarch64::compute_crc_enabled as CrcFn)
  }

  #[cfg(all(feature = "std", target_arch = "x86_64", not(target_feature = "sse4.2")))]
  {
    if platform::caps().has(platform::caps::x86::HWCRC_READY) {
      Some(x86_64::compute_sse42_runtime as CrcFn)
    } else {
      None
    }
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
    all(target_arch = "x86_64", target_feature = "sse4.2"),
    all(target_arch = "aarch64", target_feature = "crc"),
    all(feature = "std", target_arch = "x86_64", not(target_feature = "sse4.2")),
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
    assert_eq!(Crc32c::checksum(b"123456789"), 0xE306_9283);
  }

  #[test]
  fn test_empty() {
    assert_eq!(Crc32c::checksum(b""), 0x0000_0000);
  }

  #[test]
  fn test_zeros() {
    assert_eq!(Crc32c::checksum(&[0u8; 32]), 0x8A91_36AA);
  }

  #[test]
  fn test_ones() {
    assert_eq!(Crc32c::checksum(&[0xFFu8; 32]), 0x62A8_AB43);
  }

  #[test]
  fn test_incremental() {
    let mut hasher = Crc32c::new();
    hasher.update(b"1234");
    hasher.update(b"56789");
    assert_eq!(hasher.finalize(), 0xE306_9283);
  }

  #[test]
  fn test_resume() {
    let data = b"hello world";
    let (first, second) = data.split_at(6);

    let crc1 = Crc32c::checksum(first);
    let mut hasher = Crc32c::resume(crc1);
    hasher.update(second);

    assert_eq!(hasher.finalize(), Crc32c::checksum(data));
  }

  #[test]
  fn test_reset() {
    let mut hasher = Crc32c::new();
    hasher.update(b"garbage");
    hasher.reset();
    hasher.update(b"123456789");
    assert_eq!(hasher.finalize(), 0xE306_9283);
  }

  #[test]
  fn test_clone() {
    let mut hasher = Crc32c::new();
    hasher.update(b"1234");

    let mut clone = hasher.clone();
    hasher.update(b"56789");
    clone.update(b"56789");

    assert_eq!(hasher.finalize(), clone.finalize());
  }

  #[test]
  fn test_trait_impl() {
    fn check_trait<T: Checksum>() {}
    check_trait::<Crc32c>();
  }

  #[test]
  fn test_backend_name_is_stable() {
    assert_eq!(Crc32c::backend_name(), Crc32c::backend_name());
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
      let data = gen_bytes(len, len as u64 ^ 0x9E37_79B9_7F4A_7C15);
      let expected = crate::bitwise::crc32c::compute(0xFFFF_FFFF, &data) ^ 0xFFFF_FFFF;
      assert_eq!(Crc32c::checksum(&data), expected, "dispatch mismatch at len={}", len);
    }
  }

  #[test]
  fn test_forced_bitwise() {
    for &len in BOUNDARY_LENGTHS {
      let data = gen_bytes(len, len as u64 ^ 0xD1B5_4A32_D192_ED03);
      let forced = Crc32c::checksum_with(CrcBackend::Bitwise, &data).expect("bitwise backend is always available");
      assert_eq!(forced, Crc32c::checksum(&data));
    }
  }

  #[test]
  fn test_forced_auto() {
    let data = gen_bytes(100, 7);
    assert_eq!(
      Crc32c::checksum_with(CrcBackend::Auto, &data).expect("auto backend is always available"),
      Crc32c::checksum(&data)
    );
  }

  #[test]
  fn test_forced_hwcrc() {
    let supported = hw_kernel().is_some();

    for &len in BOUNDARY_LENGTHS {
      let data = gen_bytes(len, len as u64 ^ 0xA076_1D64_78BD_642F);
      match Crc32c::checksum_with(CrcBackend::HwCrc, &data) {
        Ok(crc) => {
          assert!(supported, "hwcrc succeeded on an unsupported machine");
          assert_eq!(crc, Crc32c::checksum(&data), "hwcrc mismatch at len={}", len);
        }
        Err(err) => {
          assert!(!supported, "hwcrc failed on a supported machine");
          assert_eq!(err, KernelError::UnsupportedOperation);
        }
      }
    }
  }

  #[cfg(feature = "std")]
  #[test]
  fn test_io_write() {
    use std::io::Write;

    let mut hasher = Crc32c::new();
    hasher.write_all(b"123456789").expect("checksum writer never fails");
    assert_eq!(hasher.finalize(), 0xE306_9283);
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
      let expected = crate::bitwise::crc32c::compute(0xFFFF_FFFF, &data) ^ 0xFFFF_FFFF;
      prop_assert_eq!(Crc32c::checksum(&data), expected);
    }

    /// Any split across update calls yields the one-shot value.
    #[test]
    fn split_updates_compose(data in proptest::collection::vec(any::<u8>(), 0..512), split in 0usize..512) {
      let split = split.min(data.len());
      let (a, b) = data.split_at(split);

      let mut hasher = Crc32c::new();
      hasher.update(a);
      hasher.update(b);

      prop_assert_eq!(hasher.finalize(), Crc32c::checksum(&data));
    }

    /// Resuming from a prefix CRC matches the one-shot value.
    #[test]
    fn resume_composes(data in proptest::collection::vec(any::<u8>(), 1..512), split in 0usize..512) {
      let split = split.min(data.len());
      let (a, b) = data.split_at(split);

      let mut hasher = Crc32c::resume(Crc32c::checksum(a));
      hasher.update(b);

      prop_assert_eq!(hasher.finalize(), Crc32c::checksum(&data));
    }
  }
}
