//! Bit-at-a-time CRC-32 (ISO-HDLC) baseline.

use crate::constants::crc32::POLYNOMIAL;

/// Compute CRC-32 over a byte slice without lookup tables or hardware help.
///
/// # Example
///
/// ```
/// use checksum::bitwise::crc32::compute;
///
/// let crc = compute(0xFFFF_FFFF, b"123456789") ^ 0xFFFF_FFFF;
/// assert_eq!(crc, 0xCBF4_3926);
/// ```
#[inline]
#[must_use]
pub const fn compute(crc: u32, data: &[u8]) -> u32 {
  super::fold_slice(crc, data, POLYNOMIAL)
}

/// Compute CRC-32 for a single byte.
#[inline]
#[must_use]
pub const fn compute_byte(crc: u32, byte: u8) -> u32 {
  super::fold_byte(crc, byte, POLYNOMIAL)
}
