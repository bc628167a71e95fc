//! Bit-at-a-time CRC-32C (Castagnoli) baseline.

use crate::constants::crc32c::POLYNOMIAL;

/// Compute CRC-32C over a byte slice without lookup tables or hardware help.
///
/// # Example
///
/// ```
/// use checksum::bitwise::crc32c::compute;
///
/// let crc = compute(0xFFFF_FFFF, b"123456789") ^ 0xFFFF_FFFF;
/// assert_eq!(crc, 0xE306_9283);
/// ```
#[inline]
#[must_use]
pub const fn compute(crc: u32, data: &[u8]) -> u32 {
  super::fold_slice(crc, data, POLYNOMIAL)
}

/// Compute CRC-32C for a single byte.
#[inline]
#[must_use]
pub const fn compute_byte(crc: u32, byte: u8) -> u32 {
  super::fold_byte(crc, byte, POLYNOMIAL)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn check_value() {
    // Standard CRC-32C check value: "123456789" -> 0xE3069283
    let crc = compute(0xFFFF_FFFF, b"123456789") ^ 0xFFFF_FFFF;
    assert_eq!(crc, 0xE306_9283);
  }

  #[test]
  fn empty() {
    let crc = compute(0xFFFF_FFFF, b"") ^ 0xFFFF_FFFF;
    assert_eq!(crc, 0x0000_0000);
  }

  #[test]
  fn zeros_and_ones() {
    let crc = compute(0xFFFF_FFFF, &[0u8; 32]) ^ 0xFFFF_FFFF;
    assert_eq!(crc, 0x8A91_36AA);

    let crc = compute(0xFFFF_FFFF, &[0xFFu8; 32]) ^ 0xFFFF_FFFF;
    assert_eq!(crc, 0x62A8_AB43);
  }

  #[test]
  fn incremental() {
    let data = b"hello world";
    let oneshot = compute(0xFFFF_FFFF, data) ^ 0xFFFF_FFFF;

    for split in 0..=data.len() {
      let (a, b) = data.split_at(split);
      let mut crc = compute(0xFFFF_FFFF, a);
      crc = compute(crc, b);
      crc ^= 0xFFFF_FFFF;
      assert_eq!(crc, oneshot, "mismatch at split {}", split);
    }
  }
}
