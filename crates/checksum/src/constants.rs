//! Generator polynomial constants.
//!
//! Both polynomials are stored in reflected (bit-reversed) form for
//! LSB-first processing on little-endian machines. The two families are not
//! interchangeable: hardware `crc32` instructions are hardwired to one of
//! them.

/// CRC-32 (ISO-HDLC) constants.
///
/// Polynomial: 0x04C11DB7 (reflected: 0xEDB88320)
/// Used by: Ethernet, gzip, PNG, zip, zlib
pub mod crc32 {
  /// CRC-32 polynomial in reflected form.
  pub const POLYNOMIAL: u32 = 0xEDB8_8320;
}

/// CRC-32C (Castagnoli) constants.
///
/// Polynomial: 0x1EDC6F41 (reflected: 0x82F63B78)
/// Used by: iSCSI, SCTP, ext4, Btrfs, storage and network protocols
pub mod crc32c {
  /// CRC-32C polynomial in reflected form.
  pub const POLYNOMIAL: u32 = 0x82F6_3B78;
}
