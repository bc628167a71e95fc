//! Checksum traits.
//!
//! The streaming interface shared by the CRC types.
//!
//! - **Performance**: zero-cost abstraction, inline-friendly
//! - **Streaming**: incremental updates for data arriving in pieces

use core::fmt::Debug;

/// A 32/64-bit checksum algorithm.
///
/// Provides the core interface for checksum computation with support for
/// incremental updates.
///
/// # Usage
///
/// ```rust,ignore
/// use checksum::{Checksum, Crc32c};
///
/// // One-shot (fastest for data already in memory)
/// let crc = Crc32c::checksum(b"hello world");
///
/// // Streaming (for incremental or large data)
/// let mut hasher = Crc32c::new();
/// hasher.update(b"hello ");
/// hasher.update(b"world");
/// assert_eq!(hasher.finalize(), crc);
/// ```
///
/// # Implementor Requirements
///
/// - `new()` must return the same state as `Default::default()`
/// - `finalize()` must be idempotent
/// - `reset()` must restore the hasher to its initial state
/// - Any split of the input across `update` calls must yield the one-shot
///   value
pub trait Checksum: Clone + Default {
  /// Output size in bytes (4 for CRC-32).
  const OUTPUT_SIZE: usize;

  /// The checksum output type.
  type Output: Copy + Eq + Debug + Default;

  /// Create a new hasher with the default initial value.
  #[must_use]
  fn new() -> Self;

  /// Create a new hasher resuming from a previously finalized checksum.
  #[must_use]
  fn with_initial(initial: Self::Output) -> Self;

  /// Update the hasher with additional data.
  fn update(&mut self, data: &[u8]);

  /// Finalize and return the checksum.
  ///
  /// Does not consume the hasher; further updates continue from the same
  /// state.
  #[must_use]
  fn finalize(&self) -> Self::Output;

  /// Reset the hasher to its initial state.
  fn reset(&mut self);

  /// Compute the checksum of data in one shot.
  #[inline]
  #[must_use]
  fn checksum(data: &[u8]) -> Self::Output {
    let mut h = Self::new();
    h.update(data);
    h.finalize()
  }
}
