//! Error types for kernel operations.
//!
//! Minimal error taxonomy shared by every kernel crate. All errors are
//! detected before any partial computation begins; a failing call never
//! produces a partial result.

use core::fmt;

/// A kernel call was rejected before computation began.
///
/// # Examples
///
/// ```
/// use traits::KernelError;
///
/// fn mean(data: &[i32]) -> Result<i32, KernelError> {
///   if data.is_empty() {
///     return Err(KernelError::InvalidInput);
///   }
///   Ok(data.iter().sum::<i32>() / data.len() as i32)
/// }
///
/// assert_eq!(mean(&[]), Err(KernelError::InvalidInput));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum KernelError {
  /// The input does not admit a defined result: an empty buffer where the
  /// reduction is undefined, or mismatched buffer lengths for a dot product.
  InvalidInput,
  /// An explicitly requested lane width or hardware backend is absent on
  /// the current processor (or does not exist on this architecture).
  UnsupportedOperation,
}

impl fmt::Display for KernelError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::InvalidInput => f.write_str("invalid input"),
      Self::UnsupportedOperation => f.write_str("unsupported operation on this processor"),
    }
  }
}

impl core::error::Error for KernelError {}

#[cfg(test)]
mod tests {
  extern crate alloc;

  use alloc::{format, string::ToString};

  use super::*;

  #[test]
  fn display_messages() {
    assert_eq!(KernelError::InvalidInput.to_string(), "invalid input");
    assert_eq!(
      KernelError::UnsupportedOperation.to_string(),
      "unsupported operation on this processor"
    );
  }

  #[test]
  fn debug_impl() {
    assert_eq!(format!("{:?}", KernelError::InvalidInput), "InvalidInput");
  }

  #[test]
  fn is_copy_and_eq() {
    let e = KernelError::UnsupportedOperation;
    let e2 = e;
    let e3 = e;
    assert_eq!(e2, e3);
    assert_ne!(KernelError::InvalidInput, KernelError::UnsupportedOperation);
  }

  #[test]
  fn error_trait_impl() {
    use core::error::Error;

    fn assert_error<T: Error>() {}
    assert_error::<KernelError>();

    assert!(KernelError::InvalidInput.source().is_none());
  }

  #[test]
  fn result_err_path() {
    fn rejects() -> Result<(), KernelError> {
      Err(KernelError::InvalidInput)
    }
    let err = rejects().unwrap_err();
    assert_eq!(err, KernelError::InvalidInput);
  }

  #[test]
  fn trait_bounds() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    assert_send::<KernelError>();
    assert_sync::<KernelError>();
  }
}
