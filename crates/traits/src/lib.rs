//! Shared traits and error types for the rsimd workspace.
//!
//! This crate defines the vocabulary common to every kernel crate:
//!
//! - [`KernelError`]: the error taxonomy (invalid input, unsupported
//!   hardware path)
//! - [`Checksum`]: the streaming checksum interface
//!
//! It intentionally has no dependencies and is fully `no_std`.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod checksum;
mod error;

pub use checksum::Checksum;
pub use error::KernelError;
