//! Kernel selection and cached dispatch for rsimd.
//!
//! This crate sits between [`platform`] (which detects what the CPU can do)
//! and the algorithm crates (which provide kernel variants). It owns the
//! rule that makes hardware paths safe to call: a kernel is only eligible
//! when its required capability mask is a subset of the detected snapshot.
//!
//! See [`dispatch`] for the core types.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod dispatch;

pub use dispatch::{Candidate, Dispatcher, Selected, select};
