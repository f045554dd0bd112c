//! Shared utilities for tabstore
//!
//! Atomic file replacement for the file-backed store and the tracing
//! subscriber setup used by the command line front end.

pub mod atomic_file;
pub mod tracing;

pub use atomic_file::*;
