//! Core domain types, errors, and constants for `tabstore`.
//!
//! This crate establishes the data structures shared by the storage engine,
//! the configuration loader and the command line front end.
//!
//! ## Key Components
//!
//! - **`errors`**: The primary `Error` enum, its `RecoveryHint`s and the
//!   `Result` alias. Every engine-internal failure is expressed here before the
//!   manager boundary turns it into a degraded result.
//! - **`types`**: Entry metadata, categories and priorities, quota snapshots,
//!   cleanup plans, health reports and change events.
//! - **`constants`**: Reserved key prefixes and default limits.

pub mod constants;
pub mod errors;
pub mod types;

pub use self::{
    constants::*,
    errors::{Error, RecoveryHint, Result, SerializationOp},
    types::*,
};
