//! Configuration management for tabstore
//!
//! This crate holds the storage manager's tunables and loads them with
//! precedence defaults < config file < environment < command line.

pub mod config;
pub mod loader;


pub use config::{ConfigSource, ManagerConfig, PartialConfig};
pub use loader::{ConfigLoader, LoadedConfig};
