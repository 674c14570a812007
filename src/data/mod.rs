//! External configuration
//!
//! World tunables loaded from RON files, so worlds can be tuned without a rebuild.

pub mod config;

pub use config::{WorldConfig, DEFAULT_CONFIG_PATH};
