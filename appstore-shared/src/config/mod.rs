//! # Configuration
//!
//! Client configuration: backend location, token storage, and logging.

pub mod client;

pub use client::{Config, ConfigError, LogFormat, LoggingConfig};
