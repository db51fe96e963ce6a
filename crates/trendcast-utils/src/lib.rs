//! Shared utilities for trendcast
//!
//! This crate provides common functionality used across the trendcast workspace,
//! including logging setup and application-level configuration.

pub mod config;
pub mod logging;

pub use config::{Config, ConfigError, LogFormat};
pub use logging::{init_tracing, init_tracing_with};
