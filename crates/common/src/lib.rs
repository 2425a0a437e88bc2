//! Shared configuration and error handling for Chatrelay
//!
//! This crate provides common functionality used across the relay:
//! - Configuration management following 12-factor principles
//! - The request-level error taxonomy and its HTTP mapping

pub mod config;
pub mod error;

pub use config::{Config, ConfigError};
pub use error::{Error, Result};
