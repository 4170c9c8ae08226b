//! Shared types, errors, and configuration for LedgerBridge.
//!
//! This crate provides common pieces used across all other crates:
//! - Money helpers with decimal precision
//! - Field policy for unrecognized request fields
//! - Application-wide error types
//! - Configuration management
//! - Session client for the host accounting platform

pub mod config;
pub mod error;
pub mod platform;
pub mod types;

pub use config::{ApiConfig, AppConfig, DefaultsConfig, PlatformConfig};
pub use error::{AppError, AppResult};
pub use platform::{PlatformClient, PlatformError, PlatformSession, SessionCookie};
