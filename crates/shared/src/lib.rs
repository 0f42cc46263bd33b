//! Shared types, errors, and configuration for Gudang.
//!
//! This crate provides common types used across all other crates:
//! - Configuration management
//! - Pagination types for list endpoints
//! - Bearer-token primitives that supply the acting user

pub mod auth;
pub mod config;
pub mod types;

pub use auth::{AuthConfig, Claims, TokenError, TokenService};
pub use config::AppConfig;
