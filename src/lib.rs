//! Minimal DevOps demo service.
//!
//! Four JSON endpoints over axum:
//!
//! ```text
//! GET  /                 health check
//! GET  /api/v1/info      deployment metadata
//! POST /api/v1/echo      echoes the JSON body back
//! GET  /api/v1/metrics   placeholder metrics
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`clock`]: Time source for response timestamps
//! - [`api`]: HTTP handlers and routing
//! - [`utils`]: Utility functions

pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result};
