//! Common utilities shared across the workspace.
//!
//! This crate provides:
//! - Unified error handling for store-backed repositories
//! - Configuration structures
//! - Tracing subscriber setup

pub mod config;
pub mod error;
pub mod telemetry;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
