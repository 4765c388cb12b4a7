//! Domain layer - Core business entities.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! The storage layout of these types lives in the `user-store` crate.

pub mod user;

pub use user::{User, UserField};
