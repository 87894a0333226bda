//! Cascade Core
//!
//! Core domain types, traits, and error handling for Cascade.
//! This crate has minimal dependencies and defines the shared vocabulary
//! used across all other crates.

pub mod build;
pub mod error;
pub mod event;
pub mod ids;
pub mod pipeline;
pub mod ports;
pub mod user;

pub use error::{Error, Result};
pub use ids::*;
