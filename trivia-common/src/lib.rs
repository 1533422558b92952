//! # Trivia Common Library
//!
//! Shared code for the trivia season loader:
//! - Error taxonomy
//! - Configuration loading and resolution
//! - Database initialization and row models
//! - Field-schema validation

pub mod config;
pub mod db;
pub mod error;
pub mod schema;

pub use error::{Error, Result};
