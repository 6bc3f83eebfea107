//! QA Sandbox Common Library
//!
//! Shared types, error taxonomy, and infrastructure for the QA Sandbox:
//! the user record model, the SQLite database wrapper backing the
//! persisted user store, and the locale-keyed message tables.

pub mod db;
pub mod error;
pub mod i18n;
pub mod types;

// Re-export commonly used types
pub use db::Database;
pub use error::{Error, Result};
pub use types::*;

/// QA Sandbox version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
