//! QA Sandbox web server
//!
//! Serves the testing playground pages (every interactive element carries
//! a stable `data-testid`) plus the JSON API for the credential check and
//! the persisted user CRUD.

pub mod pages;
pub mod server;

pub use server::{serve, WebServerConfig};
