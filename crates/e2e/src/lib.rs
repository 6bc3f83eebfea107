//! QA Sandbox E2E Test Framework
//!
//! A Rust-controlled E2E testing framework that:
//! - Spawns the sandbox web server as a subprocess
//! - Drives a browser by generating Playwright scripts and running them
//!   under `node`
//! - Runs built-in suites composed from typed page objects, plus
//!   declarative YAML test specs
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    E2E Test Runner (Rust)                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestRunner                                                 │
//! │    ├── spawn_server() -> ServerHandle                       │
//! │    ├── run_spec(spec: TestSpec) -> TestResult               │
//! │    └── write_results() -> test-results.json                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestSpec (YAML)                                            │
//! │    ├── name, description, tags                              │
//! │    └── steps: [Step]                                        │
//! │          ├── navigate { url }                               │
//! │          ├── click / safe_click { selector }                │
//! │          ├── fill { selector, value }                       │
//! │          ├── wait { selector, state, timeout_ms }           │
//! │          ├── assert { selector, visible?, text? }           │
//! │          └── dialog_scope { dialog, steps }                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod pages;
pub mod playwright;
pub mod runner;
pub mod server;
pub mod spec;
pub mod suites;

pub use error::{E2eError, E2eResult};
pub use runner::TestRunner;
pub use spec::{TestSpec, TestStep};
