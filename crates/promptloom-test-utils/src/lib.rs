#![deny(unsafe_code)]

//! Shared test utilities for the PromptLoom workspace.
//!
//! Provides reusable context fixtures and tracing helpers so that
//! individual crate tests stay concise and consistent.
//!
//! Add this crate as a `[dev-dependency]` in any workspace member:
//!
//! ```toml
//! [dev-dependencies]
//! promptloom-test-utils = { workspace = true }
//! ```

pub mod context;
pub mod tracing_setup;
