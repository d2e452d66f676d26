//! forge-core
//!
//! Core library for turning a set of C# sources into a single compiled DLL.
//!
//! This crate defines the path/symbol model, the source collector, the
//! define-symbol scanner, the immutable build session, project configuration,
//! and the compiler backend adapters.
//!
//! The goal is to keep all substantive logic here so it is fully testable and
//! reusable from multiple frontends (CLI, editor integrations, etc.).

pub mod collector;
pub mod model;
pub mod project;
pub mod scanner;
pub mod services;
pub mod session;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
