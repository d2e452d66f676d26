//! Project layout and persisted configuration.
//!
//! - `ProjectLayout`: computed paths for the project's metadata files.
//! - `ProjectConfig`: serializable project settings plus the saved build session.
//! - `ProjectContext`: layout + loaded config, with save support.

pub mod config;
pub mod context;
pub mod layout;
pub mod util;

pub use config::*;
pub use context::*;
pub use layout::*;
pub use util::*;
