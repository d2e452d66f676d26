pub mod backends;
pub mod build;
pub mod inputs;
pub mod manifest;
pub mod project;
pub mod scan;
pub mod util;

pub use backends::*;
pub use build::*;
pub use inputs::*;
pub use manifest::*;
pub use project::*;
pub use scan::*;
pub use util::*;
