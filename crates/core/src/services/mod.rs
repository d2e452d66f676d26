pub mod backends;
pub mod build;
pub mod pipeline;
