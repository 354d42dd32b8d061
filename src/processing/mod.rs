//! Desired state processing.
//!
//! - [`builder`] - Resource request construction
//! - [`deploy`] - Ordered submission to the provider
//! - [`projector`] - Result document projection
//! - [`tags`] - Tag merging

mod builder;
mod deploy;
mod projector;
mod tags;

// Re-export public functions
pub use builder::build_requests;
pub use deploy::{deploy, plan};
pub use projector::project;
pub use tags::merge_tags;
