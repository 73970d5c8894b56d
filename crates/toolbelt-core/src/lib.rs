//! Toolbelt core library
//!
//! This crate provides the building blocks shared by the HTTP-facing helpers:
//! the error taxonomy, configuration, random string generation, slugs, and
//! filesystem helpers. Nothing in here depends on a web framework.

pub mod config;
pub mod error;
pub mod fs;
pub mod random;
pub mod slug;

// Re-export commonly used items
pub use config::{ToolbeltConfig, DEFAULT_MAX_FILE_SIZE, DEFAULT_MAX_JSON_SIZE};
pub use error::ToolError;
pub use fs::create_dir_if_not_exist;
pub use random::random_string;
pub use slug::slugify;
