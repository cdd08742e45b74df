//! Avatar QA Adapters - External adapters for avatar-qa.
//!
//! This crate provides adapters for:
//! - Filesystem upload source
//! - Model downloading and caching

pub mod fs;
pub mod models;

pub use fs::FsUploadSource;
pub use models::{default_models_dir, ModelSource, ModelStore, BLAZEFACE};
