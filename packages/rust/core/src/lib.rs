//! Traversal and document assembly for folder2md.
//!
//! This crate ties together the path filters, file loading, and the
//! Markdown writer into the end-to-end [`builder::build_document`] workflow.

pub mod builder;
pub mod filter;
pub mod loader;

pub use builder::{
    BuildConfig, BuildReport, DocumentStats, ProgressReporter, SilentProgress, build_document,
    render_document,
};
