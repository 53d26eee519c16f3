//! Shared types, error model, and configuration for folder2md.
//!
//! This crate is the foundation depended on by all other folder2md crates.
//! It provides:
//! - [`Folder2MdError`]: the unified error type
//! - Domain types ([`ExtensionFilter`], [`FileContent`], [`language_tag`])
//! - Configuration ([`AppConfig`], [`FilterConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, FilterConfig, FiltersConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from,
};
pub use error::{Folder2MdError, Result};
pub use types::{ALL_EXTENSIONS, ExtensionFilter, FileContent, language_tag};
