//! Shared types, error model, and configuration for the documentation converter.
//!
//! This crate is the foundation depended on by all other crates.
//! It provides:
//! - [`DocLlmError`], the unified error type
//! - Domain types ([`ProcessedDocument`], [`TransformContext`])
//! - Configuration ([`LlmConfig`], config loading and validation)
//! - Pure path helpers ([`rewrite_path`] and friends)

pub mod config;
pub mod error;
pub mod paths;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    CONFIG_FILE_NAME, IgnoreList, LlmConfig, SeeAlsoConfig, init_config, load_config,
    load_config_from, parse_base_url,
};
pub use error::{DocLlmError, Result};
pub use paths::{
    absolutize, normalize_path, output_relative_path, replace_extension, rewrite_path,
    strip_extension, to_slash,
};
pub use types::{MANIFEST_VERSION, ProcessedDocument, TransformContext};
