//! Run-level artifacts built from the processed documents.
//!
//! - `llms.txt`: a line-oriented manifest pointing at every output page.
//! - `context-full.txt`: every page concatenated, grouped by category.
//!
//! Both are rendered to strings here; the caller decides where to write them.

mod bundle;
mod category;
mod manifest;

use url::Url;

use docllm_shared::{DocLlmError, LlmConfig, Result};

pub use bundle::{Bundle, build_bundle};
pub use category::{CategoryGroup, OTHER_CATEGORY, category_of, group_by_category};
pub use manifest::build_manifest;

/// File name of the manifest, written next to the output directory.
pub const MANIFEST_FILE_NAME: &str = "llms.txt";

/// File name of the bundle, written next to the output directory.
pub const BUNDLE_FILE_NAME: &str = "context-full.txt";

/// Public identity of the documentation site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteInfo {
    /// Display package name.
    pub pkg_name: String,
    /// Public URL of the output directory, ending with `/`.
    pub site_url: Url,
    /// Source repository URL.
    pub repo: String,
}

impl SiteInfo {
    /// Pull the site identity out of a validated configuration.
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let required = |name: &str, value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from)
                .ok_or_else(|| DocLlmError::MissingFields(vec![name.to_string()]))
        };

        Ok(Self {
            pkg_name: required("pkg_name", &config.pkg_name)?,
            site_url: config.site_url()?,
            repo: required("repo", &config.repo)?,
        })
    }

    /// Public URL of one output page.
    pub fn page_url(&self, relative_path: &str) -> String {
        format!("{}{}", self.site_url, relative_path.trim_start_matches('/'))
    }

    /// The bundle sits next to the output directory, so its URL is the site
    /// URL's parent joined with [`BUNDLE_FILE_NAME`].
    pub fn bundle_url(&self) -> Result<Url> {
        self.site_url
            .join(&format!("../{BUNDLE_FILE_NAME}"))
            .map_err(|e| DocLlmError::config(format!("cannot derive bundle URL: {e}")))
    }
}
