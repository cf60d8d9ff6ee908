//! Core domain types shared between the pipeline and the aggregator.

use std::path::{Path, PathBuf};

use crate::config::LlmConfig;
use crate::error::Result;
use crate::paths::absolutize;

/// Version written into the `llms.txt` header.
pub const MANIFEST_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// ProcessedDocument
// ---------------------------------------------------------------------------

/// Result of running the pipeline on one source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedDocument {
    /// Source file that was read.
    pub input_path: PathBuf,
    /// Absolute path of the written output file.
    pub output_path: PathBuf,
    /// Output-relative path with `/` separators and the output extension
    /// (e.g. `components/alert.md`). Its first segment is the category.
    pub relative_path: String,
    /// Front-matter title, if any.
    pub title: Option<String>,
}

// ---------------------------------------------------------------------------
// TransformContext
// ---------------------------------------------------------------------------

/// Per-run, read-only snapshot of everything the per-document passes need.
///
/// Built once from [`LlmConfig`] and shared across documents (and threads).
#[derive(Debug, Clone)]
pub struct TransformContext {
    /// Section titles dropped by the section remover.
    pub ignore: Vec<String>,
    /// Directory holding `<Component>.json` records.
    pub data_dir: PathBuf,
    /// Directory whose `<component-dir>/*.svelte` files name related components.
    pub components_dir: PathBuf,
    /// Docs root (absolute, normalized).
    pub docs_root: PathBuf,
    /// Examples root (absolute, normalized).
    pub examples_root: PathBuf,
    /// Lowercased source extensions (with dot) eligible for include expansion.
    pub include_extensions: Vec<String>,
    /// Output extension without a dot.
    pub format: String,
    /// Strip-prefix segment, if enabled.
    pub strip_prefix: Option<String>,
    /// Leading link prefix rewritten in "See also" lists.
    pub link_prefix: String,
    /// Absolute base replacing `link_prefix`, always ending with `/`.
    pub link_base: String,
    /// Self-closing marker tags stripped from output.
    pub marker_tags: Vec<String>,
    /// Extra diagnostics.
    pub debug: bool,
}

impl TransformContext {
    /// Build the context, resolving configured directories against `cwd`.
    ///
    /// Expects a validated config (so `base_url` is present).
    pub fn from_config(config: &LlmConfig, cwd: &Path) -> Result<Self> {
        let link_base = match &config.see_also.base_url {
            Some(base) => crate::config::parse_base_url(base)?,
            None => config.site_url()?,
        };

        Ok(Self {
            ignore: config.ignore.to_vec(),
            data_dir: absolutize(cwd, Path::new(&config.data_dir)),
            components_dir: absolutize(cwd, Path::new(&config.components_dir)),
            docs_root: config.docs_path(cwd),
            examples_root: absolutize(cwd, Path::new(&config.examples_dir)),
            include_extensions: config
                .include_extensions
                .iter()
                .map(|ext| normalize_extension(ext))
                .collect(),
            format: config.output_format().to_string(),
            strip_prefix: config.strip_prefix().map(String::from),
            link_prefix: config.see_also.link_prefix.clone(),
            link_base: link_base.to_string(),
            marker_tags: config.marker_tags.clone(),
            debug: config.debug,
        })
    }
}

/// `MD` / `md` / `.md` all become `.md`.
fn normalize_extension(ext: &str) -> String {
    format!(".{}", ext.trim_start_matches('.').to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LlmConfig {
        LlmConfig {
            base_url: Some("https://example.com/llm".into()),
            repo: Some("https://github.com/user/repo".into()),
            pkg_name: Some("Example".into()),
            include_extensions: vec!["MD".into(), ".svx".into()],
            ..LlmConfig::default()
        }
    }

    #[test]
    fn context_resolves_roots_against_cwd() {
        let ctx = TransformContext::from_config(&config(), Path::new("/work")).expect("ctx");
        assert_eq!(ctx.docs_root, PathBuf::from("/work/src/routes"));
        assert_eq!(ctx.examples_root, PathBuf::from("/work/src/routes/docs-examples"));
        assert_eq!(ctx.data_dir, PathBuf::from("/work/src/routes/component-data"));
        assert_eq!(ctx.include_extensions, vec![".md".to_string(), ".svx".to_string()]);
        assert_eq!(ctx.strip_prefix.as_deref(), Some("docs"));
    }

    #[test]
    fn link_base_defaults_to_site_url() {
        let ctx = TransformContext::from_config(&config(), Path::new("/work")).expect("ctx");
        assert_eq!(ctx.link_base, "https://example.com/llm/");
        assert_eq!(ctx.link_prefix, "/docs/");

        let mut custom = config();
        custom.see_also.base_url = Some("https://cdn.example.com/pages".into());
        let ctx = TransformContext::from_config(&custom, Path::new("/work")).expect("ctx");
        assert_eq!(ctx.link_base, "https://cdn.example.com/pages/");
    }
}
