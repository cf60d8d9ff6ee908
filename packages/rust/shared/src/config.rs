//! Converter configuration.
//!
//! The project config lives at `./llm.config.toml` (overridable from the CLI).
//! Missing keys fall back to defaults, except the three required keys that
//! describe where the output is published.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DocLlmError, Result};
use crate::paths::absolutize;

/// Default configuration file name, resolved against the working directory.
pub const CONFIG_FILE_NAME: &str = "llm.config.toml";

// ---------------------------------------------------------------------------
// Config structs (matching llm.config.toml schema)
// ---------------------------------------------------------------------------

/// Top-level converter config, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Source directory scanned for Markdown files.
    #[serde(default = "default_src_dir")]
    pub src_dir: String,

    /// Output directory for per-page files.
    #[serde(default = "default_out_dir")]
    pub out_dir: String,

    /// Output file extension (without the dot).
    #[serde(default = "default_format")]
    pub format: String,

    /// Directory holding `<Component>.json` sidecar records.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Directory whose per-component folders list related component files.
    #[serde(default = "default_components_dir")]
    pub components_dir: String,

    /// Section titles to drop. Accepts a single string or a list.
    #[serde(default, skip_serializing_if = "IgnoreList::is_empty")]
    pub ignore: IgnoreList,

    /// Path segment removed from output paths. Empty disables stripping.
    #[serde(default = "default_strip_prefix")]
    pub strip_prefix: String,

    /// Wipe the whole output directory (true) or only same-format files (false).
    #[serde(default)]
    pub clean_out_dir: bool,

    /// Directory names preserved during a full wipe.
    #[serde(default)]
    pub ignore_dirs: Vec<String>,

    /// Public URL where the contents of `out_dir` are served.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Source repository URL.
    #[serde(default)]
    pub repo: Option<String>,

    /// Display name of the documented package.
    #[serde(default)]
    pub pkg_name: Option<String>,

    /// Category order for the concatenated bundle.
    #[serde(default = "default_context_order")]
    pub context_order: Vec<String>,

    /// Docs root: base for output-relative paths and include sandboxing.
    #[serde(default = "default_docs_dir")]
    pub docs_dir: String,

    /// Examples root: included files must resolve inside it.
    #[serde(default = "default_examples_dir")]
    pub examples_dir: String,

    /// Source extensions for which include directives are expanded.
    #[serde(default = "default_include_extensions")]
    pub include_extensions: Vec<String>,

    /// Self-closing marker tags removed from the final output.
    #[serde(default = "default_marker_tags")]
    pub marker_tags: Vec<String>,

    /// Maximum number of documents processed concurrently.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Extra diagnostics and debug-level logging.
    #[serde(default)]
    pub debug: bool,

    /// "See also" link rewriting.
    #[serde(default)]
    pub see_also: SeeAlsoConfig,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            src_dir: default_src_dir(),
            out_dir: default_out_dir(),
            format: default_format(),
            data_dir: default_data_dir(),
            components_dir: default_components_dir(),
            ignore: IgnoreList::default(),
            strip_prefix: default_strip_prefix(),
            clean_out_dir: false,
            ignore_dirs: Vec::new(),
            base_url: None,
            repo: None,
            pkg_name: None,
            context_order: default_context_order(),
            docs_dir: default_docs_dir(),
            examples_dir: default_examples_dir(),
            include_extensions: default_include_extensions(),
            marker_tags: default_marker_tags(),
            concurrency: default_concurrency(),
            debug: false,
            see_also: SeeAlsoConfig::default(),
        }
    }
}

fn default_src_dir() -> String {
    "./src/routes/docs".into()
}
fn default_out_dir() -> String {
    "./static/llm".into()
}
fn default_format() -> String {
    "md".into()
}
fn default_data_dir() -> String {
    "./src/routes/component-data".into()
}
fn default_components_dir() -> String {
    "./src/lib".into()
}
fn default_strip_prefix() -> String {
    "docs".into()
}
fn default_context_order() -> Vec<String> {
    ["pages", "components", "forms", "typography", "extend", "utilities"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_docs_dir() -> String {
    "src/routes".into()
}
fn default_examples_dir() -> String {
    "src/routes/docs-examples".into()
}
fn default_include_extensions() -> Vec<String> {
    vec![".md".into()]
}
fn default_marker_tags() -> Vec<String> {
    vec!["GitHubCompoLinks".into()]
}
fn default_concurrency() -> usize {
    4
}

/// `ignore = "Title"` or `ignore = ["A", "B"]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IgnoreList {
    #[default]
    None,
    One(String),
    Many(Vec<String>),
}

impl IgnoreList {
    /// Whether no title is configured.
    pub fn is_empty(&self) -> bool {
        self.to_vec().is_empty()
    }

    /// Normalize to a list, dropping empty titles.
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Self::None => Vec::new(),
            Self::One(title) if title.is_empty() => Vec::new(),
            Self::One(title) => vec![title.clone()],
            Self::Many(titles) => titles.iter().filter(|t| !t.is_empty()).cloned().collect(),
        }
    }
}

/// `[see_also]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeeAlsoConfig {
    /// Leading link prefix replaced by `base_url`.
    #[serde(default = "default_link_prefix")]
    pub link_prefix: String,

    /// Canonical base substituted for `link_prefix`. Defaults to the
    /// top-level `base_url`.
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for SeeAlsoConfig {
    fn default() -> Self {
        Self {
            link_prefix: default_link_prefix(),
            base_url: None,
        }
    }
}

fn default_link_prefix() -> String {
    "/docs/".into()
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

impl LlmConfig {
    /// Check required fields and value ranges before anything touches disk.
    ///
    /// Every missing required field is reported at once.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("base_url", &self.base_url),
            ("repo", &self.repo),
            ("pkg_name", &self.pkg_name),
        ];
        let missing: Vec<String> = required
            .iter()
            .filter(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
            .map(|(name, _)| (*name).to_string())
            .collect();

        if !missing.is_empty() {
            return Err(DocLlmError::MissingFields(missing));
        }

        self.site_url()?;

        if let Some(base) = &self.see_also.base_url {
            Url::parse(base).map_err(|e| {
                DocLlmError::config(format!("see_also.base_url '{base}' is not a valid URL: {e}"))
            })?;
        }

        if self.concurrency == 0 {
            return Err(DocLlmError::config("concurrency must be at least 1"));
        }

        if self.format.trim_start_matches('.').is_empty() {
            return Err(DocLlmError::config("format must not be empty"));
        }

        Ok(())
    }

    /// The public base URL, normalized to end with `/` so relative paths join
    /// underneath it.
    pub fn site_url(&self) -> Result<Url> {
        let raw = self
            .base_url
            .as_deref()
            .ok_or_else(|| DocLlmError::MissingFields(vec!["base_url".into()]))?;
        parse_base_url(raw)
    }

    /// Output extension without its leading dot.
    pub fn output_format(&self) -> &str {
        self.format.trim_start_matches('.')
    }

    /// Strip prefix, or `None` when disabled.
    pub fn strip_prefix(&self) -> Option<&str> {
        Some(self.strip_prefix.as_str()).filter(|p| !p.trim().is_empty())
    }

    /// Absolute output directory.
    pub fn out_path(&self, cwd: &Path) -> PathBuf {
        absolutize(cwd, Path::new(&self.out_dir))
    }

    /// Absolute source directory.
    pub fn src_path(&self, cwd: &Path) -> PathBuf {
        absolutize(cwd, Path::new(&self.src_dir))
    }

    /// Absolute docs root.
    pub fn docs_path(&self, cwd: &Path) -> PathBuf {
        absolutize(cwd, Path::new(&self.docs_dir))
    }
}

/// Parse a base URL and make sure its path ends with `/`.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&with_slash)
        .map_err(|e| DocLlmError::config(format!("base_url '{raw}' is not a valid URL: {e}")))
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the config from `path`. Returns defaults if the file does not exist.
pub fn load_config(path: &Path) -> Result<LlmConfig> {
    if !path.exists() {
        tracing::info!(?path, "no config file found, using default configuration");
        return Ok(LlmConfig::default());
    }

    load_config_from(path)
}

/// Load the config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<LlmConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DocLlmError::io(path, e))?;

    let config: LlmConfig = toml::from_str(&content).map_err(|e| {
        DocLlmError::config(format!("failed to parse {}: {e}", path.display()))
    })?;

    tracing::info!(?path, "loaded configuration");
    Ok(config)
}

/// Write a default config file at `path`, refusing to overwrite one.
/// Required keys are filled with placeholders to be edited.
pub fn init_config(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return Err(DocLlmError::config(format!(
            "{} already exists, not overwriting",
            path.display()
        )));
    }

    let config = LlmConfig {
        base_url: Some("https://example.com/llm".into()),
        repo: Some("https://github.com/owner/repo".into()),
        pkg_name: Some("My Package".into()),
        ..LlmConfig::default()
    };
    let content =
        toml::to_string_pretty(&config).map_err(|e| DocLlmError::config(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| DocLlmError::io(path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> LlmConfig {
        LlmConfig {
            base_url: Some("https://example.com/llm".into()),
            repo: Some("https://github.com/user/repo".into()),
            pkg_name: Some("Example".into()),
            ..LlmConfig::default()
        }
    }

    #[test]
    fn defaults_match_documented_values() {
        let config: LlmConfig = toml::from_str("").expect("parse empty");
        assert_eq!(config.src_dir, "./src/routes/docs");
        assert_eq!(config.out_dir, "./static/llm");
        assert_eq!(config.format, "md");
        assert_eq!(config.strip_prefix, "docs");
        assert_eq!(config.context_order[0], "pages");
        assert_eq!(config.include_extensions, vec![".md".to_string()]);
        assert_eq!(config.concurrency, 4);
        assert!(config.ignore.to_vec().is_empty());
    }

    #[test]
    fn ignore_accepts_string_or_list() {
        let one: LlmConfig = toml::from_str(r#"ignore = "GitHub Links""#).expect("parse");
        assert_eq!(one.ignore.to_vec(), vec!["GitHub Links".to_string()]);

        let many: LlmConfig =
            toml::from_str(r#"ignore = ["GitHub Links", "LLM Link"]"#).expect("parse");
        assert_eq!(many.ignore.to_vec().len(), 2);
    }

    #[test]
    fn validation_lists_every_missing_field() {
        let err = LlmConfig::default().validate().unwrap_err();
        match err {
            DocLlmError::MissingFields(fields) => {
                assert_eq!(fields, vec!["base_url", "repo", "pkg_name"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn validation_treats_blank_as_missing() {
        let config = LlmConfig {
            repo: Some("   ".into()),
            ..complete()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("repo"));
        assert!(!err.to_string().contains("pkg_name"));
    }

    #[test]
    fn validation_rejects_bad_base_url_and_zero_concurrency() {
        let bad_url = LlmConfig {
            base_url: Some("not a url".into()),
            ..complete()
        };
        assert!(bad_url.validate().is_err());

        let zero = LlmConfig {
            concurrency: 0,
            ..complete()
        };
        assert!(zero.validate().unwrap_err().to_string().contains("concurrency"));

        assert!(complete().validate().is_ok());
    }

    #[test]
    fn site_url_gets_trailing_slash() {
        let url = complete().site_url().expect("url");
        assert_eq!(url.as_str(), "https://example.com/llm/");
        assert_eq!(url.join("components/alert.md").unwrap().as_str(),
            "https://example.com/llm/components/alert.md");
    }

    #[test]
    fn config_roundtrip() {
        let config = complete();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: LlmConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.pkg_name.as_deref(), Some("Example"));
        assert_eq!(parsed.see_also.link_prefix, "/docs/");
    }

    #[test]
    fn full_config_file_parses() {
        let toml_str = r#"
src_dir = "./docs"
out_dir = "./public/llm"
format = "txt"
ignore = ["Installation"]
strip_prefix = ""
clean_out_dir = true
ignore_dirs = ["keep"]
base_url = "https://test.com/llm"
repo = "https://github.com/test/repo"
pkg_name = "Test Package"
context_order = ["components"]

[see_also]
link_prefix = "/guide/"
base_url = "https://test.com/llm/guide"
"#;
        let config: LlmConfig = toml::from_str(toml_str).expect("parse");
        assert!(config.validate().is_ok());
        assert_eq!(config.output_format(), "txt");
        assert_eq!(config.strip_prefix(), None);
        assert!(config.clean_out_dir);
        assert_eq!(config.see_also.link_prefix, "/guide/");
    }

    #[test]
    fn paths_resolve_against_working_directory() {
        let config = complete();
        assert_eq!(
            config.out_path(Path::new("/work")),
            PathBuf::from("/work/static/llm")
        );
        assert_eq!(
            config.docs_path(Path::new("/work")),
            PathBuf::from("/work/src/routes")
        );
    }
}
