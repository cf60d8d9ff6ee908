//! `{#include <path>}` expansion with sandbox containment.
//!
//! Included files live in a tree parallel to the docs:
//! `src/routes/docs/forms/toggle.md` including `Default.svelte` reads
//! `<examples_root>/forms/toggle/Default.svelte`. Every resolved path must stay
//! inside the examples root. Failures never abort the document: the directive
//! is replaced by a visible HTML comment instead.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use docllm_shared::{TransformContext, normalize_path};

use crate::patterns::INCLUDE_RE;
use crate::source::FileSource;

/// Expanded body plus the files it pulled in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludeResult {
    /// Body with every directive replaced by content or a diagnostic.
    pub content: String,
    /// Absolute paths of successfully included files, deduplicated.
    pub dependencies: BTreeSet<PathBuf>,
}

/// Expand every include directive in `body`.
///
/// `source_path` must be absolute. Documents whose extension is not in
/// `ctx.include_extensions`, or that live outside `ctx.docs_root`, are
/// returned unchanged.
pub fn resolve_includes(
    body: &str,
    source_path: &Path,
    ctx: &TransformContext,
    fs: &dyn FileSource,
) -> IncludeResult {
    let unchanged = || IncludeResult {
        content: body.to_string(),
        dependencies: BTreeSet::new(),
    };

    if !INCLUDE_RE.is_match(body) || !has_include_extension(source_path, ctx) {
        return unchanged();
    }

    let source_path = normalize_path(source_path);
    let (Some(dir), Some(stem)) = (source_path.parent(), source_path.file_stem()) else {
        return unchanged();
    };
    let Ok(relative_dir) = dir.strip_prefix(&ctx.docs_root) else {
        debug!(path = %source_path.display(), "document outside docs root, includes not expanded");
        return unchanged();
    };

    let target_dir = ctx
        .examples_root
        .join(category_path(relative_dir))
        .join(stem);

    let mut dependencies = BTreeSet::new();
    let content = INCLUDE_RE
        .replace_all(body, |caps: &regex::Captures| {
            let token = &caps[1];
            match resolve_one(token, &target_dir, ctx, fs) {
                Ok((path, text)) => {
                    dependencies.insert(path);
                    text
                }
                Err(diagnostic) => diagnostic,
            }
        })
        .into_owned();

    IncludeResult {
        content,
        dependencies,
    }
}

/// Resolve and read one directive target, or produce the inline diagnostic.
fn resolve_one(
    token: &str,
    target_dir: &Path,
    ctx: &TransformContext,
    fs: &dyn FileSource,
) -> Result<(PathBuf, String), String> {
    if is_absolute_token(token) {
        warn!(%token, "absolute include paths are not allowed");
        return Err(format!("<!-- Absolute include paths are not allowed: {token} -->"));
    }

    let full_path = normalize_path(&target_dir.join(token));

    if full_path.strip_prefix(&ctx.examples_root).is_err() {
        warn!(path = %full_path.display(), "include path escapes examples root");
        return Err(format!("<!-- Include path escapes examples root: {token} -->"));
    }

    if !fs.is_file(&full_path) {
        warn!(path = %full_path.display(), "include file not found");
        return Err(format!(
            "<!-- File not found: {token} (looked in {}) -->",
            full_path.display()
        ));
    }

    match fs.read_to_string(&full_path) {
        Ok(text) => {
            debug!(path = %full_path.display(), "included file");
            Ok((full_path, text.trim_end().to_string()))
        }
        Err(e) => {
            warn!(path = %full_path.display(), error = %e, "failed to read include file");
            Err(format!("<!-- Error including file: {token} -->"))
        }
    }
}

/// Category path of a document directory relative to the docs root: the
/// segments after the first `docs` segment, or all segments if there is none.
fn category_path(relative_dir: &Path) -> PathBuf {
    let parts: Vec<_> = relative_dir
        .components()
        .map(|c| c.as_os_str())
        .filter(|c| !c.is_empty())
        .collect();
    let start = parts
        .iter()
        .position(|p| *p == "docs")
        .map_or(0, |i| i + 1);
    parts[start..].iter().collect()
}

fn has_include_extension(path: &Path, ctx: &TransformContext) -> bool {
    let Some(ext) = path.extension() else {
        return false;
    };
    let ext = format!(".{}", ext.to_string_lossy().to_lowercase());
    ctx.include_extensions.iter().any(|allowed| *allowed == ext)
}

/// Absolute on this platform, or rooted in either separator style.
fn is_absolute_token(token: &str) -> bool {
    Path::new(token).is_absolute() || token.starts_with('/') || token.starts_with('\\')
}
