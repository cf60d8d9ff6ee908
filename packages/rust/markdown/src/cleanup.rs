//! Small textual cleanup passes.
//!
//! Each pass is a function `&str -> String` with no I/O.

use regex::Regex;
use tracing::warn;

use crate::patterns::{SVELTE_FENCE_RE, top_level_scripts};

// ---------------------------------------------------------------------------
// Fence normalization
// ---------------------------------------------------------------------------

/// Reduce every `svelte` fence opener to the bare language tag.
///
/// `` ```svelte example hideScript `` becomes `` ```svelte ``; fences in any
/// other language are left alone.
pub fn normalize_fences(md: &str) -> String {
    SVELTE_FENCE_RE.replace_all(md, "```svelte").into_owned()
}

// ---------------------------------------------------------------------------
// Script removal
// ---------------------------------------------------------------------------

/// Remove the first top-level `<script>` block and the whitespace that
/// follows it.
///
/// The block only carries page metadata (see [`crate::see_also`]), so it must
/// not reach the output. Scripts inside fenced code and later script blocks
/// are left untouched.
pub fn remove_script_block(md: &str) -> String {
    match top_level_scripts(md).next().and_then(|caps| caps.get(0)) {
        Some(block) => format!("{}{}", &md[..block.start()], &md[block.end()..]),
        None => md.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Marker tags
// ---------------------------------------------------------------------------

/// Remove self-closing marker components such as `<GitHubCompoLinks />`.
pub fn strip_marker_tags(md: &str, tags: &[String]) -> String {
    let mut result = md.to_string();
    for tag in tags.iter().filter(|t| !t.is_empty()) {
        let pattern = format!(r"<{}\s*/>", regex::escape(tag));
        match Regex::new(&pattern) {
            Ok(re) => result = re.replace_all(&result, "").into_owned(),
            Err(e) => warn!(%tag, error = %e, "skipping unusable marker tag"),
        }
    }
    result
}
