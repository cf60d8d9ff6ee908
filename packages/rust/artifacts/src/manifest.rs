//! `llms.txt` rendering.

use tracing::instrument;

use docllm_shared::{MANIFEST_VERSION, ProcessedDocument, Result};

use crate::SiteInfo;

/// Render the manifest.
///
/// ```text
/// # <pkg_name>
///
/// version: 1
///
/// full-context: <bundle url>
///
/// /docs: <page url>
/// ...
///
/// repo: <repo url>
/// ```
///
/// Page lines are sorted by relative path, so the output does not depend on
/// the order of `docs`.
#[instrument(skip_all, fields(documents = docs.len()))]
pub fn build_manifest(docs: &[ProcessedDocument], site: &SiteInfo) -> Result<String> {
    let mut paths: Vec<&str> = docs.iter().map(|d| d.relative_path.as_str()).collect();
    paths.sort_unstable();
    paths.dedup();

    let mut out = format!("# {}\n\n", site.pkg_name);
    out.push_str(&format!("version: {MANIFEST_VERSION}\n\n"));
    out.push_str(&format!("full-context: {}\n\n", site.bundle_url()?));

    for path in paths {
        out.push_str(&format!("/docs: {}\n", site.page_url(path)));
    }

    out.push_str(&format!("\nrepo: {}\n", site.repo));
    Ok(out)
}
