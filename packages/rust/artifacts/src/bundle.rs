//! `context-full.txt` rendering.

use std::io;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, instrument, warn};

use docllm_shared::ProcessedDocument;

use crate::SiteInfo;
use crate::category::group_by_category;

const BANNER_RULE: &str =
    "================================================================================";

/// Rendered bundle plus the documents that could not be read back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bundle {
    pub text: String,
    /// Relative paths of documents left out of the bundle.
    pub skipped: Vec<String>,
}

/// Concatenate every document's output, grouped and ordered by category.
///
/// Each document's text comes from `read(output_path)`. A read failure is
/// logged and the document is recorded in [`Bundle::skipped`]; the bundle is
/// still produced.
#[instrument(skip_all, fields(documents = docs.len()))]
pub fn build_bundle(
    docs: &[ProcessedDocument],
    site: &SiteInfo,
    order: &[String],
    generated_at: DateTime<Utc>,
    mut read: impl FnMut(&Path) -> io::Result<String>,
) -> Bundle {
    let mut text = format!("# {} Documentation - Full Context\n\n", site.pkg_name);
    text.push_str(&format!(
        "Generated: {}\n",
        generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    ));
    text.push_str(&format!("Source: {}\n", site.repo));
    text.push_str(&format!("Documents: {}\n\n", docs.len()));

    let mut skipped = Vec::new();

    for group in group_by_category(docs, order) {
        text.push_str(&format!(
            "{BANNER_RULE}\n# {}\n{BANNER_RULE}\n\n",
            group.name.to_uppercase()
        ));

        for doc in group.documents {
            match read(&doc.output_path) {
                Ok(content) => {
                    text.push_str(&format!("<!-- Source: {} -->\n\n", doc.relative_path));
                    text.push_str(content.trim_end());
                    text.push_str("\n\n---\n\n");
                }
                Err(e) => {
                    warn!(
                        path = %doc.output_path.display(),
                        error = %e,
                        "skipping unreadable document in bundle"
                    );
                    skipped.push(doc.relative_path.clone());
                }
            }
        }
    }

    debug!(bytes = text.len(), skipped = skipped.len(), "bundle rendered");
    Bundle { text, skipped }
}
