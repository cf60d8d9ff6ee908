//! Output writer.
//!
//! Every file the run produces is fully rendered in memory and then written
//! atomically (temp file in the same directory, then rename), so a reader never
//! sees a partially written page, manifest or bundle.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use docllm_artifacts::{BUNDLE_FILE_NAME, MANIFEST_FILE_NAME, SiteInfo, build_bundle, build_manifest};
use docllm_shared::{DocLlmError, ProcessedDocument, Result};

/// Locations and leftovers of the run-level artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactReport {
    /// Path of the written `llms.txt`.
    pub manifest_path: PathBuf,
    /// Path of the written `context-full.txt`.
    pub bundle_path: PathBuf,
    /// Documents that could not be read back into the bundle.
    pub bundle_skipped: Vec<String>,
}

/// Write `content` to `path` via a sibling temp file, creating parent
/// directories as needed.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| DocLlmError::validation(format!("no parent directory: {}", path.display())))?;
    std::fs::create_dir_all(parent).map_err(|e| DocLlmError::io(parent, e))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp = parent.join(format!(".{file_name}.tmp"));

    std::fs::write(&temp, content).map_err(|e| DocLlmError::io(&temp, e))?;
    std::fs::rename(&temp, path).map_err(|e| DocLlmError::io(path, e))?;

    debug!(path = %path.display(), size = content.len(), "wrote file");
    Ok(())
}

/// Directory receiving `llms.txt` and `context-full.txt`: the parent of the
/// output directory, or the output directory itself when it has none.
pub fn artifact_dir(out_dir: &Path) -> PathBuf {
    out_dir
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(out_dir)
        .to_path_buf()
}

/// Render and write the manifest and the bundle for `docs`.
///
/// The bundle is assembled from the page files already on disk.
#[instrument(skip_all, fields(dir = %dir.display(), documents = docs.len()))]
pub fn assemble_artifacts(
    dir: &Path,
    docs: &[ProcessedDocument],
    site: &SiteInfo,
    order: &[String],
    generated_at: DateTime<Utc>,
) -> Result<ArtifactReport> {
    let manifest = build_manifest(docs, site)?;
    let manifest_path = dir.join(MANIFEST_FILE_NAME);
    write_atomic(&manifest_path, &manifest)?;

    let bundle = build_bundle(docs, site, order, generated_at, |path| std::fs::read_to_string(path));
    let bundle_path = dir.join(BUNDLE_FILE_NAME);
    write_atomic(&bundle_path, &bundle.text)?;

    info!(
        manifest = %manifest_path.display(),
        bundle = %bundle_path.display(),
        skipped = bundle.skipped.len(),
        "artifacts written"
    );

    Ok(ArtifactReport {
        manifest_path,
        bundle_path,
        bundle_skipped: bundle.skipped,
    })
}
