//! Output directory cleanup before a run.
//!
//! Three strategies, picked by the caller: a full wipe that preserves named
//! directories, a wipe of same-extension files only, and removal of just the
//! outputs a selective run is about to regenerate.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use docllm_shared::{DocLlmError, Result, output_relative_path};

/// Recursively delete files whose name ends in `.<format>` (case-insensitive).
///
/// Directories are kept. A missing directory is created.
#[instrument(skip_all, fields(dir = %dir.display(), format))]
pub fn clean_directory(dir: &Path, format: &str) -> Result<usize> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| DocLlmError::io(dir, e))?;
        return Ok(0);
    }

    let suffix = format!(".{}", format.trim_start_matches('.').to_lowercase());
    let removed = remove_matching(dir, &suffix)?;
    debug!(removed, "cleaned output files");
    Ok(removed)
}

fn remove_matching(dir: &Path, suffix: &str) -> Result<usize> {
    let mut removed = 0;
    for entry in fs::read_dir(dir).map_err(|e| DocLlmError::io(dir, e))? {
        let entry = entry.map_err(|e| DocLlmError::io(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| DocLlmError::io(&path, e))?;

        if file_type.is_dir() {
            removed += remove_matching(&path, suffix)?;
        } else if entry
            .file_name()
            .to_string_lossy()
            .to_lowercase()
            .ends_with(suffix)
        {
            fs::remove_file(&path).map_err(|e| DocLlmError::io(&path, e))?;
            debug!(path = %path.display(), "removed file");
            removed += 1;
        }
    }
    Ok(removed)
}

/// Remove everything under `dir` except directories named in `ignore_dirs`.
///
/// Returns `true` when `dir` ended up empty, `false` when it still holds
/// preserved content. Subdirectories are removed only once empty. A missing
/// directory is created. Refuses to operate on a filesystem root.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn clean_directory_completely(dir: &Path, ignore_dirs: &[String]) -> Result<bool> {
    if dir.parent().is_none() {
        return Err(DocLlmError::validation(format!(
            "Refusing to wipe filesystem root: {}",
            dir.display()
        )));
    }
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| DocLlmError::io(dir, e))?;
        return Ok(true);
    }
    wipe(dir, ignore_dirs)
}

fn wipe(dir: &Path, ignore_dirs: &[String]) -> Result<bool> {
    let mut preserved = false;

    for entry in fs::read_dir(dir).map_err(|e| DocLlmError::io(dir, e))? {
        let entry = entry.map_err(|e| DocLlmError::io(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| DocLlmError::io(&path, e))?;

        if !file_type.is_dir() {
            fs::remove_file(&path).map_err(|e| DocLlmError::io(&path, e))?;
            continue;
        }

        let name = entry.file_name();
        if ignore_dirs.iter().any(|ignored| name == ignored.as_str()) {
            debug!(path = %path.display(), "preserving ignored directory");
            preserved = true;
            continue;
        }

        if wipe(&path, ignore_dirs)? {
            fs::remove_dir(&path).map_err(|e| DocLlmError::io(&path, e))?;
        } else {
            debug!(path = %path.display(), "keeping directory with preserved content");
            preserved = true;
        }
    }

    Ok(!preserved)
}

/// Output files a selective run will regenerate, one per input.
pub fn output_files_to_clean(
    inputs: &[PathBuf],
    docs_root: &Path,
    src_root: &Path,
    out_dir: &Path,
    strip_prefix: Option<&str>,
    format: &str,
) -> Vec<PathBuf> {
    inputs
        .iter()
        .map(|input| {
            out_dir.join(output_relative_path(
                input,
                docs_root,
                src_root,
                strip_prefix,
                format,
            ))
        })
        .collect()
}

/// Delete each of `paths`; files that do not exist are skipped.
pub fn clean_specific_files(paths: &[PathBuf]) -> Result<usize> {
    let mut removed = 0;
    for path in paths {
        match fs::remove_file(path) {
            Ok(()) => {
                debug!(path = %path.display(), "removed file");
                removed += 1;
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(DocLlmError::io(path, e)),
        }
    }
    Ok(removed)
}
