//! Source discovery and output housekeeping.
//!
//! Finds the Markdown sources under the configured source directory, narrows
//! them to the directories/files requested on the command line, and prepares
//! the output directory before a run (see [`clean`]).

pub mod clean;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use docllm_shared::{DocLlmError, Result, normalize_path, strip_extension, to_slash};

pub use clean::{
    clean_directory, clean_directory_completely, clean_specific_files, output_files_to_clean,
};

/// Extension of discovered source documents.
const SOURCE_EXTENSION: &str = "md";

/// Characters never valid in a target path.
const INVALID_TARGET_CHARS: &[char] = &['<', '>', '"', '|', '?', '*'];

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// Every `*.md` file below `src_dir`, sorted by path.
///
/// A missing source directory is a configuration error. Unreadable entries
/// below it are logged and skipped.
#[instrument(skip_all, fields(src_dir = %src_dir.display()))]
pub fn discover_sources(src_dir: &Path) -> Result<Vec<PathBuf>> {
    if !src_dir.is_dir() {
        return Err(DocLlmError::config(format!(
            "Source directory not found: {}",
            src_dir.display()
        )));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(src_dir).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        let is_source = entry
            .path()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(SOURCE_EXTENSION));
        if is_source {
            files.push(entry.into_path());
        }
    }

    files.sort();
    debug!(count = files.len(), "discovered source files");
    Ok(files)
}

// ---------------------------------------------------------------------------
// Selective runs
// ---------------------------------------------------------------------------

/// Directories and files requested on the command line, relative to the
/// source directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Targets {
    /// Every file below one of these directories is selected.
    pub directories: Vec<String>,
    /// Individual files, with or without their extension.
    pub files: Vec<String>,
}

impl Targets {
    /// No targets means a full run.
    pub fn is_empty(&self) -> bool {
        self.directories.is_empty() && self.files.is_empty()
    }

    /// Reject blank targets and targets containing `< > " | ? *`.
    pub fn validate(&self) -> Result<()> {
        for target in self.directories.iter().chain(&self.files) {
            if target.trim().is_empty() {
                return Err(DocLlmError::validation("Empty path provided"));
            }
            if target.contains(INVALID_TARGET_CHARS) {
                return Err(DocLlmError::validation(format!(
                    "Invalid characters in path: {target}"
                )));
            }
        }
        Ok(())
    }
}

/// Narrow `files` to the requested targets.
///
/// Returns `files` unchanged for an empty target set. The result keeps the
/// input order and contains each file once even when several targets match it.
pub fn filter_files(files: &[PathBuf], targets: &Targets, src_dir: &Path) -> Vec<PathBuf> {
    if targets.is_empty() {
        return files.to_vec();
    }

    let directories: Vec<String> = targets.directories.iter().map(|d| normalize_target(d)).collect();
    let wanted_files: Vec<String> = targets.files.iter().map(|f| normalize_target(f)).collect();

    let mut seen = BTreeSet::new();
    let mut selected = Vec::new();

    for file in files {
        let Ok(relative) = file.strip_prefix(src_dir) else {
            continue;
        };
        let relative = to_slash(relative);

        let in_directory = directories
            .iter()
            .any(|dir| relative.starts_with(&format!("{dir}/")));
        let is_target_file = wanted_files.iter().any(|target| {
            relative == *target
                || strip_extension(&relative) == target
                || strip_extension(&relative) == strip_extension(target)
        });

        if (in_directory || is_target_file) && seen.insert(file.clone()) {
            debug!(path = %relative, "matched target");
            selected.push(file.clone());
        }
    }

    if selected.is_empty() {
        warn!("no files matched the specified directories or files; paths are relative to src_dir");
    }
    selected
}

/// `./forms\\inputs/` → `forms/inputs`.
fn normalize_target(target: &str) -> String {
    let slashed = target.trim().replace('\\', "/");
    to_slash(&normalize_path(Path::new(&slashed)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("docllm-discovery-test-{}", uuid::Uuid::now_v7()))
    }

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "x").unwrap();
    }

    fn targets(directories: &[&str], files: &[&str]) -> Targets {
        Targets {
            directories: directories.iter().map(|s| s.to_string()).collect(),
            files: files.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn sources() -> (PathBuf, Vec<PathBuf>) {
        let src = PathBuf::from("/site/src/routes/docs");
        let files = [
            "components/alert.md",
            "components/badge.md",
            "forms/inputs/number-input.md",
            "forms/toggle.md",
            "pages/introduction.md",
        ]
        .iter()
        .map(|rel| src.join(rel))
        .collect();
        (src, files)
    }

    #[test]
    fn test_discover_sources_finds_markdown_sorted() {
        let dir = temp_dir();
        touch(&dir, "forms/toggle.md");
        touch(&dir, "components/alert.md");
        touch(&dir, "components/Alert.svelte");
        touch(&dir, "pages/README.MD");

        let found = discover_sources(&dir).unwrap();
        let rel: Vec<String> = found
            .iter()
            .map(|p| to_slash(p.strip_prefix(&dir).unwrap()))
            .collect();
        assert_eq!(rel, vec!["components/alert.md", "forms/toggle.md", "pages/README.MD"]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_discover_sources_missing_dir_is_error() {
        let err = discover_sources(&temp_dir()).unwrap_err();
        assert!(matches!(err, DocLlmError::Config { .. }));
    }

    #[test]
    fn test_filter_without_targets_keeps_everything() {
        let (src, files) = sources();
        assert_eq!(filter_files(&files, &Targets::default(), &src), files);
    }

    #[test]
    fn test_filter_by_directory_is_recursive() {
        let (src, files) = sources();
        let selected = filter_files(&files, &targets(&["forms"], &[]), &src);
        assert_eq!(
            selected,
            vec![src.join("forms/inputs/number-input.md"), src.join("forms/toggle.md")]
        );
    }

    #[test]
    fn test_filter_by_file_with_or_without_extension() {
        let (src, files) = sources();
        let selected = filter_files(
            &files,
            &targets(&[], &["components/alert", "forms/toggle.md", "pages/introduction.txt"]),
            &src,
        );
        assert_eq!(
            selected,
            vec![
                src.join("components/alert.md"),
                src.join("forms/toggle.md"),
                src.join("pages/introduction.md"),
            ]
        );
    }

    #[test]
    fn test_filter_deduplicates_overlapping_targets() {
        let (src, files) = sources();
        let selected = filter_files(
            &files,
            &targets(&["./components/", "components"], &["components\\alert"]),
            &src,
        );
        assert_eq!(
            selected,
            vec![src.join("components/alert.md"), src.join("components/badge.md")]
        );
    }

    #[test]
    fn test_filter_without_matches_is_empty() {
        let (src, files) = sources();
        assert!(filter_files(&files, &targets(&["blocks"], &[]), &src).is_empty());
    }

    #[test]
    fn test_validate_rejects_invalid_characters() {
        assert!(targets(&["forms"], &["components/alert"]).validate().is_ok());
        assert!(targets(&["forms*"], &[]).validate().is_err());
        assert!(targets(&[], &["a|b"]).validate().is_err());
        assert!(targets(&[" "], &[]).validate().is_err());
    }
}
