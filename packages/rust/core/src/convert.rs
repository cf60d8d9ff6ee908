//! End-to-end `convert` run: clean → discover → transform → artifacts.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use docllm_artifacts::SiteInfo;
use docllm_discovery::{
    Targets, clean_directory, clean_directory_completely, clean_specific_files,
    discover_sources, filter_files, output_files_to_clean,
};
use docllm_shared::{DocLlmError, LlmConfig, ProcessedDocument, Result, TransformContext};

use crate::assembler::{ArtifactReport, artifact_dir, assemble_artifacts};
use crate::pipeline::{FailedDocument, OutputLayout, ProgressReporter, process_files};

/// Per-invocation options that are not part of the configuration file.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Restrict the run to these directories/files.
    pub targets: Targets,
    /// Leave the output directory untouched before writing.
    pub skip_clean: bool,
}

/// Everything a caller needs to summarize a run.
#[derive(Debug, Clone)]
pub struct ConvertReport {
    /// Successfully processed documents, sorted by relative path.
    pub processed: Vec<ProcessedDocument>,
    /// Documents that failed and were left out.
    pub failed: Vec<FailedDocument>,
    /// Absolute output directory.
    pub out_dir: PathBuf,
    /// Manifest/bundle locations; `None` when nothing was processed.
    pub artifacts: Option<ArtifactReport>,
    /// Whether the run was restricted to targets.
    pub selective: bool,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Run a full or selective conversion.
///
/// Configuration and target errors abort before anything touches disk.
/// Per-document failures are reported in [`ConvertReport::failed`].
#[instrument(skip_all, fields(cwd = %cwd.display(), selective = !opts.targets.is_empty()))]
pub async fn convert(
    config: &LlmConfig,
    cwd: &Path,
    opts: &ConvertOptions,
    progress: &dyn ProgressReporter,
) -> Result<ConvertReport> {
    let start = Instant::now();

    config.validate()?;
    opts.targets.validate()?;
    let site = SiteInfo::from_config(config)?;
    let ctx = Arc::new(TransformContext::from_config(config, cwd)?);
    let layout = Arc::new(OutputLayout {
        src_root: config.src_path(cwd),
        out_dir: config.out_path(cwd),
    });
    let selective = !opts.targets.is_empty();

    info!(
        src = %layout.src_root.display(),
        out = %layout.out_dir.display(),
        "starting conversion"
    );

    // --- Phase 1: Cleanup ---
    if opts.skip_clean {
        debug!("skipping cleanup");
    } else if !selective {
        progress.phase("Cleaning output directory");
        if config.clean_out_dir {
            clean_directory_completely(&layout.out_dir, &config.ignore_dirs)?;
        } else {
            clean_directory(&layout.out_dir, &ctx.format)?;
        }
    }
    std::fs::create_dir_all(&layout.out_dir).map_err(|e| DocLlmError::io(&layout.out_dir, e))?;

    // --- Phase 2: Discovery ---
    progress.phase("Discovering documents");
    let all_files = discover_sources(&layout.src_root)?;
    let files = filter_files(&all_files, &opts.targets, &layout.src_root);
    info!(found = all_files.len(), selected = files.len(), "documents discovered");

    if selective && !opts.skip_clean {
        let stale = output_files_to_clean(
            &files,
            &ctx.docs_root,
            &layout.src_root,
            &layout.out_dir,
            ctx.strip_prefix.as_deref(),
            &ctx.format,
        );
        let removed = clean_specific_files(&stale)?;
        debug!(removed, "removed outputs of targeted documents");
    }

    // --- Phase 3: Transform ---
    progress.phase("Converting documents");
    let batch = process_files(
        files,
        Arc::clone(&ctx),
        Arc::clone(&layout),
        config.concurrency,
        progress,
    )
    .await?;

    // --- Phase 4: Artifacts ---
    let artifacts = if batch.processed.is_empty() {
        warn!("no documents processed, skipping llms.txt and context-full.txt");
        None
    } else {
        progress.phase("Generating llms.txt and context-full.txt");
        if selective {
            info!("selective run: artifacts cover only the processed documents");
        }
        Some(assemble_artifacts(
            &artifact_dir(&layout.out_dir),
            &batch.processed,
            &site,
            &config.context_order,
            Utc::now(),
        )?)
    };

    let report = ConvertReport {
        processed: batch.processed,
        failed: batch.failed,
        out_dir: layout.out_dir.clone(),
        artifacts,
        selective,
        elapsed: start.elapsed(),
    };

    progress.done(&report);

    info!(
        processed = report.processed.len(),
        failed = report.failed.len(),
        elapsed_ms = report.elapsed.as_millis(),
        "conversion complete"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::SilentProgress;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("docllm-convert-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn config() -> LlmConfig {
        LlmConfig {
            base_url: Some("https://example.com/llm".into()),
            repo: Some("https://github.com/user/repo".into()),
            pkg_name: Some("Example".into()),
            ..LlmConfig::default()
        }
    }

    fn site(root: &Path) {
        write(
            root,
            "src/routes/docs/components/alert.md",
            "---\ntitle: Alert\n---\n## Usage\n\n```svelte example\n{#include Default.svelte}\n```\n",
        );
        write(root, "src/routes/docs-examples/components/alert/Default.svelte", "<Alert />\n");
        write(root, "src/routes/docs/forms/toggle.md", "---\ntitle: Toggle\n---\nToggle body\n");
        write(root, "src/routes/docs/pages/introduction.md", "---\ntitle: Introduction\n---\nHello\n");
    }

    #[tokio::test]
    async fn full_run_writes_pages_and_artifacts() {
        let root = temp_dir();
        site(&root);
        write(&root, "static/llm/stale/old.md", "stale");
        write(&root, "static/llm/keep.txt", "keep");

        let report = convert(&config(), &root, &ConvertOptions::default(), &SilentProgress)
            .await
            .unwrap();

        assert_eq!(report.processed.len(), 3);
        assert!(report.failed.is_empty());
        assert!(!root.join("static/llm/stale/old.md").exists());
        assert!(root.join("static/llm/keep.txt").exists());

        let alert = std::fs::read_to_string(root.join("static/llm/components/alert.md")).unwrap();
        assert_eq!(alert, "# Alert\n\n## Usage\n\n```svelte\n<Alert />\n```\n");

        let manifest = std::fs::read_to_string(root.join("static/llms.txt")).unwrap();
        assert!(manifest.contains("full-context: https://example.com/context-full.txt"));
        assert!(manifest.contains("/docs: https://example.com/llm/pages/introduction.md"));

        let bundle = std::fs::read_to_string(root.join("static/context-full.txt")).unwrap();
        let pos = |needle: &str| bundle.find(needle).unwrap();
        assert!(pos("# PAGES") < pos("# COMPONENTS"));
        assert!(pos("# COMPONENTS") < pos("# FORMS"));

        std::fs::remove_dir_all(&root).ok();
    }

    #[tokio::test]
    async fn selective_run_only_touches_targets() {
        let root = temp_dir();
        site(&root);
        write(&root, "static/llm/components/badge.md", "untouched");

        let opts = ConvertOptions {
            targets: Targets {
                directories: vec![],
                files: vec!["forms/toggle".into()],
            },
            skip_clean: false,
        };
        let report = convert(&config(), &root, &opts, &SilentProgress).await.unwrap();

        assert!(report.selective);
        assert_eq!(report.processed.len(), 1);
        assert_eq!(report.processed[0].relative_path, "forms/toggle.md");
        assert!(root.join("static/llm/components/badge.md").exists());
        assert!(!root.join("static/llm/components/alert.md").exists());

        let manifest = std::fs::read_to_string(root.join("static/llms.txt")).unwrap();
        assert_eq!(manifest.matches("/docs:").count(), 1);

        std::fs::remove_dir_all(&root).ok();
    }

    #[tokio::test]
    async fn missing_required_fields_abort_before_touching_disk() {
        let root = temp_dir();
        write(&root, "static/llm/old.md", "old");

        let err = convert(&LlmConfig::default(), &root, &ConvertOptions::default(), &SilentProgress)
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Missing required configuration fields: base_url, repo, pkg_name"
        );
        assert!(root.join("static/llm/old.md").exists());

        std::fs::remove_dir_all(&root).ok();
    }

    #[tokio::test]
    async fn invalid_target_is_rejected() {
        let root = temp_dir();
        site(&root);
        let opts = ConvertOptions {
            targets: Targets {
                directories: vec!["forms*".into()],
                files: vec![],
            },
            skip_clean: false,
        };
        assert!(convert(&config(), &root, &opts, &SilentProgress).await.is_err());
        std::fs::remove_dir_all(&root).ok();
    }

    #[tokio::test]
    async fn no_matches_skips_artifacts() {
        let root = temp_dir();
        site(&root);
        let opts = ConvertOptions {
            targets: Targets {
                directories: vec!["blocks".into()],
                files: vec![],
            },
            skip_clean: true,
        };
        let report = convert(&config(), &root, &opts, &SilentProgress).await.unwrap();
        assert!(report.processed.is_empty());
        assert!(report.artifacts.is_none());
        assert!(!root.join("static/llms.txt").exists());
        std::fs::remove_dir_all(&root).ok();
    }
}
