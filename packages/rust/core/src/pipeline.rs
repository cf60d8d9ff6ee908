//! Document pipeline: source file → transformed page on disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

use docllm_markdown::{FileSource, FsSource};
use docllm_shared::{
    DocLlmError, ProcessedDocument, Result, TransformContext, output_relative_path,
};

use crate::assembler::write_atomic;

/// Where outputs go and how inputs map onto them.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    /// Absolute source directory (fallback base for relative paths).
    pub src_root: PathBuf,
    /// Absolute output directory.
    pub out_dir: PathBuf,
}

/// A document the pipeline could not process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedDocument {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of a batch: successes sorted by relative path, failures in input
/// order.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub processed: Vec<ProcessedDocument>,
    pub failed: Vec<FailedDocument>,
}

/// Progress callback for reporting run status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each document, successful or not.
    fn document_done(&self, path: &str, current: usize, total: usize);
    /// Called when the run completes.
    fn done(&self, report: &crate::ConvertReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn document_done(&self, _path: &str, _current: usize, _total: usize) {}
    fn done(&self, _report: &crate::ConvertReport) {}
}

// ---------------------------------------------------------------------------
// Single document
// ---------------------------------------------------------------------------

/// Read, transform and write one document.
///
/// The output path is a pure function of the input path, so concurrent calls
/// on distinct inputs never write the same file.
pub fn process_file(
    input: &Path,
    ctx: &TransformContext,
    layout: &OutputLayout,
    fs: &dyn FileSource,
) -> Result<ProcessedDocument> {
    let raw = fs
        .read_to_string(input)
        .map_err(|e| DocLlmError::io(input, e))?;

    let output = docllm_markdown::transform(&raw, input, ctx, fs)?;

    let relative_path = output_relative_path(
        input,
        &ctx.docs_root,
        &layout.src_root,
        ctx.strip_prefix.as_deref(),
        &ctx.format,
    );
    let output_path = layout.out_dir.join(&relative_path);

    write_atomic(&output_path, &output.markdown)?;
    info!(input = %input.display(), output = %output_path.display(), "processed document");

    Ok(ProcessedDocument {
        input_path: input.to_path_buf(),
        output_path,
        relative_path,
        title: output.title,
    })
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

/// Process `files` with at most `concurrency` documents in flight.
///
/// A failing document is logged and recorded; it never aborts the batch.
/// Successes are sorted by relative path so completion order does not leak
/// into anything built from them.
#[instrument(skip_all, fields(files = files.len(), concurrency))]
pub async fn process_files(
    files: Vec<PathBuf>,
    ctx: Arc<TransformContext>,
    layout: Arc<OutputLayout>,
    concurrency: usize,
    progress: &dyn ProgressReporter,
) -> Result<BatchOutcome> {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let total = files.len();
    let mut handles = Vec::with_capacity(total);

    for input in files {
        let permit = Arc::clone(&semaphore)
            .acquire_owned()
            .await
            .map_err(|e| DocLlmError::validation(format!("worker pool closed: {e}")))?;
        let ctx = Arc::clone(&ctx);
        let layout = Arc::clone(&layout);
        let task_input = input.clone();

        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            process_file(&task_input, &ctx, &layout, &FsSource)
        });
        handles.push((input, handle));
    }

    let mut outcome = BatchOutcome::default();
    for (i, (input, handle)) in handles.into_iter().enumerate() {
        let result = handle
            .await
            .unwrap_or_else(|e| Err(DocLlmError::validation(format!("worker task failed: {e}"))));

        match result {
            Ok(doc) => outcome.processed.push(doc),
            Err(e) => {
                warn!(path = %input.display(), error = %e, "failed to process document");
                outcome.failed.push(FailedDocument {
                    path: input.clone(),
                    error: e.to_string(),
                });
            }
        }
        progress.document_done(&input.display().to_string(), i + 1, total);
    }

    outcome
        .processed
        .sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

    debug!(
        processed = outcome.processed.len(),
        failed = outcome.failed.len(),
        "batch complete"
    );
    Ok(outcome)
}
