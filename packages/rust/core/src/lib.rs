//! Core orchestration for svelte-doc-llm.
//!
//! Ties discovery, the per-document transformation passes and the artifact
//! builders into the end-to-end [`convert`] run.

pub mod assembler;
pub mod convert;
pub mod pipeline;

pub use assembler::{ArtifactReport, assemble_artifacts, write_atomic};
pub use convert::{ConvertOptions, ConvertReport, convert};
pub use pipeline::{
    BatchOutcome, FailedDocument, OutputLayout, ProgressReporter, SilentProgress, process_file,
    process_files,
};
