//! Batch driver: deterministic enumeration and run accounting.
//!
//! One run walks the files directly under the input directory (depth 1 —
//! subdirectories, including a nested default output directory, are never
//! enumerated), sorts them by filename, and feeds each through the
//! [`FramePipeline`] strictly in order. Processing is single-threaded by
//! design: exactly one decoded image is alive at any moment, and the only
//! state crossing frame boundaries is the counters below.
//!
//! The output directory is created once, idempotently. A pre-existing
//! directory is reused and never cleared, so re-running a batch over
//! unchanged inputs rewrites the same files with identical bytes.

use std::ffi::OsString;

use serde::Serialize;
use thiserror::Error;
use walkdir::WalkDir;

use crate::config::{ConfigError, FrameIndexing, RunConfig};
use crate::pipeline::{FrameOutcome, FramePipeline};

#[derive(Error, Debug)]
pub enum BatchError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to read input directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// A skipped or failed entry, kept for diagnostics only.
#[derive(Debug, Clone, Serialize)]
pub struct FrameNote {
    pub file: String,
    pub reason: String,
}

/// Counters and diagnostics accumulated over one run.
///
/// `valid` counts entries that passed the validity probe, whether or not they
/// later processed cleanly; `processed` counts encodes that reached disk.
/// Zero valid images is a reportable outcome, not an error.
#[derive(Debug, Default, Serialize)]
pub struct BatchResult {
    pub total: usize,
    pub valid: usize,
    pub processed: usize,
    pub skipped: Vec<FrameNote>,
    pub failed: Vec<FrameNote>,
}

/// Run a whole batch, discarding per-frame events.
pub fn run(config: &RunConfig) -> Result<BatchResult, BatchError> {
    run_with_observer(config, |_, _| {})
}

/// Run a whole batch, reporting each entry's outcome to `observe` as it
/// completes. The observer is a diagnostic sink; it cannot influence the run.
pub fn run_with_observer(
    config: &RunConfig,
    mut observe: impl FnMut(&str, &FrameOutcome),
) -> Result<BatchResult, BatchError> {
    let entries = list_entries(config)?;
    std::fs::create_dir_all(&config.output_dir)?;

    let pipeline = FramePipeline::new(config);
    let mut result = BatchResult::default();
    let mut validated = 0usize;

    for (position, name) in entries.iter().enumerate() {
        result.total += 1;
        let frame_index = match config.indexing {
            FrameIndexing::SortedPosition => position,
            FrameIndexing::ValidatedOnly => validated,
        };

        let display = name.to_string_lossy().into_owned();
        let outcome = pipeline.process(name, frame_index);
        match &outcome {
            FrameOutcome::Processed { .. } => {
                validated += 1;
                result.valid += 1;
                result.processed += 1;
            }
            // Failed frames passed validation before breaking, so they still
            // consume a frame index under ValidatedOnly numbering.
            FrameOutcome::Failed(error) => {
                validated += 1;
                result.valid += 1;
                result.failed.push(FrameNote {
                    file: display.clone(),
                    reason: error.to_string(),
                });
            }
            FrameOutcome::Skipped(reason) => {
                result.skipped.push(FrameNote {
                    file: display.clone(),
                    reason: reason.to_string(),
                });
            }
        }
        observe(&display, &outcome);
    }

    Ok(result)
}

/// Regular files directly under the input directory, sorted ascending by
/// filename. This sorted order is the authoritative frame-index source.
fn list_entries(config: &RunConfig) -> Result<Vec<OsString>, BatchError> {
    let mut names = Vec::new();
    for entry in WalkDir::new(&config.input_dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if entry.file_type().is_file() {
            names.push(entry.file_name().to_os_string());
        }
    }
    names.sort();
    Ok(names)
}
