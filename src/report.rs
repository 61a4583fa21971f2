//! Machine-readable run report.
//!
//! With `--report`, the batch summary is also written as `report.json` into
//! the output directory — the same counters and per-file diagnostics the CLI
//! prints, in a form scripts can consume. The report file lives alongside the
//! generated frames but is never enumerated as an input (the driver only
//! walks the input directory).

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::batch::{BatchResult, FrameNote};
use crate::config::{FrameIndexing, RunConfig, SequencePolicy};

pub const REPORT_FILE_NAME: &str = "report.json";

#[derive(Serialize)]
struct RunReport<'a> {
    tool: &'a str,
    input_dir: &'a Path,
    output_dir: &'a Path,
    policy: &'a SequencePolicy,
    indexing: FrameIndexing,
    total: usize,
    valid: usize,
    processed: usize,
    skipped: &'a [FrameNote],
    failed: &'a [FrameNote],
}

/// Serialize the run's configuration and result into the output directory.
/// Returns the path written.
pub fn write_report(config: &RunConfig, result: &BatchResult) -> std::io::Result<PathBuf> {
    let report = RunReport {
        tool: &config.tool,
        input_dir: &config.input_dir,
        output_dir: &config.output_dir,
        policy: &config.policy,
        indexing: config.indexing,
        total: result.total,
        valid: result.valid,
        processed: result.processed,
        skipped: &result.skipped,
        failed: &result.failed,
    };

    let path = config.output_dir.join(REPORT_FILE_NAME);
    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(&path, json)?;
    Ok(path)
}
