//! CLI output formatting.
//!
//! Each display has a pure `format_*` function (returns strings, no I/O) and
//! a `print_*` wrapper that writes to stdout/stderr. Per-file diagnostics are
//! best-effort and never block the run; the final summary is the one
//! user-visible contract.
//!
//! ```text
//! a.png -> frames/a.png
//! b.png: skipped (unrecognized file format)
//!
//! Successfully processed 4 out of 5 valid images (7 files seen).
//! Skipped 2 files, 1 frame failed.
//! ```

use crate::batch::BatchResult;
use crate::pipeline::FrameOutcome;

/// One line describing a finished entry.
pub fn format_frame_event(file: &str, outcome: &FrameOutcome) -> String {
    match outcome {
        FrameOutcome::Processed { output } => format!("{file} -> {}", output.display()),
        FrameOutcome::Skipped(reason) => format!("{file}: skipped ({reason})"),
        FrameOutcome::Failed(error) => format!("{file}: failed ({error})"),
    }
}

/// Human-readable run summary.
///
/// A run that found no valid images at all is its own outcome, distinct from
/// "some frames failed".
pub fn format_summary(result: &BatchResult) -> Vec<String> {
    if result.valid == 0 {
        return vec![format!(
            "No valid images found in the input folder ({} files seen).",
            result.total
        )];
    }

    let mut lines = vec![format!(
        "Successfully processed {} out of {} valid images ({} files seen).",
        result.processed, result.valid, result.total
    )];

    if !result.skipped.is_empty() || !result.failed.is_empty() {
        lines.push(format!(
            "Skipped {} file{}, {} frame{} failed.",
            result.skipped.len(),
            plural(result.skipped.len()),
            result.failed.len(),
            plural(result.failed.len()),
        ));
    }

    lines
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Print one entry's outcome: successes to stdout, problems to stderr.
pub fn print_frame_event(file: &str, outcome: &FrameOutcome) {
    let line = format_frame_event(file, outcome);
    match outcome {
        FrameOutcome::Processed { .. } => println!("{line}"),
        _ => eprintln!("{line}"),
    }
}

/// Print the run summary to stdout.
pub fn print_summary(result: &BatchResult) {
    for line in format_summary(result) {
        println!("{line}");
    }
}
