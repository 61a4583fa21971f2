//! Per-entry processing: validate → decode → plan → apply → encode.
//!
//! The pipeline is the error boundary of the whole system. Every way an
//! individual file can go wrong is absorbed here into a [`FrameOutcome`]:
//!
//! - [`FrameOutcome::Skipped`] — the entry never was a processable image
//!   (unknown signature, or a matching signature over a body that does not
//!   decode).
//! - [`FrameOutcome::Failed`] — a valid image hit a codec or filesystem error
//!   mid-processing, or its planned geometry degenerated to nothing.
//!
//! Neither outcome propagates as an error; the batch driver just moves on to
//! the next entry. The decoded image is owned by one `process` call and
//! dropped on every exit path before the next entry is touched.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::codec::{self, CodecError};
use crate::config::RunConfig;
use crate::geometry;
use crate::sniff::{DetectedFormat, Sniffer};

/// Why an entry was skipped before any processing happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No magic signature matched; the file is not an image we know.
    UnknownFormat,
    /// The signature matched but the full-decode validity probe failed.
    InvalidImage,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::UnknownFormat => f.write_str("unrecognized file format"),
            SkipReason::InvalidImage => f.write_str("invalid or corrupt image"),
        }
    }
}

/// A per-frame error, caught at the pipeline boundary.
#[derive(Error, Debug)]
pub enum FrameError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("crop region is empty ({width}x{height})")]
    EmptyCrop { width: u32, height: u32 },
    #[error("scale target is empty ({width}x{height})")]
    EmptyScale { width: u32, height: u32 },
}

/// Terminal state of one directory entry.
#[derive(Debug)]
pub enum FrameOutcome {
    Processed { output: PathBuf },
    Skipped(SkipReason),
    Failed(FrameError),
}

/// Processes one entry at a time against a fixed [`RunConfig`].
pub struct FramePipeline<'a> {
    config: &'a RunConfig,
    sniffer: Sniffer,
}

impl<'a> FramePipeline<'a> {
    pub fn new(config: &'a RunConfig) -> Self {
        Self {
            config,
            sniffer: Sniffer::new(),
        }
    }

    /// Run one entry through the full state machine.
    ///
    /// `frame_index` is assigned by the batch driver according to the run's
    /// [`FrameIndexing`](crate::config::FrameIndexing) policy.
    pub fn process(&self, file_name: &OsStr, frame_index: usize) -> FrameOutcome {
        let input_path = self.config.input_dir.join(file_name);

        let Some(format) = self.sniffer.detect(&input_path) else {
            return FrameOutcome::Skipped(SkipReason::UnknownFormat);
        };
        if !codec::is_valid_image(&self.sniffer, &input_path) {
            return FrameOutcome::Skipped(SkipReason::InvalidImage);
        }

        match self.transform(&input_path, file_name, format, frame_index) {
            Ok(output) => FrameOutcome::Processed { output },
            Err(error) => FrameOutcome::Failed(error),
        }
    }

    fn transform(
        &self,
        input_path: &Path,
        file_name: &OsStr,
        format: DetectedFormat,
        frame_index: usize,
    ) -> Result<PathBuf, FrameError> {
        let mut image = codec::decode(input_path, format)?;
        let plan = geometry::plan(image.width(), image.height(), frame_index, &self.config.policy);

        if let Some(crop) = plan.crop {
            if crop.is_empty() {
                return Err(FrameError::EmptyCrop {
                    width: crop.width,
                    height: crop.height,
                });
            }
            image = image.crop_imm(crop.x, crop.y, crop.width, crop.height);
        }

        if let Some(scale) = plan.scale {
            if scale.width == 0 || scale.height == 0 {
                return Err(FrameError::EmptyScale {
                    width: scale.width,
                    height: scale.height,
                });
            }
            image = image.resize_exact(scale.width, scale.height, scale.filter.filter());
        }

        let output = self.config.output_dir.join(output_file_name(file_name, format));
        codec::encode(&image, &output)?;
        Ok(output)
    }
}

/// Output filename for a source entry.
///
/// Lossy sources (jpeg, webp) are redirected to the lossless default: the
/// extension is rewritten to `.png` regardless of what the file was called on
/// disk. Everything else keeps its original name — the encoder dispatches on
/// that extension.
pub fn output_file_name(file_name: &OsStr, format: DetectedFormat) -> PathBuf {
    let name = Path::new(file_name);
    if format.is_lossy() {
        name.with_extension("png")
    } else {
        name.to_path_buf()
    }
}
