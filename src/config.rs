//! Per-run configuration.
//!
//! A [`RunConfig`] is built once from CLI arguments, validated, and then
//! immutable for the whole batch. All parameters come from the command line —
//! there is no config file layer; each tool is a one-shot invocation.
//!
//! The only fatal error class in framekit is [`ConfigError`]: a bad input
//! directory aborts the run before any frame is touched. Everything that goes
//! wrong *after* validation is downgraded to a per-frame skip or failure.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("input directory does not exist or is not a directory: {0}")]
    InputNotADirectory(PathBuf),
}

/// Resampling filter used when a frame is rescaled.
///
/// The variants mirror the interpolation modes of the original desktop
/// tooling; each maps onto an `image` crate filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Nearest-neighbor (no interpolation).
    None,
    Linear,
    Cubic,
    Lanczos3,
}

impl Interpolation {
    pub fn filter(self) -> image::imageops::FilterType {
        match self {
            Interpolation::None => image::imageops::FilterType::Nearest,
            Interpolation::Linear => image::imageops::FilterType::Triangle,
            Interpolation::Cubic => image::imageops::FilterType::CatmullRom,
            Interpolation::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Which geometry a run applies to each frame. See [`crate::geometry::plan`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SequencePolicy {
    /// Centered crop shrinking linearly with the frame index.
    LinearShrink {
        start_percentage: f64,
        step_percentage: f64,
    },
    /// Centered crop with a floor at `start_percentage`, rescaled back to the
    /// original dimensions — progressive digital zoom without dimension drift.
    ZoomCrop {
        start_percentage: f64,
        step_percentage: f64,
        interpolation: Interpolation,
    },
    /// Compounding multiplicative upscale; no crop.
    Upscale {
        scale_step_percentage: f64,
        interpolation: Interpolation,
    },
}

/// How the frame index is assigned to directory entries.
///
/// The tool variants genuinely diverge here and the difference is visible in
/// the output geometry, so it is an explicit setting rather than a silently
/// unified behavior:
///
/// - `progressive-crop` and `upscale` number frames by raw sorted position —
///   a skipped entry still consumes its index.
/// - `zoom-crop` and `zoom-effect` number frames by valid images seen so far —
///   non-image files in the directory do not leave gaps in the zoom curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameIndexing {
    SortedPosition,
    ValidatedOnly,
}

/// Immutable settings for one batch run.
#[derive(Debug, Clone, Serialize)]
pub struct RunConfig {
    /// Tool name: used for diagnostics and the default output directory.
    pub tool: String,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub policy: SequencePolicy,
    pub indexing: FrameIndexing,
}

impl RunConfig {
    /// Validate the input directory and derive the output directory.
    ///
    /// When no output directory is supplied it defaults to
    /// `<input_dir>/<tool>-output`. The directory is not created here — the
    /// batch driver does that once, idempotently, at the start of the run.
    pub fn new(
        tool: &str,
        input_dir: PathBuf,
        output_dir: Option<PathBuf>,
        policy: SequencePolicy,
        indexing: FrameIndexing,
    ) -> Result<Self, ConfigError> {
        if !input_dir.is_dir() {
            return Err(ConfigError::InputNotADirectory(input_dir));
        }
        let output_dir = output_dir.unwrap_or_else(|| default_output_dir(&input_dir, tool));
        Ok(Self {
            tool: tool.to_string(),
            input_dir,
            output_dir,
            policy,
            indexing,
        })
    }
}

fn default_output_dir(input_dir: &Path, tool: &str) -> PathBuf {
    input_dir.join(format!("{tool}-output"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_default_output_dir_inside_input() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = RunConfig::new(
            "progressive-crop",
            tmp.path().to_path_buf(),
            None,
            SequencePolicy::LinearShrink {
                start_percentage: 100.0,
                step_percentage: 5.0,
            },
            FrameIndexing::SortedPosition,
        )
        .unwrap();

        assert_eq!(
            config.output_dir,
            tmp.path().join("progressive-crop-output")
        );
    }

    #[test]
    fn explicit_output_dir_wins() {
        let tmp = tempfile::TempDir::new().unwrap();
        let out = tmp.path().join("elsewhere");
        let config = RunConfig::new(
            "upscale",
            tmp.path().to_path_buf(),
            Some(out.clone()),
            SequencePolicy::Upscale {
                scale_step_percentage: 1.0,
                interpolation: Interpolation::Lanczos3,
            },
            FrameIndexing::SortedPosition,
        )
        .unwrap();

        assert_eq!(config.output_dir, out);
    }

    #[test]
    fn missing_input_dir_is_a_config_error() {
        let result = RunConfig::new(
            "zoom-crop",
            PathBuf::from("/no/such/directory"),
            None,
            SequencePolicy::ZoomCrop {
                start_percentage: 10.0,
                step_percentage: 5.0,
                interpolation: Interpolation::None,
            },
            FrameIndexing::ValidatedOnly,
        );

        assert!(matches!(result, Err(ConfigError::InputNotADirectory(_))));
    }

    #[test]
    fn input_path_that_is_a_file_is_rejected() {
        let tmp = tempfile::TempDir::new().unwrap();
        let file = tmp.path().join("not-a-dir.png");
        std::fs::write(&file, b"x").unwrap();

        let result = RunConfig::new(
            "upscale",
            file,
            None,
            SequencePolicy::Upscale {
                scale_step_percentage: 1.0,
                interpolation: Interpolation::Linear,
            },
            FrameIndexing::SortedPosition,
        );
        assert!(result.is_err());
    }
}
