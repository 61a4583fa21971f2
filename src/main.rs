use clap::{Parser, Subcommand};
use framekit::config::{FrameIndexing, Interpolation, RunConfig, SequencePolicy};
use framekit::{batch, output, report};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "framekit")]
#[command(version)]
#[command(about = "Batch image-sequence transforms for stop-motion assembly")]
#[command(long_about = "\
Batch image-sequence transforms for stop-motion assembly

Each tool walks a directory of still images in sorted filename order and
writes one derived frame per input into an output directory. Files are
classified by magic bytes, not extension; anything that is not a decodable
image is skipped and the batch continues. Lossy sources (jpeg, webp) are
re-encoded as PNG to avoid stacking generation loss across the sequence.

Unless --output is given, frames land in <INPUT_DIR>/<tool>-output, which is
never re-read as input on later runs.")]
struct Cli {
    /// Write a machine-readable report.json into the output directory
    #[arg(long, global = true)]
    report: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Crop each frame progressively smaller (frame N keeps start - N*step percent)
    ProgressiveCrop(ProgressiveCropArgs),
    /// Zoom in by cropping tighter each frame, rescaled back to the source size
    ZoomCrop(ZoomArgs),
    /// Zoom sequence tuned for quality: same geometry, Lanczos3 resampling default
    ZoomEffect(ZoomArgs),
    /// Upscale each frame by a compounding factor (frame N scales by (1+step/100)^(N+1))
    Upscale(UpscaleArgs),
}

#[derive(clap::Args)]
struct ProgressiveCropArgs {
    /// Directory of source images
    input_dir: PathBuf,

    /// Output directory (default: <INPUT_DIR>/progressive-crop-output)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Percentage of the source kept by frame 0 (0-100)
    #[arg(long, default_value_t = 100.0)]
    start: f64,

    /// Percentage removed per frame (0-100, may be fractional)
    #[arg(long, default_value_t = 5.0)]
    step: f64,
}

#[derive(clap::Args)]
struct ZoomArgs {
    /// Directory of source images
    input_dir: PathBuf,

    /// Output directory (default: <INPUT_DIR>/<tool>-output)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Tightest crop percentage the zoom holds at (0-100)
    #[arg(long, default_value_t = 10.0)]
    start: f64,

    /// Zoom-in percentage per frame (0-100, may be fractional)
    #[arg(long, default_value_t = 5.0)]
    step: f64,

    /// Resampling filter for the rescale back to source size
    #[arg(long, value_enum)]
    interpolation: Option<Interpolation>,
}

#[derive(clap::Args)]
struct UpscaleArgs {
    /// Directory of source images
    input_dir: PathBuf,

    /// Output directory (default: <INPUT_DIR>/upscale-output)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Scale growth percentage per frame (may be fractional)
    #[arg(long, default_value_t = 1.0)]
    scale_step: f64,

    /// Resampling filter for the upscale
    #[arg(long, value_enum, default_value = "lanczos3")]
    interpolation: Interpolation,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match cli.command {
        Command::ProgressiveCrop(args) => RunConfig::new(
            "progressive-crop",
            args.input_dir,
            args.output,
            SequencePolicy::LinearShrink {
                start_percentage: args.start,
                step_percentage: args.step,
            },
            // Raw sorted position: a skipped entry still consumes its index.
            FrameIndexing::SortedPosition,
        )?,
        Command::ZoomCrop(args) => zoom_config("zoom-crop", args, Interpolation::None)?,
        Command::ZoomEffect(args) => zoom_config("zoom-effect", args, Interpolation::Lanczos3)?,
        Command::Upscale(args) => RunConfig::new(
            "upscale",
            args.input_dir,
            args.output,
            SequencePolicy::Upscale {
                scale_step_percentage: args.scale_step,
                interpolation: args.interpolation,
            },
            FrameIndexing::SortedPosition,
        )?,
    };

    let result = batch::run_with_observer(&config, output::print_frame_event)?;
    output::print_summary(&result);

    if cli.report {
        let path = report::write_report(&config, &result)?;
        println!("Report: {}", path.display());
    }

    Ok(())
}

/// The two zoom tools share geometry and valid-image frame numbering; they
/// differ only in name and default resampling filter.
fn zoom_config(
    tool: &str,
    args: ZoomArgs,
    default_interpolation: Interpolation,
) -> Result<RunConfig, framekit::config::ConfigError> {
    RunConfig::new(
        tool,
        args.input_dir,
        args.output,
        SequencePolicy::ZoomCrop {
            start_percentage: args.start,
            step_percentage: args.step,
            interpolation: args.interpolation.unwrap_or(default_interpolation),
        },
        // Frames are numbered over valid images only, so stray non-image
        // files do not leave gaps in the zoom curve.
        FrameIndexing::ValidatedOnly,
    )
}
