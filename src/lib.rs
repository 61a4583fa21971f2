//! # framekit
//!
//! Batch image-sequence transforms for stop-motion and animation assembly.
//! Point a tool at a directory of stills and it produces an ordered sequence
//! of derived frames: progressively smaller crops, zoom-crop composites that
//! hold their dimensions, or compounding upscales.
//!
//! # Architecture: One Engine, Thin Entry Points
//!
//! The four CLI tools (`progressive-crop`, `zoom-crop`, `zoom-effect`,
//! `upscale`) share a single parameterized engine; each subcommand only picks
//! a geometry policy, a frame-indexing rule, and parameter defaults. Per
//! entry, the engine runs:
//!
//! ```text
//! sniff (magic bytes) → validity probe → decode → plan geometry
//!     → crop/scale → re-encode → release
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`sniff`] | File-format detection by magic signature, never by extension |
//! | [`codec`] | Decode by detected format; encode by output extension with deterministic options |
//! | [`geometry`] | Pure per-frame geometry: linear shrink, zoom-crop, compounding upscale |
//! | [`pipeline`] | Per-entry state machine; the error boundary that isolates frame failures |
//! | [`batch`] | Deterministic directory enumeration, ordering, and run accounting |
//! | [`config`] | Immutable per-run settings, validated once before any frame is touched |
//! | [`output`] | CLI diagnostics — pure `format_*` functions with `print_*` wrappers |
//! | [`report`] | Optional `report.json` summary written into the output directory |
//!
//! # Design Decisions
//!
//! ## Magic Bytes Over Extensions
//!
//! Frame directories accumulate misnamed files — a `.png` that is really a
//! JPEG, exports with no extension at all. Every file is classified by its
//! leading bytes against a fixed signature table (PNG, JPEG, TIFF, BMP, WebP)
//! and decoded with the codec that table picked. Files matching no signature
//! are skipped, never errors.
//!
//! ## Per-Frame Failure Isolation
//!
//! A batch is only useful if one bad file cannot ruin it. Everything that can
//! go wrong with a single entry — corrupt body behind a valid signature,
//! degenerate geometry, a write error — is caught at the [`pipeline`]
//! boundary and recorded as a skip or failure; the run always continues to
//! the next frame. The one fatal error is an invalid input directory,
//! rejected before any frame is processed.
//!
//! ## Lossless Redirect
//!
//! Sources that sniff as jpeg or webp are re-encoded as PNG (the extension is
//! rewritten on the output name). Re-compressing a lossy source in its own
//! container would stack generation loss across a sequence that is about to
//! be re-encoded again by a video assembler.
//!
//! ## Deterministic, Sequential Processing
//!
//! Frames are processed strictly one at a time in sorted filename order, and
//! encode options are pinned (PNG: best compression, adaptive filtering, no
//! interlacing). Re-running a batch over unchanged inputs reuses the output
//! directory and rewrites byte-identical files, so partial re-runs and
//! diffing output directories both behave predictably.

pub mod batch;
pub mod codec;
pub mod config;
pub mod geometry;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod sniff;
