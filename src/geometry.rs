//! Per-frame geometry planning.
//!
//! Everything here is a pure function of `(source dimensions, frame index,
//! policy)` — no I/O, no decoded pixels, no state across calls. The frame
//! pipeline applies the resulting [`FramePlan`] to the decoded image.
//!
//! All pixel conversions truncate toward zero (floor for the non-negative
//! values involved), never round. This matters for output parity: a 333px
//! source at 50% keeps 166px, not 167.

use crate::config::{Interpolation, SequencePolicy};

/// A centered crop rectangle within the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

impl CropRect {
    /// A degenerate crop keeps no pixels; the pipeline records it as a
    /// per-frame failure rather than asking the codec to encode nothing.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Target dimensions and filter for a rescale step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleTarget {
    pub width: u32,
    pub height: u32,
    pub filter: Interpolation,
}

/// Geometry for one frame: an optional crop followed by an optional rescale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramePlan {
    pub crop: Option<CropRect>,
    pub scale: Option<ScaleTarget>,
}

/// Compute the geometry for frame `frame_index` of a sequence.
///
/// Percentages are taken as given: a linear-shrink run can walk its keep
/// percentage below zero or start above 100 for extreme configurations. The
/// crop is clamped into `[0, source]` so the centered-offset arithmetic stays
/// consistent, and a zero-area result is left in the plan for the pipeline to
/// reject per frame.
pub fn plan(width: u32, height: u32, frame_index: usize, policy: &SequencePolicy) -> FramePlan {
    match *policy {
        SequencePolicy::LinearShrink {
            start_percentage,
            step_percentage,
        } => {
            let keep = start_percentage - frame_index as f64 * step_percentage;
            FramePlan {
                crop: Some(centered_crop(width, height, keep)),
                scale: None,
            }
        }
        SequencePolicy::ZoomCrop {
            start_percentage,
            step_percentage,
            interpolation,
        } => {
            // Monotonically non-increasing, floored at the start percentage:
            // the sequence zooms in until it holds at the tightest crop.
            let keep = (100.0 - frame_index as f64 * step_percentage).max(start_percentage);
            FramePlan {
                crop: Some(centered_crop(width, height, keep)),
                scale: Some(ScaleTarget {
                    width,
                    height,
                    filter: interpolation,
                }),
            }
        }
        SequencePolicy::Upscale {
            scale_step_percentage,
            interpolation,
        } => {
            // Exponent starts at 1: frame 0 is already scaled up by one step.
            // Downstream sequences depend on this, so it stays.
            let factor = (1.0 + scale_step_percentage / 100.0).powi(frame_index as i32 + 1);
            FramePlan {
                crop: None,
                scale: Some(ScaleTarget {
                    width: (width as f64 * factor) as u32,
                    height: (height as f64 * factor) as u32,
                    filter: interpolation,
                }),
            }
        }
    }
}

/// Truncating percentage of a dimension, clamped into `[0, dimension]`.
fn percent_of(dimension: u32, percent: f64) -> u32 {
    let raw = (dimension as f64 * percent / 100.0).trunc();
    if raw <= 0.0 {
        0
    } else if raw >= dimension as f64 {
        dimension
    } else {
        raw as u32
    }
}

/// Crop rectangle keeping `keep_percent` of each axis, centered.
///
/// Offsets use floor division, so an odd margin leaves the extra pixel on
/// the bottom/right edge.
fn centered_crop(width: u32, height: u32, keep_percent: f64) -> CropRect {
    let crop_width = percent_of(width, keep_percent);
    let crop_height = percent_of(height, keep_percent);
    CropRect {
        width: crop_width,
        height: crop_height,
        x: (width - crop_width) / 2,
        y: (height - crop_height) / 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shrink(start: f64, step: f64) -> SequencePolicy {
        SequencePolicy::LinearShrink {
            start_percentage: start,
            step_percentage: step,
        }
    }

    fn zoom(start: f64, step: f64) -> SequencePolicy {
        SequencePolicy::ZoomCrop {
            start_percentage: start,
            step_percentage: step,
            interpolation: Interpolation::Cubic,
        }
    }

    fn upscale(step: f64) -> SequencePolicy {
        SequencePolicy::Upscale {
            scale_step_percentage: step,
            interpolation: Interpolation::Lanczos3,
        }
    }

    #[test]
    fn linear_shrink_reference_sequence() {
        // 1000x1000, start=100, step=10: frames 0/1/2 crop 1000/900/800 with
        // offsets 0/50/100.
        let policy = shrink(100.0, 10.0);
        let expected = [(1000, 0), (900, 50), (800, 100)];
        for (index, (side, offset)) in expected.into_iter().enumerate() {
            let crop = plan(1000, 1000, index, &policy).crop.unwrap();
            assert_eq!(crop.width, side, "frame {index}");
            assert_eq!(crop.height, side, "frame {index}");
            assert_eq!(crop.x, offset, "frame {index}");
            assert_eq!(crop.y, offset, "frame {index}");
        }
    }

    #[test]
    fn linear_shrink_has_no_rescale() {
        assert_eq!(plan(640, 480, 3, &shrink(100.0, 5.0)).scale, None);
    }

    #[test]
    fn percentages_truncate_never_round() {
        // 333 * 50% = 166.5 -> 166
        let crop = plan(333, 333, 0, &shrink(50.0, 0.0)).crop.unwrap();
        assert_eq!((crop.width, crop.height), (166, 166));
        // 999 * 99.9% = 998.001 -> 998
        let crop = plan(999, 999, 0, &shrink(99.9, 0.0)).crop.unwrap();
        assert_eq!(crop.width, 998);
    }

    #[test]
    fn centered_crop_invariant_holds_across_a_grid() {
        for &(w, h) in &[(1u32, 1u32), (7, 5), (100, 33), (1920, 1080)] {
            for index in 0..30 {
                let crop = plan(w, h, index, &shrink(100.0, 7.5)).crop.unwrap();
                assert!(crop.x + crop.width <= w, "{w}x{h} frame {index}");
                assert!(crop.y + crop.height <= h, "{w}x{h} frame {index}");
            }
        }
    }

    #[test]
    fn negative_keep_percent_yields_empty_crop() {
        // start=10, step=10: frame 2 keeps -10% -> clamped to a zero-area crop
        // with consistent centered offsets.
        let crop = plan(400, 400, 2, &shrink(10.0, 10.0)).crop.unwrap();
        assert!(crop.is_empty());
        assert_eq!((crop.x, crop.y), (200, 200));
    }

    #[test]
    fn keep_percent_above_hundred_clamps_to_source() {
        let crop = plan(200, 100, 0, &shrink(150.0, 0.0)).crop.unwrap();
        assert_eq!((crop.width, crop.height), (200, 100));
        assert_eq!((crop.x, crop.y), (0, 0));
    }

    #[test]
    fn zoom_crop_floors_at_start_percentage() {
        let policy = zoom(10.0, 5.0);
        // keep = max(10, 100 - 5i): frame 0 -> 100%, frame 18 -> 10%,
        // frame 30 -> still 10%.
        assert_eq!(plan(1000, 1000, 0, &policy).crop.unwrap().width, 1000);
        assert_eq!(plan(1000, 1000, 18, &policy).crop.unwrap().width, 100);
        assert_eq!(plan(1000, 1000, 30, &policy).crop.unwrap().width, 100);
    }

    #[test]
    fn zoom_crop_rescales_to_original_dimensions() {
        let frame = plan(800, 600, 4, &zoom(10.0, 5.0));
        let scale = frame.scale.unwrap();
        assert_eq!((scale.width, scale.height), (800, 600));
        assert_eq!(scale.filter, Interpolation::Cubic);
    }

    #[test]
    fn upscale_step_zero_is_identity_for_every_frame() {
        let policy = upscale(0.0);
        for index in 0..10 {
            let scale = plan(640, 480, index, &policy).scale.unwrap();
            assert_eq!((scale.width, scale.height), (640, 480), "frame {index}");
        }
    }

    #[test]
    fn upscale_step_hundred_doubles_frame_zero() {
        let frame = plan(100, 100, 0, &upscale(100.0));
        let scale = frame.scale.unwrap();
        assert_eq!((scale.width, scale.height), (200, 200));
        assert_eq!(frame.crop, None);
    }

    #[test]
    fn upscale_compounds_from_one_not_zero() {
        // 1% step: frame 1 factor is 1.01^2, dimensions floor.
        let scale = plan(1000, 1000, 1, &upscale(1.0)).scale.unwrap();
        assert_eq!(scale.width, 1020); // 1000 * 1.0201 = 1020.1 -> 1020
    }

    #[test]
    fn plan_is_pure() {
        let policy = zoom(25.0, 12.5);
        let a = plan(1234, 777, 6, &policy);
        let b = plan(1234, 777, 6, &policy);
        assert_eq!(a, b);
    }
}
