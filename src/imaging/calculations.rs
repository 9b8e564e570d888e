//! Pure calculation functions for frame geometry.
//!
//! All functions here are pure and testable without any I/O or images.
//! Rounding is `f64::round` (half away from zero) throughout; centering
//! offsets use floor division, so an odd remainder pixel lands on the
//! bottom/right edge.

use super::backend::Dimensions;
use super::params::{FrameSpec, Offset};

/// Canvas chosen for one source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasPlan {
    pub target: Dimensions,
}

/// Whether `ratio` is already the frame's ratio, within tolerance.
///
/// # Examples
/// ```
/// # use meuralize::imaging::{FrameSpec, is_already_target};
/// let frame = FrameSpec::default();
/// assert!(is_already_target(1920.0 / 1080.0, &frame));
/// assert!(!is_already_target(4.0 / 3.0, &frame));
/// ```
pub fn is_already_target(ratio: f64, frame: &FrameSpec) -> bool {
    (ratio - frame.ratio()).abs() < frame.tolerance
}

/// Choose the output canvas for a source image.
///
/// Landscape sources keep their width (at least the frame's minimum width)
/// and derive the height; portrait and square sources keep their height (at
/// least the minimum height) and derive the width.
///
/// # Examples
/// ```
/// # use meuralize::imaging::{Dimensions, FrameSpec, plan_canvas};
/// let plan = plan_canvas(Dimensions::new(4000, 2000), &FrameSpec::default());
/// assert_eq!(plan.target, Dimensions::new(4000, 2250));
/// ```
pub fn plan_canvas(source: Dimensions, frame: &FrameSpec) -> CanvasPlan {
    let ratio = frame.ratio();

    let target = if source.width > source.height {
        let width = source.width.max(frame.min_canvas.width);
        let height = (width as f64 / ratio).round() as u32;
        Dimensions::new(width, height)
    } else {
        let height = source.height.max(frame.min_canvas.height);
        let width = (height as f64 * ratio).round() as u32;
        Dimensions::new(width, height)
    };

    CanvasPlan { target }
}

/// Calculate dimensions that fit entirely inside `target` ("fit" resize).
///
/// The scale factor is the *smaller* of the two axis ratios, so nothing is
/// cropped and one side may fall short of the target.
pub fn calculate_fit_dimensions(source: Dimensions, target: Dimensions) -> Dimensions {
    let scale_x = target.width as f64 / source.width as f64;
    let scale_y = target.height as f64 / source.height as f64;
    let scale = scale_x.min(scale_y);

    Dimensions::new(
        ((source.width as f64 * scale).round() as u32).clamp(1, target.width),
        ((source.height as f64 * scale).round() as u32).clamp(1, target.height),
    )
}

/// Calculate dimensions needed to fill a target area (resize before crop).
///
/// The scale factor is the *larger* of the two axis ratios: one dimension
/// matches the target, the other meets or exceeds it.
pub fn calculate_fill_dimensions(source: Dimensions, target: Dimensions) -> Dimensions {
    let scale_x = target.width as f64 / source.width as f64;
    let scale_y = target.height as f64 / source.height as f64;
    let scale = scale_x.max(scale_y);

    Dimensions::new(
        ((source.width as f64 * scale).round() as u32).max(target.width),
        ((source.height as f64 * scale).round() as u32).max(target.height),
    )
}

/// Offset that centers `inner` inside `outer`. Floor division; never negative.
pub fn center_offset(outer: Dimensions, inner: Dimensions) -> Offset {
    Offset {
        x: outer.width.saturating_sub(inner.width) / 2,
        y: outer.height.saturating_sub(inner.height) / 2,
    }
}

/// Dimensions for shrinking toward `floor` without going below it on the
/// limiting axis.
///
/// Returns `None` when the image is already at or inside the floor, or when
/// the computed scale would not make it smaller.
pub fn calculate_floor_downscale(current: Dimensions, floor: Dimensions) -> Option<Dimensions> {
    if current.width <= floor.width && current.height <= floor.height {
        return None;
    }

    let scale_x = floor.width as f64 / current.width as f64;
    let scale_y = floor.height as f64 / current.height as f64;
    let scale = scale_x.max(scale_y);

    if scale >= 1.0 {
        return None;
    }

    Some(scale_dimensions(current, scale))
}

/// Scale both sides by `factor`, rounding, never below one pixel.
pub fn scale_dimensions(current: Dimensions, factor: f64) -> Dimensions {
    Dimensions::new(
        ((current.width as f64 * factor).round() as u32).max(1),
        ((current.height as f64 * factor).round() as u32).max(1),
    )
}
