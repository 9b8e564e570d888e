//! High-level image operations.
//!
//! These functions combine calculations with backend execution: they take a
//! borrowed source raster plus a target canvas, compute geometry, and drive
//! the backend. Each returns an owned layer, independent of the source and of
//! every other layer.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::{calculate_fill_dimensions, calculate_fit_dimensions, center_offset};
use super::params::{BackgroundParams, Offset};
use tracing::debug;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// A raster and where it goes on the canvas.
#[derive(Debug, Clone)]
pub struct Layer<R> {
    pub raster: R,
    pub dims: Dimensions,
    pub offset: Offset,
}

/// Build the blurred, rippled, muted backdrop covering the whole canvas.
///
/// Steps, each applied to the previous result:
/// 1. fill-resize then center-crop to exactly `target`
/// 2. gaussian blur
/// 3. wave distortion
/// 4. the same gaussian blur again, to erase the ripple's edges
/// 5. brightness/saturation modulation
pub fn synthesize_background<B: ImageBackend>(
    backend: &B,
    source: &B::Raster,
    target: Dimensions,
    params: &BackgroundParams,
) -> Result<Layer<B::Raster>> {
    let source_dims = backend.dimensions(source);
    let fill = calculate_fill_dimensions(source_dims, target);
    debug!(%source_dims, %fill, %target, "background fill");

    let filled = backend.resize(source, fill)?;
    let cropped = backend.crop(&filled, center_offset(fill, target), target)?;
    drop(filled);

    let blurred = backend.blur(&cropped, params.blur)?;
    let rippled = backend.wave(&blurred, params.wave)?;
    let smoothed = backend.blur(&rippled, params.blur)?;
    let muted = backend.modulate(&smoothed, params.modulation)?;

    Ok(Layer {
        dims: backend.dimensions(&muted),
        raster: muted,
        offset: Offset { x: 0, y: 0 },
    })
}

/// Scale the source to fit entirely inside `target`, centered.
///
/// Sources that already have the fitted size are copied rather than resampled.
pub fn fit_foreground<B: ImageBackend>(
    backend: &B,
    source: &B::Raster,
    target: Dimensions,
) -> Result<Layer<B::Raster>> {
    let source_dims = backend.dimensions(source);
    let fitted = calculate_fit_dimensions(source_dims, target);
    let offset = center_offset(target, fitted);
    debug!(%source_dims, %fitted, x = offset.x, y = offset.y, "foreground fit");

    let raster = if fitted == source_dims {
        source.clone()
    } else {
        backend.resize(source, fitted)?
    };

    Ok(Layer {
        raster,
        dims: fitted,
        offset,
    })
}

/// Place `foreground` over `background` at the foreground's offset.
///
/// The result always has the background's dimensions.
pub fn compose<B: ImageBackend>(
    backend: &B,
    background: &Layer<B::Raster>,
    foreground: &Layer<B::Raster>,
) -> Result<B::Raster> {
    let right = foreground.offset.x.checked_add(foreground.dims.width);
    let bottom = foreground.offset.y.checked_add(foreground.dims.height);
    let inside = right.is_some_and(|r| r <= background.dims.width)
        && bottom.is_some_and(|b| b <= background.dims.height);
    if !inside {
        return Err(BackendError::ProcessingFailed(format!(
            "Foreground {} at +{}+{} does not fit canvas {}",
            foreground.dims, foreground.offset.x, foreground.offset.y, background.dims
        )));
    }

    backend.overlay(&background.raster, &foreground.raster, foreground.offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, MockRaster, RecordedOp};

    fn raster(width: u32, height: u32) -> MockRaster {
        MockRaster {
            dims: Dimensions::new(width, height),
        }
    }

    // =========================================================================
    // synthesize_background
    // =========================================================================

    #[test]
    fn background_applies_steps_in_order() {
        let backend = MockBackend::new();
        let layer = synthesize_background(
            &backend,
            &raster(4000, 2000),
            Dimensions::new(4000, 2250),
            &BackgroundParams::default(),
        )
        .unwrap();

        assert_eq!(layer.dims, Dimensions::new(4000, 2250));
        assert_eq!(layer.offset, Offset { x: 0, y: 0 });
        assert_eq!(
            backend.get_operations(),
            vec![
                RecordedOp::Resize {
                    width: 4500,
                    height: 2250
                },
                RecordedOp::Crop {
                    x: 250,
                    y: 0,
                    width: 4000,
                    height: 2250
                },
                RecordedOp::Blur(95.0),
                RecordedOp::Wave {
                    amplitude: 4.0,
                    wavelength: 40.0
                },
                RecordedOp::Blur(95.0),
                RecordedOp::Modulate {
                    brightness: 80.0,
                    saturation: 90.0,
                    hue: 100.0
                },
            ]
        );
    }

    #[test]
    fn background_portrait_crops_vertically() {
        let backend = MockBackend::new();
        let layer = synthesize_background(
            &backend,
            &raster(1000, 2000),
            Dimensions::new(3556, 2000),
            &BackgroundParams::default(),
        )
        .unwrap();

        assert_eq!(layer.dims, Dimensions::new(3556, 2000));
        let ops = backend.get_operations();
        assert_eq!(
            ops[1],
            RecordedOp::Crop {
                x: 0,
                y: 2556,
                width: 3556,
                height: 2000
            }
        );
    }

    #[test]
    fn background_engine_failure_propagates() {
        let backend = MockBackend::new().failing_on("wave");
        let result = synthesize_background(
            &backend,
            &raster(800, 600),
            Dimensions::new(1920, 1080),
            &BackgroundParams::default(),
        );
        assert!(result.is_err());
        // Nothing runs after the failing step
        assert!(!backend
            .get_operations()
            .iter()
            .any(|op| matches!(op, RecordedOp::Modulate { .. })));
    }

    // =========================================================================
    // fit_foreground
    // =========================================================================

    #[test]
    fn foreground_landscape_scenario_is_copied() {
        let backend = MockBackend::new();
        let layer =
            fit_foreground(&backend, &raster(4000, 2000), Dimensions::new(4000, 2250)).unwrap();

        assert_eq!(layer.dims, Dimensions::new(4000, 2000));
        assert_eq!(layer.offset, Offset { x: 0, y: 125 });
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn foreground_portrait_scenario() {
        let backend = MockBackend::new();
        let layer =
            fit_foreground(&backend, &raster(1000, 2000), Dimensions::new(3556, 2000)).unwrap();

        assert_eq!(layer.dims, Dimensions::new(1000, 2000));
        assert_eq!(layer.offset, Offset { x: 1278, y: 0 });
    }

    #[test]
    fn foreground_small_source_is_resized() {
        let backend = MockBackend::new();
        let layer =
            fit_foreground(&backend, &raster(800, 600), Dimensions::new(1920, 1080)).unwrap();

        assert_eq!(layer.dims, Dimensions::new(1440, 1080));
        assert_eq!(layer.offset, Offset { x: 240, y: 0 });
        assert_eq!(
            backend.get_operations(),
            vec![RecordedOp::Resize {
                width: 1440,
                height: 1080
            }]
        );
    }

    // =========================================================================
    // compose
    // =========================================================================

    #[test]
    fn compose_keeps_canvas_dimensions() {
        let backend = MockBackend::new();
        let target = Dimensions::new(4000, 2250);
        let source = raster(4000, 2000);
        let bg =
            synthesize_background(&backend, &source, target, &BackgroundParams::default()).unwrap();
        let fg = fit_foreground(&backend, &source, target).unwrap();

        let result = compose(&backend, &bg, &fg).unwrap();
        assert_eq!(result.dims, target);
        assert_eq!(
            backend.get_operations().last(),
            Some(&RecordedOp::Overlay { x: 0, y: 125 })
        );
    }

    #[test]
    fn compose_rejects_oversized_foreground() {
        let backend = MockBackend::new();
        let bg = Layer {
            raster: raster(100, 100),
            dims: Dimensions::new(100, 100),
            offset: Offset { x: 0, y: 0 },
        };
        let fg = Layer {
            raster: raster(80, 80),
            dims: Dimensions::new(80, 80),
            offset: Offset { x: 30, y: 0 },
        };
        assert!(compose(&backend, &bg, &fg).is_err());
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn compose_overlay_failure_propagates() {
        let backend = MockBackend::new().failing_on("overlay");
        let bg = Layer {
            raster: raster(10, 10),
            dims: Dimensions::new(10, 10),
            offset: Offset { x: 0, y: 0 },
        };
        let fg = Layer {
            raster: raster(4, 4),
            dims: Dimensions::new(4, 4),
            offset: Offset { x: 3, y: 3 },
        };
        assert!(compose(&backend, &bg, &fg).is_err());
    }
}
