//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides how a frame is built) and the [`backend`](super::backend)
//! (which does the actual pixel work). This separation allows swapping backends
//! (e.g. for testing with a mock) without changing operation logic.
//!
//! ## Types
//!
//! - [`Quality`] — Lossy encoding quality (1–100, default 92). Clamped on construction.
//! - [`FrameSpec`] — Target aspect ratio, minimum canvas and ratio tolerance.
//! - [`Blur`] — Gaussian blur strength.
//! - [`Wave`] — Sinusoidal ripple amplitude and wavelength.
//! - [`Modulation`] — Brightness/saturation/hue percentages (100 = unchanged).
//! - [`BackgroundParams`] — The full backdrop recipe.
//! - [`Offset`] — Placement of one raster over another.

use super::backend::Dimensions;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(92)
    }
}

/// Shape of the output frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSpec {
    /// Aspect ratio as (width, height), e.g. `(16, 9)`.
    pub aspect: (u32, u32),
    /// Smallest canvas ever produced. Width is the floor for landscape
    /// sources, height for portrait ones.
    pub min_canvas: Dimensions,
    /// Two ratios closer than this are considered the same.
    pub tolerance: f64,
}

impl FrameSpec {
    pub fn ratio(&self) -> f64 {
        self.aspect.0 as f64 / self.aspect.1 as f64
    }
}

impl Default for FrameSpec {
    fn default() -> Self {
        Self {
            aspect: (16, 9),
            min_canvas: Dimensions {
                width: 1920,
                height: 1080,
            },
            tolerance: 0.01,
        }
    }
}

/// Gaussian blur parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blur {
    pub sigma: f32,
}

/// Vertical sine displacement: `dy = amplitude * sin(2π x / wavelength)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wave {
    pub amplitude: f32,
    pub wavelength: f32,
}

/// HSL modulation in percent. `100` leaves a channel untouched.
///
/// Hue follows the usual convention where `0..=200` maps onto a rotation of
/// `-180°..=180°`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Modulation {
    pub brightness: f32,
    pub saturation: f32,
    pub hue: f32,
}

impl Modulation {
    pub fn is_identity(&self) -> bool {
        self.brightness == 100.0 && self.saturation == 100.0 && self.hue == 100.0
    }
}

/// Everything the background synthesizer applies after the fill crop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundParams {
    pub blur: Blur,
    pub wave: Wave,
    pub modulation: Modulation,
}

impl Default for BackgroundParams {
    fn default() -> Self {
        Self {
            blur: Blur { sigma: 95.0 },
            wave: Wave {
                amplitude: 4.0,
                wavelength: 40.0,
            },
            modulation: Modulation {
                brightness: 80.0,
                saturation: 90.0,
                hue: 100.0,
            },
        }
    }
}

/// Top-left placement of a layer, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offset {
    pub x: u32,
    pub y: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_default_is_92() {
        assert_eq!(Quality::default().value(), 92);
    }

    #[test]
    fn default_frame_is_16_by_9_hd() {
        let frame = FrameSpec::default();
        assert!((frame.ratio() - 16.0 / 9.0).abs() < f64::EPSILON);
        assert_eq!(frame.min_canvas.width, 1920);
        assert_eq!(frame.min_canvas.height, 1080);
    }

    #[test]
    fn default_background_recipe() {
        let bg = BackgroundParams::default();
        assert_eq!(bg.blur.sigma, 95.0);
        assert_eq!(bg.wave.amplitude, 4.0);
        assert_eq!(bg.wave.wavelength, 40.0);
        assert_eq!(bg.modulation.brightness, 80.0);
        assert_eq!(bg.modulation.saturation, 90.0);
        assert!(!bg.modulation.is_identity());
    }
}
