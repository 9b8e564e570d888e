//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, BMP, TIFF) | `image::ImageReader` with content sniffing |
//! | Encode JPEG | `image::codecs::jpeg::JpegEncoder` with explicit quality |
//! | Encode PNG, BMP, TIFF | `DynamicImage::write_to` (lossless) |
//! | Resize | `resize_exact` with `Lanczos3` filter |
//! | Crop | `DynamicImage::crop_imm` |
//! | Gaussian blur | `image::imageops::fast_blur` (box approximation) |
//! | Wave | per-pixel vertical sine displacement |
//! | Modulate | per-pixel HSL scaling |
//! | Overlay | `image::imageops::overlay` (alpha "over") |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{Blur, Modulation, Offset, Quality, Wave};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader, RgbImage, Rgba};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Extensions the reframer accepts, paired with the codec that handles them.
const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("bmp", ImageFormat::Bmp),
    ("tiff", ImageFormat::Tiff),
    ("tif", ImageFormat::Tiff),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled() && fmt.writing_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the extensions that can be both decoded and re-encoded.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn output_format(path: &Path) -> Result<ImageFormat, BackendError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    PHOTO_CANDIDATES
        .iter()
        .find(|(candidate, fmt)| *candidate == ext && fmt.writing_enabled())
        .map(|(_, fmt)| *fmt)
        .ok_or(BackendError::UnsupportedFormat(ext))
}

fn encode_error(path: &Path, err: image::ImageError) -> BackendError {
    BackendError::Encode {
        path: PathBuf::from(path),
        source: Box::new(err),
    }
}

impl ImageBackend for RustBackend {
    type Raster = DynamicImage;

    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError> {
        ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| BackendError::Decode {
                path: path.to_path_buf(),
                source: Box::new(e),
            })
    }

    fn dimensions(&self, raster: &DynamicImage) -> Dimensions {
        Dimensions::new(raster.width(), raster.height())
    }

    fn encode(
        &self,
        raster: &DynamicImage,
        path: &Path,
        quality: Option<Quality>,
    ) -> Result<(), BackendError> {
        let format = output_format(path)?;
        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);

        match format {
            ImageFormat::Jpeg => {
                // JPEG has no alpha channel
                let quality = quality.unwrap_or_default().value() as u8;
                let encoder = JpegEncoder::new_with_quality(&mut writer, quality);
                DynamicImage::ImageRgb8(raster.to_rgb8())
                    .write_with_encoder(encoder)
                    .map_err(|e| encode_error(path, e))?;
            }
            other => raster
                .write_to(&mut writer, other)
                .map_err(|e| encode_error(path, e))?,
        }

        writer.flush()?;
        Ok(())
    }

    fn resize(
        &self,
        raster: &DynamicImage,
        size: Dimensions,
    ) -> Result<DynamicImage, BackendError> {
        if !size.is_valid() {
            return Err(BackendError::ProcessingFailed(format!(
                "Cannot resize to {size}"
            )));
        }
        Ok(raster.resize_exact(size.width, size.height, FilterType::Lanczos3))
    }

    fn crop(
        &self,
        raster: &DynamicImage,
        offset: Offset,
        size: Dimensions,
    ) -> Result<DynamicImage, BackendError> {
        let fits_x = offset.x.checked_add(size.width).is_some_and(|r| r <= raster.width());
        let fits_y = offset.y.checked_add(size.height).is_some_and(|b| b <= raster.height());
        if !fits_x || !fits_y {
            return Err(BackendError::ProcessingFailed(format!(
                "Crop {size} at +{}+{} exceeds {}x{}",
                offset.x,
                offset.y,
                raster.width(),
                raster.height()
            )));
        }
        Ok(raster.crop_imm(offset.x, offset.y, size.width, size.height))
    }

    fn blur(&self, raster: &DynamicImage, blur: Blur) -> Result<DynamicImage, BackendError> {
        if blur.sigma <= 0.0 {
            return Ok(raster.clone());
        }
        let rgb = raster.to_rgb8();
        Ok(DynamicImage::ImageRgb8(image::imageops::fast_blur(&rgb, blur.sigma)))
    }

    fn wave(&self, raster: &DynamicImage, wave: Wave) -> Result<DynamicImage, BackendError> {
        if wave.wavelength <= 0.0 {
            return Err(BackendError::ProcessingFailed(format!(
                "Wave wavelength must be positive, got {}",
                wave.wavelength
            )));
        }
        let src = raster.to_rgb8();
        let (w, h) = src.dimensions();
        let max_y = h.saturating_sub(1) as f32;

        let out = RgbImage::from_fn(w, h, |x, y| {
            let phase = std::f32::consts::TAU * x as f32 / wave.wavelength;
            let sy = (y as f32 - wave.amplitude * phase.sin()).round().clamp(0.0, max_y);
            *src.get_pixel(x, sy as u32)
        });
        Ok(DynamicImage::ImageRgb8(out))
    }

    fn modulate(
        &self,
        raster: &DynamicImage,
        modulation: Modulation,
    ) -> Result<DynamicImage, BackendError> {
        if modulation.is_identity() {
            return Ok(raster.clone());
        }
        let mut img = raster.to_rgba8();
        for pixel in img.pixels_mut() {
            let Rgba([r, g, b, a]) = *pixel;
            let (h, s, l) = rgb_to_hsl(r, g, b);
            let h = (h + (modulation.hue - 100.0) / 200.0).rem_euclid(1.0);
            let s = (s * modulation.saturation / 100.0).clamp(0.0, 1.0);
            let l = (l * modulation.brightness / 100.0).clamp(0.0, 1.0);
            let (r, g, b) = hsl_to_rgb(h, s, l);
            *pixel = Rgba([r, g, b, a]);
        }
        Ok(DynamicImage::ImageRgba8(img))
    }

    fn overlay(
        &self,
        background: &DynamicImage,
        foreground: &DynamicImage,
        offset: Offset,
    ) -> Result<DynamicImage, BackendError> {
        let mut canvas = background.to_rgba8();
        let top = foreground.to_rgba8();
        image::imageops::overlay(&mut canvas, &top, offset.x as i64, offset.y as i64);
        Ok(DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8()))
    }
}

/// RGB bytes to HSL, all components in `0.0..=1.0`.
fn rgb_to_hsl(r: u8, g: u8, b: u8) -> (f32, f32, f32) {
    let r = r as f32 / 255.0;
    let g = g as f32 / 255.0;
    let b = b as f32 / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    let delta = max - min;

    if delta == 0.0 {
        return (0.0, 0.0, l);
    }

    let s = if l > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };

    let h = if max == r {
        (g - b) / delta + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };

    (h / 6.0, s, l)
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (u8, u8, u8) {
    let to_byte = |v: f32| (v * 255.0).round().clamp(0.0, 255.0) as u8;

    if s == 0.0 {
        let v = to_byte(l);
        return (v, v, v);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    (
        to_byte(hue_to_channel(p, q, h + 1.0 / 3.0)),
        to_byte(hue_to_channel(p, q, h)),
        to_byte(hue_to_channel(p, q, h - 1.0 / 3.0)),
    )
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
