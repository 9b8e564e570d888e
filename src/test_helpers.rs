//! Shared test utilities for the meuralize test suite.
//!
//! Writes small synthetic images so backend and pipeline tests can run the
//! real codecs without checked-in fixtures.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_photo_folder(&[("wide.jpg", 320, 180), ("tall.png", 90, 160)]);
//! let img = solid_image(4, 4, [255, 0, 0]);
//! ```

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::path::Path;
use tempfile::TempDir;

// =========================================================================
// Raster fixtures
// =========================================================================

/// A single-colour RGB image.
pub fn solid_image(width: u32, height: u32, rgb: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(rgb)))
}

/// A diagonal colour gradient, so encoders have real content to work on.
pub fn gradient_image(width: u32, height: u32) -> DynamicImage {
    let img = RgbImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width.max(1)) as u8;
        let g = (y * 255 / height.max(1)) as u8;
        let b = ((x + y) % 256) as u8;
        Rgb([r, g, b])
    });
    DynamicImage::ImageRgb8(img)
}

/// Write a gradient JPEG of the given size.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    gradient_image(width, height)
        .save_with_format(path, ImageFormat::Jpeg)
        .unwrap();
}

/// Write a gradient PNG of the given size.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    gradient_image(width, height)
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

// =========================================================================
// Folder fixtures
// =========================================================================

/// Create a temp folder holding one synthetic image per `(name, width, height)`.
///
/// The format follows the extension: `.jpg`/`.jpeg` become JPEG, anything
/// else is written through `image`'s extension lookup.
pub fn setup_photo_folder(files: &[(&str, u32, u32)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (name, width, height) in files {
        let path = tmp.path().join(name);
        if crate::naming::is_jpeg(&path) {
            create_test_jpeg(&path, *width, *height);
        } else {
            gradient_image(*width, *height).save(&path).unwrap();
        }
    }
    tmp
}
