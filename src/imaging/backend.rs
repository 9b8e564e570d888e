//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the raster engine the reframing pipeline is
//! written against: decode, encode, resize, crop, blur, wave, modulate and
//! overlay. Rasters are opaque to the pipeline (`Self::Raster`); every
//! operation borrows its input and returns a freshly owned raster, so the
//! decoded source is never aliased or mutated by the layers derived from it.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), pure Rust, built on the
//! `image` crate. Tests use the `MockBackend` in this module, whose rasters
//! carry dimensions only.

use super::params::{Blur, Modulation, Offset, Quality, Wave};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("Failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Pixel dimensions of a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Both sides are non-zero.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Component-wise `<=`.
    pub fn fits_within(&self, other: Dimensions) -> bool {
        self.width <= other.width && self.height <= other.height
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// The raster engine used by the reframing pipeline.
///
/// Every operation is atomic: it either returns a complete new raster or a
/// [`BackendError`]. Implementations must not mutate their inputs.
pub trait ImageBackend {
    /// Decoded pixel data owned by the engine. Cloning yields an
    /// independent copy.
    type Raster: Clone;

    /// Decode an image file.
    fn decode(&self, path: &Path) -> Result<Self::Raster, BackendError>;

    /// Dimensions of a decoded raster.
    fn dimensions(&self, raster: &Self::Raster) -> Dimensions;

    /// Encode to `path`, format chosen by extension. `quality` only applies
    /// to lossy formats; `None` means the engine default.
    fn encode(
        &self,
        raster: &Self::Raster,
        path: &Path,
        quality: Option<Quality>,
    ) -> Result<(), BackendError>;

    /// Resize to exactly `size`, ignoring the source aspect ratio.
    fn resize(&self, raster: &Self::Raster, size: Dimensions) -> Result<Self::Raster, BackendError>;

    /// Cut a `size` region whose top-left corner is at `offset`.
    fn crop(
        &self,
        raster: &Self::Raster,
        offset: Offset,
        size: Dimensions,
    ) -> Result<Self::Raster, BackendError>;

    fn blur(&self, raster: &Self::Raster, blur: Blur) -> Result<Self::Raster, BackendError>;

    /// Ripple distortion. Output dimensions equal input dimensions.
    fn wave(&self, raster: &Self::Raster, wave: Wave) -> Result<Self::Raster, BackendError>;

    fn modulate(
        &self,
        raster: &Self::Raster,
        modulation: Modulation,
    ) -> Result<Self::Raster, BackendError>;

    /// Alpha-blend `foreground` over `background` at `offset`. The result has
    /// the background's dimensions and is fully opaque.
    fn overlay(
        &self,
        background: &Self::Raster,
        foreground: &Self::Raster,
        offset: Offset,
    ) -> Result<Self::Raster, BackendError>;
}
