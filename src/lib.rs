//! # Meuralize
//!
//! Reframes photos for 16:9 digital art frames. Every supported image in a
//! folder that is not already 16:9 gets a sibling `<name>-meural.<ext>`: the
//! untouched original, scaled to fit and centered, laid over a backdrop built
//! from the photo itself (fill-cropped, blurred, rippled, blurred again and
//! muted). Outputs are then pushed under a per-file size limit.
//!
//! # Pipeline
//!
//! ```text
//! folder ─► scan ─► for each file, one at a time:
//!     decode ─► ratio check ─► canvas plan ─► background + foreground
//!            ─► composite ─► write ─► size governor ─► report line
//! ```
//!
//! A failure in one file is reported and the batch moves on. Only an invalid
//! folder or configuration ends the run early.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Non-recursive listing of supported images in the input folder |
//! | [`process`] | Per-file pipeline, batch loop, progress events and JSON report |
//! | [`governor`] | Size governor: downscale, JPEG quality ladder, last-resort shrink |
//! | [`imaging`] | Frame geometry, raster engine trait, `image`-crate backend, layer operations |
//! | [`config`] | Run configuration with stock defaults and validation |
//! | [`naming`] | `<stem>-meural.<ext>` output naming |
//! | [`output`] | CLI output formatting for progress events |
//!
//! # Canvas Geometry
//!
//! Landscape sources (wider than tall) keep their width and gain height;
//! portrait and square sources keep their height and gain width. Either side
//! is raised to at least 1920x1080. Computed sides are rounded to the nearest
//! pixel, so a 1000x2000 portrait lands on a 3556x2000 canvas.
//!
//! # Pure-Rust Imaging
//!
//! All raster work goes through the [`imaging::ImageBackend`] trait. The
//! production [`imaging::RustBackend`] is built on the `image` crate, so the
//! binary has no ImageMagick or other system library dependency.

pub mod config;
pub mod governor;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod process;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
