//! Image processing, pure Rust on top of the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode / encode** | `image` crate codecs (JPEG, PNG, BMP, TIFF) |
//! | **Fill / fit resize** | Lanczos3 `resize_exact` + `crop_imm` |
//! | **Backdrop** | `fast_blur` + sine wave + HSL modulation |
//! | **Composite** | `imageops::overlay` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for frame geometry (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Background, foreground and composite built on the backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{
    CanvasPlan, calculate_fill_dimensions, calculate_fit_dimensions, calculate_floor_downscale,
    center_offset, is_already_target, plan_canvas, scale_dimensions,
};
pub use operations::{Layer, compose, fit_foreground, synthesize_background};
pub use params::{BackgroundParams, Blur, FrameSpec, Modulation, Offset, Quality, Wave};
pub use rust_backend::{RustBackend, supported_input_extensions};
