//! Run configuration.
//!
//! Every tunable of a run lives in one immutable [`MeuralConfig`], built at
//! startup from stock defaults plus command-line overrides, validated once,
//! then passed by reference into the pipeline. Nothing mutates it afterwards.
//!
//! ## Stock defaults
//!
//! ```text
//! frame        16:9, minimum canvas 1920x1080, ratio tolerance 0.01
//! budget       20 MiB per output file, downscale floor 1920x1080
//! background   blur sigma 95, wave 4x40, modulate 80/90/100
//! suffix       -meural
//! extensions   jpg jpeg png bmp tiff tif
//! ```

use crate::governor::SizeBudget;
use crate::imaging::{BackgroundParams, FrameSpec, supported_input_extensions};
use crate::naming::DEFAULT_SUFFIX;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration for one reframing run.
#[derive(Debug, Clone)]
pub struct MeuralConfig {
    /// Output frame shape.
    pub frame: FrameSpec,
    /// Per-file size ceiling and downscale floor.
    pub budget: SizeBudget,
    /// Backdrop recipe.
    pub background: BackgroundParams,
    /// Inserted between stem and extension of output files.
    pub output_suffix: String,
    /// Lowercase extensions (without dot) picked up by the folder scan.
    pub extensions: Vec<String>,
    /// Print the innermost cause under each per-file error.
    pub debug: bool,
}

impl Default for MeuralConfig {
    fn default() -> Self {
        Self {
            frame: FrameSpec::default(),
            budget: SizeBudget::default(),
            background: BackgroundParams::default(),
            output_suffix: DEFAULT_SUFFIX.to_string(),
            extensions: supported_input_extensions()
                .iter()
                .map(|e| e.to_string())
                .collect(),
            debug: false,
        }
    }
}

impl MeuralConfig {
    /// Override the size ceiling, in MiB.
    pub fn with_max_size_mb(mut self, megabytes: u64) -> Result<Self, ConfigError> {
        self.budget = SizeBudget::from_megabytes(megabytes, self.budget.floor).ok_or_else(|| {
            ConfigError::Validation(format!("size limit of {megabytes}MB is too large"))
        })?;
        Ok(self)
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (aw, ah) = self.frame.aspect;
        if aw == 0 || ah == 0 {
            return Err(ConfigError::Validation(format!(
                "frame aspect must be non-zero, got {aw}:{ah}"
            )));
        }
        if !self.frame.min_canvas.is_valid() {
            return Err(ConfigError::Validation(format!(
                "minimum canvas must be non-zero, got {}",
                self.frame.min_canvas
            )));
        }
        if self.frame.tolerance.is_nan() || self.frame.tolerance <= 0.0 {
            return Err(ConfigError::Validation(
                "ratio tolerance must be positive".into(),
            ));
        }
        if self.budget.max_bytes == 0 {
            return Err(ConfigError::Validation(
                "size budget must be greater than zero".into(),
            ));
        }
        if !self.budget.floor.is_valid() {
            return Err(ConfigError::Validation(format!(
                "downscale floor must be non-zero, got {}",
                self.budget.floor
            )));
        }
        if self.output_suffix.is_empty() {
            return Err(ConfigError::Validation(
                "output suffix must not be empty".into(),
            ));
        }
        if self.background.wave.wavelength <= 0.0 {
            return Err(ConfigError::Validation(
                "wave wavelength must be positive".into(),
            ));
        }
        let supported = supported_input_extensions();
        if let Some(ext) = self
            .extensions
            .iter()
            .find(|e| !supported.contains(&e.as_str()))
        {
            return Err(ConfigError::Validation(format!(
                "extension '{ext}' has no codec compiled in"
            )));
        }
        Ok(())
    }
}
