//! Per-file reframing pipeline and the batch loop around it.
//!
//! ## One file
//!
//! ```text
//! decode ─► classify ratio ─► (already 16:9? skip)
//!        ─► plan canvas ─► background ─┐
//!                       ─► foreground ─┴► compose ─► write name-meural.ext ─► size governor
//! ```
//!
//! Background and foreground each borrow the decoded source and produce their
//! own raster; the composite is moved into the size governor after the first
//! write.
//!
//! ## Many files
//!
//! Files are processed strictly one after another. Every per-file failure is
//! turned into a [`FileError`], reported, and the loop moves on; only an
//! invalid folder stops the run. Progress is streamed as [`ProcessEvent`]s to
//! a caller-supplied sink, and the run ends with a [`BatchReport`].

use crate::config::{ConfigError, MeuralConfig};
use crate::governor::{self, GovernorError, SizeBudget, SizeReport, Verdict};
use crate::imaging::{
    BackendError, Dimensions, ImageBackend, RustBackend, compose, fit_foreground,
    is_already_target, plan_canvas, synthesize_background,
};
use crate::naming;
use crate::scan::{self, ScanError};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors that stop the whole run before any file is touched.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Pipeline stage a raster-engine failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Background,
    Foreground,
    Composite,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Stage::Background => "Background",
            Stage::Foreground => "Foreground",
            Stage::Composite => "Composite",
        })
    }
}

/// Why a single file could not be reframed.
#[derive(Error, Debug)]
pub enum FileError {
    #[error("Invalid file path: {0}")]
    InvalidPath(PathBuf),
    #[error("{0}")]
    Decode(#[source] BackendError),
    #[error("Invalid image dimensions: {0}")]
    InvalidDimensions(Dimensions),
    #[error("{stage} stage failed: {source}")]
    Pipeline {
        stage: Stage,
        #[source]
        source: BackendError,
    },
    #[error("Could not generate output path for {0}")]
    OutputPath(PathBuf),
    #[error("Could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
    #[error(transparent)]
    SizeGovernor(#[from] GovernorError),
}

impl FileError {
    /// Message of the innermost error in the source chain.
    pub fn root_cause(&self) -> String {
        let mut err: &dyn std::error::Error = self;
        while let Some(next) = err.source() {
            err = next;
        }
        err.to_string()
    }
}

/// What happened to a file that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    /// Already the target ratio; nothing written.
    Skipped { ratio: f64 },
    Reframed {
        output: PathBuf,
        ratio: f64,
        canvas: Dimensions,
        size: SizeReport,
    },
}

/// Progress notifications, in the order they occur.
#[derive(Debug)]
pub enum ProcessEvent {
    NoImages {
        folder: PathBuf,
    },
    Discovered {
        count: usize,
    },
    FileStarted {
        index: usize,
        total: usize,
        name: String,
    },
    Skipped,
    Reframing {
        ratio: f64,
    },
    Saved {
        output: PathBuf,
        size: SizeReport,
        budget: SizeBudget,
    },
    Failed {
        name: String,
        error: FileError,
        /// Innermost cause, present when debug output is on.
        cause: Option<String>,
    },
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Skipped,
    Saved,
    Failed,
}

/// Serializable summary of one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub source: PathBuf,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canvas: Option<(u32, u32)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub within_budget: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Serializable summary of a run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub folder: PathBuf,
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub fn count(&self, status: FileStatus) -> usize {
        self.files.iter().filter(|f| f.status == status).count()
    }
}

/// Reframe every supported image in `folder` with the pure-Rust backend.
pub fn process(
    folder: &Path,
    config: &MeuralConfig,
    on_event: impl FnMut(ProcessEvent),
) -> Result<BatchReport, ProcessError> {
    process_with_backend(&RustBackend::new(), folder, config, on_event)
}

/// Process a folder using a specific backend (allows testing with mock).
pub fn process_with_backend<B: ImageBackend>(
    backend: &B,
    folder: &Path,
    config: &MeuralConfig,
    mut on_event: impl FnMut(ProcessEvent),
) -> Result<BatchReport, ProcessError> {
    config.validate()?;
    let images = scan::find_images(folder, &config.extensions)?;

    let mut report = BatchReport {
        folder: folder.to_path_buf(),
        files: Vec::with_capacity(images.len()),
    };

    if images.is_empty() {
        on_event(ProcessEvent::NoImages {
            folder: folder.to_path_buf(),
        });
        return Ok(report);
    }

    let total = images.len();
    on_event(ProcessEvent::Discovered { count: total });

    for (i, path) in images.iter().enumerate() {
        let name = display_name(path);
        on_event(ProcessEvent::FileStarted {
            index: i + 1,
            total,
            name: name.clone(),
        });

        let file_report = match process_file(backend, path, config, &mut on_event) {
            Ok(FileOutcome::Skipped { ratio }) => {
                on_event(ProcessEvent::Skipped);
                FileReport {
                    aspect_ratio: Some(ratio),
                    ..FileReport::new(path, FileStatus::Skipped)
                }
            }
            Ok(FileOutcome::Reframed {
                output,
                ratio,
                canvas,
                size,
            }) => {
                let file_report = FileReport {
                    aspect_ratio: Some(ratio),
                    output: Some(output.clone()),
                    canvas: Some((canvas.width, canvas.height)),
                    initial_bytes: Some(size.initial_bytes),
                    final_bytes: Some(size.final_bytes),
                    within_budget: Some(size.verdict != Verdict::Exhausted),
                    ..FileReport::new(path, FileStatus::Saved)
                };
                on_event(ProcessEvent::Saved {
                    output,
                    size,
                    budget: config.budget,
                });
                file_report
            }
            Err(error) => {
                let file_report = FileReport {
                    error: Some(error.to_string()),
                    ..FileReport::new(path, FileStatus::Failed)
                };
                let cause = config.debug.then(|| error.root_cause());
                on_event(ProcessEvent::Failed { name, error, cause });
                file_report
            }
        };
        report.files.push(file_report);
    }

    on_event(ProcessEvent::Completed);
    Ok(report)
}

/// Run the full pipeline for one image.
///
/// Emits [`ProcessEvent::Reframing`] once the image is known to need work;
/// the caller reports the final outcome.
pub fn process_file<B: ImageBackend>(
    backend: &B,
    path: &Path,
    config: &MeuralConfig,
    on_event: &mut impl FnMut(ProcessEvent),
) -> Result<FileOutcome, FileError> {
    if !path.is_file() {
        return Err(FileError::InvalidPath(path.to_path_buf()));
    }

    let source = backend.decode(path).map_err(FileError::Decode)?;
    let source_dims = backend.dimensions(&source);
    if !source_dims.is_valid() {
        return Err(FileError::InvalidDimensions(source_dims));
    }

    let ratio = source_dims.aspect_ratio();
    if is_already_target(ratio, &config.frame) {
        debug!(path = %path.display(), ratio, "already target ratio");
        return Ok(FileOutcome::Skipped { ratio });
    }
    on_event(ProcessEvent::Reframing { ratio });

    let plan = plan_canvas(source_dims, &config.frame);
    debug!(%source_dims, target = %plan.target, "canvas planned");

    let background = synthesize_background(backend, &source, plan.target, &config.background)
        .map_err(|source| FileError::Pipeline {
            stage: Stage::Background,
            source,
        })?;
    let foreground =
        fit_foreground(backend, &source, plan.target).map_err(|source| FileError::Pipeline {
            stage: Stage::Foreground,
            source,
        })?;

    let composite =
        compose(backend, &background, &foreground).map_err(|source| FileError::Pipeline {
            stage: Stage::Composite,
            source,
        })?;

    let output = naming::output_path(path, &config.output_suffix)
        .ok_or_else(|| FileError::OutputPath(path.to_path_buf()))?;

    backend
        .encode(&composite, &output, None)
        .map_err(|source| FileError::Write {
            path: output.clone(),
            source,
        })?;

    let size = governor::enforce(backend, composite, &output, &config.budget)?;

    Ok(FileOutcome::Reframed {
        output,
        ratio,
        canvas: plan.target,
        size,
    })
}

impl FileReport {
    fn new(source: &Path, status: FileStatus) -> Self {
        Self {
            source: source.to_path_buf(),
            status,
            aspect_ratio: None,
            output: None,
            canvas: None,
            initial_bytes: None,
            final_bytes: None,
            within_budget: None,
            error: None,
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
