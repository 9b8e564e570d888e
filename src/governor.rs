//! Size governor: shrink an already-written output file until it fits a byte budget.
//!
//! The only way to know the encoded size is to write the file and stat it, so
//! every strategy overwrites the output path and re-measures. Strategies run
//! in a fixed order and the first one that lands under the budget wins:
//!
//! ```text
//! Downscale ──► Quality 85 ──► Quality 70 ──► Quality 60 ──► Shrink ×0.9 (≤10) ──► Exhausted
//!     │              │              │              │               │
//!     └──────────────┴──────────────┴──────────────┴───────────────┴──► Accepted
//! ```
//!
//! - **Downscale** resizes toward the floor (1920x1080 by default) without
//!   letting the limiting axis drop below it. Skipped when already at the floor.
//! - **Quality ladder** only runs for JPEG outputs. The chosen quality sticks
//!   for any later shrink writes.
//! - **Shrink** scales the current (already reduced) image by 0.9 per round,
//!   at most ten rounds.
//!
//! Running out of strategies is not an error: the last, smallest file stays
//! on disk and the report says [`Verdict::Exhausted`].

use crate::imaging::{
    BackendError, Dimensions, ImageBackend, Quality, calculate_floor_downscale, scale_dimensions,
};
use crate::naming::is_jpeg;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Lossy qualities tried in order for JPEG outputs.
pub const QUALITY_LADDER: [u32; 3] = [85, 70, 60];
/// Per-round scale factor of the last-resort shrink loop.
pub const SHRINK_FACTOR: f64 = 0.9;
/// Upper bound on shrink rounds.
pub const MAX_SHRINK_ROUNDS: u32 = 10;

const BYTES_PER_MB: u64 = 1024 * 1024;

#[derive(Error, Debug)]
pub enum GovernorError {
    #[error("Re-encode failed: {0}")]
    Backend(#[from] BackendError),
    #[error("Could not measure {path}: {source}")]
    Measure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Byte ceiling for one output file, plus the resolution the first strategy
/// shrinks toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeBudget {
    pub max_bytes: u64,
    pub floor: Dimensions,
}

impl SizeBudget {
    /// `None` when the byte count does not fit in a `u64`.
    pub fn from_megabytes(megabytes: u64, floor: Dimensions) -> Option<Self> {
        let max_bytes = megabytes.checked_mul(BYTES_PER_MB)?;
        Some(Self { max_bytes, floor })
    }

    pub fn allows(&self, bytes: u64) -> bool {
        bytes <= self.max_bytes
    }

    /// The ceiling in whole MiB, for messages.
    pub fn max_megabytes(&self) -> u64 {
        self.max_bytes / BYTES_PER_MB
    }
}

impl Default for SizeBudget {
    fn default() -> Self {
        Self {
            max_bytes: 20 * BYTES_PER_MB,
            floor: Dimensions::new(1920, 1080),
        }
    }
}

/// Which reduction produced an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Downscale,
    Quality(u32),
    Shrink { round: u32 },
}

/// One write-and-measure cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
    pub strategy: Strategy,
    pub dims: Dimensions,
    pub quality: Option<Quality>,
    pub bytes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The first write already fit; nothing was touched.
    WithinBudget,
    /// The last attempt brought the file under budget.
    Reduced,
    /// Every strategy ran and the file is still too large.
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeReport {
    pub initial_bytes: u64,
    pub final_bytes: u64,
    pub attempts: Vec<Attempt>,
    pub verdict: Verdict,
}

impl SizeReport {
    /// The attempt that satisfied the budget, if any.
    pub fn accepted_by(&self) -> Option<&Attempt> {
        match self.verdict {
            Verdict::Reduced => self.attempts.last(),
            _ => None,
        }
    }

    /// Whether the shrink loop was entered.
    pub fn reached_shrink(&self) -> bool {
        self.attempts
            .iter()
            .any(|a| matches!(a.strategy, Strategy::Shrink { .. }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Downscale,
    Quality(usize),
    Shrink(u32),
    Accepted,
    Exhausted,
}

struct Governor<'a, B: ImageBackend> {
    backend: &'a B,
    path: &'a Path,
    budget: &'a SizeBudget,
    jpeg: bool,
    current: B::Raster,
    quality: Option<Quality>,
    attempts: Vec<Attempt>,
}

impl<B: ImageBackend> Governor<'_, B> {
    /// Write the current raster, measure it and record the attempt.
    /// Returns whether the budget is now met.
    fn attempt(&mut self, strategy: Strategy) -> Result<bool, GovernorError> {
        self.backend.encode(&self.current, self.path, self.quality)?;
        let bytes = measure(self.path)?;
        let dims = self.backend.dimensions(&self.current);
        debug!(?strategy, %dims, bytes, "size governor attempt");

        self.attempts.push(Attempt {
            strategy,
            dims,
            quality: self.quality,
            bytes,
        });
        Ok(self.budget.allows(bytes))
    }

    fn after_downscale(&self) -> State {
        if self.jpeg {
            State::Quality(0)
        } else {
            State::Shrink(0)
        }
    }

    fn step(&mut self, state: State) -> Result<State, GovernorError> {
        let next = match state {
            State::Downscale => {
                let dims = self.backend.dimensions(&self.current);
                match calculate_floor_downscale(dims, self.budget.floor) {
                    Some(size) => {
                        self.current = self.backend.resize(&self.current, size)?;
                        if self.attempt(Strategy::Downscale)? {
                            State::Accepted
                        } else {
                            self.after_downscale()
                        }
                    }
                    None => self.after_downscale(),
                }
            }
            State::Quality(rung) => {
                let value = QUALITY_LADDER[rung];
                self.quality = Some(Quality::new(value));
                if self.attempt(Strategy::Quality(value))? {
                    State::Accepted
                } else if rung + 1 < QUALITY_LADDER.len() {
                    State::Quality(rung + 1)
                } else {
                    State::Shrink(0)
                }
            }
            State::Shrink(round) if round >= MAX_SHRINK_ROUNDS => State::Exhausted,
            State::Shrink(round) => {
                let dims = self.backend.dimensions(&self.current);
                let size = scale_dimensions(dims, SHRINK_FACTOR);
                self.current = self.backend.resize(&self.current, size)?;
                if self.attempt(Strategy::Shrink { round: round + 1 })? {
                    State::Accepted
                } else {
                    State::Shrink(round + 1)
                }
            }
            terminal @ (State::Accepted | State::Exhausted) => terminal,
        };
        Ok(next)
    }
}

/// Bring the file at `path` under `budget`, re-encoding `image` as needed.
///
/// `image` must be the raster that was just written to `path`. JPEG handling
/// is decided by the path's extension.
pub fn enforce<B: ImageBackend>(
    backend: &B,
    image: B::Raster,
    path: &Path,
    budget: &SizeBudget,
) -> Result<SizeReport, GovernorError> {
    let initial_bytes = measure(path)?;
    if budget.allows(initial_bytes) {
        return Ok(SizeReport {
            initial_bytes,
            final_bytes: initial_bytes,
            attempts: Vec::new(),
            verdict: Verdict::WithinBudget,
        });
    }

    debug!(path = %path.display(), initial_bytes, max_bytes = budget.max_bytes, "over budget");

    let mut governor = Governor {
        backend,
        path,
        budget,
        jpeg: is_jpeg(path),
        current: image,
        quality: None,
        attempts: Vec::new(),
    };

    let mut state = State::Downscale;
    while !matches!(state, State::Accepted | State::Exhausted) {
        state = governor.step(state)?;
    }

    let final_bytes = governor
        .attempts
        .last()
        .map_or(initial_bytes, |a| a.bytes);
    let verdict = if state == State::Accepted {
        Verdict::Reduced
    } else {
        warn!(path = %path.display(), final_bytes, "size budget not reached");
        Verdict::Exhausted
    };

    Ok(SizeReport {
        initial_bytes,
        final_bytes,
        attempts: governor.attempts,
        verdict,
    })
}

fn measure(path: &Path) -> Result<u64, GovernorError> {
    std::fs::metadata(path)
        .map(|m| m.len())
        .map_err(|source| GovernorError::Measure {
            path: path.to_path_buf(),
            source,
        })
}
