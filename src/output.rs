//! CLI output formatting for the reframing run.
//!
//! # Output Format
//!
//! ```text
//! Found 3 image(s) to process...
//!
//! Processing 1/3: beach.jpg
//!   ✓ Already 16:9 aspect ratio, skipping
//!
//! Processing 2/3: tower.jpg
//!   → Creating Meural version (aspect ratio: 0.67)
//!     → File size 31.2MB exceeds limit, optimizing...
//!     → Reduced to 18.4MB by adjusting quality to 85%
//!   ✓ Saved: tower-meural.jpg (18.4MB)
//!
//! Processing 3/3: broken.png
//!   ✗ Error processing broken.png: Failed to decode ...
//!
//! Processing complete!
//! ```
//!
//! # Architecture
//!
//! [`format_process_event`] turns one event into display lines (pure, no
//! I/O); [`print_process_event`] writes them to stdout. Errors go to stdout
//! too, in sequence with the progress they belong to.

use crate::governor::{SizeBudget, SizeReport, Strategy, Verdict};
use crate::process::ProcessEvent;
use std::path::Path;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Bytes as megabytes with one decimal: `20971520` → `20.0MB`.
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.1}MB", bytes as f64 / BYTES_PER_MB)
}

/// Aspect ratio rounded to two decimals, trailing zeros dropped but at
/// least one kept: `2.0`, `0.5`, `1.33`.
pub fn format_ratio(ratio: f64) -> String {
    let rounded = (ratio * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.1}")
    } else {
        rounded.to_string()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Governor narration for one saved file. Empty when the first write fit.
pub fn format_size_report(report: &SizeReport, budget: &SizeBudget) -> Vec<String> {
    if report.verdict == Verdict::WithinBudget {
        return Vec::new();
    }

    let mut lines = vec![format!(
        "    → File size {} exceeds limit, optimizing...",
        format_megabytes(report.initial_bytes)
    )];

    if report.reached_shrink() {
        lines.push("    → As last resort, resizing below minimum dimensions...".to_string());
    }

    if let Some(accepted) = report.accepted_by() {
        let how = match accepted.strategy {
            Strategy::Quality(q) => format!("adjusting quality to {q}%"),
            Strategy::Downscale | Strategy::Shrink { .. } => {
                format!("resizing to {}", accepted.dims)
            }
        };
        lines.push(format!(
            "    → Reduced to {} by {how}",
            format_megabytes(accepted.bytes)
        ));
    }

    if report.verdict == Verdict::Exhausted {
        lines.push(format!(
            "    → Warning: Could not reduce below {}MB limit (final: {})",
            budget.max_megabytes(),
            format_megabytes(report.final_bytes)
        ));
    }

    lines
}

/// Format a single progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::NoImages { folder } => {
            vec![format!(
                "No supported image files found in {}",
                folder.display()
            )]
        }
        ProcessEvent::Discovered { count } => {
            vec![format!("Found {count} image(s) to process...")]
        }
        ProcessEvent::FileStarted { index, total, name } => {
            vec![String::new(), format!("Processing {index}/{total}: {name}")]
        }
        ProcessEvent::Skipped => {
            vec!["  ✓ Already 16:9 aspect ratio, skipping".to_string()]
        }
        ProcessEvent::Reframing { ratio } => {
            vec![format!(
                "  → Creating Meural version (aspect ratio: {})",
                format_ratio(*ratio)
            )]
        }
        ProcessEvent::Saved {
            output,
            size,
            budget,
        } => {
            let mut lines = format_size_report(size, budget);
            lines.push(format!(
                "  ✓ Saved: {} ({})",
                file_name(output),
                format_megabytes(size.final_bytes)
            ));
            lines
        }
        ProcessEvent::Failed { name, error, cause } => {
            let mut lines = vec![format!("  ✗ Error processing {name}: {error}")];
            if let Some(cause) = cause {
                lines.push(format!("    Debug: {cause}"));
            }
            lines
        }
        ProcessEvent::Completed => {
            vec![String::new(), "Processing complete!".to_string()]
        }
    }
}

pub fn print_process_event(event: &ProcessEvent) {
    for line in format_process_event(event) {
        println!("{line}");
    }
}
