//! Output file naming.
//!
//! Every reframed image is written next to its source with a suffix inserted
//! before the extension, keeping the original format:
//!
//! - `sunset.jpg` → `sunset-meural.jpg`
//! - `scans/Page 3.TIFF` → `scans/Page 3-meural.TIFF`
//! - `archive.tar.png` → `archive.tar-meural.png`

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Default suffix appended to output file stems.
pub const DEFAULT_SUFFIX: &str = "-meural";

/// Build the sibling output path for `source`.
///
/// Returns `None` when the path has no file name to derive from
/// (e.g. `/` or `..`).
pub fn output_path(source: &Path, suffix: &str) -> Option<PathBuf> {
    let stem = source.file_stem()?;

    let mut name = OsString::from(stem);
    name.push(suffix);
    if let Some(ext) = source.extension() {
        name.push(".");
        name.push(ext);
    }

    Some(match source.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    })
}

/// Whether the path's extension is in the JPEG family (`.jpg`, `.jpeg`, any case).
pub fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"))
}
