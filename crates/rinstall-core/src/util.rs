//! Filesystem helpers.

use std::fs;
use std::path::Path;

/// Whether anything exists at `path`. Broken symlinks and paths that cannot
/// be inspected count as missing.
///
/// # Examples
///
/// ```
/// use rinstall_core::util::exists;
///
/// assert!(exists(env!("CARGO_MANIFEST_DIR")));
/// assert!(!exists("/this/path/does/not/exist"));
/// ```
pub fn exists(path: impl AsRef<Path>) -> bool {
    fs::metadata(path).is_ok()
}
