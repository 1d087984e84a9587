//! Executable lookup shared by the engine adapters.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Resolve `bin` against a `PATH`-style list of directories.
///
/// Path-like values (containing a separator) are checked directly instead of
/// searched.
pub(crate) fn find_executable_in(bin: &str, paths: Option<&OsStr>) -> Option<PathBuf> {
    if bin.is_empty() {
        return None;
    }
    if bin.contains(std::path::MAIN_SEPARATOR) {
        let p = PathBuf::from(bin);
        return if is_executable(&p) { Some(p) } else { None };
    }

    for dir in std::env::split_paths(paths?) {
        let candidate = dir.join(bin);
        if is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
