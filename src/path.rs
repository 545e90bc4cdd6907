//! Directory helpers for resolving names relative to the file being parsed.

use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

/// Everything up to and including the last directory separator, or `None`
/// when `path` has no directory part.
pub fn directory_of(path: &str) -> Option<String> {
    path.rfind(MAIN_SEPARATOR)
        .map(|pos| path[..pos + MAIN_SEPARATOR.len_utf8()].to_string())
}

/// Prefix `filename` with `directory`, which is expected to end in a separator.
pub fn join(directory: Option<&str>, filename: &str) -> String {
    match directory {
        Some(dir) => format!("{dir}{filename}"),
        None => filename.to_string(),
    }
}

/// Lexically normalize `path`: drop `.` segments and fold `name/..` pairs.
///
/// Symlinks are not resolved, so two spellings of one file compare equal only
/// when they differ by such segments.
pub fn normalize(path: &str) -> String {
    let mut out = PathBuf::new();
    for component in Path::new(path).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    if out.as_os_str().is_empty() {
        return ".".to_string();
    }
    out.to_string_lossy().into_owned()
}
