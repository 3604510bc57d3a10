//! Filesystem helpers shared by the tasks and the picker.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use super::error::{TaskError, TaskResult};

/// Check the folder field before a task runs.
pub fn validate_folder(folder: &str) -> TaskResult<PathBuf> {
    let folder = folder.trim();
    if folder.is_empty() {
        return Err(TaskError::NoFolder);
    }
    let path = PathBuf::from(folder);
    if !path.is_dir() {
        return Err(TaskError::FolderMissing(path));
    }
    Ok(path)
}

/// Regular files directly inside `dir`, sorted by file name.
///
/// Sub-directories and anything that does not resolve to a plain file are
/// skipped.
pub fn list_files(dir: &Path) -> TaskResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| TaskError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries.flatten() {
        // `Path::is_file` follows symlinks, so linked files are included.
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// One row of the folder / script picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
}

/// Immediate children of `dir` for browsing.
///
/// Directories are sorted before files; within each group entries are sorted
/// alphabetically (case-insensitive).
pub fn list_entries(dir: &Path, show_hidden: bool) -> std::io::Result<Vec<EntryInfo>> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();

    for entry in std::fs::read_dir(dir)?.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if !show_hidden && name.starts_with('.') {
            continue;
        }
        // Follow symlinks so a linked folder can be browsed into.
        let is_dir = entry.path().is_dir();
        let info = EntryInfo {
            path: entry.path(),
            name,
            is_dir,
        };
        if is_dir {
            dirs.push(info);
        } else {
            files.push(info);
        }
    }

    dirs.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    files.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    dirs.extend(files);
    Ok(dirs)
}

/// Extension including the leading dot, or empty. The bytes are kept as-is,
/// so non-UTF-8 extensions survive a rename.
pub fn dotted_extension(path: &Path) -> OsString {
    let mut ext = OsString::new();
    if let Some(e) = path.extension() {
        ext.push(".");
        ext.push(e);
    }
    ext
}

/// `{stem}{ext}`, or `{stem}_{n}{ext}` when a counter is given.
pub fn numbered_name(stem: &OsStr, counter: Option<u32>, ext: &OsStr) -> OsString {
    let mut name = stem.to_os_string();
    if let Some(n) = counter {
        name.push(format!("_{n}"));
    }
    name.push(ext);
    name
}

/// First path in `dir` that does not exist yet: `{stem}{ext}`, then
/// `{stem}_1{ext}`, `{stem}_2{ext}`, …
pub fn available_path(dir: &Path, stem: &OsStr, ext: &OsStr) -> PathBuf {
    let candidate = dir.join(numbered_name(stem, None, ext));
    if !candidate.exists() {
        return candidate;
    }
    let mut counter = 1u32;
    loop {
        let candidate = dir.join(numbered_name(stem, Some(counter), ext));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Lossy display name of the last path component.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
