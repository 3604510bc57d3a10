//! Bulk rename: give every file in a folder a sequential name.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use super::error::{TaskError, TaskResult};
use super::fs::{self, dotted_extension, file_name, numbered_name};
use super::task::Severity;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenameSummary {
    pub renamed: usize,
    /// Files that already had their target name.
    pub unchanged: usize,
}

/// Rename the top-level files of `folder` to `{prefix}_{NNN}{ext}`.
///
/// Files are numbered from 1 in name order. An existing target gets a
/// `_1`, `_2`, … suffix, so nothing is ever overwritten.
pub fn rename_files(
    folder: &Path,
    prefix: &str,
    mut report: impl FnMut(Severity, String),
) -> TaskResult<RenameSummary> {
    report(Severity::Info, "Starting file rename...".into());

    let files = fs::list_files(folder)?;
    let mut summary = RenameSummary::default();
    if files.is_empty() {
        report(Severity::Warning, "No files found to rename".into());
        return Ok(summary);
    }

    for (i, old_path) in files.iter().enumerate() {
        let ext = dotted_extension(old_path);
        let stem = format!("{prefix}_{:03}", i + 1);
        let new_path = target_path(folder, old_path, OsStr::new(&stem), &ext);
        let old_name = file_name(old_path);

        if &new_path == old_path {
            summary.unchanged += 1;
            report(Severity::Info, format!("Already named: {old_name}"));
            continue;
        }

        std::fs::rename(old_path, &new_path).map_err(|e| TaskError::io(old_path, e))?;
        summary.renamed += 1;
        report(
            Severity::Info,
            format!("Renamed: {old_name} -> {}", file_name(&new_path)),
        );
    }

    report(Severity::Success, "Rename completed successfully.".into());
    Ok(summary)
}

/// Target for `source`: the first of `{stem}{ext}`, `{stem}_1{ext}`, … that is
/// either free or already `source` itself.
fn target_path(folder: &Path, source: &Path, stem: &OsStr, ext: &OsStr) -> PathBuf {
    let candidate = folder.join(numbered_name(stem, None, ext));
    if candidate == source || !candidate.exists() {
        return candidate;
    }
    let mut counter = 1u32;
    loop {
        let candidate = folder.join(numbered_name(stem, Some(counter), ext));
        if candidate == source || !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs as stdfs;

    fn names(dir: &Path) -> Vec<String> {
        fs::list_files(dir).unwrap().iter().map(|p| file_name(p)).collect()
    }

    #[test]
    fn numbers_every_file_uniquely() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["b.txt", "a.JPG", "c", "d.tar.gz"] {
            stdfs::write(tmp.path().join(name), name).unwrap();
        }

        let summary = rename_files(tmp.path(), "document", |_, _| {}).unwrap();
        assert_eq!(summary.renamed, 4);

        let got = names(tmp.path());
        let unique: HashSet<_> = got.iter().collect();
        assert_eq!(unique.len(), 4);
        assert_eq!(
            got,
            ["document_001.JPG", "document_002.txt", "document_003", "document_004.gz"]
        );
        // Content follows the file it came from.
        let moved = stdfs::read_to_string(tmp.path().join("document_001.JPG")).unwrap();
        assert_eq!(moved, "a.JPG");
    }

    #[test]
    fn collision_gets_suffix_instead_of_overwrite() {
        let tmp = tempfile::tempdir().unwrap();
        // "a.txt" becomes #1 and wants "doc_001.txt"; "doc_001.txt" sorts
        // after it and is #2, so it is still in place when #1 is renamed.
        stdfs::write(tmp.path().join("a.txt"), "first").unwrap();
        stdfs::write(tmp.path().join("doc_001.txt"), "second").unwrap();

        let summary = rename_files(tmp.path(), "doc", |_, _| {}).unwrap();
        assert_eq!(summary.renamed, 2);
        assert_eq!(
            stdfs::read_to_string(tmp.path().join("doc_001_1.txt")).unwrap(),
            "first"
        );
        assert_eq!(
            stdfs::read_to_string(tmp.path().join("doc_002.txt")).unwrap(),
            "second"
        );
    }

    #[test]
    fn already_numbered_files_are_left_alone() {
        let tmp = tempfile::tempdir().unwrap();
        stdfs::write(tmp.path().join("doc_001.txt"), "").unwrap();
        stdfs::write(tmp.path().join("doc_002.txt"), "").unwrap();

        let summary = rename_files(tmp.path(), "doc", |_, _| {}).unwrap();
        assert_eq!(summary, RenameSummary { renamed: 0, unchanged: 2 });
        assert_eq!(names(tmp.path()), ["doc_001.txt", "doc_002.txt"]);
    }

    #[test]
    fn empty_folder_warns() {
        let tmp = tempfile::tempdir().unwrap();
        stdfs::create_dir(tmp.path().join("only_a_dir")).unwrap();
        let mut lines = Vec::new();
        let summary = rename_files(tmp.path(), "doc", |sev, msg| lines.push((sev, msg))).unwrap();
        assert_eq!(summary.renamed, 0);
        assert!(lines
            .iter()
            .any(|(sev, msg)| *sev == Severity::Warning && msg.contains("No files")));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_extension_is_kept() {
        use std::os::unix::ffi::OsStrExt;

        let tmp = tempfile::tempdir().unwrap();
        stdfs::write(tmp.path().join(OsStr::from_bytes(b"a.t\xe9xt")), "x").unwrap();

        rename_files(tmp.path(), "doc", |_, _| {}).unwrap();
        let got: Vec<Vec<u8>> = fs::list_files(tmp.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().as_bytes().to_vec())
            .collect();
        assert_eq!(got, [b"doc_001.t\xe9xt".to_vec()]);
    }

    #[cfg(unix)]
    #[test]
    fn first_io_error_aborts() {
        use crate::core::fs::test_support::{lock_dir, unlock_dir};

        let tmp = tempfile::tempdir().unwrap();
        stdfs::write(tmp.path().join("a.txt"), "").unwrap();
        stdfs::write(tmp.path().join("b.txt"), "").unwrap();
        if !lock_dir(tmp.path()) {
            return; // permissions are not enforced for this user
        }

        let mut lines = Vec::new();
        let result = rename_files(tmp.path(), "doc", |sev, msg| lines.push((sev, msg)));
        unlock_dir(tmp.path());

        match result {
            Err(TaskError::Io { path, .. }) => assert_eq!(path, tmp.path().join("a.txt")),
            other => panic!("expected an I/O error, got {other:?}"),
        }
        assert_eq!(names(tmp.path()), ["a.txt", "b.txt"]);
        assert!(!lines.iter().any(|(sev, _)| *sev == Severity::Success));
    }
}
