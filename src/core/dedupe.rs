//! Duplicate removal by content hash.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::error::{TaskError, TaskResult};
use super::fs::{self, file_name};
use super::task::Severity;

const READ_BUF: usize = 64 * 1024;

/// Lowercase hex MD5 of a file's contents, read in 64 KiB chunks.
pub fn md5_hex(path: &Path) -> std::io::Result<String> {
    let mut reader = BufReader::with_capacity(READ_BUF, File::open(path)?);
    let mut ctx = md5::Context::new();
    let mut buf = vec![0u8; READ_BUF];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        ctx.consume(&buf[..n]);
    }
    Ok(format!("{:x}", ctx.compute()))
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DedupeSummary {
    pub removed: Vec<PathBuf>,
    pub unreadable: usize,
}

/// Delete every top-level file whose content matches an earlier file.
///
/// The first file (in name order) carrying a hash is kept.
pub fn remove_duplicates(
    folder: &Path,
    mut report: impl FnMut(Severity, String),
) -> TaskResult<DedupeSummary> {
    report(Severity::Info, "Searching for duplicate files...".into());

    let files = fs::list_files(folder)?;
    let mut summary = DedupeSummary::default();
    if files.is_empty() {
        report(Severity::Warning, "No files found to analyze".into());
        return Ok(summary);
    }

    let mut seen: HashMap<String, PathBuf> = HashMap::new();
    for path in files {
        let name = file_name(&path);
        let hash = match md5_hex(&path) {
            Ok(h) => h,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "hash failed");
                report(Severity::Warning, format!("Could not read file: {name}"));
                summary.unreadable += 1;
                continue;
            }
        };

        if let Some(original) = seen.get(&hash) {
            std::fs::remove_file(&path).map_err(|e| TaskError::io(&path, e))?;
            report(
                Severity::Info,
                format!("Removed duplicate: {name} (same as {})", file_name(original)),
            );
            summary.removed.push(path);
        } else {
            seen.insert(hash, path);
        }
    }

    let count = summary.removed.len();
    let severity = if count > 0 {
        Severity::Success
    } else {
        Severity::Info
    };
    report(
        severity,
        format!("Duplicate removal completed. Removed {count} files."),
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;

    #[test]
    fn md5_matches_known_digest() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("abc");
        stdfs::write(&p, "abc").unwrap();
        assert_eq!(md5_hex(&p).unwrap(), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn keeps_first_occurrence() {
        let tmp = tempfile::tempdir().unwrap();
        stdfs::write(tmp.path().join("a.txt"), "same").unwrap();
        stdfs::write(tmp.path().join("b.txt"), "same").unwrap();
        stdfs::write(tmp.path().join("c.txt"), "other").unwrap();
        stdfs::write(tmp.path().join("d.bin"), "same").unwrap();

        let summary = remove_duplicates(tmp.path(), |_, _| {}).unwrap();
        assert_eq!(
            summary.removed,
            [tmp.path().join("b.txt"), tmp.path().join("d.bin")]
        );
        assert!(tmp.path().join("a.txt").exists());
        assert!(tmp.path().join("c.txt").exists());
        assert!(!tmp.path().join("b.txt").exists());
    }

    #[test]
    fn no_duplicates_reports_info() {
        let tmp = tempfile::tempdir().unwrap();
        stdfs::write(tmp.path().join("a"), "1").unwrap();
        stdfs::write(tmp.path().join("b"), "2").unwrap();

        let mut last = None;
        let summary = remove_duplicates(tmp.path(), |sev, msg| last = Some((sev, msg))).unwrap();
        assert!(summary.removed.is_empty());
        let (sev, msg) = last.unwrap();
        assert_eq!(sev, Severity::Info);
        assert!(msg.contains("Removed 0 files"));
    }

    #[test]
    fn subdirectories_are_not_scanned() {
        let tmp = tempfile::tempdir().unwrap();
        stdfs::create_dir(tmp.path().join("sub")).unwrap();
        stdfs::write(tmp.path().join("a"), "x").unwrap();
        stdfs::write(tmp.path().join("sub/a"), "x").unwrap();

        let summary = remove_duplicates(tmp.path(), |_, _| {}).unwrap();
        assert!(summary.removed.is_empty());
        assert!(tmp.path().join("sub/a").exists());
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_file_is_skipped_with_warning() {
        use crate::core::fs::test_support::lock_file;

        let tmp = tempfile::tempdir().unwrap();
        stdfs::write(tmp.path().join("a"), "same").unwrap();
        stdfs::write(tmp.path().join("b"), "same").unwrap();
        stdfs::write(tmp.path().join("c"), "same").unwrap();
        if !lock_file(&tmp.path().join("b")) {
            return; // permissions are not enforced for this user
        }

        let mut lines = Vec::new();
        let summary = remove_duplicates(tmp.path(), |sev, msg| lines.push((sev, msg))).unwrap();
        assert_eq!(summary.unreadable, 1);
        assert_eq!(summary.removed, [tmp.path().join("c")]);
        assert!(tmp.path().join("b").exists());
        assert!(lines.contains(&(Severity::Warning, "Could not read file: b".to_string())));
    }
}
