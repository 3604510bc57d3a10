//! Temporary-file cleanup (recursive).

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::error::{TaskError, TaskResult};
use super::task::Severity;

/// Name suffixes treated as temporary, compared case-insensitively.
pub const TEMP_SUFFIXES: &[&str] = &[".tmp", ".temp", ".bak", ".backup", ".old"];

pub fn is_temporary(name: &str) -> bool {
    let lower = name.to_lowercase();
    TEMP_SUFFIXES.iter().any(|s| lower.ends_with(s))
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupSummary {
    pub deleted: Vec<PathBuf>,
    pub failed: usize,
}

/// Delete temporary files anywhere under `folder`.
///
/// Failures on single entries are reported and the walk continues.
pub fn clean_temporary_files(
    folder: &Path,
    mut report: impl FnMut(Severity, String),
) -> TaskResult<CleanupSummary> {
    report(Severity::Info, "Cleaning temporary files...".into());

    if let Err(e) = std::fs::read_dir(folder) {
        return Err(TaskError::io(folder, e));
    }

    let mut summary = CleanupSummary::default();
    for entry in WalkDir::new(folder).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                let where_ = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                report(Severity::Warning, format!("Could not read: {where_}"));
                summary.failed += 1;
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !is_temporary(&name) {
            continue;
        }

        match std::fs::remove_file(entry.path()) {
            Ok(()) => {
                report(Severity::Info, format!("Deleted temporary file: {name}"));
                summary.deleted.push(entry.path().to_path_buf());
            }
            Err(e) => {
                tracing::debug!(path = %entry.path().display(), error = %e, "remove failed");
                report(Severity::Warning, format!("Could not delete: {name}"));
                summary.failed += 1;
            }
        }
    }

    let count = summary.deleted.len();
    let severity = if count > 0 {
        Severity::Success
    } else {
        Severity::Info
    };
    report(
        severity,
        format!("Cleanup completed. Deleted {count} temporary files."),
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn suffix_match_is_case_insensitive() {
        assert!(is_temporary("report.TMP"));
        assert!(is_temporary("db.backup"));
        assert!(is_temporary("config.old"));
        assert!(!is_temporary("old.txt"));
        assert!(!is_temporary("tmp"));
    }

    #[test]
    fn removes_temporaries_recursively() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(tmp.path().join("keep.txt"), "").unwrap();
        fs::write(tmp.path().join("x.tmp"), "").unwrap();
        fs::write(nested.join("y.Bak"), "").unwrap();
        fs::write(nested.join("z.rs"), "").unwrap();
        // A directory with a temp-looking name is not a file.
        fs::create_dir(tmp.path().join("cache.old")).unwrap();

        let summary = clean_temporary_files(tmp.path(), |_, _| {}).unwrap();
        assert_eq!(summary.deleted.len(), 2);
        assert_eq!(summary.failed, 0);
        assert!(tmp.path().join("keep.txt").exists());
        assert!(nested.join("z.rs").exists());
        assert!(!nested.join("y.Bak").exists());
        assert!(tmp.path().join("cache.old").is_dir());
    }

    #[test]
    fn missing_folder_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = clean_temporary_files(&tmp.path().join("nope"), |_, _| {}).unwrap_err();
        assert!(matches!(err, TaskError::Io { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn failed_delete_warns_and_continues() {
        use crate::core::fs::test_support::{lock_dir, unlock_dir};

        let tmp = tempfile::tempdir().unwrap();
        let locked = tmp.path().join("a_locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("x.tmp"), "").unwrap();
        fs::write(tmp.path().join("y.tmp"), "").unwrap();
        if !lock_dir(&locked) {
            return; // permissions are not enforced for this user
        }

        let mut lines = Vec::new();
        let result = clean_temporary_files(tmp.path(), |sev, msg| lines.push((sev, msg)));
        unlock_dir(&locked);

        let summary = result.unwrap();
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.deleted, [tmp.path().join("y.tmp")]);
        assert!(locked.join("x.tmp").exists());
        assert!(lines.contains(&(Severity::Warning, "Could not delete: x.tmp".to_string())));
    }
}
