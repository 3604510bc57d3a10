//! Organize by type: move each file into a sub-folder named after its
//! extension.

use std::path::Path;

use super::error::{TaskError, TaskResult};
use super::fs::{self, available_path, dotted_extension, file_name};
use super::task::Severity;

/// Folder used for files without an extension.
pub const NO_EXTENSION_DIR: &str = "no_extension";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OrganizeSummary {
    pub moved: usize,
    pub skipped: usize,
    pub created_dirs: Vec<String>,
}

/// Sub-folder name for a file: its lower-cased extension without the dot.
pub fn type_folder_name(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| NO_EXTENSION_DIR.to_string())
}

pub fn organize_by_type(
    folder: &Path,
    mut report: impl FnMut(Severity, String),
) -> TaskResult<OrganizeSummary> {
    report(Severity::Info, "Organizing files by type...".into());

    let files = fs::list_files(folder)?;
    let mut summary = OrganizeSummary::default();
    if files.is_empty() {
        report(Severity::Warning, "No files found to organize".into());
        return Ok(summary);
    }

    for old_path in &files {
        let name = file_name(old_path);
        let kind = type_folder_name(old_path);
        let type_dir = folder.join(&kind);

        if !type_dir.exists() {
            std::fs::create_dir_all(&type_dir).map_err(|e| TaskError::io(&type_dir, e))?;
            report(Severity::Info, format!("Created folder: {kind}"));
            summary.created_dirs.push(kind.clone());
        } else if !type_dir.is_dir() {
            report(
                Severity::Warning,
                format!("Skipped {name}: '{kind}' exists and is not a folder"),
            );
            summary.skipped += 1;
            continue;
        }

        // Only the folder name is lossy; the file keeps its exact name unless
        // that is taken.
        let Some(original) = old_path.file_name() else {
            continue;
        };
        let mut new_path = type_dir.join(original);
        if new_path.exists() {
            let stem = old_path.file_stem().unwrap_or(original);
            new_path = available_path(&type_dir, stem, &dotted_extension(old_path));
        }

        std::fs::rename(old_path, &new_path).map_err(|e| TaskError::io(old_path, e))?;
        summary.moved += 1;
        report(
            Severity::Info,
            format!("Moved: {name} -> {kind}/{}", file_name(&new_path)),
        );
    }

    report(Severity::Success, "Organizing completed successfully.".into());
    Ok(summary)
}
