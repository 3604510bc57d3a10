//! Folder / script picker model (data only).
//!
//! Stands in for a native file dialog: one directory is listed at a time
//! and the user walks up and down the hierarchy.

use std::path::{Path, PathBuf};

use crate::core::fs::{self, EntryInfo};
use crate::core::script::ScriptKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerPurpose {
    Folder,
    Script(ScriptKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerRow {
    /// A recently used script.
    Saved(PathBuf),
    /// `..`
    Parent(PathBuf),
    Entry(EntryInfo),
}

impl PickerRow {
    pub fn label(&self) -> String {
        match self {
            PickerRow::Saved(p) => format!("★ {}", p.display()),
            PickerRow::Parent(_) => "../".to_string(),
            PickerRow::Entry(e) if e.is_dir => format!("{}/", e.name),
            PickerRow::Entry(e) => e.name.clone(),
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, PickerRow::Parent(_)) || matches!(self, PickerRow::Entry(e) if e.is_dir)
    }
}

/// What the caller should do after a picker key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    Stay,
    Chosen(PathBuf),
}

#[derive(Debug)]
pub struct Picker {
    pub purpose: PickerPurpose,
    pub dir: PathBuf,
    pub rows: Vec<PickerRow>,
    pub selected: usize,
    pub offset: usize,
    /// Script mode: list every file, not only the matching extension.
    pub show_all: bool,
    pub show_hidden: bool,
    pub error: Option<String>,
    saved: Vec<PathBuf>,
}

impl Picker {
    /// Open at `start` (or the home directory when `start` is not a folder).
    pub fn new(purpose: PickerPurpose, start: &str, saved_scripts: &[String]) -> Self {
        let start = Path::new(start.trim());
        let dir = if start.is_dir() {
            start.to_path_buf()
        } else {
            dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"))
        };
        let mut picker = Self {
            purpose,
            dir,
            rows: Vec::new(),
            selected: 0,
            offset: 0,
            show_all: false,
            show_hidden: false,
            error: None,
            saved: saved_scripts.iter().map(PathBuf::from).collect(),
        };
        picker.refresh();
        picker
    }

    pub fn title(&self) -> String {
        match self.purpose {
            PickerPurpose::Folder => " Select a folder ".to_string(),
            PickerPurpose::Script(kind) => format!(" Select a {} script ", kind.label()),
        }
    }

    /// Re-read the current directory.
    pub fn refresh(&mut self) {
        self.rows.clear();
        self.error = None;

        if let PickerPurpose::Script(kind) = self.purpose {
            for saved in &self.saved {
                if self.show_all || has_extension(saved, kind.extension()) {
                    self.rows.push(PickerRow::Saved(saved.clone()));
                }
            }
        }
        if let Some(parent) = self.dir.parent() {
            self.rows.push(PickerRow::Parent(parent.to_path_buf()));
        }

        match fs::list_entries(&self.dir, self.show_hidden) {
            Ok(entries) => {
                for entry in entries {
                    if self.wants(&entry) {
                        self.rows.push(PickerRow::Entry(entry));
                    }
                }
            }
            Err(e) => self.error = Some(format!("Cannot read {}: {e}", self.dir.display())),
        }

        self.selected = self.selected.min(self.rows.len().saturating_sub(1));
        self.offset = self.offset.min(self.selected);
    }

    fn wants(&self, entry: &EntryInfo) -> bool {
        match self.purpose {
            _ if entry.is_dir => true,
            PickerPurpose::Folder => false,
            PickerPurpose::Script(_) if self.show_all => true,
            PickerPurpose::Script(kind) => has_extension(&entry.path, kind.extension()),
        }
    }

    pub fn selected_row(&self) -> Option<&PickerRow> {
        self.rows.get(self.selected)
    }

    pub fn select_next(&mut self, by: usize) {
        if !self.rows.is_empty() {
            self.selected = (self.selected + by).min(self.rows.len() - 1);
        }
    }

    pub fn select_prev(&mut self, by: usize) {
        self.selected = self.selected.saturating_sub(by);
    }

    pub fn select_last(&mut self) {
        self.selected = self.rows.len().saturating_sub(1);
    }

    /// Ensure the selected row is visible within `height` rows.
    pub fn clamp_scroll(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + height {
            self.offset = self.selected + 1 - height;
        }
    }

    fn enter_dir(&mut self, dir: PathBuf) {
        let previous = std::mem::replace(&mut self.dir, dir);
        self.selected = 0;
        self.offset = 0;
        self.refresh();
        // Land on the folder we came out of when walking up.
        if let Some(idx) = self.rows.iter().position(|r| matches!(r, PickerRow::Entry(e) if e.path == previous)) {
            self.selected = idx;
        }
    }

    pub fn go_parent(&mut self) {
        if let Some(parent) = self.dir.parent().map(Path::to_path_buf) {
            self.enter_dir(parent);
        }
    }

    /// Enter: descend into directories; in script mode a file is chosen.
    pub fn activate(&mut self) -> PickOutcome {
        match self.selected_row().cloned() {
            Some(PickerRow::Parent(p)) => {
                self.enter_dir(p);
                PickOutcome::Stay
            }
            Some(PickerRow::Entry(e)) if e.is_dir => {
                self.enter_dir(e.path);
                PickOutcome::Stay
            }
            Some(PickerRow::Entry(e)) => PickOutcome::Chosen(e.path),
            Some(PickerRow::Saved(p)) => PickOutcome::Chosen(p),
            None => PickOutcome::Stay,
        }
    }

    /// Folder mode "select": the highlighted folder, or the listed one when
    /// the highlight is on `..` or nothing.
    pub fn choose_folder(&self) -> Option<PathBuf> {
        if self.purpose != PickerPurpose::Folder {
            return None;
        }
        match self.selected_row() {
            Some(PickerRow::Entry(e)) if e.is_dir => Some(e.path.clone()),
            _ => Some(self.dir.clone()),
        }
    }

    pub fn toggle_show_all(&mut self) {
        if matches!(self.purpose, PickerPurpose::Script(_)) {
            self.show_all = !self.show_all;
            self.refresh();
        }
    }

    pub fn toggle_hidden(&mut self) {
        self.show_hidden = !self.show_hidden;
        self.refresh();
    }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;

    fn labels(p: &Picker) -> Vec<String> {
        p.rows.iter().map(PickerRow::label).collect()
    }

    fn layout() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        stdfs::create_dir(tmp.path().join("inbox")).unwrap();
        stdfs::write(tmp.path().join("tidy.py"), "").unwrap();
        stdfs::write(tmp.path().join("tidy.AHK"), "").unwrap();
        stdfs::write(tmp.path().join("notes.txt"), "").unwrap();
        tmp
    }

    #[test]
    fn folder_mode_lists_only_directories() {
        let tmp = layout();
        let p = Picker::new(PickerPurpose::Folder, tmp.path().to_str().unwrap(), &[]);
        assert_eq!(labels(&p), ["../", "inbox/"]);
    }

    #[test]
    fn script_mode_filters_by_extension() {
        let tmp = layout();
        let mut p = Picker::new(
            PickerPurpose::Script(ScriptKind::AutoHotkey),
            tmp.path().to_str().unwrap(),
            &[],
        );
        assert_eq!(labels(&p), ["../", "inbox/", "tidy.AHK"]);
        p.toggle_show_all();
        assert_eq!(
            labels(&p),
            ["../", "inbox/", "notes.txt", "tidy.AHK", "tidy.py"]
        );
    }

    #[test]
    fn saved_scripts_come_first_and_are_chosen_directly() {
        let tmp = layout();
        let saved = tmp.path().join("tidy.py").display().to_string();
        let mut p = Picker::new(
            PickerPurpose::Script(ScriptKind::Python),
            tmp.path().to_str().unwrap(),
            &[saved.clone()],
        );
        assert!(matches!(p.rows[0], PickerRow::Saved(_)));
        assert_eq!(p.activate(), PickOutcome::Chosen(PathBuf::from(saved)));
    }

    #[test]
    fn walking_down_and_back_up() {
        let tmp = layout();
        let mut p = Picker::new(PickerPurpose::Folder, tmp.path().to_str().unwrap(), &[]);
        p.select_next(1);
        assert_eq!(p.choose_folder(), Some(tmp.path().join("inbox")));
        assert_eq!(p.activate(), PickOutcome::Stay);
        assert_eq!(p.dir, tmp.path().join("inbox"));
        assert_eq!(p.choose_folder(), Some(tmp.path().join("inbox")));

        p.go_parent();
        assert_eq!(p.dir, tmp.path());
        assert_eq!(p.selected_row().map(PickerRow::label).as_deref(), Some("inbox/"));
    }

    #[test]
    fn scroll_follows_selection() {
        let tmp = layout();
        let mut p = Picker::new(
            PickerPurpose::Script(ScriptKind::Python),
            tmp.path().to_str().unwrap(),
            &[],
        );
        p.show_all = true;
        p.refresh();
        p.select_last();
        p.clamp_scroll(2);
        assert_eq!(p.offset, p.rows.len() - 2);
        p.select_prev(10);
        p.clamp_scroll(2);
        assert_eq!(p.offset, 0);
    }
}
