//! Task identifiers and log severities.

use std::fmt;

/// Severity of a single activity-log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// Every job the user can start against a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Rename,
    Organize,
    Dedupe,
    CleanTemp,
    Python,
    AutoHotkey,
}

impl TaskKind {
    /// Noun used in "Error during …" messages.
    pub fn activity(self) -> &'static str {
        match self {
            TaskKind::Rename => "renaming",
            TaskKind::Organize => "organizing",
            TaskKind::Dedupe => "duplicate removal",
            TaskKind::CleanTemp => "cleanup",
            TaskKind::Python | TaskKind::AutoHotkey => "script execution",
        }
    }

    /// Parse a `--task` argument.
    pub fn from_cli(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "rename" => Some(TaskKind::Rename),
            "organize" | "organise" => Some(TaskKind::Organize),
            "dedupe" | "duplicates" => Some(TaskKind::Dedupe),
            "clean" | "cleanup" | "temp" => Some(TaskKind::CleanTemp),
            "python" | "py" => Some(TaskKind::Python),
            "ahk" | "autohotkey" => Some(TaskKind::AutoHotkey),
            _ => None,
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskKind::Rename => "rename",
            TaskKind::Organize => "organize",
            TaskKind::Dedupe => "dedupe",
            TaskKind::CleanTemp => "clean",
            TaskKind::Python => "python",
            TaskKind::AutoHotkey => "ahk",
        };
        f.write_str(name)
    }
}
