//! Activity log shown in the main window.
//!
//! Every entry is mirrored to `tracing` so a `RUST_LOG` run captures the same
//! history on stderr.

use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Local};

use crate::core::task::Severity;

/// Oldest entries are dropped past this many.
const MAX_ENTRIES: usize = 10_000;

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub at: DateTime<Local>,
    pub severity: Severity,
    pub message: String,
}

impl LogEntry {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            at: Local::now(),
            severity,
            message: message.into(),
        }
    }

    pub fn timestamp(&self) -> String {
        self.at.format("%H:%M:%S").to_string()
    }

    /// Plain-text form used for saved logs and headless output.
    pub fn line(&self) -> String {
        format!("[{}] {}", self.timestamp(), self.message)
    }
}

#[derive(Debug, Default)]
pub struct ActivityLog {
    entries: Vec<LogEntry>,
    /// Lines scrolled up from the newest entry (0 = follow the tail).
    pub scroll: usize,
}

impl ActivityLog {
    pub fn push(&mut self, severity: Severity, message: impl Into<String>) {
        let entry = LogEntry::new(severity, message);
        match severity {
            Severity::Error => tracing::error!("{}", entry.message),
            Severity::Warning => tracing::warn!("{}", entry.message),
            Severity::Info | Severity::Success => tracing::info!("{}", entry.message),
        }
        self.entries.push(entry);
        if self.entries.len() > MAX_ENTRIES {
            let excess = self.entries.len() - MAX_ENTRIES;
            self.entries.drain(..excess);
        }
        // Keep the viewport anchored when the user has scrolled up.
        if self.scroll > 0 {
            self.scroll += 1;
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Severity::Info, message);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.scroll = 0;
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll = (self.scroll + lines).min(self.entries.len().saturating_sub(1));
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&entry.line());
            out.push('\n');
        }
        out
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        std::fs::write(path, self.to_text())
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

/// Suggested file name for a saved log, e.g. `autotask-20240131-154502.log`.
pub fn default_log_name() -> String {
    format!("autotask-{}.log", Local::now().format("%Y%m%d-%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_carry_a_clock_timestamp() {
        let entry = LogEntry::new(Severity::Info, "hello");
        let line = entry.line();
        assert!(line.starts_with('['));
        assert_eq!(&line[9..], "] hello");
    }

    #[test]
    fn scrolling_is_clamped() {
        let mut log = ActivityLog::default();
        for i in 0..5 {
            log.info(format!("line {i}"));
        }
        log.scroll_up(100);
        assert_eq!(log.scroll, 4);
        log.info("new");
        assert_eq!(log.scroll, 5);
        log.scroll_down(100);
        assert_eq!(log.scroll, 0);
        log.clear();
        assert!(log.entries().is_empty());
    }

    #[test]
    fn save_writes_every_line() {
        let tmp = tempfile::tempdir().unwrap();
        let mut log = ActivityLog::default();
        log.info("one");
        log.push(Severity::Error, "two");
        let path = tmp.path().join("logs/out.log");
        log.save_to(&path).unwrap();

        let text = std::fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("] one"));
        assert!(lines[1].ends_with("] two"));
    }
}
