//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

use crate::config::Action;
use crate::core::task::Severity;

/// Central theme: change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── log ────────────────────────────────────────────────────
    pub fn severity_style(severity: Severity) -> Style {
        let fg = match severity {
            Severity::Info => Color::Rgb(0x34, 0x98, 0xdb),
            Severity::Success => Color::Rgb(0x2e, 0xcc, 0x71),
            Severity::Warning => Color::Rgb(0xf3, 0x9c, 0x12),
            Severity::Error => Color::Rgb(0xe7, 0x4c, 0x3c),
        };
        Style::default().fg(fg)
    }

    pub fn timestamp_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    // ── buttons ────────────────────────────────────────────────
    pub fn button_style(action: Action, focused: bool, enabled: bool) -> Style {
        let base = match action {
            Action::Quit => Style::default().fg(Color::Red),
            Action::OpenFolder => Style::default().fg(Color::Green),
            _ => Style::default().fg(Color::Cyan),
        };
        let base = if enabled {
            base
        } else {
            base.add_modifier(Modifier::DIM)
        };
        if focused {
            base.bg(Color::DarkGray).add_modifier(Modifier::BOLD)
        } else {
            base
        }
    }

    pub fn key_hint_style(focused: bool) -> Style {
        let s = Style::default().fg(Color::Yellow);
        if focused {
            s.bg(Color::DarkGray)
        } else {
            s
        }
    }

    // ── folder field ───────────────────────────────────────────
    pub fn field_style(editing: bool) -> Style {
        if editing {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        }
    }

    pub fn dir_style() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn file_style() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn selected_style() -> Style {
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn popup_border_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn hint_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }
}
