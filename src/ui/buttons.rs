//! Button grid: placement, focus order, and rendering.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::config::{Action, AppConfig};

use super::layout::{columns, AppLayout};
use super::theme::Theme;

pub const TASK_ROWS: [[Action; 3]; 2] = [
    [Action::Rename, Action::Organize, Action::Dedupe],
    [Action::CleanTemp, Action::RunPython, Action::RunAhk],
];

pub const CONTROL_ROW: [Action; 5] = [
    Action::OpenFolder,
    Action::ClearLog,
    Action::SaveLog,
    Action::OpenGithub,
    Action::Quit,
];

/// Focus rows, top to bottom.
const FOCUS_ROWS: [&[Action]; 4] = [&[Action::Browse], &TASK_ROWS[0], &TASK_ROWS[1], &CONTROL_ROW];

fn position(action: Action) -> (usize, usize) {
    for (r, row) in FOCUS_ROWS.iter().enumerate() {
        if let Some(c) = row.iter().position(|&a| a == action) {
            return (r, c);
        }
    }
    (1, 0)
}

fn flat() -> impl Iterator<Item = Action> {
    FOCUS_ROWS.iter().flat_map(|row| row.iter().copied())
}

/// Next button in reading order (wraps).
pub fn next_focus(current: Action) -> Action {
    let all: Vec<Action> = flat().collect();
    let idx = all.iter().position(|&a| a == current).unwrap_or(0);
    all[(idx + 1) % all.len()]
}

/// Previous button in reading order (wraps).
pub fn prev_focus(current: Action) -> Action {
    let all: Vec<Action> = flat().collect();
    let idx = all.iter().position(|&a| a == current).unwrap_or(0);
    all[(idx + all.len() - 1) % all.len()]
}

/// Button in the row above/below, keeping the column where possible.
pub fn vertical_focus(current: Action, down: bool) -> Action {
    let (r, c) = position(current);
    let target = if down {
        (r + 1).min(FOCUS_ROWS.len() - 1)
    } else {
        r.saturating_sub(1)
    };
    let row = FOCUS_ROWS[target];
    row[c.min(row.len() - 1)]
}

/// Screen rectangle of every clickable button.
pub fn button_rects(layout: &AppLayout) -> Vec<(Action, Rect)> {
    let mut out = vec![(Action::Browse, layout.browse_area)];

    let inner = Block::default().borders(Borders::ALL).inner(layout.tasks_area);
    for (r, row) in TASK_ROWS.iter().enumerate() {
        if r as u16 >= inner.height {
            break;
        }
        let line = Rect::new(inner.x, inner.y + r as u16, inner.width, 1);
        for (&action, rect) in row.iter().zip(columns(line, row.len() as u32)) {
            out.push((action, rect));
        }
    }

    for (&action, rect) in CONTROL_ROW
        .iter()
        .zip(columns(layout.controls_area, CONTROL_ROW.len() as u32))
    {
        out.push((action, rect));
    }
    out
}

/// Which button, if any, sits under a terminal cell.
pub fn hit_test(layout: &AppLayout, col: u16, row: u16) -> Option<Action> {
    button_rects(layout)
        .into_iter()
        .find(|(_, r)| super::layout::contains(*r, col, row))
        .map(|(a, _)| a)
}

/// One-line button caption, e.g. `[ Rename Files (r) ]`.
pub struct Button<'a> {
    pub action: Action,
    pub config: &'a AppConfig,
    pub focused: bool,
    pub enabled: bool,
}

impl Widget for Button<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let style = Theme::button_style(self.action, self.focused, self.enabled);
        let hint = self
            .config
            .short_binding(self.action)
            .map(|k| format!(" ({k})"))
            .unwrap_or_default();
        let mut spans = vec![Span::styled(format!("[ {}", self.action.label()), style)];
        spans.push(Span::styled(hint, Theme::key_hint_style(self.focused)));
        spans.push(Span::styled(" ]", style));

        let area = if self.action == Action::Browse && area.height >= 3 {
            Rect::new(area.x, area.y + 1, area.width, 1)
        } else {
            area
        };
        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}
