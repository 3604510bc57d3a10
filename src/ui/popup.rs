//! Popup overlays: folder/script picker, text prompt, controls list.

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use crate::app::input::TextInput;
use crate::app::picker::{Picker, PickerPurpose};
use crate::config::{Action, AppConfig};

use super::layout::centered_fixed;
use super::theme::Theme;

fn popup_block(title: String) -> Block<'static> {
    Block::default()
        .title(title)
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::popup_border_style())
}

// ───────────────────────────────────────── picker popup ──────

/// Rows above (current dir) and below (error + hint) the list.
const PICKER_CHROME: u16 = 4;

pub fn picker_rect(area: Rect) -> Rect {
    centered_fixed(area.width.saturating_sub(4).min(90), area.height.saturating_sub(2).min(24), area)
}

/// Number of list rows visible in the picker for a terminal `area`.
pub fn picker_list_height(area: Rect) -> usize {
    let inner = popup_block(String::new()).inner(picker_rect(area));
    inner.height.saturating_sub(PICKER_CHROME) as usize
}

pub struct PickerPopup<'a> {
    pub picker: &'a Picker,
}

impl Widget for PickerPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = picker_rect(area);
        Clear.render(popup, buf);
        let block = popup_block(self.picker.title());
        let inner = block.inner(popup);
        block.render(popup, buf);

        let list_height = inner.height.saturating_sub(PICKER_CHROME) as usize;
        let mut lines = vec![
            Line::from(Span::styled(
                format!(" {}", self.picker.dir.display()),
                Theme::title_style(),
            )),
            Line::raw(""),
        ];

        let rows = self
            .picker
            .rows
            .iter()
            .enumerate()
            .skip(self.picker.offset)
            .take(list_height);
        for (i, row) in rows {
            let selected = i == self.picker.selected;
            let prefix = if selected { " ▸ " } else { "   " };
            let mut style = if row.is_dir() {
                Theme::dir_style()
            } else {
                Theme::file_style()
            };
            if selected {
                style = style.patch(Theme::selected_style());
            }
            lines.push(Line::from(Span::styled(format!("{prefix}{}", row.label()), style)));
        }
        while lines.len() < list_height + 2 {
            lines.push(Line::raw(""));
        }

        let error = self.picker.error.clone().unwrap_or_default();
        lines.push(Line::from(Span::styled(
            format!(" {error}"),
            Style::default().fg(Color::Red),
        )));

        let hint = match self.picker.purpose {
            PickerPurpose::Folder => " Enter: open  Space: select  Bksp: up  .: hidden  Esc: cancel",
            PickerPurpose::Script(_) => " Enter: open/run  Tab: all files  Bksp: up  .: hidden  Esc: cancel",
        };
        lines.push(Line::from(Span::styled(hint, Theme::hint_style())));

        Paragraph::new(lines).render(inner, buf);
    }
}

// ───────────────────────────────────────── prompt popup ──────

pub fn prompt_rect(area: Rect) -> Rect {
    centered_fixed(area.width.saturating_sub(4).min(80), 6, area)
}

/// Where the terminal cursor goes while typing into the prompt.
pub fn prompt_cursor(area: Rect, input: &TextInput) -> Position {
    let inner = popup_block(String::new()).inner(prompt_rect(area));
    let x = inner.x + 1 + input.cursor() as u16;
    Position::new(x.min(inner.right().saturating_sub(1)), inner.y + 1)
}

pub struct PromptPopup<'a> {
    pub title: &'a str,
    pub input: &'a TextInput,
}

impl Widget for PromptPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = prompt_rect(area);
        Clear.render(popup, buf);
        let block = popup_block(format!(" {} ", self.title));
        let inner = block.inner(popup);
        block.render(popup, buf);

        let lines = vec![
            Line::raw(""),
            Line::from(Span::styled(format!(" {}", self.input.value()), Theme::field_style(true))),
            Line::raw(""),
            Line::from(Span::styled(" Enter: save  Esc: cancel", Theme::hint_style())),
        ];
        Paragraph::new(lines).render(inner, buf);
    }
}

// ───────────────────────────────────────── controls popup ────

/// Read-only list of every action and its keys.
pub struct ControlsPopup<'a> {
    pub config: &'a AppConfig,
}

impl Widget for ControlsPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = (Action::ALL.len() as u16) + 6;
        let popup = centered_fixed(56, height, area);
        Clear.render(popup, buf);
        let block = popup_block(" Controls ".to_string());
        let inner = block.inner(popup);
        block.render(popup, buf);

        let mut lines = vec![Line::raw("")];
        for &action in Action::ALL {
            let label_col = format!("   {:<22}", action.label());
            let keys_width = (inner.width as usize).saturating_sub(label_col.len() + 1).max(1);
            let keys = self.config.display_bindings(action);
            lines.push(Line::from(vec![
                Span::styled(label_col, Style::default().fg(Color::White)),
                Span::styled(format!("{keys:>keys_width$}"), Style::default().fg(Color::Yellow)),
            ]));
        }
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            format!("  Edit bindings in {}", self.config.path.display()),
            Theme::hint_style(),
        )));
        lines.push(Line::from(Span::styled("  Esc: close", Theme::hint_style())));

        Paragraph::new(lines).render(inner, buf);
    }
}
