//! Whole-window rendering.

use ratatui::{
    layout::Position,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::state::{ActiveView, AppState};

use super::buttons::{button_rects, Button};
use super::layout::AppLayout;
use super::log_view::LogView;
use super::popup::{self, ControlsPopup, PickerPopup, PromptPopup};
use super::spinner::BusyIndicator;
use super::theme::Theme;

pub fn draw(frame: &mut Frame, state: &mut AppState) {
    let area = frame.area();
    state.terminal_area = area;
    let layout = AppLayout::from_area(area);

    let title = Line::from(vec![
        Span::styled(" AutoTask ", Theme::title_style()),
        Span::styled("folder maintenance", Theme::hint_style()),
    ]);
    frame.render_widget(Paragraph::new(title), layout.title_area);

    // ── folder field ──────────────────────────────────────────
    let editing = state.active_view == ActiveView::EditFolder;
    let shown = if editing {
        state.input.value()
    } else {
        state.folder.as_str()
    };
    let field = Paragraph::new(Span::styled(shown, Theme::field_style(editing))).block(
        Block::default()
            .title(" Working folder ")
            .borders(Borders::ALL)
            .border_style(if editing {
                Theme::field_style(true)
            } else {
                Theme::border_style()
            }),
    );
    frame.render_widget(field, layout.folder_area);
    if editing {
        let x = layout.folder_area.x + 1 + state.input.cursor() as u16;
        let max_x = layout.folder_area.right().saturating_sub(2);
        frame.set_cursor_position(Position::new(x.min(max_x), layout.folder_area.y + 1));
    }

    // ── buttons ───────────────────────────────────────────────
    let tasks_block = Block::default()
        .title(" Tasks ")
        .title_style(Theme::title_style())
        .borders(Borders::ALL)
        .border_style(Theme::border_style());
    frame.render_widget(tasks_block, layout.tasks_area);
    frame.render_widget(
        BusyIndicator {
            task: state.busy.map(|t| t.activity()),
            tick: state.tick,
        },
        layout.tasks_area,
    );

    let main_view = state.active_view == ActiveView::Main;
    for (action, rect) in button_rects(&layout) {
        frame.render_widget(
            Button {
                action,
                config: &state.config,
                focused: main_view && state.focus == action,
                enabled: state.busy.is_none() || !action.is_task(),
            },
            rect,
        );
    }

    // ── activity log ──────────────────────────────────────────
    let log_title = if state.log.scroll > 0 {
        format!(" Activity log (↑{}) ", state.log.scroll)
    } else {
        " Activity log ".to_string()
    };
    let log_block = Block::default()
        .title(log_title)
        .title_style(Theme::title_style())
        .borders(Borders::ALL)
        .border_style(Theme::border_style());
    frame.render_widget(
        LogView {
            log: &state.log,
            block: log_block,
        },
        layout.log_area,
    );

    let hint = state.config.status_bar_hint();
    frame.render_widget(
        Paragraph::new(hint).style(Theme::status_bar_style()),
        layout.status_area,
    );

    // ── overlays ──────────────────────────────────────────────
    match state.active_view {
        ActiveView::Picker => {
            let height = popup::picker_list_height(area);
            if let Some(picker) = state.picker.as_mut() {
                picker.clamp_scroll(height);
                frame.render_widget(PickerPopup { picker: &*picker }, area);
            }
        }
        ActiveView::SaveLogPrompt => {
            frame.render_widget(
                PromptPopup {
                    title: "Save log as",
                    input: &state.input,
                },
                area,
            );
            frame.set_cursor_position(popup::prompt_cursor(area, &state.input));
        }
        ActiveView::Controls => {
            frame.render_widget(ControlsPopup { config: &state.config }, area);
        }
        ActiveView::Main | ActiveView::EditFolder => {}
    }
}
