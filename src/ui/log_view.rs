//! Activity log widget: newest entries at the bottom.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

use crate::app::log::ActivityLog;

use super::theme::Theme;

pub struct LogView<'a> {
    pub log: &'a ActivityLog,
    pub block: Block<'a>,
}

impl Widget for LogView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = self.block.inner(area);
        self.block.render(area, buf);

        let entries = self.log.entries();
        let height = inner.height as usize;
        let scroll = self.log.scroll.min(entries.len().saturating_sub(height));
        let end = entries.len() - scroll;
        let start = end.saturating_sub(height);

        let lines: Vec<Line> = entries[start..end]
            .iter()
            .map(|e| {
                Line::from(vec![
                    Span::styled(format!("[{}] ", e.timestamp()), Theme::timestamp_style()),
                    Span::styled(e.message.as_str(), Theme::severity_style(e.severity)),
                ])
            })
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }
}
