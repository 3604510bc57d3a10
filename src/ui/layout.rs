//! Layout helpers: split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main window layout, top to bottom: title, folder row, task buttons,
/// activity log, control buttons, status bar.
pub struct AppLayout {
    pub title_area: Rect,
    pub folder_area: Rect,
    pub browse_area: Rect,
    pub tasks_area: Rect,
    pub log_area: Rect,
    pub controls_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // title
                Constraint::Length(3), // folder field + browse button
                Constraint::Length(4), // task buttons (two rows inside a border)
                Constraint::Min(3),    // activity log
                Constraint::Length(1), // control buttons
                Constraint::Length(1), // status bar
            ])
            .split(area);

        let folder_row = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(10), Constraint::Length(14)])
            .split(chunks[1]);

        Self {
            title_area: chunks[0],
            folder_area: folder_row[0],
            browse_area: folder_row[1],
            tasks_area: chunks[2],
            log_area: chunks[3],
            controls_area: chunks[4],
            status_area: chunks[5],
        }
    }
}

/// Split `area` into `n` equal columns.
pub fn columns(area: Rect, n: u32) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints((0..n).map(|_| Constraint::Ratio(1, n)))
        .split(area)
        .to_vec()
}

/// Whether a terminal cell lies inside `area`.
pub fn contains(area: Rect, col: u16, row: u16) -> bool {
    col >= area.x
        && col < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

/// Create a centered rectangle with fixed dimensions, clamped to the available area.
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}
