//! Diff panel renderer.
//!
//! The panel can be split into several columns. Lines flow down the first
//! column, then continue at the top of the next, so with `n` columns of
//! height `h` the panel shows `diff_lines[diff_scroll..diff_scroll + n * h]`.
//!
//! Virtual scrolling: only the visible lines are turned into `ListItem`s per
//! frame, so drawing cost follows the viewport and not the size of the diff.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Borders, List, ListItem},
};

use crate::app::{AppState, PanelFocus};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

/// Narrowest column worth showing, separator included.
const MIN_COLUMN_WIDTH: u16 = 40;

/// How many of the `requested` columns fit into a panel `width` cells wide.
/// Always at least one.
pub fn visible_columns(width: u16, requested: u16) -> u16 {
    (width / MIN_COLUMN_WIDTH).min(requested).max(1)
}

pub fn render_diff(frame: &mut Frame, area: Rect, focus: PanelFocus, state: &AppState, theme: &Theme) {
    let block = panel_block("Diff", focus == PanelFocus::Diff, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    if state.diff_lines.is_empty() {
        let msg = match (&state.last_error, state.diff_loading) {
            (_, true) => "Running diff command...",
            (Some(_), false) => "Diff command failed; see status bar.",
            (None, false) => "Working tree is clean.",
        };
        frame.render_widget(List::new([ListItem::new(Line::raw(msg))]), inner);
        return;
    }

    let columns = visible_columns(inner.width, state.diff_columns) as usize;
    let areas = Layout::horizontal(vec![Constraint::Fill(1); columns]).split(inner);
    let height = inner.height as usize;
    let total = state.diff_lines.len();
    let first = state.diff_scroll.min(total.saturating_sub(1));

    for (index, column) in areas.iter().enumerate() {
        let start = (first + index * height).min(total);
        let end = (start + height).min(total);

        let column = if index == 0 {
            *column
        } else {
            let separator = Block::new()
                .borders(Borders::LEFT)
                .border_style(Style::default().fg(theme.border_inactive));
            let body = separator.inner(*column);
            frame.render_widget(separator, *column);
            body
        };

        let items: Vec<ListItem> = state.diff_lines[start..end]
            .iter()
            .map(|l| ListItem::new(l.clone()))
            .collect();
        frame.render_widget(List::new(items), column);
    }
}
