//! Responsive 3-panel layout for diffpilot.
//!
//! Pure layout arithmetic, recomputed inside every `terminal.draw()` so each
//! frame reflects the live terminal size.
//!
//! At `>= 120` columns all three panels are visible, sized by
//! `AppState.left_pct / center_pct / right_pct`. Narrower terminals collapse
//! both side panels and the diff fills the width.
//!
//! `Spacing::Overlap(1)` with `MergeStrategy::Fuzzy` lets adjacent borders
//! share one column and merge their junction glyphs.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect, Spacing},
    style::{Modifier, Style},
    symbols::merge::MergeStrategy,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
};

use crate::app::AppState;
use crate::theme::Theme;

/// Narrowest terminal that shows the side panels.
const WIDE_LAYOUT_COLS: u16 = 120;

/// Returns `[left, center, right, status_bar]` for the current frame.
pub fn compute_layout(frame: &Frame, state: &AppState) -> [Rect; 4] {
    let [main_area, status_bar] =
        frame.area().layout(&Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]));

    let horizontal = if frame.area().width >= WIDE_LAYOUT_COLS {
        Layout::horizontal([
            Constraint::Percentage(state.left_pct),
            Constraint::Percentage(state.center_pct),
            Constraint::Percentage(state.right_pct),
        ])
    } else {
        Layout::horizontal([Constraint::Length(0), Constraint::Fill(1), Constraint::Length(0)])
    }
    .spacing(Spacing::Overlap(1));

    let [left, center, right] = main_area.layout(&horizontal);
    [left, center, right, status_bar]
}

/// Inner `Rect` of a bordered panel.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Bordered panel block; thick and highlighted when focused.
///
/// `MergeStrategy::Fuzzy` is required because `Exact` produces wrong junctions
/// where `Thick` and `Plain` borders meet.
pub fn panel_block<'a>(title: &'a str, is_focused: bool, theme: &'a Theme) -> Block<'a> {
    let (color, border_type) = if is_focused {
        (theme.border_active, BorderType::Thick)
    } else {
        (theme.border_inactive, BorderType::Plain)
    };

    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(Style::default().fg(color))
        .merge_borders(MergeStrategy::Fuzzy)
}

/// Renders the 1-row status bar.
///
/// Left to right: window title, file count, diff column count, short
/// fingerprint of the shown diff, then the last refresh error if there is one.
pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let mut spans = vec![Span::styled(
        format!(" {} ", state.window_title),
        Style::default().fg(theme.status_title).add_modifier(Modifier::BOLD),
    )];

    let summary = if state.diff_loading {
        " loading…".to_owned()
    } else {
        match state.records.len() {
            1 => " 1 file".to_owned(),
            n => format!(" {n} files"),
        }
    };
    spans.push(Span::raw(summary));

    let columns = if state.diff_visible_columns < state.diff_columns {
        format!("  {} cols ({} fit)", state.diff_columns, state.diff_visible_columns)
    } else {
        format!("  {} cols", state.diff_columns)
    };
    spans.push(Span::raw(columns));

    if let Some(fingerprint) = &state.fingerprint {
        let short = fingerprint.get(..8).unwrap_or(fingerprint);
        spans.push(Span::raw(format!("  @{short}")));
    }

    match &state.last_error {
        Some(message) => {
            let first_line = message.lines().next().unwrap_or_default();
            spans.push(Span::styled(
                format!("  ✗ {first_line}"),
                Style::default().fg(theme.status_error).add_modifier(Modifier::BOLD),
            ));
        }
        None => spans.push(Span::raw("  ? help  +/- columns  r refresh  q quit")),
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg)),
        area,
    );
}
