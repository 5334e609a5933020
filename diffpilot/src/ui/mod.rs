//! UI rendering for diffpilot.
//!
//! `render()` is the single entry point called from the event loop's
//! `terminal.draw()` closure. Layout arithmetic lives in `layout.rs`, the
//! panels in `file_tree.rs` and `diff_view.rs`; the tag legend is small
//! enough to live here.

mod layout;
pub mod diff_view;
pub mod file_tree;
pub mod help;
pub mod keybindings;

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, Mode, PanelFocus};
use crate::theme::Theme;
use layout::{compute_layout, inner_rect, panel_block, render_status_bar};

/// Renders one frame: three panels, status bar, and the help overlay if open.
///
/// Viewport heights and panel rects are written back into `state` for the
/// next key or mouse event; the one-frame lag is not noticeable.
pub fn render(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    let [left, center, right, status_bar] = compute_layout(frame, state);

    let diff_inner = inner_rect(center);
    state.diff_visible_columns = diff_view::visible_columns(diff_inner.width, state.diff_columns);
    state.file_list_viewport_height = inner_rect(left).height;
    state.diff_viewport_height = diff_inner.height.saturating_mul(state.diff_visible_columns);
    state.tags_viewport_height = inner_rect(right).height;
    state.panel_rects = [left, center, right];

    let focus = state.focus;
    if left.width > 0 {
        file_tree::render_file_list(frame, left, focus, state, theme);
    }
    diff_view::render_diff(frame, center, focus, state, theme);
    if right.width > 0 {
        render_tags(frame, right, focus, state, theme);
    }
    render_status_bar(frame, status_bar, state, theme);

    if state.mode == Mode::HelpOverlay {
        help::render_help_overlay(frame, theme, state.help_scroll);
    }
}

/// Tag legend: every tag used by a shown file, in its configured style, with
/// the number of files carrying it. Tags defined only in the configuration
/// follow, dimmed.
fn render_tags(frame: &mut Frame, area: Rect, focus: PanelFocus, state: &AppState, theme: &Theme) {
    let block = panel_block("Tags", focus == PanelFocus::Tags, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    let mut used: Vec<(&str, usize)> = Vec::new();
    for tag in state.records.iter().flat_map(|r| r.tags.iter()) {
        match used.iter_mut().find(|(name, _)| *name == tag.as_str()) {
            Some((_, count)) => *count += 1,
            None => used.push((tag.as_str(), 1)),
        }
    }

    let mut lines: Vec<Line> = used
        .iter()
        .map(|(name, count)| {
            Line::from(vec![
                Span::styled(format!("#{name}"), theme.tag_style(state.tags.get(*name))),
                Span::raw(format!("  {count}")),
            ])
        })
        .collect();

    let unused = state
        .tags
        .keys()
        .filter(|name| !used.iter().any(|(u, _)| *u == name.as_str()));
    for name in unused {
        lines.push(Line::from(Span::styled(
            format!("#{name}"),
            Style::default().fg(theme.border_inactive),
        )));
    }

    if lines.is_empty() {
        lines.push(Line::raw("(no tags)"));
    }

    frame.render_widget(Paragraph::new(lines).scroll((state.tags_scroll, 0)), inner);
}
