//! File list panel.
//!
//! One `ListItem` per record so the `ListState` index matches `AppState.records`.
//! The first record of each group carries an extra heading line with the group
//! title, which keeps the groups visible without making headings selectable.

use diffpilot_core::types::{ChangeStatus, DiffRecord};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
};

use crate::app::{AppState, PanelFocus};
use crate::theme::Theme;
use crate::ui::layout::panel_block;

/// Renders the left panel from `AppState.records`.
pub fn render_file_list(
    frame: &mut Frame,
    area: Rect,
    focus: PanelFocus,
    state: &mut AppState,
    theme: &Theme,
) {
    let title = match state.records.len() {
        0 => "Files".to_owned(),
        n => format!("Files ({n})"),
    };
    let block = panel_block(&title, focus == PanelFocus::FileList, theme);

    let items: Vec<ListItem> = if state.records.is_empty() {
        let msg = if state.diff_loading { "Loading..." } else { "No changes" };
        vec![ListItem::new(Line::raw(msg))]
    } else {
        let mut previous_group: Option<&str> = None;
        state
            .records
            .iter()
            .map(|record| {
                let heading = previous_group != Some(record.group_title.as_str());
                previous_group = Some(&record.group_title);
                record_item(record, heading, state, theme)
            })
            .collect()
    };

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(theme.border_active).add_modifier(Modifier::BOLD))
        .highlight_symbol("▸");

    frame.render_stateful_widget(list, area, &mut state.file_list_state);
}

/// `[M] src/main.rs #backend`, preceded by the group title when `heading`.
fn record_item(
    record: &DiffRecord,
    heading: bool,
    state: &AppState,
    theme: &Theme,
) -> ListItem<'static> {
    let badge_color = match record.status {
        ChangeStatus::Added => theme.file_added,
        ChangeStatus::Deleted => theme.file_removed,
        ChangeStatus::Modified => theme.file_modified,
    };
    let mut spans = vec![
        Span::styled(format!("[{}] ", record.status.badge()), Style::default().fg(badge_color)),
        Span::raw(record.filename.clone()),
    ];
    for tag in &record.tags {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!("#{tag}"), theme.tag_style(state.tags.get(tag))));
    }

    let mut lines = Vec::with_capacity(2);
    if heading {
        lines.push(Line::from(Span::styled(
            record.group_title.clone(),
            Style::default().fg(theme.group_title).add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )));
    }
    lines.push(Line::from(spans));
    ListItem::new(lines)
}
