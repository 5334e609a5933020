//! Help overlay.
//!
//! Drawn in the same `terminal.draw()` as the panels: `Clear` erases the area
//! first, then a bordered `Paragraph` goes on top.

use ratatui::{
    Frame,
    layout::Constraint,
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::theme::Theme;

/// Renders the centred help modal, scrolled by `help_scroll` rows.
///
/// Skipped below 60 columns, where the centred area can collapse to zero height.
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 60 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(80), Constraint::Percentage(80));
    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" Help  (j/k scroll, ? or Esc to close) ")
        .border_style(Style::default().fg(theme.border_active));

    frame.render_widget(
        Paragraph::new(help_text())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        overlay_area,
    );
}

fn help_text() -> Text<'static> {
    Text::from(vec![
        Line::from("Navigation"),
        Line::from("  j / k         Scroll down / up one line"),
        Line::from("  g / G         Jump to top / bottom"),
        Line::from("  Ctrl-d / u    Scroll half page down / up"),
        Line::from("  Ctrl-f / b    Scroll full page down / up"),
        Line::from("  H / L, Tab    Move panel focus left / right"),
        Line::from(""),
        Line::from("Files"),
        Line::from("  { / }         Previous / next file"),
        Line::from("  Enter / l     Jump to selected file in the diff"),
        Line::from(""),
        Line::from("Diff"),
        Line::from("  [ / ]         Previous / next hunk"),
        Line::from("  < / >         Shrink / grow diff panel by 5%"),
        Line::from("  + / -         More / fewer diff columns (1 to 100)"),
        Line::from("                (lines flow from one column into the next)"),
        Line::from(""),
        Line::from("Refresh"),
        Line::from("  r             Re-run the diff now and reload diffpilot.toml"),
        Line::from("                (the view also refreshes on its own interval)"),
        Line::from(""),
        Line::from("General"),
        Line::from("  ?             Open / close this help"),
        Line::from("  q / Esc       Quit"),
    ])
}
