//! Turns an ordered pipeline result into styled terminal lines.
//!
//! Runs on tokio's blocking pool: syntect highlighting is CPU-bound and the
//! syntax/theme sets are loaded once into `LazyLock` statics. Output lines are
//! fully owned (`Line<'static>`) so they can be stored in `AppState` and drawn
//! on every frame without re-highlighting.

use std::sync::LazyLock;

use diffpilot_core::types::{ChangeStatus, DiffRecord, PipelineResult};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use similar::{ChangeTag, TextDiff};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::{SyntaxReference, SyntaxSet};

use crate::theme::Theme;

static PS: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static TS: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// A pipeline result plus its pre-rendered diff panel.
#[derive(Debug)]
pub struct RenderedDiff {
    /// The records, tags and fingerprint exactly as pushed by the stream.
    pub result: PipelineResult,
    /// Every record's header and body, in display order.
    pub lines: Vec<Line<'static>>,
    /// `file_offsets[i]` is the index in `lines` of record `i`'s header line.
    pub file_offsets: Vec<usize>,
    /// Indices in `lines` of every `@@` hunk header, ascending.
    pub hunk_offsets: Vec<usize>,
}

/// Renders every record of `result` for the diff panel.
pub fn render_result(result: PipelineResult, theme: &Theme) -> RenderedDiff {
    let mut lines = Vec::new();
    let mut file_offsets = Vec::with_capacity(result.records.len());
    let mut hunk_offsets = Vec::new();

    for record in &result.records {
        file_offsets.push(lines.len());
        lines.push(record_header(record, theme));
        render_body(record, theme, &mut lines, &mut hunk_offsets);
        lines.push(Line::raw(""));
    }

    RenderedDiff { result, lines, file_offsets, hunk_offsets }
}

/// Header line shown above each file's body: status, path, group and tags.
fn record_header(record: &DiffRecord, theme: &Theme) -> Line<'static> {
    let status_color = match record.status {
        ChangeStatus::Added => theme.file_added,
        ChangeStatus::Deleted => theme.file_removed,
        ChangeStatus::Modified => theme.file_modified,
    };
    let mut spans = vec![
        Span::styled(
            format!("[{}] ", record.status.badge()),
            Style::default().fg(status_color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            record.filename.clone(),
            Style::default().fg(theme.file_header).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", record.group_title),
            Style::default().fg(theme.group_title),
        ),
    ];
    for tag in &record.tags {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!("#{tag}"), Style::default().fg(theme.tag_default)));
    }
    Line::from(spans)
}

/// Picks a syntax by file extension first, then by the record's language tag.
fn syntax_for(record: &DiffRecord) -> &'static SyntaxReference {
    let ext = record.filename.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
    PS.find_syntax_by_extension(ext)
        .or_else(|| PS.find_syntax_by_token(&record.language))
        .unwrap_or_else(|| PS.find_syntax_plain_text())
}

/// Appends one record's body lines to `out`.
///
/// Lines before the first `@@` of a verbatim block (binary, mode-only) are
/// metadata and rendered dimmed rather than as additions or removals.
fn render_body(
    record: &DiffRecord,
    theme: &Theme,
    out: &mut Vec<Line<'static>>,
    hunk_offsets: &mut Vec<usize>,
) {
    let syntax_theme =
        TS.themes.get(theme.syntax_theme).or_else(|| TS.themes.values().next());
    let mut highlighter = syntax_theme.map(|t| HighlightLines::new(syntax_for(record), t));

    let mut in_metadata = record.content.starts_with("diff --git");
    let mut pending_removed: Option<(String, Vec<Span<'static>>)> = None;

    for raw in record.content.lines() {
        if raw.starts_with("@@") {
            in_metadata = false;
            flush_removed(&mut pending_removed, out);
            hunk_offsets.push(out.len());
            out.push(Line::from(Span::styled(
                raw.to_owned(),
                Style::default().fg(theme.diff_hunk_header),
            )));
            continue;
        }
        if in_metadata || raw.starts_with('\\') {
            flush_removed(&mut pending_removed, out);
            out.push(Line::from(Span::styled(
                raw.to_owned(),
                Style::default().fg(theme.diff_metadata),
            )));
            continue;
        }

        let (origin, code) = match raw.chars().next() {
            Some(c @ ('+' | '-' | ' ')) => (c, &raw[1..]),
            _ => (' ', raw),
        };
        let base_spans = match highlighter.as_mut() {
            Some(h) => syntect_spans(code, h),
            None => vec![Span::styled(code.to_owned(), Style::default().fg(theme.diff_context))],
        };

        match origin {
            '-' => {
                flush_removed(&mut pending_removed, out);
                let mut spans = vec![Span::styled("- ", Style::default().fg(theme.diff_removed))];
                spans.extend(base_spans);
                pending_removed = Some((code.to_owned(), spans));
            }
            '+' => {
                if let Some((old_code, _)) = pending_removed.take() {
                    let (old_words, new_words) = word_diff_spans(&old_code, code, theme);
                    let mut old = vec![Span::styled("- ", Style::default().fg(theme.diff_removed))];
                    old.extend(old_words);
                    out.push(Line::from(old));
                    let mut new = vec![Span::styled("+ ", Style::default().fg(theme.diff_added))];
                    new.extend(new_words);
                    out.push(Line::from(new));
                } else {
                    let mut spans = vec![Span::styled("+ ", Style::default().fg(theme.diff_added))];
                    spans.extend(base_spans);
                    out.push(Line::from(spans));
                }
            }
            _ => {
                flush_removed(&mut pending_removed, out);
                let mut spans = vec![Span::styled("  ", Style::default().fg(theme.diff_context))];
                spans.extend(base_spans);
                out.push(Line::from(spans));
            }
        }
    }
    flush_removed(&mut pending_removed, out);
}

fn flush_removed(pending: &mut Option<(String, Vec<Span<'static>>)>, out: &mut Vec<Line<'static>>) {
    if let Some((_, spans)) = pending.take() {
        out.push(Line::from(spans));
    }
}

/// Highlights one line of code into owned spans, plain on syntect errors.
fn syntect_spans(code: &str, h: &mut HighlightLines) -> Vec<Span<'static>> {
    let line = format!("{code}\n");
    let ranges = h.highlight_line(&line, &PS).unwrap_or_default();
    let spans: Vec<Span<'static>> = ranges
        .into_iter()
        .map(|(style, text)| syntect_to_span(style, text.trim_end_matches('\n')))
        .filter(|span| !span.content.is_empty())
        .collect();
    if spans.is_empty() {
        vec![Span::raw(code.to_owned())]
    } else {
        spans
    }
}

/// Converts a syntect style to a ratatui span, keeping the foreground only so
/// the terminal background shows through.
fn syntect_to_span(style: syntect::highlighting::Style, content: &str) -> Span<'static> {
    use syntect::highlighting::FontStyle;

    let mut out = Style::default();
    let fg = style.foreground;
    if fg.a > 0 {
        out = out.fg(Color::Rgb(fg.r, fg.g, fg.b));
    }
    if style.font_style.contains(FontStyle::BOLD) {
        out = out.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        out = out.add_modifier(Modifier::ITALIC);
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        out = out.add_modifier(Modifier::UNDERLINED);
    }
    Span::styled(content.to_owned(), out)
}

/// Word-level emphasis for a removed/added line pair.
///
/// Changed words are bold in the diff color; shared words are dimmed.
fn word_diff_spans(
    old_line: &str,
    new_line: &str,
    theme: &Theme,
) -> (Vec<Span<'static>>, Vec<Span<'static>>) {
    let diff = TextDiff::from_words(old_line, new_line);
    let mut old_spans = Vec::new();
    let mut new_spans = Vec::new();

    for op in diff.ops() {
        for change in diff.iter_inline_changes(op) {
            for (emphasized, value) in change.iter_strings_lossy() {
                let text = value.into_owned();
                match change.tag() {
                    ChangeTag::Delete => {
                        old_spans.push(Span::styled(text, emphasis(theme.diff_removed, emphasized)));
                    }
                    ChangeTag::Insert => {
                        new_spans.push(Span::styled(text, emphasis(theme.diff_added, emphasized)));
                    }
                    ChangeTag::Equal => {
                        let span = Span::styled(text, Style::default().fg(theme.diff_metadata));
                        old_spans.push(span.clone());
                        new_spans.push(span);
                    }
                }
            }
        }
    }
    (old_spans, new_spans)
}

fn emphasis(color: Color, emphasized: bool) -> Style {
    let style = Style::default().fg(color);
    if emphasized {
        style.add_modifier(Modifier::BOLD)
    } else {
        style
    }
}
