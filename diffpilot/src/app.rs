//! Central application state for diffpilot.
//!
//! This module owns all mutable UI state: the current mode, which panel has focus,
//! per-panel scroll offsets and viewport heights, panel width percentages, and the
//! latest diff snapshot pushed by the stream. No ratatui rendering logic lives here.

use std::collections::BTreeMap;
use std::sync::Arc;

use diffpilot_core::config::TagStyle;
use diffpilot_core::types::DiffRecord;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::ListState;
use tokio::sync::Notify;

use crate::highlight::RenderedDiff;

/// Fewest columns the diff panel can be split into.
pub const MIN_COLUMNS: u16 = 1;
/// Most columns the diff panel can be split into.
pub const MAX_COLUMNS: u16 = 100;
/// Requested column count at startup; narrow panels show fewer.
pub const DEFAULT_COLUMNS: u16 = 3;

/// Which keybinding set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Normal vim-style navigation mode (default).
    #[default]
    Normal,
    /// Full-screen help overlay is shown above all panels.
    HelpOverlay,
}

/// Which panel currently has keyboard focus.
///
/// Navigation cycles FileList → Diff → Tags → FileList via `next()` and in
/// reverse via `prev()`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    /// Left panel listing changed files in display order.
    #[default]
    FileList,
    /// Centre panel showing every file's diff.
    Diff,
    /// Right panel with the tag legend.
    Tags,
}

impl PanelFocus {
    /// Returns the panel that precedes `self` in the cycle (wraps around).
    pub fn prev(self) -> Self {
        match self {
            PanelFocus::FileList => PanelFocus::Tags,
            PanelFocus::Diff => PanelFocus::FileList,
            PanelFocus::Tags => PanelFocus::Diff,
        }
    }

    /// Returns the panel that follows `self` in the cycle (wraps around).
    pub fn next(self) -> Self {
        match self {
            PanelFocus::FileList => PanelFocus::Diff,
            PanelFocus::Diff => PanelFocus::Tags,
            PanelFocus::Tags => PanelFocus::FileList,
        }
    }
}

/// All mutable UI state passed through every render cycle.
pub struct AppState {
    /// Current mode governing which keybindings are active.
    pub mode: Mode,
    /// Which panel currently receives keyboard scroll/navigation events.
    pub focus: PanelFocus,
    /// Title shown in the status bar and the terminal window.
    pub window_title: String,

    /// Stateful list widget backing the file-list panel (left).
    pub file_list_state: ListState,
    /// Vertical scroll offset for the diff panel (centre).
    pub diff_scroll: usize,
    /// Vertical scroll offset for the tag legend (right).
    pub tags_scroll: u16,
    /// Vertical scroll offset for the help overlay.
    pub help_scroll: u16,

    /// Requested number of diff columns, within `MIN_COLUMNS..=MAX_COLUMNS`.
    pub diff_columns: u16,
    /// Columns that fit the last rendered diff panel, at most `diff_columns`.
    pub diff_visible_columns: u16,

    /// Inner panel heights after borders, cached after each render for
    /// half-page and full-page scrolling. For the diff panel this counts the
    /// lines of every visible column.
    pub diff_viewport_height: u16,
    pub tags_viewport_height: u16,
    pub file_list_viewport_height: u16,
    /// Outer rects of the three panels from the last render, for mouse focus.
    pub panel_rects: [Rect; 3],

    /// Width percentage of the left (file-list) panel. Default: 22.
    pub left_pct: u16,
    /// Width percentage of the centre (diff) panel. Default: 58.
    pub center_pct: u16,
    /// Width percentage of the right (tags) panel. Default: 20.
    pub right_pct: u16,

    /// Records of the latest update, in display order.
    pub records: Vec<DiffRecord>,
    /// Tag styles of the latest update.
    pub tags: BTreeMap<String, TagStyle>,
    /// Fingerprint of the latest update.
    pub fingerprint: Option<String>,
    /// Highlighted lines for the diff panel.
    pub diff_lines: Vec<Line<'static>>,
    /// Line index in `diff_lines` of each record's header.
    pub file_offsets: Vec<usize>,
    /// Line indices of `@@` hunk headers within `diff_lines`.
    pub hunk_offsets: Vec<usize>,
    /// Index into `hunk_offsets` for `[` / `]` navigation.
    pub hunk_cursor: usize,
    /// True until the first update or error arrives.
    pub diff_loading: bool,
    /// Message of the last failed refresh, cleared by the next update.
    pub last_error: Option<String>,

    /// Wakes the stream driver for an immediate, unconditional refresh.
    pub refresh: Arc<Notify>,
}

impl AppState {
    /// Constructs `AppState` with the given title and refresh trigger.
    ///
    /// Panel percentages are 22 / 58 / 20 (left / centre / right).
    pub fn new(window_title: String, refresh: Arc<Notify>) -> Self {
        Self {
            mode: Mode::default(),
            focus: PanelFocus::default(),
            window_title,
            file_list_state: ListState::default(),
            diff_scroll: 0,
            tags_scroll: 0,
            help_scroll: 0,
            diff_columns: DEFAULT_COLUMNS,
            diff_visible_columns: 1,
            diff_viewport_height: 0,
            tags_viewport_height: 0,
            file_list_viewport_height: 0,
            panel_rects: [Rect::default(); 3],
            left_pct: 22,
            center_pct: 58,
            right_pct: 20,
            records: Vec::new(),
            tags: BTreeMap::new(),
            fingerprint: None,
            diff_lines: Vec::new(),
            file_offsets: Vec::new(),
            hunk_offsets: Vec::new(),
            hunk_cursor: 0,
            diff_loading: true,
            last_error: None,
            refresh,
        }
    }

    /// Scrolls the focused panel down by `lines` rows.
    pub fn scroll_down(&mut self, lines: u16) {
        match self.focus {
            PanelFocus::FileList => self.file_list_state.scroll_down_by(lines),
            PanelFocus::Diff => {
                let max = self.diff_lines.len().saturating_sub(1);
                self.diff_scroll = self.diff_scroll.saturating_add(lines as usize).min(max);
            }
            PanelFocus::Tags => self.tags_scroll = self.tags_scroll.saturating_add(lines),
        }
    }

    /// Scrolls the focused panel up by `lines` rows.
    pub fn scroll_up(&mut self, lines: u16) {
        match self.focus {
            PanelFocus::FileList => self.file_list_state.scroll_up_by(lines),
            PanelFocus::Diff => self.diff_scroll = self.diff_scroll.saturating_sub(lines as usize),
            PanelFocus::Tags => self.tags_scroll = self.tags_scroll.saturating_sub(lines),
        }
    }

    /// Scrolls the focused panel to the very top.
    pub fn scroll_top(&mut self) {
        match self.focus {
            PanelFocus::FileList => self.file_list_state.select_first(),
            PanelFocus::Diff => {
                self.diff_scroll = 0;
                self.hunk_cursor = 0;
            }
            PanelFocus::Tags => self.tags_scroll = 0,
        }
    }

    /// Scrolls the focused panel to the very bottom.
    pub fn scroll_bottom(&mut self) {
        match self.focus {
            PanelFocus::FileList => self.file_list_state.select_last(),
            PanelFocus::Diff => self.diff_scroll = self.diff_lines.len().saturating_sub(1),
            PanelFocus::Tags => self.tags_scroll = u16::MAX,
        }
    }

    fn focused_viewport_height(&self) -> u16 {
        match self.focus {
            PanelFocus::FileList => self.file_list_viewport_height,
            PanelFocus::Diff => self.diff_viewport_height,
            PanelFocus::Tags => self.tags_viewport_height,
        }
    }

    /// Scrolls the focused panel down by half its visible height.
    pub fn half_page_down(&mut self) {
        self.scroll_down((self.focused_viewport_height() / 2).max(1));
    }

    /// Scrolls the focused panel up by half its visible height.
    pub fn half_page_up(&mut self) {
        self.scroll_up((self.focused_viewport_height() / 2).max(1));
    }

    /// Scrolls the focused panel down by its full visible height.
    pub fn full_page_down(&mut self) {
        self.scroll_down(self.focused_viewport_height().max(1));
    }

    /// Scrolls the focused panel up by its full visible height.
    pub fn full_page_up(&mut self) {
        self.scroll_up(self.focused_viewport_height().max(1));
    }

    /// Moves the file-list selection up one row, whatever panel has focus.
    pub fn prev_file(&mut self) {
        self.file_list_state.scroll_up_by(1);
    }

    /// Moves the file-list selection down one row, whatever panel has focus.
    pub fn next_file(&mut self) {
        self.file_list_state.scroll_down_by(1);
    }

    /// Jumps the diff panel to the previous hunk header.
    pub fn prev_hunk(&mut self) {
        if self.hunk_offsets.is_empty() {
            return;
        }
        self.hunk_cursor = self.hunk_cursor.saturating_sub(1);
        self.diff_scroll = self.hunk_offsets[self.hunk_cursor];
    }

    /// Jumps the diff panel to the next hunk header.
    pub fn next_hunk(&mut self) {
        if self.hunk_offsets.is_empty() {
            return;
        }
        self.hunk_cursor = (self.hunk_cursor + 1).min(self.hunk_offsets.len() - 1);
        self.diff_scroll = self.hunk_offsets[self.hunk_cursor];
    }

    /// Scrolls the diff panel to the selected file's header and focuses it.
    pub fn jump_to_selected_file(&mut self) {
        let Some(idx) = self.file_list_state.selected() else {
            return;
        };
        let Some(&offset) = self.file_offsets.get(idx) else {
            return;
        };
        self.diff_scroll = offset;
        self.hunk_cursor = self.hunk_offsets.partition_point(|&h| h < offset);
        self.focus = PanelFocus::Diff;
    }

    /// Asks the stream driver to refresh now and push even an unchanged diff.
    pub fn request_refresh(&self) {
        self.refresh.notify_one();
    }

    /// Replaces the diff snapshot with a newly pushed update.
    ///
    /// The file selection follows the previously selected filename when it is
    /// still present; scroll positions are clamped to the new content.
    pub fn apply_update(&mut self, rendered: RenderedDiff) {
        let selected_name = self
            .file_list_state
            .selected()
            .and_then(|i| self.records.get(i))
            .map(|r| r.filename.clone());

        let RenderedDiff { result, lines, file_offsets, hunk_offsets } = rendered;
        self.records = result.records;
        self.tags = result.tags;
        self.fingerprint = Some(result.fingerprint);
        self.diff_lines = lines;
        self.file_offsets = file_offsets;
        self.hunk_offsets = hunk_offsets;
        self.diff_loading = false;
        self.last_error = None;

        let reselect = selected_name
            .and_then(|name| self.records.iter().position(|r| r.filename == name))
            .or(if self.records.is_empty() { None } else { Some(0) });
        self.file_list_state.select(reselect);

        self.diff_scroll = self.diff_scroll.min(self.diff_lines.len().saturating_sub(1));
        self.hunk_cursor = self
            .hunk_cursor
            .min(self.hunk_offsets.len().saturating_sub(1));
    }

    /// Records a failed refresh; the last good snapshot stays on screen.
    pub fn apply_error(&mut self, message: String) {
        self.diff_loading = false;
        self.last_error = Some(message);
    }

    /// Splits the diff panel into one more column, up to `MAX_COLUMNS`.
    pub fn more_columns(&mut self) {
        self.diff_columns = self.diff_columns.saturating_add(1).min(MAX_COLUMNS);
    }

    /// Merges one diff column away, down to `MIN_COLUMNS`.
    pub fn fewer_columns(&mut self) {
        self.diff_columns = self.diff_columns.saturating_sub(1).max(MIN_COLUMNS);
    }

    /// Shrinks the diff (centre) panel by moving 5% to the side panels.
    ///
    /// The centre panel will not shrink below 20%.
    pub fn shrink_diff_panel(&mut self) {
        const MIN_CENTER: u16 = 20;
        const STEP: u16 = 5;
        if self.center_pct <= MIN_CENTER {
            return;
        }
        let transfer = STEP.min(self.center_pct - MIN_CENTER);
        self.center_pct -= transfer;
        let left_gain = transfer / 2;
        let right_gain = transfer - left_gain;
        self.left_pct = self.left_pct.saturating_add(left_gain);
        self.right_pct = self.right_pct.saturating_add(right_gain);
    }

    /// Grows the diff (centre) panel by pulling 5% from the side panels.
    ///
    /// The centre panel will not grow above 80% and side panels keep at least 5%.
    pub fn grow_diff_panel(&mut self) {
        const MAX_CENTER: u16 = 80;
        const MIN_SIDE: u16 = 5;
        const STEP: u16 = 5;
        if self.center_pct >= MAX_CENTER {
            return;
        }
        let transfer = STEP.min(MAX_CENTER - self.center_pct);
        let left_give = (transfer / 2).min(self.left_pct.saturating_sub(MIN_SIDE));
        let right_give = (transfer - transfer / 2).min(self.right_pct.saturating_sub(MIN_SIDE));
        self.left_pct -= left_give;
        self.right_pct -= right_give;
        self.center_pct += left_give + right_give;
    }
}
