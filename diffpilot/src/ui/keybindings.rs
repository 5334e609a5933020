//! Keybinding dispatcher for diffpilot.
//!
//! Translates crossterm key and mouse events into `AppState` mutations and
//! returns a `KeyAction` telling the event loop whether to continue or quit.
//! Dispatch branches on `state.mode` first.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;

use crate::app::{AppState, Mode, PanelFocus};

/// Control-flow signal returned from the dispatchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Keep running; the next render tick redraws.
    Continue,
    /// Tear down the terminal and exit.
    Quit,
}

/// Dispatches a key event to the handler for the current mode.
pub fn handle_key(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match state.mode {
        Mode::HelpOverlay => handle_help(key, state),
        Mode::Normal => handle_normal(key, state),
    }
}

fn handle_normal(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if let Some(action) = handle_scroll_key(key, state) {
        return action;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return KeyAction::Quit,

        KeyCode::Char('H') | KeyCode::BackTab => state.focus = state.focus.prev(),
        KeyCode::Char('L') | KeyCode::Tab => state.focus = state.focus.next(),

        KeyCode::Enter | KeyCode::Char('l') if state.focus == PanelFocus::FileList => {
            state.jump_to_selected_file();
        }

        KeyCode::Char('{') => state.prev_file(),
        KeyCode::Char('}') => state.next_file(),

        KeyCode::Char('[') => state.prev_hunk(),
        KeyCode::Char(']') => state.next_hunk(),

        KeyCode::Char('<') => state.shrink_diff_panel(),
        KeyCode::Char('>') => state.grow_diff_panel(),

        KeyCode::Char('+') | KeyCode::Char('=') => state.more_columns(),
        KeyCode::Char('-') | KeyCode::Char('_') => state.fewer_columns(),

        KeyCode::Char('r') => state.request_refresh(),

        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
        }

        KeyCode::Char('q') | KeyCode::Esc => return KeyAction::Quit,

        _ => {}
    }
    KeyAction::Continue
}

/// j / k / g / G and the Ctrl page keys. `None` lets the key fall through.
fn handle_scroll_key(key: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => state.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => state.scroll_up(1),
        KeyCode::Char('g') | KeyCode::Home => state.scroll_top(),
        KeyCode::Char('G') | KeyCode::End => state.scroll_bottom(),
        KeyCode::Char('d') if ctrl => state.half_page_down(),
        KeyCode::Char('u') if ctrl => state.half_page_up(),
        KeyCode::Char('f') if ctrl => state.full_page_down(),
        KeyCode::PageDown => state.full_page_down(),
        KeyCode::Char('b') if ctrl => state.full_page_up(),
        KeyCode::PageUp => state.full_page_up(),
        _ => return None,
    }
    Some(KeyAction::Continue)
}

/// Help overlay: j/k/g/G scroll it; `?`, `Esc` or `q` dismiss it.
fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.help_scroll = state.help_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.help_scroll = state.help_scroll.saturating_sub(1);
        }
        KeyCode::Char('g') => state.help_scroll = 0,
        KeyCode::Char('G') => state.help_scroll = u16::MAX,
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => state.mode = Mode::Normal,
        _ => {}
    }
    KeyAction::Continue
}

/// Left click focuses the panel under the cursor; the wheel scrolls by 3.
pub fn handle_mouse(mouse: MouseEvent, state: &mut AppState) -> KeyAction {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let pos = Position { x: mouse.column, y: mouse.row };
            let [left, center, right] = state.panel_rects;
            // Collapsed side panels have zero width and cannot take focus.
            if left.width > 0 && left.contains(pos) {
                state.focus = PanelFocus::FileList;
            } else if center.contains(pos) {
                state.focus = PanelFocus::Diff;
            } else if right.width > 0 && right.contains(pos) {
                state.focus = PanelFocus::Tags;
            }
        }
        MouseEventKind::ScrollUp if state.mode == Mode::HelpOverlay => {
            state.help_scroll = state.help_scroll.saturating_sub(3);
        }
        MouseEventKind::ScrollDown if state.mode == Mode::HelpOverlay => {
            state.help_scroll = state.help_scroll.saturating_add(3);
        }
        MouseEventKind::ScrollUp => state.scroll_up(3),
        MouseEventKind::ScrollDown => state.scroll_down(3),
        _ => {}
    }
    KeyAction::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::Notify;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn state() -> AppState {
        AppState::new("t".to_owned(), Arc::new(Notify::new()))
    }

    #[test]
    fn q_quits_and_help_swallows_it() {
        let mut state = state();
        assert_eq!(handle_key(press(KeyCode::Char('?')), &mut state), KeyAction::Continue);
        assert_eq!(state.mode, Mode::HelpOverlay);
        assert_eq!(handle_key(press(KeyCode::Char('q')), &mut state), KeyAction::Continue);
        assert_eq!(state.mode, Mode::Normal);
        assert_eq!(handle_key(press(KeyCode::Char('q')), &mut state), KeyAction::Quit);
    }

    #[test]
    fn focus_cycles_through_panels() {
        let mut state = state();
        handle_key(press(KeyCode::Char('L')), &mut state);
        assert_eq!(state.focus, PanelFocus::Diff);
        handle_key(press(KeyCode::Char('L')), &mut state);
        assert_eq!(state.focus, PanelFocus::Tags);
        handle_key(press(KeyCode::Char('L')), &mut state);
        assert_eq!(state.focus, PanelFocus::FileList);
        handle_key(press(KeyCode::Char('H')), &mut state);
        assert_eq!(state.focus, PanelFocus::Tags);
    }

    #[test]
    fn plus_and_minus_change_column_count() {
        let mut state = state();
        let start = state.diff_columns;
        handle_key(press(KeyCode::Char('+')), &mut state);
        assert_eq!(state.diff_columns, start + 1);
        handle_key(press(KeyCode::Char('-')), &mut state);
        handle_key(press(KeyCode::Char('-')), &mut state);
        assert_eq!(state.diff_columns, start - 1);
    }

    #[tokio::test]
    async fn r_wakes_the_refresh_trigger() {
        let refresh = Arc::new(Notify::new());
        let mut state = AppState::new("t".to_owned(), Arc::clone(&refresh));
        handle_key(press(KeyCode::Char('r')), &mut state);
        // notify_one stores a permit, so a later waiter completes at once.
        tokio::time::timeout(std::time::Duration::from_secs(1), refresh.notified())
            .await
            .expect("refresh permit stored");
    }
}
