//! diffpilot: a live, grouped view of a git diff.
//!
//! Entry point for the `diffpilot` binary. `--json` streams updates as JSON
//! lines on stdout; otherwise the terminal view starts.
//!
//! # Terminal startup sequence
//!
//! 1. Logging goes to a file, since the TUI owns stderr.
//! 2. `install_panic_hook()` before anything touches the terminal.
//! 3. `register_sigterm()` returns a flag polled by the event loop.
//! 4. `init_tui()` enters the alternate screen and raw mode.
//! 5. Input task, stream driver and stream client are spawned.
//!
//! The event loop exits only via `break`, so `restore_tui()` always runs after
//! it. Draw errors are carried out of the loop rather than returned with `?`.

mod app;
mod cli;
mod event;
mod headless;
mod highlight;
mod logging;
mod theme;
mod tui;
mod ui;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use diffpilot_core::pipeline::Pipeline;
use diffpilot_core::settings::Settings;
use diffpilot_core::stream::StreamDriver;
use tokio::sync::Notify;

use crate::event::AppEvent;
use crate::ui::keybindings::{handle_key, handle_mouse, KeyAction};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let cli = cli::Cli::parse();
    let settings = cli.settings();

    if cli.json {
        logging::init_stderr()?;
        return headless::run(settings, cli.initial_render()).await;
    }

    let log_path = cli.log_file.clone().unwrap_or_else(logging::default_log_path);
    logging::init_file(&log_path)?;
    run_terminal(settings, cli.ansi).await
}

async fn run_terminal(settings: Settings, ansi: bool) -> std::io::Result<()> {
    let theme = theme::Theme::select(settings.dark_mode, ansi);
    let refresh = Arc::new(Notify::new());
    let mut state = app::AppState::new(settings.window_title.clone(), Arc::clone(&refresh));

    tracing::info!(
        root = %settings.working_directory.display(),
        command = %settings.diff_command,
        config = %settings.config_file.display(),
        "starting terminal view"
    );

    tui::install_panic_hook();
    let term_flag = tui::register_sigterm()?;
    let mut terminal = tui::init_tui()?;
    if let Err(e) = tui::set_title(&settings.window_title) {
        tracing::debug!(error = %e, "terminal refused window title");
    }

    let handler = event::EventHandler::new();
    event::spawn_event_task(handler.tx.clone());
    let stream = StreamDriver::new(Pipeline::new(&settings), settings.refresh_interval)
        .refresh_trigger(refresh)
        .spawn();
    event::spawn_stream_task(stream, theme.clone(), handler.tx.clone());
    let mut rx = handler.rx;

    let mut outcome = Ok(());
    'event_loop: loop {
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(50)) => {
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
            maybe_event = rx.recv() => {
                match maybe_event {
                    Some(AppEvent::Render) => {
                        if let Err(e) = terminal.draw(|frame| ui::render(frame, &mut state, &theme)) {
                            outcome = Err(e);
                            break 'event_loop;
                        }
                    }
                    Some(AppEvent::Key(key)) => {
                        if handle_key(key, &mut state) == KeyAction::Quit {
                            break 'event_loop;
                        }
                    }
                    Some(AppEvent::Mouse(mouse)) => {
                        handle_mouse(mouse, &mut state);
                    }
                    // ratatui picks up the new size from frame.area() on the next draw.
                    Some(AppEvent::Resize) => {}
                    Some(AppEvent::DiffUpdated(rendered)) => {
                        tracing::debug!(files = rendered.result.records.len(), "diff updated");
                        state.apply_update(*rendered);
                    }
                    Some(AppEvent::DiffError(message)) => {
                        tracing::warn!(%message, "diff refresh failed");
                        state.apply_error(message);
                    }
                    None => break 'event_loop,
                }
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
        }
    }

    tui::restore_tui()?;
    tracing::info!("terminal view closed");
    outcome
}
