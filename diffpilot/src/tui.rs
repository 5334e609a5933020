//! Terminal lifecycle management for diffpilot.
//!
//! The TUI draws to stderr. Stdout is left alone so `diffpilot --json` and
//! the interactive view share one output convention: machine-readable data on
//! stdout only, never escape sequences.

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use signal_hook::consts::SIGTERM;
use signal_hook::flag::register;
use std::io::{stderr, BufWriter, Stderr};
use std::panic;
use std::sync::{atomic::AtomicBool, Arc};

/// CrosstermBackend over a buffered stderr writer.
///
/// The `BufWriter` batches escape sequences into fewer write(2) calls per frame.
pub type Tui = Terminal<CrosstermBackend<BufWriter<Stderr>>>;

/// Enables raw mode, enters the alternate screen and turns on mouse capture.
///
/// Call [`restore_tui`] at every exit path.
///
/// # Errors
///
/// Returns `Err` if `enable_raw_mode`, `execute!`, or `Terminal::new` fails.
pub fn init_tui() -> std::io::Result<Tui> {
    let mut out = BufWriter::new(stderr());
    enable_raw_mode()?;
    execute!(out, EnterAlternateScreen, EnableMouseCapture)?;
    Terminal::new(CrosstermBackend::new(out))
}

/// Sets the terminal window title.
pub fn set_title(title: &str) -> std::io::Result<()> {
    execute!(stderr(), SetTitle(title))
}

/// Restores the terminal to its pre-TUI state.
///
/// Idempotent. ratatui 0.30 does not restore the terminal on `Drop`, so this
/// runs after the event loop and again from the panic hook.
///
/// # Errors
///
/// Returns `Err` if `disable_raw_mode` or `execute!` fails. The panic hook
/// ignores the error.
pub fn restore_tui() -> std::io::Result<()> {
    disable_raw_mode()?;
    execute!(stderr(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}

/// Installs a panic hook that restores the terminal before the panic message prints.
///
/// Must be called before [`init_tui`]. Chains onto the previous hook so the
/// default printer still runs.
pub fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_tui();
        original_hook(panic_info);
    }));
}

/// Registers a SIGTERM handler that flips the returned flag to `true`.
///
/// The main loop polls the flag on a 50 ms heartbeat.
///
/// # Errors
///
/// Returns `Err` if the OS refuses to register the handler.
pub fn register_sigterm() -> std::io::Result<Arc<AtomicBool>> {
    let term = Arc::new(AtomicBool::new(false));
    register(SIGTERM, Arc::clone(&term))?;
    Ok(term)
}
