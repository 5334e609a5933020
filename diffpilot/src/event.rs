//! Event bus for diffpilot.
//!
//! Terminal input, render ticks and diff stream results are normalised into a
//! single `AppEvent` enum and sent over a tokio unbounded MPSC channel. The
//! main loop receives from this channel and dispatches accordingly.

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind, MouseEvent};
use diffpilot_core::stream::StreamEvent;
use futures::{FutureExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

use crate::highlight::{render_result, RenderedDiff};
use crate::theme::Theme;

/// All events the application can receive from any source.
#[derive(Debug)]
#[non_exhaustive]
pub enum AppEvent {
    /// A key press from the terminal (`KeyEventKind::Press` only).
    Key(KeyEvent),
    /// A mouse event from the terminal (click, scroll, move).
    Mouse(MouseEvent),
    /// Terminal was resized; the next draw reads the new size from the frame.
    Resize,
    /// Render tick, one `terminal.draw()` every 33 ms.
    Render,
    /// The diff changed; carries the highlighted result.
    DiffUpdated(Box<RenderedDiff>),
    /// The last pipeline run failed.
    DiffError(String),
}

/// Holds the sender and receiver ends of the unified event channel.
pub struct EventHandler {
    /// Send half, cloned into each producing task.
    pub tx: mpsc::UnboundedSender<AppEvent>,
    /// Receive half, owned by the main loop.
    pub rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    /// Creates a new `EventHandler` with a fresh unbounded channel.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawns the task that forwards terminal input and render ticks.
///
/// `reader.next().fuse()` keeps `select!` from polling a finished stream, and
/// only `KeyEventKind::Press` is forwarded because Windows also reports
/// releases. Send errors mean the main loop is gone; the task then ends.
pub fn spawn_event_task(tx: mpsc::UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let mut render_interval = interval(Duration::from_millis(33));
        let mut reader = EventStream::new();

        loop {
            let render_tick = render_interval.tick();
            let crossterm_event = reader.next().fuse();

            let sent = tokio::select! {
                _ = render_tick => tx.send(AppEvent::Render),
                maybe_event = crossterm_event => match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        tx.send(AppEvent::Key(key))
                    }
                    Some(Ok(Event::Resize(_, _))) => tx.send(AppEvent::Resize),
                    Some(Ok(Event::Mouse(mouse))) => tx.send(AppEvent::Mouse(mouse)),
                    _ => Ok(()),
                },
            };
            if sent.is_err() {
                break;
            }
        }
    });
}

/// Spawns the stream client that feeds diff updates into the event bus.
///
/// Each update is highlighted on the blocking pool before it is forwarded, so
/// the draw loop only ever receives ready-to-render lines. When the main loop
/// goes away the stream receiver is dropped, which closes the driver.
pub fn spawn_stream_task(
    mut stream: mpsc::Receiver<StreamEvent>,
    theme: Theme,
    tx: mpsc::UnboundedSender<AppEvent>,
) {
    tokio::spawn(async move {
        while let Some(event) = stream.recv().await {
            let app_event = match event {
                StreamEvent::Update(result) => {
                    let theme = theme.clone();
                    match tokio::task::spawn_blocking(move || render_result(result, &theme)).await {
                        Ok(rendered) => AppEvent::DiffUpdated(Box::new(rendered)),
                        Err(e) => AppEvent::DiffError(format!("highlighting failed: {e}")),
                    }
                }
                StreamEvent::Error { message } => AppEvent::DiffError(message),
            };
            if tx.send(app_event).is_err() {
                break;
            }
        }
    });
}
