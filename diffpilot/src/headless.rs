//! JSON-lines feed: one stream client that writes every event to stdout.
//!
//! Each line is a serialized `StreamEvent`, e.g. `{"event":"update",...}` or
//! `{"event":"error","message":"..."}`. A closed stdout (the reader went away)
//! or Ctrl-C ends the stream cleanly.

use std::io::ErrorKind;

use diffpilot_core::pipeline::Pipeline;
use diffpilot_core::settings::Settings;
use diffpilot_core::stream::{InitialRender, StreamDriver};
use tokio::io::AsyncWriteExt;

/// Streams updates for `settings` to stdout until the reader disconnects.
///
/// # Errors
///
/// Returns `Err` on stdout write failures other than a broken pipe.
pub async fn run(settings: Settings, initial: InitialRender) -> std::io::Result<()> {
    let pipeline = Pipeline::new(&settings);
    let mut events = StreamDriver::new(pipeline, settings.refresh_interval)
        .initial_render(initial)
        .spawn();
    let mut out = tokio::io::stdout();

    tracing::info!(
        root = %settings.working_directory.display(),
        command = %settings.diff_command,
        "streaming diff updates as JSON lines"
    );

    loop {
        let event = tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => match event {
                Some(event) => event,
                None => break,
            },
        };

        let mut line = serde_json::to_vec(&event).map_err(std::io::Error::other)?;
        line.push(b'\n');
        let written = match out.write_all(&line).await {
            Ok(()) => out.flush().await,
            Err(e) => Err(e),
        };
        match written {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                tracing::info!("stdout closed, stopping stream");
                break;
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
