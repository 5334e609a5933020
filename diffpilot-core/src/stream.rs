//! Per-client polling loop that pushes diff updates only when they change.
//!
//! Each connected client gets its own [`StreamDriver`] task. The driver sleeps
//! for the refresh interval, re-runs the [`Pipeline`] on a blocking worker, and
//! compares the fingerprint of the raw command output with the last one it
//! pushed. Identical output produces no send at all.
//!
//! The driver stops once the client's receiver is dropped. That is noticed
//! while sleeping or when a send fails, never in the middle of a pipeline run.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, Notify};

use crate::pipeline::Pipeline;
use crate::types::PipelineResult;
use crate::{Error, Result};

/// What the client receives.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum StreamEvent {
    /// The ordered records and tag styles of a changed diff.
    Update(PipelineResult),
    /// A pipeline run failed; the stream keeps going.
    Error {
        /// Human-readable failure description.
        message: String,
    },
}

/// Behaviour on connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitialRender {
    /// Run once on connect and push the result unconditionally.
    #[default]
    Immediate,
    /// Record the current fingerprint silently and push only on a later change.
    /// For clients that already hold a rendered snapshot.
    Deferred,
}

/// Lifecycle of one client stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Streaming,
    Closed,
}

/// Polling loop for a single client.
pub struct StreamDriver {
    pipeline: Pipeline,
    interval: Duration,
    initial: InitialRender,
    refresh: Option<Arc<Notify>>,
    last_fingerprint: Option<String>,
}

impl StreamDriver {
    /// Creates a driver that re-runs `pipeline` every `interval`.
    pub fn new(pipeline: Pipeline, interval: Duration) -> Self {
        Self {
            pipeline,
            interval,
            initial: InitialRender::default(),
            refresh: None,
            last_fingerprint: None,
        }
    }

    /// Chooses what happens on connect.
    pub fn initial_render(mut self, initial: InitialRender) -> Self {
        self.initial = initial;
        self
    }

    /// Installs a trigger that cuts the current sleep short and pushes the
    /// next result even if its fingerprint is unchanged.
    ///
    /// Configuration edits do not change the diff output, so this is how a
    /// client picks them up before the next real change.
    pub fn refresh_trigger(mut self, trigger: Arc<Notify>) -> Self {
        self.refresh = Some(trigger);
        self
    }

    /// Spawns the driver on the current runtime and returns the client end.
    ///
    /// The channel holds at most one pending event, so a slow client delays
    /// the next tick instead of queueing renders.
    pub fn spawn(self) -> mpsc::Receiver<StreamEvent> {
        let (tx, rx) = mpsc::channel(1);
        tokio::spawn(self.run(tx));
        rx
    }

    /// Runs the stream until `tx`'s receiver is dropped.
    pub async fn run(mut self, tx: mpsc::Sender<StreamEvent>) {
        tracing::debug!(interval_ms = self.interval.as_millis() as u64, "stream opened");

        let mut state = match self.initial {
            InitialRender::Immediate => self.tick(&tx, true).await,
            InitialRender::Deferred => self.capture_baseline(&tx).await,
        };

        'stream: while state == StreamState::Streaming {
            let refresh = self.refresh.clone();
            let force = tokio::select! {
                _ = tokio::time::sleep(self.interval) => false,
                _ = notified(refresh.as_deref()) => true,
                _ = tx.closed() => break 'stream,
            };
            state = self.tick(&tx, force).await;
        }

        tracing::debug!("stream closed");
    }

    async fn capture_baseline(&mut self, tx: &mpsc::Sender<StreamEvent>) -> StreamState {
        match run_pipeline(&self.pipeline).await {
            Ok(result) => {
                self.last_fingerprint = Some(result.fingerprint);
                StreamState::Streaming
            }
            Err(e) => self.send(tx, error_event(&e)).await,
        }
    }

    async fn tick(&mut self, tx: &mpsc::Sender<StreamEvent>, force: bool) -> StreamState {
        let event = match run_pipeline(&self.pipeline).await {
            Ok(result) => {
                let unchanged =
                    self.last_fingerprint.as_deref() == Some(result.fingerprint.as_str());
                if unchanged && !force {
                    return StreamState::Streaming;
                }
                self.last_fingerprint = Some(result.fingerprint.clone());
                StreamEvent::Update(result)
            }
            Err(e) => {
                // Forget the fingerprint so the first good run afterwards is pushed
                // and replaces the error on the client.
                self.last_fingerprint = None;
                error_event(&e)
            }
        };
        self.send(tx, event).await
    }

    async fn send(&self, tx: &mpsc::Sender<StreamEvent>, event: StreamEvent) -> StreamState {
        match tx.send(event).await {
            Ok(()) => StreamState::Streaming,
            Err(_) => StreamState::Closed,
        }
    }
}

/// Runs `pipeline` on tokio's blocking pool so other streams keep ticking
/// while the diff command executes.
///
/// # Errors
///
/// Returns the pipeline's own error, or [`Error::Worker`] if the blocking task
/// panicked or was cancelled.
pub async fn run_pipeline(pipeline: &Pipeline) -> Result<PipelineResult> {
    let pipeline = pipeline.clone();
    tokio::task::spawn_blocking(move || pipeline.run())
        .await
        .map_err(|e| Error::Worker(e.to_string()))?
}

fn error_event(error: &Error) -> StreamEvent {
    tracing::warn!(%error, "pipeline run failed");
    StreamEvent::Error { message: error.to_string() }
}

async fn notified(trigger: Option<&Notify>) {
    match trigger {
        Some(notify) => notify.notified().await,
        None => std::future::pending().await,
    }
}
