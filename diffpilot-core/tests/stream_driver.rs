//! Polling behaviour of the per-client stream driver.

#![cfg(unix)]

use std::sync::Arc;
use std::time::Duration;

use diffpilot_core::pipeline::Pipeline;
use diffpilot_core::settings::Settings;
use diffpilot_core::stream::{InitialRender, StreamDriver, StreamEvent};
use tempfile::TempDir;
use tokio::sync::{mpsc, Notify};
use tokio::time::timeout;

const TICK: Duration = Duration::from_millis(50);
const QUIET: Duration = Duration::from_millis(400);
const WAIT: Duration = Duration::from_secs(5);

const ONE_FILE: &str = "diff --git a/a.rs b/a.rs\n--- a/a.rs\n+++ b/a.rs\n@@ -1 +1 @@\n-x\n+y\n";

fn project(diff: &str) -> (TempDir, Pipeline) {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("changes.diff"), diff).unwrap();
    let mut settings = Settings::new(dir.path());
    settings.diff_command = "cat changes.diff".to_owned();
    let pipeline = Pipeline::new(&settings);
    (dir, pipeline)
}

async fn next_event(rx: &mut mpsc::Receiver<StreamEvent>) -> StreamEvent {
    timeout(WAIT, rx.recv())
        .await
        .expect("event within timeout")
        .expect("stream still open")
}

#[tokio::test]
async fn immediate_push_then_silence_while_unchanged() {
    let (_dir, pipeline) = project(ONE_FILE);
    let mut rx = StreamDriver::new(pipeline, TICK).spawn();

    match next_event(&mut rx).await {
        StreamEvent::Update(result) => assert_eq!(result.records[0].filename, "a.rs"),
        other => panic!("expected update, got {other:?}"),
    }

    // Several ticks over identical output: nothing is sent.
    assert!(timeout(QUIET, rx.recv()).await.is_err());
}

#[tokio::test]
async fn change_in_output_is_pushed() {
    let (dir, pipeline) = project(ONE_FILE);
    let mut rx = StreamDriver::new(pipeline, TICK).spawn();
    let first = match next_event(&mut rx).await {
        StreamEvent::Update(result) => result.fingerprint,
        other => panic!("expected update, got {other:?}"),
    };

    std::fs::write(dir.path().join("changes.diff"), format!("{ONE_FILE}\n")).unwrap();

    match next_event(&mut rx).await {
        StreamEvent::Update(result) => assert_ne!(result.fingerprint, first),
        other => panic!("expected update, got {other:?}"),
    }
}

#[tokio::test]
async fn deferred_stream_waits_for_a_real_change() {
    let (dir, pipeline) = project(ONE_FILE);
    let mut rx = StreamDriver::new(pipeline, TICK)
        .initial_render(InitialRender::Deferred)
        .spawn();

    assert!(timeout(QUIET, rx.recv()).await.is_err());

    std::fs::write(dir.path().join("changes.diff"), "").unwrap();
    match next_event(&mut rx).await {
        StreamEvent::Update(result) => assert!(result.records.is_empty()),
        other => panic!("expected update, got {other:?}"),
    }
}

#[tokio::test]
async fn failures_are_reported_and_the_stream_recovers() {
    let (dir, pipeline) = project(ONE_FILE);
    std::fs::remove_file(dir.path().join("changes.diff")).unwrap();
    let mut rx = StreamDriver::new(pipeline, TICK).spawn();

    match next_event(&mut rx).await {
        StreamEvent::Error { message } => assert!(message.contains("cat changes.diff")),
        other => panic!("expected error, got {other:?}"),
    }

    std::fs::write(dir.path().join("changes.diff"), ONE_FILE).unwrap();
    loop {
        match next_event(&mut rx).await {
            StreamEvent::Update(result) => {
                assert_eq!(result.records.len(), 1);
                break;
            }
            // The file may not have been written yet on an intermediate tick.
            StreamEvent::Error { .. } => continue,
        }
    }
}

#[tokio::test]
async fn refresh_trigger_forces_a_push() {
    let (_dir, pipeline) = project(ONE_FILE);
    let trigger = Arc::new(Notify::new());
    let mut rx = StreamDriver::new(pipeline, Duration::from_secs(3600))
        .refresh_trigger(Arc::clone(&trigger))
        .spawn();

    let first = next_event(&mut rx).await;
    trigger.notify_one();
    let second = next_event(&mut rx).await;

    match (first, second) {
        (StreamEvent::Update(a), StreamEvent::Update(b)) => assert_eq!(a.fingerprint, b.fingerprint),
        other => panic!("expected two updates, got {other:?}"),
    }
}

#[tokio::test]
async fn driver_stops_when_client_disconnects() {
    let (_dir, pipeline) = project(ONE_FILE);
    let (tx, mut rx) = mpsc::channel(1);
    let handle = tokio::spawn(StreamDriver::new(pipeline, TICK).run(tx));

    next_event(&mut rx).await;
    drop(rx);

    timeout(WAIT, handle)
        .await
        .expect("driver exits after disconnect")
        .expect("driver task did not panic");
}

#[test]
fn events_serialize_with_an_event_tag() {
    let event = StreamEvent::Error { message: "boom".to_owned() };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json, serde_json::json!({ "event": "error", "message": "boom" }));
}

#[tokio::test(flavor = "current_thread")]
async fn slow_command_does_not_hold_up_other_streams() {
    let (_slow_dir, slow) = {
        let dir = TempDir::new().expect("tempdir");
        std::fs::write(dir.path().join("changes.diff"), ONE_FILE).unwrap();
        let mut settings = Settings::new(dir.path());
        settings.diff_command = "sleep 2; cat changes.diff".to_owned();
        let pipeline = Pipeline::new(&settings);
        (dir, pipeline)
    };
    let (_fast_dir, fast) = project(ONE_FILE);

    let mut slow_rx = StreamDriver::new(slow, TICK).spawn();
    let mut fast_rx = StreamDriver::new(fast, TICK).spawn();
    let started = tokio::time::Instant::now();

    let first = timeout(Duration::from_secs(1), fast_rx.recv())
        .await
        .expect("fast stream answers while the slow command runs")
        .expect("stream still open");
    assert!(matches!(first, StreamEvent::Update(_)));
    assert!(started.elapsed() < Duration::from_secs(1));

    match next_event(&mut slow_rx).await {
        StreamEvent::Update(result) => assert_eq!(result.records[0].filename, "a.rs"),
        other => panic!("expected update, got {other:?}"),
    }
}
