//! End-to-end pipeline runs against a scratch directory.
//!
//! The diff command is `cat changes.diff`, so every test controls the "diff
//! tool output" by writing that file.

#![cfg(unix)]

use std::path::Path;

use diffpilot_core::pipeline::{fingerprint, Pipeline};
use diffpilot_core::runner::run_command;
use diffpilot_core::settings::Settings;
use diffpilot_core::types::ChangeStatus;
use diffpilot_core::Error;
use tempfile::TempDir;

const CHANGES: &str = "\
diff --git a/notes.txt b/notes.txt
--- a/notes.txt
+++ b/notes.txt
@@ -1 +1 @@
-old
+new
diff --git a/README.md b/README.md
--- a/README.md
+++ b/README.md
@@ -1 +1,2 @@
 # Project
+More words.
diff --git a/app.py b/app.py
new file mode 100644
--- /dev/null
+++ b/app.py
@@ -0,0 +1 @@
+print('hi')
";

const GROUPS: &str = r#"
[[file_groups]]
glob = "*.py"
priority = 1
title = "Backend"
tags = ["backend"]

[[file_groups]]
glob = "*.md"
priority = 2
title = "Docs"

[tags.backend]
color = "white"
"#;

fn project(diff: &str) -> (TempDir, Settings) {
    let dir = TempDir::new().expect("tempdir");
    write(dir.path(), "changes.diff", diff);
    let mut settings = Settings::new(dir.path());
    settings.diff_command = "cat changes.diff".to_owned();
    (dir, settings)
}

fn write(root: &Path, name: &str, text: &str) {
    std::fs::write(root.join(name), text).expect("write fixture");
}

#[test]
fn run_orders_records_by_configured_groups() {
    let (dir, settings) = project(CHANGES);
    write(dir.path(), "diffpilot.toml", GROUPS);

    let result = Pipeline::new(&settings).run().unwrap();

    let names: Vec<_> = result.records.iter().map(|r| r.filename.as_str()).collect();
    assert_eq!(names, vec!["app.py", "README.md", "notes.txt"]);
    assert_eq!(result.records[0].status, ChangeStatus::Added);
    assert_eq!(result.records[0].tags, vec!["backend".to_owned()]);
    assert_eq!(result.records[1].group_title, "Docs");
    assert!(result.records[2].is_ungrouped());
    assert_eq!(result.tags["backend"].color.as_deref(), Some("white"));
    assert_eq!(result.fingerprint, fingerprint(CHANGES.as_bytes()));
}

#[test]
fn without_config_everything_is_ungrouped_by_name() {
    let (_dir, settings) = project(CHANGES);
    let result = Pipeline::new(&settings).run().unwrap();

    let names: Vec<_> = result.records.iter().map(|r| r.filename.as_str()).collect();
    assert_eq!(names, vec!["README.md", "app.py", "notes.txt"]);
    assert!(result.records.iter().all(|r| r.is_ungrouped()));
    assert!(result.tags.is_empty());
}

#[test]
fn fingerprint_is_stable_and_sensitive() {
    let (dir, settings) = project(CHANGES);
    let pipeline = Pipeline::new(&settings);

    let first = pipeline.run().unwrap().fingerprint;
    let second = pipeline.run().unwrap().fingerprint;
    assert_eq!(first, second);

    write(dir.path(), "changes.diff", &format!("{CHANGES}+\n"));
    let third = pipeline.run().unwrap().fingerprint;
    assert_ne!(first, third);
}

#[test]
fn config_edits_apply_on_next_run() {
    let (dir, settings) = project(CHANGES);
    let pipeline = Pipeline::new(&settings);
    assert!(pipeline.run().unwrap().records[0].is_ungrouped());

    write(dir.path(), "diffpilot.toml", GROUPS);
    assert_eq!(pipeline.run().unwrap().records[0].filename, "app.py");
}

#[test]
fn empty_output_is_a_successful_empty_run() {
    let (_dir, settings) = project("");
    let result = Pipeline::new(&settings).run().unwrap();
    assert!(result.records.is_empty());
    assert_eq!(result.fingerprint, fingerprint(b""));
}

#[test]
fn nonzero_exit_is_command_failed() {
    let (_dir, mut settings) = project(CHANGES);
    settings.diff_command = "echo boom >&2; exit 3".to_owned();

    match Pipeline::new(&settings).run() {
        Err(Error::CommandFailed { code, stderr, .. }) => {
            assert_eq!(code, Some(3));
            assert_eq!(stderr, "boom");
        }
        other => panic!("expected CommandFailed, got {other:?}"),
    }
}

#[test]
fn stderr_alone_does_not_fail() {
    let dir = TempDir::new().unwrap();
    let output = run_command("echo careful >&2; printf 'diff --git a/x b/x\\n'", dir.path()).unwrap();
    assert_eq!(output.stderr, "careful");
    assert_eq!(output.stdout_text(), "diff --git a/x b/x\n");
}

#[test]
fn command_runs_in_working_directory_without_moving_process_cwd() {
    let dir = TempDir::new().unwrap();
    let before = std::env::current_dir().unwrap();

    let output = run_command("pwd", dir.path()).unwrap();
    let reported = std::fs::canonicalize(output.stdout_text().trim()).unwrap();
    assert_eq!(reported, std::fs::canonicalize(dir.path()).unwrap());
    assert_eq!(std::env::current_dir().unwrap(), before);
}

#[test]
fn malformed_config_fails_the_run() {
    let (dir, settings) = project(CHANGES);
    write(dir.path(), "diffpilot.toml", "[[file_groups]]\ntitle = \"no glob\"\n");
    assert!(matches!(
        Pipeline::new(&settings).run(),
        Err(Error::MalformedConfiguration { .. })
    ));
}
