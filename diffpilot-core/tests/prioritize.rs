//! Group matching and display order.

use std::path::Path;

use diffpilot_core::config::{Configuration, FileGroup, GlobSpec};
use diffpilot_core::parser::parse_block;
use diffpilot_core::prioritize::Prioritizer;
use diffpilot_core::types::{DiffRecord, UNGROUPED_PRIORITY, UNGROUPED_TITLE};
use diffpilot_core::Error;

fn record(filename: &str) -> DiffRecord {
    parse_block(&format!("diff --git a/{filename} b/{filename}\n")).expect("marker block")
}

fn records(names: &[&str]) -> Vec<DiffRecord> {
    names.iter().map(|n| record(n)).collect()
}

fn group(glob: &str, priority: i64, title: &str, tags: &[&str]) -> FileGroup {
    FileGroup {
        glob: GlobSpec::One(glob.to_owned()),
        priority,
        title: title.to_owned(),
        tags: tags.iter().map(|t| (*t).to_owned()).collect(),
    }
}

fn order(ordered: &[DiffRecord]) -> Vec<&str> {
    ordered.iter().map(|r| r.filename.as_str()).collect()
}

#[test]
fn backend_docs_then_ungrouped() {
    let config = Configuration::from_toml(
        r#"
        [[file_groups]]
        glob = "*.py"
        priority = 1
        title = "Backend"

        [[file_groups]]
        glob = "*.md"
        priority = 2
        title = "Docs"
        "#,
        Path::new("diffpilot.toml"),
    )
    .unwrap();

    let prioritizer = Prioritizer::new(&config).unwrap();
    let ordered = prioritizer.prioritize(records(&["notes.txt", "README.md", "app.py"]));

    assert_eq!(order(&ordered), vec!["app.py", "README.md", "notes.txt"]);
    assert_eq!((ordered[0].priority, ordered[0].group_title.as_str()), (1, "Backend"));
    assert_eq!((ordered[1].priority, ordered[1].group_title.as_str()), (2, "Docs"));
    assert_eq!(ordered[2].priority, UNGROUPED_PRIORITY);
    assert_eq!(ordered[2].group_title, UNGROUPED_TITLE);
    assert!(ordered[2].is_ungrouped());
}

#[test]
fn first_declared_group_wins_over_lower_priority() {
    let config = Configuration {
        file_groups: vec![
            group("src/*", 50, "Sources", &["src"]),
            group("*.rs", 1, "Rust", &["rust"]),
        ],
        ..Configuration::default()
    };
    let prioritizer = Prioritizer::new(&config).unwrap();
    let ordered = prioritizer.prioritize(records(&["src/lib.rs", "build.rs"]));

    assert_eq!(order(&ordered), vec!["build.rs", "src/lib.rs"]);
    let lib = &ordered[1];
    assert_eq!(lib.priority, 50);
    assert_eq!(lib.group_title, "Sources");
    assert_eq!(lib.tags, vec!["src".to_owned()]);
}

#[test]
fn unmatched_files_sort_after_huge_priorities() {
    let config = Configuration {
        file_groups: vec![group("*.lock", i64::MAX - 1, "Locks", &[])],
        ..Configuration::default()
    };
    let prioritizer = Prioritizer::new(&config).unwrap();
    let ordered = prioritizer.prioritize(records(&["a.txt", "Cargo.lock"]));
    assert_eq!(order(&ordered), vec!["Cargo.lock", "a.txt"]);
}

#[test]
fn group_at_max_priority_still_sorts_before_unmatched() {
    let config = Configuration {
        file_groups: vec![group("*.py", i64::MAX, "Py", &["py"])],
        ..Configuration::default()
    };
    let prioritizer = Prioritizer::new(&config).unwrap();
    let ordered = prioritizer.prioritize(records(&["z.py", "a.txt"]));

    assert_eq!(order(&ordered), vec!["z.py", "a.txt"]);
    assert!(!ordered[0].is_ungrouped());
    assert_eq!(ordered[0].priority, i64::MAX);
    assert!(ordered[1].is_ungrouped());
    assert_eq!(ordered[1].group_title, UNGROUPED_TITLE);
}

#[test]
fn any_pattern_of_a_group_matches() {
    let config = Configuration {
        file_groups: vec![FileGroup {
            glob: GlobSpec::Many(vec!["*.toml".to_owned(), "ci/*.y?ml".to_owned()]),
            priority: 3,
            title: "Config".to_owned(),
            tags: vec!["cfg".to_owned()],
        }],
        ..Configuration::default()
    };
    let prioritizer = Prioritizer::new(&config).unwrap();
    let ordered = prioritizer.prioritize(records(&["ci/build.yaml", "Cargo.toml", "main.c"]));

    assert_eq!(order(&ordered), vec!["Cargo.toml", "ci/build.yaml", "main.c"]);
    assert_eq!(ordered[1].group_title, "Config");
    assert!(ordered[2].tags.is_empty());
}

#[test]
fn star_matches_across_directories() {
    let config = Configuration {
        file_groups: vec![group("*.py", 1, "Python", &[]), group("test[s_]*", 2, "Tests", &[])],
        ..Configuration::default()
    };
    let prioritizer = Prioritizer::new(&config).unwrap();
    let ordered = prioritizer.prioritize(records(&["tests/test_app.js", "pkg/deep/mod.py"]));
    assert_eq!(ordered[0].filename, "pkg/deep/mod.py");
    assert_eq!(ordered[1].group_title, "Tests");
}

#[test]
fn braces_and_backslashes_match_literally() {
    let config = Configuration {
        file_groups: vec![
            group("*.{py,md}", 1, "Braces", &[]),
            group(r"legacy\*.ini", 2, "Backslash", &[]),
        ],
        ..Configuration::default()
    };
    let prioritizer = Prioritizer::new(&config).unwrap();
    let ordered = prioritizer.prioritize(records(&[
        "a.py",
        "odd.{py,md}",
        r"legacy\app.ini",
        "legacy*.ini",
    ]));

    let titles: Vec<(&str, &str)> = ordered
        .iter()
        .map(|r| (r.filename.as_str(), r.group_title.as_str()))
        .collect();
    assert_eq!(
        titles,
        vec![
            ("odd.{py,md}", "Braces"),
            (r"legacy\app.ini", "Backslash"),
            ("a.py", UNGROUPED_TITLE),
            ("legacy*.ini", UNGROUPED_TITLE),
        ]
    );
}

#[test]
fn ties_are_broken_by_filename() {
    let prioritizer = Prioritizer::new(&Configuration::default()).unwrap();
    let first = prioritizer.prioritize(records(&["b.rs", "a.rs", "C.rs", "a.rs"]));
    let second = prioritizer.prioritize(records(&["a.rs", "C.rs", "a.rs", "b.rs"]));

    assert_eq!(order(&first), vec!["C.rs", "a.rs", "a.rs", "b.rs"]);
    assert_eq!(first, second);
}

#[test]
fn invalid_glob_fails_compilation() {
    let config = Configuration {
        file_groups: vec![group("*.py", 1, "ok", &[]), group("src/[", 2, "broken", &[])],
        ..Configuration::default()
    };
    match Prioritizer::new(&config) {
        Err(Error::InvalidGlob { group, pattern, .. }) => {
            assert_eq!(group, 1);
            assert_eq!(pattern, "src/[");
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected invalid glob error"),
    }
}

#[test]
fn missing_config_file_means_no_groups() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = Configuration::load(&dir.path().join("diffpilot.toml")).unwrap();
    assert_eq!(config, Configuration::default());
}

#[test]
fn config_file_is_read_from_disk() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("diffpilot.toml");
    std::fs::write(
        &path,
        r##"
        [[file_groups]]
        glob = "*.rs"
        priority = -1
        title = "Rust"
        tags = ["core"]

        [tags.core]
        color = "#ffffff"
        background = "#3b5bdb"
        "##,
    )
    .unwrap();

    let config = Configuration::load(&path).unwrap();
    assert_eq!(config.file_groups[0].priority, -1);
    let style = config.tags.get("core").expect("core tag style");
    assert_eq!(style.color.as_deref(), Some("#ffffff"));
    assert_eq!(style.background.as_deref(), Some("#3b5bdb"));
}

#[test]
fn unreadable_toml_is_malformed() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("diffpilot.toml");
    std::fs::write(&path, "[[file_groups]\nglob = ").unwrap();
    assert!(matches!(Configuration::load(&path), Err(Error::MalformedConfiguration { .. })));
}
