//! End-to-end coverage that invokes the compiled `structgraph` binary
//! against a small synthetic fixture tree, the way a user would from a
//! shell. `CARGO_BIN_EXE_structgraph` is set automatically by Cargo.

use std::path::{Path, PathBuf};
use std::process::Command;

fn binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_structgraph"))
}

/// Build a tiny two-file Rust project under a fresh temp dir: `lib.rs`
/// defines `helper` and `Widget`, `main.rs` calls `helper` and
/// instantiates `Widget`. Good enough to exercise every query operator
/// without needing a real multi-language corpus.
fn fixture() -> tempfile::TempDir {
    let tmp = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        tmp.path().join("lib.rs"),
        "pub fn helper() -> i32 {\n    1\n}\n\npub struct Widget {\n    pub value: i32,\n}\n\nimpl Widget {\n    pub fn new() -> Widget {\n        Widget { value: helper() }\n    }\n}\n",
    )
    .unwrap();
    std::fs::write(
        tmp.path().join("main.rs"),
        "mod lib;\nuse lib::{helper, Widget};\n\nfn main() {\n    let w = Widget::new();\n    println!(\"{} {}\", helper(), w.value);\n}\n",
    )
    .unwrap();
    tmp
}

fn run(root: &Path, args: &[&str]) -> (String, String, bool) {
    let out = Command::new(binary())
        .arg("--root")
        .arg(root)
        .args(args)
        .output()
        .expect("failed to invoke structgraph binary");
    (
        String::from_utf8_lossy(&out.stdout).to_string(),
        String::from_utf8_lossy(&out.stderr).to_string(),
        out.status.success(),
    )
}

fn run_success(root: &Path, args: &[&str]) -> String {
    let (stdout, stderr, ok) = run(root, args);
    assert!(ok, "command {:?} failed\nstdout: {stdout}\nstderr: {stderr}", args);
    stdout
}

fn run_failure(root: &Path, args: &[&str]) -> (String, String) {
    let (stdout, stderr, ok) = run(root, args);
    assert!(!ok, "command {:?} unexpectedly succeeded\nstdout: {stdout}", args);
    (stdout, stderr)
}

#[test]
fn map_lists_symbols_from_both_files() {
    let tmp = fixture();
    let stdout = run_success(tmp.path(), &["map"]);
    assert!(stdout.contains("helper"));
    assert!(stdout.contains("Widget"));
    assert!(stdout.contains("main"));
}

#[test]
fn map_count_reports_totals_without_listing() {
    let tmp = fixture();
    let stdout = run_success(tmp.path(), &["--count", "map"]);
    assert!(stdout.contains("symbols"));
    assert!(!stdout.contains("helper"));
}

#[test]
fn search_matches_by_substring() {
    let tmp = fixture();
    let stdout = run_success(tmp.path(), &["search", "help"]);
    assert!(stdout.contains("helper"));
    assert!(!stdout.contains("Widget"));
}

#[test]
fn symbols_filters_by_kind() {
    let tmp = fixture();
    let stdout = run_success(tmp.path(), &["symbols", "--kind", "class"]);
    assert!(stdout.contains("Widget"));
    assert!(!stdout.contains("helper"));
}

#[test]
fn callers_finds_the_file_that_references_a_symbol() {
    let tmp = fixture();
    let stdout = run_success(tmp.path(), &["callers", "helper"]);
    assert!(stdout.contains("main.rs"));
}

#[test]
fn callers_on_unknown_symbol_exits_nonzero_with_suggestion() {
    let tmp = fixture();
    let (stdout, stderr) = run_failure(tmp.path(), &["callers", "helpr"]);
    assert!(stdout.is_empty());
    assert!(stderr.contains("helpr") || stderr.to_lowercase().contains("not found"));
}

#[test]
fn deps_and_dependents_are_inverse_views_of_imports() {
    let tmp = fixture();
    let deps = run_success(tmp.path(), &["deps", "main.rs"]);
    assert!(deps.contains("lib.rs"));
    let dependents = run_success(tmp.path(), &["dependents", "lib.rs"]);
    assert!(dependents.contains("main.rs"));
}

#[test]
fn neighborhood_includes_direct_import_neighbors() {
    let tmp = fixture();
    let stdout = run_success(tmp.path(), &["neighborhood", "main.rs"]);
    assert!(stdout.contains("lib.rs"));
}

#[test]
fn orphans_at_file_level_excludes_main() {
    let tmp = fixture();
    let stdout = run_success(tmp.path(), &["orphans"]);
    assert!(!stdout.contains("main.rs"));
}

#[test]
fn structure_groups_output_by_directory() {
    let tmp = fixture();
    let stdout = run_success(tmp.path(), &["structure"]);
    assert!(stdout.contains("lib.rs"));
    assert!(stdout.contains("main.rs"));
}

#[test]
fn context_reports_source_and_used_symbols() {
    let tmp = fixture();
    let stdout = run_success(tmp.path(), &["context", "new"]);
    assert!(stdout.contains("Widget"));
    assert!(stdout.contains("helper"));
}

#[test]
fn trace_walks_upward_through_callers() {
    let tmp = fixture();
    let stdout = run_success(tmp.path(), &["trace", "helper"]);
    assert!(stdout.contains("helper"));
}

#[test]
fn outline_collapses_multi_line_bodies() {
    let tmp = fixture();
    let stdout = run_success(tmp.path(), &["outline", "lib.rs"]);
    assert!(stdout.contains("fn helper"));
}

#[test]
fn outline_expand_prints_full_body() {
    let tmp = fixture();
    let stdout = run_success(tmp.path(), &["outline", "lib.rs", "--expand", "new"]);
    assert!(stdout.contains("Widget { value: helper() }"));
}

#[test]
fn reindex_reports_full_rebuild_counts() {
    let tmp = fixture();
    let stdout = run_success(tmp.path(), &["reindex"]);
    assert!(stdout.contains("files"));
}

#[test]
fn stats_reports_file_and_symbol_counts() {
    let tmp = fixture();
    let stdout = run_success(tmp.path(), &["stats"]);
    assert!(stdout.contains("2 files"));
}

#[test]
fn ui_prints_a_one_shot_overview_and_exits() {
    let tmp = fixture();
    let stdout = run_success(tmp.path(), &["ui"]);
    assert!(stdout.contains("project overview"));
    assert!(stdout.contains("highest-ranked"));
}

#[test]
fn unknown_file_argument_exits_nonzero() {
    let tmp = fixture();
    let (_, stderr) = run_failure(tmp.path(), &["deps", "missing.rs"]);
    assert!(stderr.contains("missing.rs"));
}

#[test]
fn json_flag_emits_parseable_json() {
    let tmp = fixture();
    let stdout = run_success(tmp.path(), &["--json", "stats"]);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(parsed["fileCount"], 2);
}
