//! End-to-end scenarios from `spec.md` §8, driven against the compiled
//! `automaton` binary so the CLI's argument parsing, exit codes, and
//! stdout/stderr contract are exercised exactly as an external caller
//! would see them.

use std::io::Write;
use std::path::Path;
use std::process::Command;

fn automaton() -> Command {
    Command::new(env!("CARGO_BIN_EXE_automaton"))
}

fn write_workflow(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
fn linear_chain_happy_path() {
    let dir = tempfile::tempdir().unwrap();
    let workflow = write_workflow(
        dir.path(),
        "wf.json",
        r#"{
            "kind": "process",
            "nodes": [
                {"id": "a", "actionRef": "plugin.core.echo", "input": {"message": "hi"}},
                {"id": "b", "actionRef": "plugin.core.echo", "dependsOn": ["a"], "input": {"message": "hi"}},
                {"id": "c", "actionRef": "plugin.core.echo", "dependsOn": ["b"], "input": {"message": "hi"}}
            ]
        }"#,
    );
    let runs_dir = dir.path().join("runs");

    let output = automaton()
        .arg("run")
        .arg(&workflow)
        .arg("--runs-dir")
        .arg(&runs_dir)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().last().unwrap(), "OK");

    let metrics = std::fs::read_to_string(runs_dir.join("metrics.jsonl")).unwrap();
    let lines: Vec<&str> = metrics.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines.iter().take(3).all(|l| l.contains("\"type\":\"node_result\"")));
    assert!(lines[3].contains("\"type\":\"workflow_result\""));
}

#[test]
fn reference_resolution_passes_upstream_output_downstream() {
    let dir = tempfile::tempdir().unwrap();
    let workflow = write_workflow(
        dir.path(),
        "wf.json",
        r#"{
            "kind": "process",
            "nodes": [
                {"id": "a", "actionRef": "plugin.core.echo", "input": {"message": "hello"}},
                {"id": "b", "actionRef": "plugin.core.echo", "dependsOn": ["a"],
                 "input": {"text": {"$ref": "$.nodes.a.output.message"}}}
            ]
        }"#,
    );

    let output = automaton()
        .arg("run")
        .arg(&workflow)
        .arg("--runs-dir")
        .arg(dir.path().join("runs"))
        .output()
        .unwrap();

    assert!(output.status.success());
}

#[test]
fn cycle_exits_3_and_reports_the_offending_ids() {
    let dir = tempfile::tempdir().unwrap();
    let workflow = write_workflow(
        dir.path(),
        "wf.json",
        r#"{
            "kind": "process",
            "nodes": [
                {"id": "a", "actionRef": "plugin.core.echo", "dependsOn": ["b"]},
                {"id": "b", "actionRef": "plugin.core.echo", "dependsOn": ["a"]}
            ]
        }"#,
    );
    let runs_dir = dir.path().join("runs");

    let output = automaton()
        .arg("run")
        .arg(&workflow)
        .arg("--runs-dir")
        .arg(&runs_dir)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("cycle detected: a, b"));
    assert!(!runs_dir.join("metrics.jsonl").exists());
}

// Retry exhaustion against a handler that always raises retryable is
// exercised at the engine level (engine::driver's
// `retry_exhaustion_yields_single_failed_record_and_exit_4`), where a
// `TestNode` double can be registered directly. Action handlers are
// pluggable external collaborators out of this crate's scope (spec.md §1),
// so the CLI surface has no always-retryable action to drive the same
// scenario through the compiled binary.

#[test]
fn unknown_action_exits_3_with_one_metrics_record() {
    let dir = tempfile::tempdir().unwrap();
    let workflow = write_workflow(
        dir.path(),
        "wf.json",
        r#"{
            "kind": "process",
            "nodes": [
                {"id": "a", "actionRef": "plugin.nope.nope"}
            ]
        }"#,
    );
    let runs_dir = dir.path().join("runs");

    let output = automaton()
        .arg("run")
        .arg(&workflow)
        .arg("--runs-dir")
        .arg(&runs_dir)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));
    let metrics = std::fs::read_to_string(runs_dir.join("metrics.jsonl")).unwrap();
    assert_eq!(metrics.lines().count(), 1);
}

#[test]
fn mode_gate_runs_in_explore_but_aborts_in_verify() {
    let dir = tempfile::tempdir().unwrap();
    let workflow = write_workflow(
        dir.path(),
        "wf.json",
        r#"{
            "kind": "process",
            "nodes": [
                {"id": "a", "actionRef": "plugin.core.echo", "input": {"greeting": "Hello {{name}}"}}
            ]
        }"#,
    );

    let explore = automaton()
        .arg("run")
        .arg(&workflow)
        .arg("--mode")
        .arg("explore")
        .arg("--runs-dir")
        .arg(dir.path().join("runs-explore"))
        .output()
        .unwrap();
    assert!(explore.status.success());

    let verify = automaton()
        .arg("run")
        .arg(&workflow)
        .arg("--mode")
        .arg("verify")
        .arg("--runs-dir")
        .arg(dir.path().join("runs-verify"))
        .output()
        .unwrap();
    assert_eq!(verify.status.code(), Some(4));
}

#[test]
fn dry_run_skips_invocation_and_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let workflow = write_workflow(
        dir.path(),
        "wf.json",
        r#"{
            "kind": "process",
            "nodes": [
                {"id": "a", "actionRef": "plugin.core.echo", "input": {"message": "hi"}}
            ]
        }"#,
    );

    let output = automaton()
        .arg("run")
        .arg(&workflow)
        .arg("--dry-run")
        .arg("--runs-dir")
        .arg(dir.path().join("runs"))
        .output()
        .unwrap();

    assert!(output.status.success());
}

#[test]
fn validate_reports_topological_order_without_executing() {
    let dir = tempfile::tempdir().unwrap();
    let workflow = write_workflow(
        dir.path(),
        "wf.json",
        r#"{
            "kind": "process",
            "nodes": [
                {"id": "b", "actionRef": "plugin.nope.nope", "dependsOn": ["a"]},
                {"id": "a", "actionRef": "plugin.nope.nope"}
            ]
        }"#,
    );

    let output = automaton().arg("validate").arg(&workflow).output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("a, b"));
}

#[test]
fn invalid_ir_exits_2() {
    let dir = tempfile::tempdir().unwrap();
    let workflow = write_workflow(dir.path(), "wf.json", r#"{"kind": "process", "nodes": []}"#);

    let output = automaton().arg("validate").arg(&workflow).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}
