//! Append-only metrics journal (`spec` §6.2).
//!
//! One JSON object per line: a `node_result` record after every node
//! completes (success or failure) and a `workflow_result` record only when
//! every node in the run succeeds. Per §5/§9, a write failure is logged and
//! swallowed — it must never turn into a node or workflow failure.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::warn;

/// One `node_result` line.
#[derive(Debug, Serialize)]
pub struct NodeResult<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub node: &'a str,
    #[serde(rename = "actionRef")]
    pub action_ref: &'a str,
    #[serde(rename = "schemaVersion")]
    pub schema_version: &'a str,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
}

impl<'a> NodeResult<'a> {
    pub fn success(node: &'a str, action_ref: &'a str, schema_version: &'a str) -> Self {
        Self {
            kind: "node_result",
            node,
            action_ref,
            schema_version,
            ok: true,
            error: None,
        }
    }

    pub fn failure(node: &'a str, action_ref: &'a str, schema_version: &'a str, error: &'a str) -> Self {
        Self {
            kind: "node_result",
            node,
            action_ref,
            schema_version,
            ok: false,
            error: Some(error),
        }
    }
}

/// The single `workflow_result` line, written only on full success.
#[derive(Debug, Serialize)]
pub struct WorkflowResult<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub workflow: &'a str,
    pub ok: bool,
}

impl<'a> WorkflowResult<'a> {
    pub fn success(workflow: &'a str) -> Self {
        Self {
            kind: "workflow_result",
            workflow,
            ok: true,
        }
    }
}

/// Appends JSON-line records to `<runs_dir>/metrics.jsonl`.
///
/// Opened in append mode per write and flushed immediately afterwards, so a
/// crash mid-run leaves at most one partial trailing line (`spec` §5).
pub struct MetricsJournal {
    path: PathBuf,
}

impl MetricsJournal {
    /// `runs_dir` is created if it doesn't already exist; the journal file
    /// itself is `<runs_dir>/metrics.jsonl`.
    pub fn new(runs_dir: &Path) -> Self {
        if let Err(err) = std::fs::create_dir_all(runs_dir) {
            warn!(runs_dir = %runs_dir.display(), %err, "failed to create runs directory");
        }
        Self {
            path: runs_dir.join("metrics.jsonl"),
        }
    }

    /// Append one record as a single JSON line. Failures (serialization or
    /// I/O) are logged to stderr via `tracing::warn!` and otherwise ignored.
    pub fn append(&self, record: &impl Serialize) {
        let line = match serde_json::to_string(record) {
            Ok(line) => line,
            Err(err) => {
                warn!(%err, "failed to serialize metrics record");
                return;
            }
        };

        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| {
                writeln!(file, "{line}")?;
                file.flush()
            });

        if let Err(err) = result {
            warn!(path = %self.path.display(), %err, "failed to append metrics record");
        }
    }

    /// The path records are written to, for callers that want to read the
    /// journal back (tests, the CLI's debug output).
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let journal = MetricsJournal::new(dir.path());

        journal.append(&NodeResult::success("a", "plugin.core.echo", "v1"));
        journal.append(&NodeResult::failure("b", "plugin.core.echo", "v1", "boom"));
        journal.append(&WorkflowResult::success("/tmp/wf.json"));

        let content = std::fs::read_to_string(journal.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("\"ok\":true"));
        assert!(lines[1].contains("\"error\":\"boom\""));
        assert!(lines[2].contains("workflow_result"));
    }

    #[test]
    fn creates_runs_dir_if_missing() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested").join("runs");
        let journal = MetricsJournal::new(&nested);
        journal.append(&NodeResult::success("a", "plugin.core.echo", "v1"));
        assert!(nested.join("metrics.jsonl").exists());
    }
}
