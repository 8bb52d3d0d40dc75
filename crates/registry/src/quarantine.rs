//! The quarantine deny-list.
//!
//! A newline-delimited JSON file of `{"actionRef": ..., "version": ...}`
//! entries, loaded once at startup. Looking up a quarantined pair in
//! `verify`/`prod` mode fails the node; in `explore` it is ignored
//! entirely (the driver never even calls [`QuarantineList::contains`] in
//! that mode).

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

#[derive(Deserialize)]
struct QuarantineEntry {
    #[serde(rename = "actionRef")]
    action_ref: String,
    #[serde(default = "default_version")]
    version: String,
}

fn default_version() -> String {
    "v1".to_string()
}

/// The set of `(actionRef, schemaVersion)` pairs forbidden in strict modes.
pub struct QuarantineList {
    entries: HashSet<(String, String)>,
}

impl QuarantineList {
    /// A quarantine list with nothing in it.
    pub fn empty() -> Self {
        Self {
            entries: HashSet::new(),
        }
    }

    /// Load a quarantine list from a newline-delimited JSON file.
    ///
    /// Mirrors the reference loader's resilience: a missing file yields an
    /// empty list (not an error), and malformed individual lines are
    /// skipped with a warning rather than aborting the whole load.
    pub fn load_from_file(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return Self::empty(),
        };

        let mut entries = HashSet::new();
        for (lineno, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<QuarantineEntry>(line) {
                Ok(entry) => {
                    entries.insert((entry.action_ref, entry.version));
                }
                Err(err) => {
                    warn!(path = %path.display(), line = lineno + 1, %err, "skipping malformed quarantine entry");
                }
            }
        }
        Self { entries }
    }

    /// Whether `(actionRef, schemaVersion)` is quarantined.
    pub fn contains(&self, action_ref: &str, schema_version: &str) -> bool {
        self.entries
            .contains(&(action_ref.to_string(), schema_version.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_an_empty_list() {
        let list = QuarantineList::load_from_file(Path::new("/nonexistent/quarantine.jsonl"));
        assert!(!list.contains("plugin.http.get", "v1"));
    }

    #[test]
    fn loads_valid_entries_and_skips_malformed_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"actionRef": "plugin.http.get", "version": "v1"}}"#).unwrap();
        writeln!(file, "not json").unwrap();
        writeln!(file, r#"{{"actionRef": "plugin.core.echo"}}"#).unwrap(); // defaults to v1
        file.flush().unwrap();

        let list = QuarantineList::load_from_file(file.path());
        assert!(list.contains("plugin.http.get", "v1"));
        assert!(list.contains("plugin.core.echo", "v1"));
        assert!(!list.contains("plugin.core.echo", "v2"));
    }
}
