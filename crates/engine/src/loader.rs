//! IR loader — parses a workflow file path into the internal graph model.
//!
//! Dispatches on file extension: `.yaml`/`.yml` parses as YAML, anything
//! else as JSON (`spec` §4.1). Performs only structural parsing; node-level
//! shape (unique ids, dependency existence, cycles) is the validator's job
//! (`crate::dag`).

use std::path::Path;

use serde_json::Value;

use crate::error::LoadError;
use crate::models::Workflow;

/// Load and structurally validate a workflow IR file.
///
/// # Errors
/// [`LoadError`] if the file can't be read, doesn't parse in its expected
/// format, isn't a mapping, has `kind != "process"`, or has a missing,
/// non-array, or empty `nodes`.
pub fn load_workflow(path: &Path) -> Result<Workflow, LoadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let value: Value = if is_yaml_path(path) {
        serde_yaml::from_str(&raw).map_err(|source| LoadError::Yaml {
            path: path.display().to_string(),
            source,
        })?
    } else {
        serde_json::from_str(&raw).map_err(|source| LoadError::Json {
            path: path.display().to_string(),
            source,
        })?
    };

    structurally_validate(&value, path)
}

fn is_yaml_path(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

fn structurally_validate(value: &Value, path: &Path) -> Result<Workflow, LoadError> {
    let obj = value.as_object().ok_or(LoadError::NotAMapping)?;

    let kind = obj.get("kind").and_then(Value::as_str);
    if kind != Some("process") {
        return Err(LoadError::WrongKind);
    }

    let nodes = obj.get("nodes").and_then(Value::as_array);
    match nodes {
        Some(nodes) if !nodes.is_empty() => {}
        _ => return Err(LoadError::EmptyNodes),
    }

    // Unknown top-level keys are ignored (spec §6.4) — re-deserialize
    // through the typed model now that shape is confirmed. A node whose
    // own fields don't type-check (e.g. a non-string `actionRef`) surfaces
    // here as a parse error; see crate::error for why that folds into this
    // structural tier rather than the dynamically-typed original's Graph
    // tier.
    serde_json::from_value(value.clone()).map_err(|source| LoadError::Json {
        path: path.display().to_string(),
        source,
    })
}
