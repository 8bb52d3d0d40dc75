//! Reference resolver (`spec` §4.3).
//!
//! Walks a node's `input` value, substituting every leaf that is a mapping
//! with exactly one key `$ref` whose value is a string. Everything else
//! (other mappings, sequences, scalars) recurses or passes through
//! unchanged. Also enforces the mode gate on `{{ }}` template literals.

use serde_json::Value;
use tracing::debug;

use crate::config::Mode;
use crate::error::ResolveError;

type OutputContext = std::collections::HashMap<String, Value>;

/// Resolve every `$ref` leaf in `input` against `context`, honoring the
/// template-literal gate for `mode`. When `debug_ref` is set (from
/// `AUTOMATOR_DEBUG_REF`), each `$ref` lookup logs the referenced node's raw
/// output, mirroring the original runner's `[DEBUG_REF]` trace.
pub fn resolve_input(
    input: &Value,
    context: &OutputContext,
    mode: Mode,
    debug_ref: bool,
) -> Result<Value, ResolveError> {
    match input {
        Value::Object(map) => {
            if map.len() == 1 {
                if let Some(Value::String(path)) = map.get("$ref") {
                    return resolve_ref(path, context, debug_ref);
                }
            }
            let mut out = serde_json::Map::with_capacity(map.len());
            for (k, v) in map {
                out.insert(k.clone(), resolve_input(v, context, mode, debug_ref)?);
            }
            Ok(Value::Object(out))
        }
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(resolve_input(item, context, mode, debug_ref)?);
            }
            Ok(Value::Array(out))
        }
        Value::String(s) => {
            if mode.is_strict() && s.contains("{{") && s.contains("}}") {
                return Err(ResolveError::Permanent(
                    "template literals not allowed in verify/prod; use $ref".to_string(),
                ));
            }
            Ok(Value::String(s.clone()))
        }
        other => Ok(other.clone()),
    }
}

fn resolve_ref(path: &str, context: &OutputContext, debug_ref: bool) -> Result<Value, ResolveError> {
    let parts: Vec<&str> = path.split('.').collect();
    if parts.len() < 5 || parts[0] != "$" || parts[1] != "nodes" || parts[3] != "output" {
        return Err(ResolveError::Permanent(format!(
            "Unsupported $ref path: {path}"
        )));
    }

    let node_id = parts[2];
    let mut value = context
        .get(node_id)
        .cloned()
        .ok_or_else(|| ResolveError::Retryable(format!("$ref to unknown node: {node_id}")))?;

    if debug_ref {
        let preview: String = value.to_string().chars().take(200).collect();
        debug!(nid = %node_id, out = %preview, "[DEBUG_REF]");
    }

    for token in &parts[4..] {
        value = apply_token(token, value, path)?;
    }

    Ok(value)
}

fn apply_token(token: &str, value: Value, full_path: &str) -> Result<Value, ResolveError> {
    let bracket_count = token.matches('[').count();
    if bracket_count > 1 {
        return Err(ResolveError::Permanent(format!(
            "$ref invalid token (nested brackets not supported): {full_path}"
        )));
    }

    let Some(open) = token.find('[') else {
        // Bare identifier: field lookup.
        return field_lookup(&value, token, full_path);
    };

    if !token.ends_with(']') {
        return Err(ResolveError::Permanent(format!(
            "$ref invalid index token: {full_path}"
        )));
    }

    let head = &token[..open];
    let idx_str = &token[open + 1..token.len() - 1];
    let idx: usize = idx_str
        .parse()
        .map_err(|_| ResolveError::Permanent(format!("$ref invalid index: {full_path}")))?;

    let indexed_into = if head.is_empty() {
        value
    } else {
        field_lookup(&value, head, full_path)?
    };

    match indexed_into {
        Value::Array(items) => items
            .get(idx)
            .cloned()
            .ok_or_else(|| ResolveError::Permanent(format!("$ref index out of range: {full_path}"))),
        _ => Err(ResolveError::Permanent(format!(
            "$ref index out of range: {full_path}"
        ))),
    }
}

fn field_lookup(value: &Value, field: &str, full_path: &str) -> Result<Value, ResolveError> {
    match value.get(field) {
        Some(v) => Ok(v.clone()),
        None => Err(ResolveError::Permanent(format!(
            "$ref field not found: {full_path}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx(entries: &[(&str, Value)]) -> OutputContext {
        entries.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn resolves_simple_field_ref() {
        let context = ctx(&[("a", json!({"message": "hello"}))]);
        let input = json!({"text": {"$ref": "$.nodes.a.output.message"}});
        let resolved = resolve_input(&input, &context, Mode::Explore, false).unwrap();
        assert_eq!(resolved, json!({"text": "hello"}));
    }

    #[test]
    fn resolves_nested_field_and_index() {
        let context = ctx(&[("a", json!({"items": [{"name": "x"}, {"name": "y"}]}))]);
        let input = json!({"$ref": "$.nodes.a.output.items[1].name"});
        let resolved = resolve_input(&input, &context, Mode::Explore, false).unwrap();
        assert_eq!(resolved, json!("y"));
    }

    #[test]
    fn resolves_bare_index_token() {
        let context = ctx(&[("a", json!({"items": ["x", "y"]}))]);
        let input = json!({"$ref": "$.nodes.a.output.items[0]"});
        let resolved = resolve_input(&input, &context, Mode::Explore, false).unwrap();
        assert_eq!(resolved, json!("x"));
    }

    #[test]
    fn no_ref_leaves_remain_after_resolution() {
        let context = ctx(&[("a", json!({"v": 1}))]);
        let input = json!({
            "nested": {"x": {"$ref": "$.nodes.a.output.v"}, "y": [1, {"$ref": "$.nodes.a.output.v"}]}
        });
        let resolved = resolve_input(&input, &context, Mode::Explore, false).unwrap();
        let serialized = resolved.to_string();
        assert!(!serialized.contains("$ref"));
    }

    #[test]
    fn missing_node_id_is_retryable() {
        let context = ctx(&[]);
        let input = json!({"$ref": "$.nodes.missing.output.x"});
        assert!(matches!(
            resolve_input(&input, &context, Mode::Explore, false),
            Err(ResolveError::Retryable(_))
        ));
    }

    #[test]
    fn bad_prefix_is_permanent() {
        let context = ctx(&[("a", json!({"x": 1}))]);
        let input = json!({"$ref": "nodes.a.output.x"});
        assert!(matches!(
            resolve_input(&input, &context, Mode::Explore, false),
            Err(ResolveError::Permanent(_))
        ));
    }

    #[test]
    fn missing_field_is_permanent() {
        let context = ctx(&[("a", json!({"x": 1}))]);
        let input = json!({"$ref": "$.nodes.a.output.y"});
        assert!(matches!(
            resolve_input(&input, &context, Mode::Explore, false),
            Err(ResolveError::Permanent(_))
        ));
    }

    #[test]
    fn out_of_range_index_is_permanent() {
        let context = ctx(&[("a", json!({"items": [1]}))]);
        let input = json!({"$ref": "$.nodes.a.output.items[5]"});
        assert!(matches!(
            resolve_input(&input, &context, Mode::Explore, false),
            Err(ResolveError::Permanent(_))
        ));
    }

    #[test]
    fn double_bracket_token_is_rejected() {
        let context = ctx(&[("a", json!({"items": [[1, 2]]}))]);
        let input = json!({"$ref": "$.nodes.a.output.items[[0]]"});
        assert!(matches!(
            resolve_input(&input, &context, Mode::Explore, false),
            Err(ResolveError::Permanent(_))
        ));
    }

    #[test]
    fn template_literal_passes_in_explore() {
        let context = ctx(&[]);
        let input = json!({"greeting": "Hello {{name}}"});
        let resolved = resolve_input(&input, &context, Mode::Explore, false).unwrap();
        assert_eq!(resolved, input);
    }

    #[test]
    fn template_literal_rejected_in_verify_and_prod() {
        let context = ctx(&[]);
        let input = json!({"greeting": "Hello {{name}}"});
        assert!(matches!(
            resolve_input(&input, &context, Mode::Verify, false),
            Err(ResolveError::Permanent(_))
        ));
        assert!(matches!(
            resolve_input(&input, &context, Mode::Prod, false),
            Err(ResolveError::Permanent(_))
        ));
    }
}
