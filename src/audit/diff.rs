//! Field-level diffs for update entries

use std::collections::BTreeSet;

use serde_json::Value;

/// Describe top-level field changes between two JSON objects.
///
/// Fields are listed in key order. Returns `None` when nothing changed.
/// `updated_at` is ignored since every update touches it.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let (Value::Object(before_obj), Value::Object(after_obj)) = (before, after) else {
        return (before != after).then(|| format!("{} -> {}", format_value(before), format_value(after)));
    };

    let keys: BTreeSet<&String> = before_obj.keys().chain(after_obj.keys()).collect();
    let changes: Vec<String> = keys
        .into_iter()
        .filter(|key| key.as_str() != "updated_at")
        .filter_map(|key| match (before_obj.get(key), after_obj.get(key)) {
            (Some(b), Some(a)) if b != a => {
                Some(format!("{}: {} -> {}", key, format_value(b), format_value(a)))
            }
            (Some(b), None) => Some(format!("{}: {} -> (removed)", key, format_value(b))),
            (None, Some(a)) => Some(format!("{}: (added) -> {}", key, format_value(a))),
            _ => None,
        })
        .collect();

    (!changes.is_empty()).then(|| changes.join(", "))
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) if s.chars().count() > 50 => {
            let head: String = s.chars().take(47).collect();
            format!("\"{}...\"", head)
        }
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
        other => other.to_string(),
    }
}
