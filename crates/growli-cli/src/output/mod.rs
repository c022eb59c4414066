pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Flatten nested objects into (dotted.path, scalar) pairs. Arrays of
/// scalars are joined; arrays of objects are indexed (`views.0.tier`).
pub(crate) fn flatten(value: &Value) -> Vec<(String, String)> {
    let mut rows = Vec::new();
    flatten_into(&mut rows, String::new(), value);
    rows
}

fn flatten_into(rows: &mut Vec<(String, String)>, prefix: String, value: &Value) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                flatten_into(rows, child(&prefix, key), val);
            }
        }
        Value::Array(arr) if arr.iter().any(|v| v.is_object() || v.is_array()) => {
            for (i, val) in arr.iter().enumerate() {
                flatten_into(rows, child(&prefix, &i.to_string()), val);
            }
        }
        _ => rows.push((prefix, scalar(value))),
    }
}

fn child(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

pub(crate) fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(scalar).collect::<Vec<_>>().join("; "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested() {
        let value = json!({
            "score": 70,
            "gaps": { "liquidity": { "current": "0.8" } },
            "strengths": ["a", "b"],
            "views": [{ "tier": 1 }],
            "break_even": null
        });
        let rows = flatten(&value);
        assert!(rows.contains(&("score".to_string(), "70".to_string())));
        assert!(rows.contains(&("gaps.liquidity.current".to_string(), "0.8".to_string())));
        assert!(rows.contains(&("strengths".to_string(), "a; b".to_string())));
        assert!(rows.contains(&("views.0.tier".to_string(), "1".to_string())));
        assert!(rows.contains(&("break_even".to_string(), String::new())));
    }
}
