pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("JSON serialization error: {}", e),
        },
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Render a leaf value as plain text. Nested structures fall back to JSON.
pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Fields of `map` holding non-empty arrays of objects, e.g. schedules and
/// scenario lists. Nested objects are searched too, so a snapshot's
/// `output.schedule` is found.
pub(crate) fn row_sets(map: &serde_json::Map<String, Value>) -> Vec<(String, &Vec<Value>)> {
    let mut sets = Vec::new();
    for (key, val) in map {
        match val {
            Value::Array(items) if items.first().map_or(false, Value::is_object) => {
                sets.push((key.clone(), items));
            }
            Value::Object(inner) => {
                for (inner_key, items) in row_sets(inner) {
                    sets.push((format!("{key}.{inner_key}"), items));
                }
            }
            _ => {}
        }
    }
    sets
}

/// Column names for a set of rows: the scalar fields of the first row.
pub(crate) fn scalar_columns(rows: &[Value]) -> Vec<String> {
    match rows.first() {
        Some(Value::Object(first)) => first
            .iter()
            .filter(|(_, v)| !v.is_array() && !v.is_object())
            .map(|(k, _)| k.clone())
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_sets_found_in_nested_objects() {
        let value = json!({
            "snapshot": {"output": {"schedule": [{"installment": 1}], "principal": "10"}},
            "history": [{"revision": 0}],
            "warnings": ["w"]
        });
        let sets = row_sets(value.as_object().unwrap());
        let names: Vec<&str> = sets.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["history", "snapshot.output.schedule"]);
    }

    #[test]
    fn test_scalar_columns_skip_nested() {
        let rows = vec![json!({"name": "a", "payment": "1.5", "schedule": [{"x": 1}]})];
        assert_eq!(scalar_columns(&rows), vec!["name", "payment"]);
    }
}
