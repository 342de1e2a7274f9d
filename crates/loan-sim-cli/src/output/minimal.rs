use serde_json::Value;

use super::scalar_text;

/// Fields that answer "what will I pay", in order of preference.
const PRIORITY_KEYS: [&str; 5] = [
    "monthly_payment",
    "passes",
    "suggested_down_payment",
    "principal",
    "total_paid",
];

/// Print just the key answer value from the output.
///
/// Searches the result (including nested objects such as a simulation
/// snapshot's `output`) for the first priority key with a non-null value,
/// then falls back to the first field.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    for key in PRIORITY_KEYS {
        if let Some(found) = find_key(result_obj, key) {
            println!("{}", scalar_text(found));
            return;
        }
    }

    if let Value::Object(map) = result_obj {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, scalar_text(val));
            return;
        }
    }

    println!("{}", scalar_text(result_obj));
}

/// Look up `key` at this level, then in nested objects. Arrays are not
/// entered so a scenario's payment never shadows the selected plan's.
fn find_key<'v>(value: &'v Value, key: &str) -> Option<&'v Value> {
    let map = value.as_object()?;
    if let Some(found) = map.get(key).filter(|v| !v.is_null()) {
        return Some(found);
    }
    map.values().find_map(|v| find_key(v, key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_payment_found() {
        let value = json!({"snapshot": {"output": {"monthly_payment": "1421.581"}}});
        assert_eq!(find_key(&value, "monthly_payment"), Some(&json!("1421.581")));
    }

    #[test]
    fn test_arrays_not_searched() {
        let value = json!({"scenarios": [{"monthly_payment": "1"}]});
        assert_eq!(find_key(&value, "monthly_payment"), None);
    }

    #[test]
    fn test_null_values_skipped() {
        let value = json!({"suggested_down_payment": null});
        assert_eq!(find_key(&value, "suggested_down_payment"), None);
    }
}
