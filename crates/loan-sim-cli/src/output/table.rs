use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{row_sets, scalar_columns, scalar_text};

/// Format output as tables: one Field/Value table for the scalar results,
/// then one table per row set (schedules, scenarios, edit history).
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::Object(result)) = map.get("result") {
                print_result(result);
                print_envelope(map);
            } else {
                print_result(map);
            }
        }
        Value::Array(rows) => print_rows(rows),
        _ => println!("{}", value),
    }
}

fn print_result(result: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    collect_scalars(result, "", &mut builder);
    println!("{}", Table::from(builder));

    for (name, rows) in row_sets(result) {
        println!("\n{}:", name);
        print_rows(rows);
    }
}

/// Flatten nested objects into dotted field names; arrays are printed
/// separately as row sets.
fn collect_scalars(map: &Map<String, Value>, prefix: &str, builder: &mut Builder) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) => collect_scalars(inner, &name, builder),
            Value::Array(items) if items.first().map_or(false, Value::is_object) => {}
            _ => builder.push_record([name, scalar_text(val)]),
        }
    }
}

fn print_rows(rows: &[Value]) {
    let headers = scalar_columns(rows);
    if headers.is_empty() {
        for item in rows {
            println!("{}", scalar_text(item));
        }
        return;
    }

    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(scalar_text).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    println!("{}", Table::from(builder));
}

fn print_envelope(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                println!("  - {}", scalar_text(w));
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}
