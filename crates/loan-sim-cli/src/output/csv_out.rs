use serde_json::{Map, Value};
use std::io;

use super::{row_sets, scalar_columns, scalar_text};

/// Write output as CSV to stdout.
///
/// When the result carries row sets (schedules, scenarios) the largest one
/// is written as a table; otherwise the scalar fields are written as
/// `field,value` pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => result,
            _ => map,
        },
        Value::Array(rows) => {
            write_rows(&mut wtr, rows);
            let _ = wtr.flush();
            return;
        }
        _ => {
            let _ = wtr.write_record([scalar_text(value)]);
            let _ = wtr.flush();
            return;
        }
    };

    match row_sets(result).into_iter().max_by_key(|(_, rows)| rows.len()) {
        Some((_, rows)) => write_rows(&mut wtr, rows),
        None => write_fields(&mut wtr, result),
    }

    let _ = wtr.flush();
}

fn write_fields(wtr: &mut csv::Writer<io::StdoutLock<'_>>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &scalar_text(val)]);
    }
}

fn write_rows(wtr: &mut csv::Writer<io::StdoutLock<'_>>, rows: &[Value]) {
    let headers = scalar_columns(rows);
    if headers.is_empty() {
        for item in rows {
            let _ = wtr.write_record([scalar_text(item)]);
        }
        return;
    }

    let _ = wtr.write_record(&headers);
    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(scalar_text).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}
