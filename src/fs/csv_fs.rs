//! CSV backend (§4.2): `_headers.txt` holds one column name per line, and
//! each data row becomes `row_NNNN.json` — an object keyed by header name.
//!
//! Zero-padding width for `NNNN` is resolved per the Open Question in
//! SPEC_FULL.md §9: `max(4, digits(row_count - 1))`, so a 50000-row file
//! gets 5-digit names instead of silently colliding past `row_9999.json`.

use std::sync::Arc;
use std::time::SystemTime;

use serde_json::{Map, Value};

use crate::errors::{DavError, DavResult};
use crate::fs::tree::{Node, TreeBackend};
use crate::fs::{Backend, BackendErr};

fn pad_width(row_count: usize) -> usize {
    if row_count == 0 {
        return 4;
    }
    let digits = (row_count - 1).to_string().len();
    digits.max(4)
}

pub fn from_bytes(bytes: &[u8]) -> DavResult<Arc<dyn Backend>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DavError::Backend(BackendErr::Failure(format!("csv: {e}"))))?
        .iter()
        .map(str::to_string)
        .collect();

    let rows: Vec<csv::StringRecord> = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| DavError::Backend(BackendErr::Failure(format!("csv: {e}"))))?;

    let mtime = SystemTime::now();
    let mut root = Node::dir(mtime);

    let header_lines = headers.join("\n");
    root.insert("_headers.txt", Node::file(header_lines.into_bytes(), "text/plain", mtime));

    let width = pad_width(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let mut obj = Map::new();
        for (col, value) in headers.iter().zip(row.iter()) {
            obj.insert(col.clone(), Value::String(value.to_string()));
        }
        let body = serde_json::to_vec_pretty(&Value::Object(obj))
            .map_err(|e| DavError::Backend(BackendErr::Failure(format!("csv: {e}"))))?;
        let name = format!("row_{:0width$}.json", i, width = width);
        root.insert(name, Node::file(body, "application/json", mtime));
    }

    Ok(Arc::new(TreeBackend::new(root, "csv")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] = b"name,age\nAda,36\nGrace,85\n";

    #[test]
    fn headers_file_holds_the_raw_header_row() {
        let b = from_bytes(SAMPLE).unwrap();
        let data = b.get(&["_headers.txt".to_string()]).unwrap();
        assert_eq!(data, b"name\nage");
    }

    #[test]
    fn each_row_becomes_a_keyed_json_object() {
        let b = from_bytes(SAMPLE).unwrap();
        let data = b.get(&["row_0000.json".to_string()]).unwrap();
        let value: Value = serde_json::from_slice(&data).unwrap();
        assert_eq!(value["name"], "Ada");
        assert_eq!(value["age"], "36");
    }

    #[test]
    fn pad_width_grows_with_row_count() {
        assert_eq!(pad_width(3), 4);
        assert_eq!(pad_width(50_000), 5);
    }
}
