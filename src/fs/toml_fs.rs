//! TOML backend (§4.2): same mapping rules as JSON (§4.2) — tables become
//! directories keyed by field name, arrays become directories keyed by
//! decimal index, scalars become files.

use std::sync::Arc;
use std::time::SystemTime;

use toml::Value;

use crate::errors::{DavError, DavResult};
use crate::fs::tree::{Node, TreeBackend};
use crate::fs::{Backend, BackendErr};

fn scalar_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Integers/floats/booleans round-trip as JSON literals verbatim, so they're
/// marked `application/json` for the `?json` export (§4.4) to reparse
/// natively rather than stringify. Datetimes have no native JSON
/// representation, so they stay plain text like strings.
fn scalar_content_type(v: &Value) -> &'static str {
    match v {
        Value::Integer(_) | Value::Float(_) | Value::Boolean(_) => "application/json",
        _ => "text/plain",
    }
}

fn build(value: &Value, mtime: SystemTime) -> Node {
    match value {
        Value::Table(map) => {
            let mut node = Node::dir(mtime);
            for (k, v) in map {
                node.insert(k.clone(), build(v, mtime));
            }
            node
        }
        Value::Array(items) => {
            let mut node = Node::dir(mtime);
            for (i, v) in items.iter().enumerate() {
                node.insert(i.to_string(), build(v, mtime));
            }
            node
        }
        scalar => Node::file(scalar_text(scalar).into_bytes(), scalar_content_type(scalar), mtime),
    }
}

pub fn from_bytes(bytes: &[u8]) -> DavResult<Arc<dyn Backend>> {
    let text = std::str::from_utf8(bytes).map_err(|e| DavError::Backend(BackendErr::Failure(e.to_string())))?;
    let value: Value = text
        .parse()
        .map_err(|e: toml::de::Error| DavError::Backend(BackendErr::Failure(e.to_string())))?;
    let mtime = SystemTime::now();
    let root = match &value {
        Value::Table(_) => build(&value, mtime),
        _ => {
            let mut node = Node::dir(mtime);
            node.insert("value", build(&value, mtime));
            node
        }
    };
    Ok(Arc::new(TreeBackend::new(root, "toml")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "title = \"demo\"\n\n[server]\nport = 8080\ntags = [\"a\", \"b\"]\n";

    #[test]
    fn scalar_at_key_is_a_file() {
        let b = from_bytes(SAMPLE.as_bytes()).unwrap();
        assert_eq!(b.get(&["title".to_string()]).unwrap(), b"demo");
    }

    #[test]
    fn table_is_a_directory() {
        let b = from_bytes(SAMPLE.as_bytes()).unwrap();
        assert!(b.info(&["server".to_string()]).unwrap().is_dir());
        assert_eq!(
            b.get(&["server".to_string(), "port".to_string()]).unwrap(),
            b"8080"
        );
    }

    #[test]
    fn array_is_indexed_directory() {
        let b = from_bytes(SAMPLE.as_bytes()).unwrap();
        let p = vec!["server".to_string(), "tags".to_string()];
        assert_eq!(b.list(&p).unwrap(), vec!["0".to_string(), "1".to_string()]);
        assert_eq!(b.get(&[p[0].clone(), p[1].clone(), "0".to_string()]).unwrap(), b"a");
    }
}
