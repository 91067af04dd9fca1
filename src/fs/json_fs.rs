//! JSON backend (§4.2): scalars become files in textual form, objects become
//! directories keyed by field name, arrays become directories keyed by
//! decimal index. String scalars are `text/plain`; number/bool/null scalars
//! are `application/json` so `?json` export can reparse them natively.

use std::sync::Arc;
use std::time::SystemTime;

use serde_json::Value;

use crate::errors::DavResult;
use crate::fs::tree::{Node, TreeBackend};
use crate::fs::Backend;

fn scalar_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `String` scalars are plain text; every other scalar (number, bool, null)
/// is stored as its JSON literal form so the `?json` export (§4.4) can
/// reparse it natively instead of stringifying it (scenario S3: `GET
/// /?json` must return the input document verbatim, not with numbers
/// turned into quoted strings).
fn scalar_content_type(v: &Value) -> &'static str {
    match v {
        Value::String(_) => "text/plain",
        _ => "application/json",
    }
}

fn build(value: &Value, mtime: SystemTime) -> Node {
    match value {
        Value::Object(map) => {
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

/// Build a backend over an already-parsed JSON value.
pub fn new(value: Value) -> Arc<dyn Backend> {
    let mtime = SystemTime::now();
    // A bare scalar at the document root can't be a directory (§3 invariant
    // 1), so it's wrapped as the sole child of a synthetic root.
    let root = match &value {
        Value::Object(_) | Value::Array(_) => build(&value, mtime),
        scalar => {
            let mut node = Node::dir(mtime);
            node.insert("value", build(scalar, mtime));
            node
        }
    };
    Arc::new(TreeBackend::new(root, "json"))
}

/// Parse and build a backend from raw file bytes.
pub fn from_bytes(bytes: &[u8]) -> DavResult<Arc<dyn Backend>> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| crate::errors::DavError::Backend(crate::fs::BackendErr::Failure(e.to_string())))?;
    Ok(new(value))
}
