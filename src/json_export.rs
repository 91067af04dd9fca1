//! The `?json` subtree export (§4.4).
//!
//! Implemented as an explicit stack-based traversal with a depth cap
//! (DESIGN NOTES §9), rather than function recursion, so a pathologically
//! deep backend tree fails with a clean `BackendError` instead of blowing
//! the native call stack.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::{Map, Value};

use crate::fs::{Backend, BackendErr, BackendResult, Kind, ResourceInfo};

fn file_value(backend: &dyn Backend, segments: &[String]) -> BackendResult<Value> {
    let data = backend.get(segments)?;
    let info = backend.info(segments)?;
    let content_type = info.content_type.as_deref().unwrap_or("application/octet-stream");
    if content_type == "application/json" {
        // Reparse rather than stringify: a JSON/TOML number/bool/null leaf
        // must round-trip as its native type (scenario S3), not come back
        // as a quoted string.
        serde_json::from_slice(&data).map_err(|e| BackendErr::Failure(e.to_string()))
    } else if content_type.starts_with("text/") {
        Ok(Value::String(String::from_utf8_lossy(&data).into_owned()))
    } else {
        Ok(Value::String(BASE64.encode(&data)))
    }
}

struct Frame {
    segments: Vec<String>,
    children: Vec<String>,
    idx: usize,
    obj: Map<String, Value>,
}

/// Export `root` (which must be a directory) as a JSON value mirroring its
/// shape: directories become objects, `application/json` files reparse as
/// their native scalar, other text files become strings, everything else
/// becomes a base64 string.
pub fn export_subtree(backend: &dyn Backend, root: &[String], depth_cap: usize) -> BackendResult<Value> {
    let root_children = backend.list(root)?;
    let mut stack = vec![Frame {
        segments: root.to_vec(),
        children: root_children,
        idx: 0,
        obj: Map::new(),
    }];

    loop {
        if stack.len() > depth_cap {
            return Err(BackendErr::Failure(format!(
                "subtree export exceeded max depth of {depth_cap}"
            )));
        }

        let done = stack.last().unwrap().idx >= stack.last().unwrap().children.len();
        if done {
            let frame = stack.pop().unwrap();
            let value = Value::Object(frame.obj);
            match stack.last_mut() {
                Some(parent) => {
                    let name = frame.segments.last().cloned().unwrap_or_default();
                    parent.obj.insert(name, value);
                }
                None => return Ok(value),
            }
            continue;
        }

        let (name, child_segments) = {
            let frame = stack.last_mut().unwrap();
            let name = frame.children[frame.idx].clone();
            frame.idx += 1;
            let mut segs = frame.segments.clone();
            segs.push(name.clone());
            (name, segs)
        };

        let info: ResourceInfo = backend.info(&child_segments)?;
        match info.kind {
            Kind::Directory => {
                let children = backend.list(&child_segments)?;
                stack.push(Frame {
                    segments: child_segments,
                    children,
                    idx: 0,
                    obj: Map::new(),
                });
            }
            Kind::File => {
                let value = file_value(backend, &child_segments)?;
                stack.last_mut().unwrap().obj.insert(name, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::json_fs;

    #[test]
    fn exports_nested_tree() {
        let backend = json_fs::new(serde_json::json!({
            "k": 42,
            "sub": { "x": "y" }
        }));
        let value = export_subtree(backend.as_ref(), &[], 1024).unwrap();
        assert_eq!(value["k"], 42);
        assert_eq!(value["sub"]["x"], "y");
    }

    #[test]
    fn empty_directory_exports_empty_object() {
        let backend = json_fs::new(serde_json::json!({}));
        let value = export_subtree(backend.as_ref(), &[], 1024).unwrap();
        assert_eq!(value, serde_json::json!({}));
    }
}
