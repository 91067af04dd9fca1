//! XML backend (§4.2): each element becomes a directory named after its
//! tag; repeated sibling tags are disambiguated as `tag_0`, `tag_1`, …;
//! an element's own text content and attributes surface as the synthetic
//! files `_text` and `_attribs.json`.
//!
//! Collision rule (Open Question (b) in SPEC_FULL.md): if a real child tag
//! is itself named `_text` or `_attribs.json`, the *synthetic* name is the
//! one that gets mangled (`__text`, `__attribs.json`, …) so the user-facing
//! tag name is never altered.
//!
//! Built on `xmltree`, parsing via `xml-rs` underneath — both teacher
//! dependencies already used for the multistatus response body (§4.4).

use std::sync::Arc;
use std::time::SystemTime;

use xmltree::{Element, XMLNode};

use crate::errors::{DavError, DavResult};
use crate::fs::tree::{Node, TreeBackend};
use crate::fs::{Backend, BackendErr};

fn unique_synthetic_name(base: &str, taken: &std::collections::BTreeSet<String>) -> String {
    let mut name = base.to_string();
    while taken.contains(&name) {
        name = format!("_{name}");
    }
    name
}

fn element_text(el: &Element) -> String {
    el.children
        .iter()
        .filter_map(|n| match n {
            XMLNode::Text(t) => Some(t.as_str()),
            XMLNode::CData(t) => Some(t.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("")
}

fn build(el: &Element, mtime: SystemTime) -> Node {
    let mut node = Node::dir(mtime);

    let mut tag_counts: std::collections::BTreeMap<String, usize> = Default::default();
    for child in &el.children {
        if let XMLNode::Element(child_el) = child {
            *tag_counts.entry(child_el.name.clone()).or_insert(0) += 1;
        }
    }

    let mut seen: std::collections::BTreeMap<String, usize> = Default::default();
    let mut taken_names: std::collections::BTreeSet<String> = Default::default();
    for child in &el.children {
        if let XMLNode::Element(child_el) = child {
            let count = tag_counts[&child_el.name];
            let name = if count > 1 {
                let idx = seen.entry(child_el.name.clone()).or_insert(0);
                let n = format!("{}_{}", child_el.name, idx);
                *idx += 1;
                n
            } else {
                child_el.name.clone()
            };
            taken_names.insert(name.clone());
            node.insert(name, build(child_el, mtime));
        }
    }

    let text = element_text(el);
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        let name = unique_synthetic_name("_text", &taken_names);
        taken_names.insert(name.clone());
        node.insert(name, Node::file(trimmed.as_bytes().to_vec(), "text/plain", mtime));
    }

    if !el.attributes.is_empty() {
        let mut obj = serde_json::Map::new();
        for (k, v) in &el.attributes {
            obj.insert(k.clone(), serde_json::Value::String(v.clone()));
        }
        let body = serde_json::to_vec_pretty(&serde_json::Value::Object(obj)).unwrap_or_default();
        let name = unique_synthetic_name("_attribs.json", &taken_names);
        node.insert(name, Node::file(body, "application/json", mtime));
    }

    node
}

pub fn from_bytes(bytes: &[u8]) -> DavResult<Arc<dyn Backend>> {
    let root_el = Element::parse(bytes).map_err(|e| DavError::Backend(BackendErr::Failure(format!("xml: {e}"))))?;
    let mtime = SystemTime::now();
    let mut root = Node::dir(mtime);
    root.insert(root_el.name.clone(), build(&root_el, mtime));
    Ok(Arc::new(TreeBackend::new(root, "xml")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] = br#"<catalog id="1"><book><title>Dune</title></book><book><title>Hyperion</title></book></catalog>"#;

    #[test]
    fn root_element_is_a_named_directory() {
        let b = from_bytes(SAMPLE).unwrap();
        assert!(b.info(&["catalog".to_string()]).unwrap().is_dir());
    }

    #[test]
    fn repeated_siblings_are_disambiguated() {
        let b = from_bytes(SAMPLE).unwrap();
        let mut children = b.list(&["catalog".to_string()]).unwrap();
        children.sort();
        assert_eq!(children, vec!["_attribs.json".to_string(), "book_0".to_string(), "book_1".to_string()]);
    }

    #[test]
    fn leaf_text_is_exposed_as_synthetic_file() {
        let b = from_bytes(SAMPLE).unwrap();
        let p = vec!["catalog".to_string(), "book_0".to_string(), "title".to_string(), "_text".to_string()];
        assert_eq!(b.get(&p).unwrap(), b"Dune");
    }

    #[test]
    fn attributes_become_json() {
        let b = from_bytes(SAMPLE).unwrap();
        let p = vec!["catalog".to_string(), "_attribs.json".to_string()];
        let data = b.get(&p).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&data).unwrap();
        assert_eq!(v["id"], "1");
    }
}
