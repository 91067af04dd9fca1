//! HTML backend (§4.2): same directory/file shape as XML (§4.2), built over
//! a lenient HTML5 parse instead of a well-formed-XML one, since real-world
//! HTML routinely omits closing tags and quotes that `xmltree` would reject.
//!
//! Built on `scraper` (and `html5ever` underneath), grounded in
//! `other_examples` HTML-scraping samples.

use std::sync::Arc;
use std::time::SystemTime;

use ego_tree::NodeRef;
use scraper::{Html, Node as HtmlNode};

use crate::errors::DavResult;
use crate::fs::tree::{Node, TreeBackend};
use crate::fs::Backend;

fn unique_synthetic_name(base: &str, taken: &std::collections::BTreeSet<String>) -> String {
    let mut name = base.to_string();
    while taken.contains(&name) {
        name = format!("_{name}");
    }
    name
}

fn own_text(node: NodeRef<HtmlNode>) -> String {
    node.children()
        .filter_map(|c| match c.value() {
            HtmlNode::Text(t) => Some(t.text.to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("")
}

fn build(node: NodeRef<HtmlNode>, mtime: SystemTime) -> Node {
    let mut out = Node::dir(mtime);

    let element_children: Vec<NodeRef<HtmlNode>> = node
        .children()
        .filter(|c| matches!(c.value(), HtmlNode::Element(_)))
        .collect();

    let mut tag_counts: std::collections::BTreeMap<String, usize> = Default::default();
    for c in &element_children {
        if let HtmlNode::Element(el) = c.value() {
            *tag_counts.entry(el.name().to_string()).or_insert(0) += 1;
        }
    }

    let mut seen: std::collections::BTreeMap<String, usize> = Default::default();
    let mut taken_names: std::collections::BTreeSet<String> = Default::default();
    for c in element_children {
        if let HtmlNode::Element(el) = c.value() {
            let tag = el.name().to_string();
            let count = tag_counts[&tag];
            let name = if count > 1 {
                let idx = seen.entry(tag.clone()).or_insert(0);
                let n = format!("{}_{}", tag, idx);
                *idx += 1;
                n
            } else {
                tag.clone()
            };
            taken_names.insert(name.clone());
            out.insert(name, build(c, mtime));
        }
    }

    let text = own_text(node);
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        let name = unique_synthetic_name("_text", &taken_names);
        taken_names.insert(name.clone());
        out.insert(name, Node::file(trimmed.as_bytes().to_vec(), "text/plain", mtime));
    }

    if let HtmlNode::Element(el) = node.value() {
        if el.attrs().next().is_some() {
            let mut obj = serde_json::Map::new();
            for (k, v) in el.attrs() {
                obj.insert(k.to_string(), serde_json::Value::String(v.to_string()));
            }
            let body = serde_json::to_vec_pretty(&serde_json::Value::Object(obj)).unwrap_or_default();
            let name = unique_synthetic_name("_attribs.json", &taken_names);
            out.insert(name, Node::file(body, "application/json", mtime));
        }
    }

    out
}

pub fn from_bytes(bytes: &[u8]) -> DavResult<Arc<dyn Backend>> {
    let text = String::from_utf8_lossy(bytes);
    let document = Html::parse_document(&text);
    let mtime = SystemTime::now();
    let html_node = document.tree.root().children().find(|n| matches!(n.value(), HtmlNode::Element(_)));

    let mut root = Node::dir(mtime);
    if let Some(html_node) = html_node {
        root.insert("html", build(html_node, mtime));
    }
    Ok(Arc::new(TreeBackend::new(root, "html")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<html><body><p class="a">one</p><p>two</p></body></html>"#;

    #[test]
    fn root_is_html_directory() {
        let b = from_bytes(SAMPLE.as_bytes()).unwrap();
        assert!(b.info(&["html".to_string()]).unwrap().is_dir());
    }

    #[test]
    fn repeated_tags_are_disambiguated() {
        let b = from_bytes(SAMPLE.as_bytes()).unwrap();
        let mut children = b
            .list(&["html".to_string(), "body".to_string()])
            .unwrap();
        children.sort();
        assert_eq!(children, vec!["p_0".to_string(), "p_1".to_string()]);
    }

    #[test]
    fn attribute_and_text_are_exposed() {
        let b = from_bytes(SAMPLE.as_bytes()).unwrap();
        let p = vec!["html".to_string(), "body".to_string(), "p_0".to_string(), "_text".to_string()];
        assert_eq!(b.get(&p).unwrap(), b"one");
        let attrs = vec!["html".to_string(), "body".to_string(), "p_0".to_string(), "_attribs.json".to_string()];
        let data = b.get(&attrs).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&data).unwrap();
        assert_eq!(v["class"], "a");
    }
}
