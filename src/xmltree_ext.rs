//! Multistatus XML tree construction (§4.4), via `xmltree`/`xml-rs` — the
//! same pair of crates the teacher already depends on for its own
//! conditional-request and property machinery.
//!
//! This server doesn't track real XML namespaces (there's exactly one,
//! `DAV:`, used verbatim everywhere), so every element is built with the
//! literal `D:` prefix baked into its name rather than through `xmltree`'s
//! namespace API — the simplest thing that serialises correctly.

use xmltree::{Element, XMLNode};

pub fn text_element(name: &str, text: impl Into<String>) -> Element {
    let mut el = Element::new(name);
    el.children.push(XMLNode::Text(text.into()));
    el
}

pub fn empty_element(name: &str) -> Element {
    Element::new(name)
}

pub fn parent(name: &str, children: Vec<Element>) -> Element {
    let mut el = Element::new(name);
    el.children.extend(children.into_iter().map(XMLNode::Element));
    el
}

/// Build the `D:multistatus` root, attaching the `DAV:` namespace
/// declaration directly as an attribute (§4.4).
pub fn multistatus(responses: Vec<Element>) -> Element {
    let mut el = parent("D:multistatus", responses);
    el.attributes.insert("xmlns:D".to_string(), "DAV:".to_string());
    el
}

/// One `D:response` for a found resource, with the five standard
/// properties (§4.4: displayname, resourcetype, getcontentlength,
/// getcontenttype, getlastmodified) inside a single 200 propstat.
pub fn response_found(href: &str, props: Vec<Element>) -> Element {
    let propstat = parent(
        "D:propstat",
        vec![parent("D:prop", props), text_element("D:status", "HTTP/1.1 200 OK")],
    );
    parent("D:response", vec![text_element("D:href", href), propstat])
}

/// A `D:response` for a path that vanished between being listed and being
/// described — still a single row in the multistatus, but with a 404
/// propstat and no properties (§4.4 edge case).
pub fn response_not_found(href: &str) -> Element {
    let propstat = parent(
        "D:propstat",
        vec![empty_element("D:prop"), text_element("D:status", "HTTP/1.1 404 Not Found")],
    );
    parent("D:response", vec![text_element("D:href", href), propstat])
}

/// A `D:response` for a resource whose backend query failed mid-enumeration
/// (§7: a recursive PROPFIND error fails only that resource's propstat with
/// 500, not the whole multistatus).
pub fn response_error(href: &str) -> Element {
    let propstat = parent(
        "D:propstat",
        vec![
            empty_element("D:prop"),
            text_element("D:status", "HTTP/1.1 500 Internal Server Error"),
        ],
    );
    parent("D:response", vec![text_element("D:href", href), propstat])
}

pub fn render(element: &Element) -> String {
    let mut buf = Vec::new();
    let config = xmltree::EmitterConfig::new().perform_indent(false);
    element.write_with_config(&mut buf, config).unwrap_or_default();
    String::from_utf8(buf).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_declared_namespace_and_responses() {
        let doc = multistatus(vec![response_found("/a.txt", vec![text_element("D:displayname", "a.txt")])]);
        let xml = render(&doc);
        assert!(xml.contains("xmlns:D=\"DAV:\""));
        assert!(xml.contains("D:displayname"));
        assert!(xml.contains("/a.txt"));
    }

    #[test]
    fn error_response_carries_a_500_propstat() {
        let xml = render(&response_error("/broken"));
        assert!(xml.contains("/broken"));
        assert!(xml.contains("500"));
    }
}
