//! Python source backend (§4.2): top-level `def`s become `<name>.src` files
//! holding their verbatim source span; top-level `class`es become
//! directories whose children are `<method>.src` files for each method
//! defined directly in the class body.
//!
//! No crate in the corpus parses Python, and a real AST (tokenizer,
//! grammar, scope resolution) is out of proportion to what a read-only
//! file browser needs. This is a deliberate simplification: an
//! indentation-scoped regex scanner that finds `def`/`class` headers at a
//! given nesting depth and captures everything up to the next line at or
//! above that depth, rather than true semantic parsing.

use std::sync::Arc;
use std::time::SystemTime;

use regex::Regex;

use crate::errors::DavResult;
use crate::fs::tree::{Node, TreeBackend};
use crate::fs::Backend;

fn indent_of(line: &str) -> usize {
    line.chars().take_while(|c| *c == ' ').count()
}

fn is_blank_or_comment(line: &str) -> bool {
    let t = line.trim_start();
    t.is_empty() || t.starts_with('#')
}

/// Capture the verbatim span of the block starting at `lines[start]`
/// (a `def`/`class` header at `indent`): every following line that's
/// either blank/comment or indented deeper than `indent`.
fn capture_block(lines: &[&str], start: usize, indent: usize) -> (String, usize) {
    let mut end = start + 1;
    while end < lines.len() {
        let line = lines[end];
        if is_blank_or_comment(line) || indent_of(line) > indent {
            end += 1;
        } else {
            break;
        }
    }
    // Trim trailing blank lines from the captured span.
    let mut last = end;
    while last > start + 1 && lines[last - 1].trim().is_empty() {
        last -= 1;
    }
    (lines[start..last].join("\n"), end)
}

fn scan(lines: &[&str], indent: usize, def_re: &Regex, class_re: &Regex) -> Vec<(String, Node)> {
    let mtime = SystemTime::now();
    let mut out = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        if indent_of(line) != indent || is_blank_or_comment(line) {
            i += 1;
            continue;
        }
        // `def_re`/`class_re` are anchored at column 0, so match against the
        // line with its leading indentation stripped, not the raw line —
        // otherwise nested definitions (indent > 0) never match.
        let unindented = &line[indent..];
        if let Some(caps) = def_re.captures(unindented) {
            let name = caps[1].to_string();
            let (span, end) = capture_block(lines, i, indent);
            out.push((format!("{name}.src"), Node::file(span.into_bytes(), "text/plain", mtime)));
            i = end;
        } else if let Some(caps) = class_re.captures(unindented) {
            let name = caps[1].to_string();
            let (span, end) = capture_block(lines, i, indent);
            let body_lines: Vec<&str> = span.split('\n').collect();
            let methods = scan(&body_lines[1..], indent + 4, def_re, class_re);
            let mut dir = Node::dir(mtime);
            for (n, node) in methods {
                dir.insert(n, node);
            }
            out.push((name, dir));
            i = end;
        } else {
            i += 1;
        }
    }
    out
}

pub fn from_bytes(bytes: &[u8]) -> DavResult<Arc<dyn Backend>> {
    let text = String::from_utf8_lossy(bytes).into_owned();
    let lines: Vec<&str> = text.lines().collect();
    let def_re = Regex::new(r"^def\s+([A-Za-z_][A-Za-z0-9_]*)\s*\(").unwrap();
    let class_re = Regex::new(r"^class\s+([A-Za-z_][A-Za-z0-9_]*)\s*[\(:]").unwrap();

    let mtime = SystemTime::now();
    let mut root = Node::dir(mtime);
    for (name, node) in scan(&lines, 0, &def_re, &class_re) {
        root.insert(name, node);
    }
    Ok(Arc::new(TreeBackend::new(root, "python-source")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "def add(a, b):\n    return a + b\n\n\nclass Greeter:\n    def hello(self):\n        return 'hi'\n\n    def bye(self):\n        return 'bye'\n";

    #[test]
    fn top_level_function_becomes_src_file() {
        let b = from_bytes(SAMPLE.as_bytes()).unwrap();
        let data = b.get(&["add.src".to_string()]).unwrap();
        let text = String::from_utf8(data).unwrap();
        assert!(text.starts_with("def add(a, b):"));
        assert!(text.contains("return a + b"));
    }

    #[test]
    fn top_level_class_becomes_directory_of_methods() {
        let b = from_bytes(SAMPLE.as_bytes()).unwrap();
        assert!(b.info(&["Greeter".to_string()]).unwrap().is_dir());
        let mut children = b.list(&["Greeter".to_string()]).unwrap();
        children.sort();
        assert_eq!(children, vec!["bye.src".to_string(), "hello.src".to_string()]);
    }
}
