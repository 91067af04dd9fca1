//! Nested-mapping in-memory backend (§4.2: "leaves are byte buffers,
//! interior nodes are sub-mappings"). This is the frontend's own reference
//! backend — most protocol-level tests (§8 S1-S6, invariants 1-6) are
//! written against it instead of a real file format.

use std::sync::Arc;
use std::time::SystemTime;

use crate::fs::tree::{Node, TreeBackend};
use crate::fs::Backend;

/// Convenience builder mirroring the way tests construct a `Memory` tree:
/// either a leaf byte buffer or a directory of named children.
pub enum Entry {
    File(Vec<u8>, &'static str),
    Dir(Vec<(&'static str, Entry)>),
}

fn build(entry: Entry, mtime: SystemTime) -> Node {
    match entry {
        Entry::File(data, content_type) => Node::file(data, content_type, mtime),
        Entry::Dir(children) => {
            let mut node = Node::dir(mtime);
            for (name, child) in children {
                node.insert(name, build(child, mtime));
            }
            node
        }
    }
}

pub fn new(root: Entry) -> Arc<dyn Backend> {
    let mtime = SystemTime::now();
    Arc::new(TreeBackend::new(build(root, mtime), "memory"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::BackendErr;

    fn sample() -> Arc<dyn Backend> {
        new(Entry::Dir(vec![
            ("a.txt", Entry::File(b"hi\n".to_vec(), "text/plain")),
            (
                "sub",
                Entry::Dir(vec![("b.txt", Entry::File(vec![0u8; 5], "text/plain"))]),
            ),
        ]))
    }

    #[test]
    fn root_is_directory() {
        let b = sample();
        assert!(b.info(&[]).unwrap().is_dir());
    }

    #[test]
    fn lists_children_in_sorted_order() {
        let b = sample();
        assert_eq!(b.list(&[]).unwrap(), vec!["a.txt".to_string(), "sub".to_string()]);
    }

    #[test]
    fn reads_file_body_matching_size() {
        let b = sample();
        let p = vec!["a.txt".to_string()];
        let info = b.info(&p).unwrap();
        let data = b.get(&p).unwrap();
        assert_eq!(data.len() as u64, info.size.unwrap());
        assert_eq!(data, b"hi\n");
    }

    #[test]
    fn list_on_file_is_not_found() {
        let b = sample();
        assert!(matches!(b.list(&["a.txt".to_string()]), Err(BackendErr::NotFound)));
    }

    #[test]
    fn get_on_directory_is_not_found() {
        let b = sample();
        assert!(matches!(b.get(&["sub".to_string()]), Err(BackendErr::NotFound)));
    }

    #[test]
    fn missing_path_is_not_found() {
        let b = sample();
        assert!(matches!(b.info(&["nope".to_string()]), Err(BackendErr::NotFound)));
    }

    #[test]
    fn repeated_calls_are_identical() {
        let b = sample();
        let p = vec!["sub".to_string()];
        assert_eq!(b.list(&p).unwrap(), b.list(&p).unwrap());
    }
}
