//! Shared plumbing for every adapter that precomputes its whole path tree
//! once at construction (§4.1: "adapters that cannot answer in near-constant
//! time must precompute an index at construction"). Memory, ZIP, TAR, JSON,
//! CSV, INI, XML, TOML, HTML, Mailbox and Source-AST all reduce to: parse
//! the native format once, build a `Node` tree, and answer `info`/`list`/
//! `get` by walking it. SQLite and OS-info don't use this — they answer
//! live against a native handle (§9).

use std::collections::BTreeMap;
use std::time::SystemTime;

use crate::fs::{Backend, BackendErr, BackendResult, ResourceInfo};

#[derive(Clone)]
pub enum Node {
    File {
        data: Vec<u8>,
        content_type: String,
        mtime: SystemTime,
    },
    Dir {
        children: BTreeMap<String, Node>,
        mtime: SystemTime,
    },
}

impl Node {
    pub fn dir(mtime: SystemTime) -> Node {
        Node::Dir {
            children: BTreeMap::new(),
            mtime,
        }
    }

    pub fn file(data: impl Into<Vec<u8>>, content_type: impl Into<String>, mtime: SystemTime) -> Node {
        Node::File {
            data: data.into(),
            content_type: content_type.into(),
            mtime,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Node::Dir { .. })
    }

    /// Insert `name` as a direct child, only valid if `self` is a directory.
    /// Panics if called on a file — adapters build trees bottom-up from
    /// their own parse, so this is a programmer error, not a runtime one.
    pub fn insert(&mut self, name: impl Into<String>, child: Node) {
        match self {
            Node::Dir { children, .. } => {
                children.insert(name.into(), child);
            }
            Node::File { .. } => panic!("tried to insert a child into a file node"),
        }
    }

    /// Fetch (creating intermediate directories as needed) the directory at
    /// `segments` relative to `self`, for adapters that synthesise
    /// directories from flat entry paths (ZIP/TAR entry prefixes).
    pub fn mkdirs<S: AsRef<str>>(&mut self, segments: &[S], mtime: SystemTime) -> &mut Node {
        let mut cur = self;
        for seg in segments {
            let children = match cur {
                Node::Dir { children, .. } => children,
                Node::File { .. } => panic!("mkdirs through a file node"),
            };
            cur = children
                .entry(seg.as_ref().to_string())
                .or_insert_with(|| Node::dir(mtime));
        }
        cur
    }
}

/// A `Backend` over a precomputed `Node` tree.
pub struct TreeBackend {
    root: Node,
    name: &'static str,
}

impl TreeBackend {
    pub fn new(root: Node, name: &'static str) -> TreeBackend {
        TreeBackend { root, name }
    }

    fn navigate(&self, path: &[String]) -> Option<&Node> {
        let mut cur = &self.root;
        for seg in path {
            match cur {
                Node::Dir { children, .. } => cur = children.get(seg)?,
                Node::File { .. } => return None,
            }
        }
        Some(cur)
    }
}

impl Backend for TreeBackend {
    fn info(&self, path: &[String]) -> BackendResult<ResourceInfo> {
        let node = self.navigate(path).ok_or(BackendErr::NotFound)?;
        Ok(match node {
            Node::Dir { mtime, .. } => ResourceInfo::directory(*mtime),
            Node::File { data, content_type, mtime } => {
                ResourceInfo::file(data.len() as u64, *mtime, content_type.clone())
            }
        })
    }

    fn list(&self, path: &[String]) -> BackendResult<Vec<String>> {
        match self.navigate(path).ok_or(BackendErr::NotFound)? {
            Node::Dir { children, .. } => Ok(children.keys().cloned().collect()),
            Node::File { .. } => Err(BackendErr::NotFound),
        }
    }

    fn get(&self, path: &[String]) -> BackendResult<Vec<u8>> {
        match self.navigate(path).ok_or(BackendErr::NotFound)? {
            Node::File { data, .. } => Ok(data.clone()),
            Node::Dir { .. } => Err(BackendErr::NotFound),
        }
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
