//! The backend contract (§4.1): a narrow `{info, list, get, close}` capability
//! set implemented by one module per supported data format.
//!
//! Grounded on the teacher's `DavFileSystem`/`DavMetaData` trait split
//! (`other_examples/bb70a8eb_audebert-dav-server-rs__src-fs.rs.rs`), trimmed
//! to the read-only subset this system needs and flattened from an
//! open-file-handle model to a single in-memory `ResourceInfo` struct, since
//! every backend here materialises its whole tree up front.

use std::fmt;
use std::time::SystemTime;

pub mod csv_fs;
pub mod html_fs;
pub mod ini_fs;
pub mod json_fs;
pub mod mailbox_fs;
pub mod memory;
pub mod osinfo;
pub mod source_ast;
pub mod sqlite_fs;
pub mod tar_fs;
pub mod toml_fs;
pub mod tree;
pub mod xml_fs;
pub mod zip_fs;

/// Kind of a resource, mirrors `DavMetaData::is_dir`/`is_file` but as a plain enum
/// since every backend here answers `info()` from an already-built index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Directory,
    File,
}

/// The descriptor returned by `Backend::info` (§3).
#[derive(Debug, Clone)]
pub struct ResourceInfo {
    pub kind: Kind,
    /// Byte length of the file body. Always `None` for directories.
    pub size: Option<u64>,
    pub mtime: SystemTime,
    /// MIME type. Always `None` for directories.
    pub content_type: Option<String>,
}

impl ResourceInfo {
    pub fn directory(mtime: SystemTime) -> ResourceInfo {
        ResourceInfo {
            kind: Kind::Directory,
            size: None,
            mtime,
            content_type: None,
        }
    }

    pub fn file(size: u64, mtime: SystemTime, content_type: impl Into<String>) -> ResourceInfo {
        ResourceInfo {
            kind: Kind::File,
            size: Some(size),
            mtime,
            content_type: Some(content_type.into()),
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == Kind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == Kind::File
    }
}

/// Errors a backend can report. Never confused with each other (§4.1):
/// a missing path is always `NotFound`, anything else is `Failure`.
#[derive(Debug, Clone)]
pub enum BackendErr {
    NotFound,
    Failure(String),
}

pub type BackendResult<T> = std::result::Result<T, BackendErr>;

impl fmt::Display for BackendErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendErr::NotFound => write!(f, "not found"),
            BackendErr::Failure(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for BackendErr {}

/// A canonical virtual path: an ordered sequence of non-empty segments.
/// `&[]` is the root.
pub type Segments<'a> = &'a [String];

/// The backend contract (§4.1). Implementors hold their own interior
/// mutability (a `parking_lot::Mutex` around a non-thread-safe native
/// reader, or nothing at all for pure immutable indices) — see §5 and §9.
pub trait Backend: Send + Sync {
    /// Classify a path. Must not perform heavy work (§4.1) — adapters that
    /// can't answer in near-constant time precompute an index at construction.
    fn info(&self, path: Segments) -> BackendResult<ResourceInfo>;

    /// List the direct children of a directory, in a stable order.
    fn list(&self, path: Segments) -> BackendResult<Vec<String>>;

    /// Read the full body of a file.
    fn get(&self, path: Segments) -> BackendResult<Vec<u8>>;

    /// Release any held resources. Idempotent; a no-op default for backends
    /// that hold nothing (§4.1).
    fn close(&self) {}

    /// Human readable name used in 500 response bodies (§7).
    fn name(&self) -> &'static str;
}
