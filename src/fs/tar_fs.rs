//! TAR backend (§4.2), layered under `flate2`/`bzip2`/`xz2` for the
//! `.tar.gz`/`.tgz`, `.tar.bz2`, `.tar.xz` variants (grounded together in
//! `other_examples/manifests/aecs4u-rcompare` and `zanbaldwin-rawr`).
//!
//! `tar::Archive` is a forward-only stream over its reader, so — unlike ZIP,
//! which supports random access by index — the whole archive is read once
//! at construction into the same `Node` tree shape ZIP uses.

use std::io::Read;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::errors::{DavError, DavResult};
use crate::fs::tree::{Node, TreeBackend};
use crate::fs::{Backend, BackendErr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Bzip2,
    Xz,
}

fn decompress(bytes: &[u8], compression: Compression) -> DavResult<Vec<u8>> {
    let mut out = Vec::new();
    match compression {
        Compression::None => return Ok(bytes.to_vec()),
        Compression::Gzip => {
            flate2::read::GzDecoder::new(bytes)
                .read_to_end(&mut out)
                .map_err(|e| DavError::Backend(BackendErr::Failure(format!("gzip: {e}"))))?;
        }
        Compression::Bzip2 => {
            bzip2::read::BzDecoder::new(bytes)
                .read_to_end(&mut out)
                .map_err(|e| DavError::Backend(BackendErr::Failure(format!("bzip2: {e}"))))?;
        }
        Compression::Xz => {
            xz2::read::XzDecoder::new(bytes)
                .read_to_end(&mut out)
                .map_err(|e| DavError::Backend(BackendErr::Failure(format!("xz: {e}"))))?;
        }
    }
    Ok(out)
}

pub fn from_bytes(bytes: Vec<u8>, compression: Compression) -> DavResult<Arc<dyn Backend>> {
    let raw = decompress(&bytes, compression)?;
    let mut archive = tar::Archive::new(raw.as_slice());

    let root_mtime = SystemTime::now();
    let mut root = Node::dir(root_mtime);

    let entries = archive
        .entries()
        .map_err(|e| DavError::Backend(BackendErr::Failure(format!("tar: {e}"))))?;

    for entry in entries {
        let mut entry = entry.map_err(|e| DavError::Backend(BackendErr::Failure(format!("tar: {e}"))))?;
        let path = entry
            .path()
            .map_err(|e| DavError::Backend(BackendErr::Failure(format!("tar: {e}"))))?
            .to_string_lossy()
            .into_owned();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            continue;
        }

        let mtime = entry
            .header()
            .mtime()
            .ok()
            .map(|secs| UNIX_EPOCH + Duration::from_secs(secs))
            .unwrap_or(root_mtime);

        if entry.header().entry_type().is_dir() {
            root.mkdirs(&segments, mtime);
        } else if entry.header().entry_type().is_file() {
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry
                .read_to_end(&mut data)
                .map_err(|e| DavError::Backend(BackendErr::Failure(format!("tar: {e}"))))?;
            let content_type = mime_guess::from_path(&path)
                .first_raw()
                .unwrap_or("application/octet-stream")
                .to_string();
            let (dirs, file_name) = segments.split_at(segments.len() - 1);
            let parent = root.mkdirs(dirs, mtime);
            parent.insert(file_name[0], Node::file(data, content_type, mtime));
        }
    }

    Ok(Arc::new(TreeBackend::new(root, "tar")))
}

/// Pick the decompression layer from a filename, per the extension map
/// (§6: `.tar|.tar.gz|.tgz|.tar.bz2|.tar.xz→tar`).
pub fn compression_for_name(name: &str) -> Compression {
    let lower = name.to_ascii_lowercase();
    if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
        Compression::Gzip
    } else if lower.ends_with(".tar.bz2") {
        Compression::Bzip2
    } else if lower.ends_with(".tar.xz") {
        Compression::Xz
    } else {
        Compression::None
    }
}
