//! ZIP backend (§4.2): entries partition into directories (explicit or
//! inferred from path prefixes) and files; `mtime` from the entry header,
//! `content_type` guessed from the name's extension.
//!
//! Grounded on `zip` crate usage in `inakimalerba-OxiCloud` / `Koh0920-sync-rs`.

use std::io::Read;
use std::sync::Arc;
use std::time::SystemTime;

use zip::ZipArchive;

use crate::errors::{DavError, DavResult};
use crate::fs::tree::{Node, TreeBackend};
use crate::fs::{Backend, BackendErr};
use crate::util::calendar_to_systemtime;

fn entry_mtime(entry: &zip::read::ZipFile) -> SystemTime {
    let dt = entry.last_modified();
    match dt {
        Some(dt) => calendar_to_systemtime(
            dt.year() as i32,
            dt.month() as u8,
            dt.day(),
            dt.hour(),
            dt.minute(),
            dt.second(),
        ),
        None => SystemTime::now(),
    }
}

pub fn from_bytes(bytes: Vec<u8>) -> DavResult<Arc<dyn Backend>> {
    let cursor = std::io::Cursor::new(bytes);
    let mut archive = ZipArchive::new(cursor)
        .map_err(|e| DavError::Backend(BackendErr::Failure(format!("zip: {e}"))))?;

    let root_mtime = SystemTime::now();
    let mut root = Node::dir(root_mtime);

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| DavError::Backend(BackendErr::Failure(format!("zip: {e}"))))?;
        let name = entry.name().to_string();
        let is_dir = entry.is_dir();
        let mtime = entry_mtime(&entry);

        let segments: Vec<&str> = name.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            continue;
        }

        if is_dir {
            root.mkdirs(&segments, mtime);
        } else {
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry
                .read_to_end(&mut data)
                .map_err(|e| DavError::Backend(BackendErr::Failure(format!("zip: {e}"))))?;
            let content_type = mime_guess::from_path(&name)
                .first_raw()
                .unwrap_or("application/octet-stream")
                .to_string();
            let (dirs, file_name) = segments.split_at(segments.len() - 1);
            let parent = root.mkdirs(dirs, mtime);
            parent.insert(file_name[0], Node::file(data, content_type, mtime));
        }
    }

    Ok(Arc::new(TreeBackend::new(root, "zip")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_zip() -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut w = zip::ZipWriter::new(std::io::Cursor::new(&mut buf));
            let opts = zip::write::SimpleFileOptions::default();
            w.start_file("a.txt", opts).unwrap();
            w.write_all(b"hi\n").unwrap();
            w.start_file("sub/b.txt", opts).unwrap();
            w.write_all(b"12345").unwrap();
            w.finish().unwrap();
        }
        buf
    }

    #[test]
    fn s1_zip_root_layout() {
        let backend = from_bytes(sample_zip()).unwrap();
        let mut children = backend.list(&[]).unwrap();
        children.sort();
        assert_eq!(children, vec!["a.txt".to_string(), "sub".to_string()]);

        let a = backend.info(&["a.txt".to_string()]).unwrap();
        assert_eq!(a.size, Some(3));

        let sub = backend.info(&["sub".to_string()]).unwrap();
        assert!(sub.is_dir());

        let b = backend.get(&["sub".to_string(), "b.txt".to_string()]).unwrap();
        assert_eq!(b.len(), 5);
    }
}
