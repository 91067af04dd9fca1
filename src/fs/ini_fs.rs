//! INI backend (§4.2): sections become directories, keys become files
//! holding the raw value text. Keys outside any named section (the
//! implicit default section) land directly under the root.
//!
//! Built on the `ini` crate — not directly grounded in the retrieved
//! example pack, picked as the standard crates.io INI parser per
//! SPEC_FULL.md's allowance for ungrounded-but-real dependencies.

use std::sync::Arc;
use std::time::SystemTime;

use ini::Ini;

use crate::errors::{DavError, DavResult};
use crate::fs::tree::{Node, TreeBackend};
use crate::fs::{Backend, BackendErr};

pub fn from_bytes(bytes: &[u8]) -> DavResult<Arc<dyn Backend>> {
    let text = String::from_utf8_lossy(bytes);
    let conf = Ini::load_from_str(&text)
        .map_err(|e| DavError::Backend(BackendErr::Failure(format!("ini: {e}"))))?;

    let mtime = SystemTime::now();
    let mut root = Node::dir(mtime);

    for (section, props) in conf.iter() {
        match section {
            None => {
                for (key, value) in props.iter() {
                    root.insert(key, Node::file(value.as_bytes().to_vec(), "text/plain", mtime));
                }
            }
            Some(name) => {
                let mut dir = Node::dir(mtime);
                for (key, value) in props.iter() {
                    dir.insert(key, Node::file(value.as_bytes().to_vec(), "text/plain", mtime));
                }
                root.insert(name, dir);
            }
        }
    }

    Ok(Arc::new(TreeBackend::new(root, "ini")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] = b"root_key=1\n\n[server]\nhost=localhost\nport=8080\n";

    #[test]
    fn default_section_keys_land_at_root() {
        let b = from_bytes(SAMPLE).unwrap();
        assert_eq!(b.get(&["root_key".to_string()]).unwrap(), b"1");
    }

    #[test]
    fn named_section_becomes_a_directory() {
        let b = from_bytes(SAMPLE).unwrap();
        assert!(b.info(&["server".to_string()]).unwrap().is_dir());
        assert_eq!(
            b.get(&["server".to_string(), "host".to_string()]).unwrap(),
            b"localhost"
        );
    }
}
