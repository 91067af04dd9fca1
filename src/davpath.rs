//! Canonical virtual paths (§3, §9 "Path representation").
//!
//! The teacher crate threads a `DavPath` through every handler
//! (`DavPath::from_uri_and_prefix`, `path.parent()`, `path.is_collection()`)
//! but the type itself wasn't part of the retrieved file set. Rebuilt here
//! along the same lines: parse once at the HTTP boundary, carry a plain
//! `Vec<String>` of segments internally, and only go back to URL form when
//! rendering an `href` or `Content-Location`.

use http::StatusCode;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

use crate::errors::{DavError, DavResult};

const FRAGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// An ordered, non-empty-segment virtual path. The empty sequence is the root.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DavPath {
    segments: Vec<String>,
}

impl DavPath {
    pub fn root() -> DavPath {
        DavPath { segments: Vec::new() }
    }

    /// Canonicalise a raw request path (already stripped of scheme/authority
    /// and of any `?query`) into a `DavPath`.
    ///
    /// Percent-decodes, splits on `/`, drops empty segments from leading,
    /// trailing, or doubled separators, and rejects `.`/`..` segments and
    /// embedded NUL bytes with 400 (§3).
    pub fn parse(raw_path: &str) -> DavResult<DavPath> {
        let decoded = percent_decode_str(raw_path)
            .decode_utf8()
            .map_err(|_| DavError::Status(StatusCode::BAD_REQUEST))?;

        if decoded.contains('\0') {
            return Err(DavError::Status(StatusCode::BAD_REQUEST));
        }

        let mut segments = Vec::new();
        for seg in decoded.split('/') {
            if seg.is_empty() {
                continue;
            }
            if seg == "." || seg == ".." {
                return Err(DavError::Status(StatusCode::BAD_REQUEST));
            }
            segments.push(seg.to_string());
        }
        Ok(DavPath { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The parent path. The root is its own parent.
    pub fn parent(&self) -> DavPath {
        if self.segments.is_empty() {
            DavPath::root()
        } else {
            DavPath {
                segments: self.segments[..self.segments.len() - 1].to_vec(),
            }
        }
    }

    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(|s| s.as_str())
    }

    pub fn child(&self, name: &str) -> DavPath {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        DavPath { segments }
    }

    /// `displayname` per §4.3: last segment, or `/` for the root.
    pub fn display_name(&self) -> String {
        match self.last() {
            Some(name) => name.to_string(),
            None => "/".to_string(),
        }
    }

    /// Absolute URL path with percent-encoded segments and a leading `/`.
    /// Directories get a trailing `/`.
    pub fn as_href(&self, is_dir: bool) -> String {
        let mut s = String::from("/");
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                s.push('/');
            }
            s.push_str(&utf8_percent_encode(seg, FRAGMENT).to_string());
        }
        if is_dir && !self.segments.is_empty() {
            s.push('/');
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_is_empty() {
        assert!(DavPath::parse("/").unwrap().is_root());
        assert!(DavPath::parse("").unwrap().is_root());
    }

    #[test]
    fn drops_doubled_and_trailing_slashes() {
        let p = DavPath::parse("//a//b/").unwrap();
        assert_eq!(p.segments(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn rejects_dotdot() {
        assert!(DavPath::parse("/a/../b").is_err());
        assert!(DavPath::parse("/..").is_err());
    }

    #[test]
    fn rejects_nul() {
        assert!(DavPath::parse("/a\0b").is_err());
    }

    #[test]
    fn percent_decodes() {
        let p = DavPath::parse("/a%20b").unwrap();
        assert_eq!(p.segments(), &["a b".to_string()]);
    }

    #[test]
    fn href_roundtrips_encoding() {
        let p = DavPath::parse("/a%20b").unwrap();
        assert_eq!(p.as_href(false), "/a%20b");
    }

    #[test]
    fn parent_of_root_is_root() {
        assert_eq!(DavPath::root().parent(), DavPath::root());
    }
}
