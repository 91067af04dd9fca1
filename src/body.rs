//! The response body type.
//!
//! The teacher's `Body` wraps either a single `Bytes` buffer or a live
//! `Stream`, because its handlers can serve arbitrarily large files over a
//! long-lived async connection. Nothing here ever streams (§1 Non-goals:
//! "responses are fully materialised before transmission"), so `Body` is
//! just an owned buffer — but it keeps the teacher's `empty()`/`From`
//! constructors so the handler code that builds responses reads the same
//! way it did in the teacher.

use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct Body {
    bytes: Bytes,
}

impl Body {
    pub fn empty() -> Body {
        Body { bytes: Bytes::new() }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<String> for Body {
    fn from(t: String) -> Body {
        Body { bytes: Bytes::from(t) }
    }
}

impl From<&str> for Body {
    fn from(t: &str) -> Body {
        Body {
            bytes: Bytes::from(t.to_string()),
        }
    }
}

impl From<Vec<u8>> for Body {
    fn from(t: Vec<u8>) -> Body {
        Body { bytes: Bytes::from(t) }
    }
}

impl From<Bytes> for Body {
    fn from(t: Bytes) -> Body {
        Body { bytes: t }
    }
}
