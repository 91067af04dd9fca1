//! Mbox mailbox backend (§4.2): each message becomes a flat
//! `NNNN_<sanitised subject>.eml` file holding the message's raw source.
//!
//! Mbox message boundaries (lines starting with `From ` at column 0) are
//! hand-rolled, since no crate in the corpus parses mbox framing; the
//! message bodies themselves are handed to `mail-parser` only to pull out
//! the `Subject` header for naming.

use std::sync::Arc;
use std::time::SystemTime;

use mail_parser::MessageParser;

use crate::errors::DavResult;
use crate::fs::tree::{Node, TreeBackend};
use crate::fs::Backend;

/// Split raw mbox bytes into the raw source of each contained message.
fn split_messages(bytes: &[u8]) -> Vec<&[u8]> {
    let mut starts = Vec::new();
    let mut at_line_start = true;
    for (i, &b) in bytes.iter().enumerate() {
        if at_line_start && bytes[i..].starts_with(b"From ") {
            starts.push(i);
        }
        at_line_start = b == b'\n';
    }
    if starts.is_empty() {
        return if bytes.is_empty() { Vec::new() } else { vec![bytes] };
    }
    let mut out = Vec::with_capacity(starts.len());
    for w in starts.windows(2) {
        out.push(&bytes[w[0]..w[1]]);
    }
    out.push(&bytes[*starts.last().unwrap()..]);
    out
}

fn sanitise(subject: &str) -> String {
    let cleaned: String = subject
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let trimmed = cleaned.trim_matches('_');
    let s = if trimmed.is_empty() { "no_subject" } else { trimmed };
    s.chars().take(64).collect()
}

pub fn from_bytes(bytes: &[u8]) -> DavResult<Arc<dyn Backend>> {
    let mtime = SystemTime::now();
    let mut root = Node::dir(mtime);
    let parser = MessageParser::default();

    for (i, raw) in split_messages(bytes).into_iter().enumerate() {
        let subject = parser
            .parse(raw)
            .and_then(|m| m.subject().map(str::to_string))
            .unwrap_or_default();
        let name = format!("{:04}_{}.eml", i, sanitise(&subject));
        root.insert(name, Node::file(raw.to_vec(), "message/rfc822", mtime));
    }

    Ok(Arc::new(TreeBackend::new(root, "mailbox")))
}
