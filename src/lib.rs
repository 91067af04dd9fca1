//! ## Read-only WebDAV over structured data
//!
//! `structdav` exposes a single structured data file — a ZIP or TAR
//! archive, a SQLite database, a JSON/CSV/INI/XML/TOML/HTML document, an
//! mbox mailbox, a Python source tree, or a live snapshot of host OS
//! info — as a browsable WebDAV filesystem. The mapping from native
//! structure to virtual paths is format-specific (§4.2); everything above
//! that line is one implementation of [`OPTIONS`/`GET`/`HEAD`/`PROPFIND`][DavHandler]
//! against a single [`Backend`] trait object.
//!
//! Every mutating verb (`PUT`, `DELETE`, `MKCOL`, `COPY`, `MOVE`, `LOCK`, …)
//! is rejected with `405 Method Not Allowed` — there is nothing to write
//! back into a ZIP entry or a SQLite row (§1 Non-goals).
//!
//! ## Layout
//!
//! - [`fs`]: the `Backend` trait and one adapter module per supported format.
//! - [`davpath`]: canonical virtual paths.
//! - [`davhandler`]: request dispatch — one `handle_*` function per verb.
//! - [`xmltree_ext`]: multistatus XML tree construction for PROPFIND.
//! - [`json_export`]: the `?json` subtree export.
//! - [`dispatch`]: extension-to-adapter resolution and CLI argument parsing.
//! - [`server`]: the `tiny_http` accept loop and worker threads.

pub mod body;
pub mod davhandler;
pub mod davpath;
pub mod dispatch;
pub mod errors;
pub mod fs;
pub mod json_export;
pub mod server;
pub mod util;
pub mod xmltree_ext;

pub use crate::davhandler::{DavBuilder, DavHandler};
pub use crate::errors::{DavError, DavResult};
pub use crate::fs::{Backend, BackendErr, BackendResult, Kind, ResourceInfo};
