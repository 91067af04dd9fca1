//
// This module contains the main entry point of the library: DavHandler.
// Adapted from the teacher's davhandler/mod.rs — same builder/handler split
// and per-verb submodule layout, but synchronous (no `Arc<dyn Future>`
// dispatch machinery) and over a fixed four-verb method set.
//
use std::sync::Arc;

use http::{Request, Response, StatusCode};
use log::debug;

use crate::body::Body;
use crate::davpath::DavPath;
use crate::errors::{DavError, DavResult};
use crate::fs::Backend;
use crate::util::{dav_method, DavMethod};

pub mod handle_gethead;
pub mod handle_options;
pub mod handle_propfind;

/// Configuration of the handler.
#[derive(Clone)]
pub struct DavBuilder {
    backend: Arc<dyn Backend>,
}

impl DavBuilder {
    pub fn new(backend: Arc<dyn Backend>) -> DavBuilder {
        DavBuilder { backend }
    }

    pub fn build(self) -> DavHandler {
        DavHandler {
            backend: self.backend,
        }
    }
}

/// The webdav handler. Cheap to clone (one `Arc`) so each connection worker
/// can own its copy (§5: "backend handle ... immutable after construction").
#[derive(Clone)]
pub struct DavHandler {
    pub(crate) backend: Arc<dyn Backend>,
}

impl DavHandler {
    pub fn builder(backend: Arc<dyn Backend>) -> DavBuilder {
        DavBuilder::new(backend)
    }

    /// Handle one already-parsed request. This is the synchronous
    /// equivalent of the teacher's `handle`/`handle_inner` pair: translate
    /// errors into a response, never let one escape to the caller.
    pub fn handle(&self, req: &Request<()>, body: &[u8]) -> Response<Body> {
        match self.handle_inner(req, body) {
            Ok(resp) => {
                debug!("== END REQUEST result OK");
                resp
            }
            Err(err) => {
                debug!("== END REQUEST result {:?}", err);
                let mut builder = Response::builder()
                    .status(err.status_code())
                    .header("content-type", "text/plain; charset=utf-8");
                if err.status_code() == StatusCode::METHOD_NOT_ALLOWED {
                    builder = builder.header("Allow", DavMethod::allow_header());
                }
                builder.body(Body::from(err.to_string())).unwrap()
            }
        }
    }

    fn handle_inner(&self, req: &Request<()>, body: &[u8]) -> DavResult<Response<Body>> {
        let method = match dav_method(req.method().as_str()) {
            Some(m) => m,
            None => {
                debug!("refusing method {} on {}", req.method(), req.uri());
                return Err(DavError::Status(StatusCode::METHOD_NOT_ALLOWED));
            }
        };

        let path = DavPath::parse(req.uri().path())?;

        debug!("== START REQUEST {:?} {}", method, req.uri());

        match method {
            DavMethod::OPTIONS => self.handle_options(),
            DavMethod::PROPFIND => self.handle_propfind(req, &path, body),
            DavMethod::HEAD | DavMethod::GET => self.handle_gethead(req, &path, method),
            _ => unreachable!("dav_method only returns the four matched verbs"),
        }
    }
}
