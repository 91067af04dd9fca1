//! GET / HEAD, including the `?json` subtree export (§4.3, §4.4).

use http::{Request, Response, StatusCode};

use crate::body::Body;
use crate::davpath::DavPath;
use crate::errors::DavResult;
use crate::fs::Kind;
use crate::json_export::export_subtree;
use crate::util::{systemtime_to_rfc1123, DavMethod};

/// Largest chunk the dispatch shell reads at once when streaming a GET body
/// to the client socket. Kept as a named constant in the teacher's style
/// (`handle_gethead::READ_BUF_SIZE`), even though every body here is fully
/// materialised before the constant comes into play.
pub const READ_BUF_SIZE: usize = 64 * 1024;

fn wants_json(req: &Request<()>) -> bool {
    req.uri()
        .query()
        .map(|q| q.split('&').any(|kv| kv == "json" || kv.starts_with("json=")))
        .unwrap_or(false)
}

fn directory_index_html(path: &DavPath, children: &[String]) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html><head><title>Index of ");
    html.push_str(&htmlescape::encode_minimal(&path.display_name()));
    html.push_str("</title></head><body>\n<h1>Index of ");
    html.push_str(&htmlescape::encode_minimal(&path.display_name()));
    html.push_str("</h1>\n<ul>\n");
    if !path.is_root() {
        html.push_str("<li><a href=\"../\">../</a></li>\n");
    }
    for name in children {
        let href = htmlescape::encode_minimal(name);
        html.push_str(&format!("<li><a href=\"{href}\">{href}</a></li>\n"));
    }
    html.push_str("</ul>\n</body></html>\n");
    html
}

impl crate::davhandler::DavHandler {
    pub(crate) fn handle_gethead(
        &self,
        req: &Request<()>,
        path: &DavPath,
        method: DavMethod,
    ) -> DavResult<Response<Body>> {
        let segments = path.segments();
        let info = self.backend.info(segments)?;

        let mut builder = Response::builder().status(StatusCode::OK);
        builder = builder.header("Last-Modified", systemtime_to_rfc1123(info.mtime));

        let body: Body = match info.kind {
            Kind::Directory => {
                if wants_json(req) {
                    let value = export_subtree(self.backend.as_ref(), segments, 1024)?;
                    builder = builder.header("Content-Type", "application/json");
                    Body::from(serde_json::to_vec(&value).unwrap_or_default())
                } else {
                    let children = self.backend.list(segments)?;
                    builder = builder.header("Content-Type", "text/html; charset=utf-8");
                    Body::from(directory_index_html(path, &children))
                }
            }
            Kind::File => {
                let content_type = info
                    .content_type
                    .clone()
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                builder = builder.header("Content-Type", content_type);
                let data = self.backend.get(segments)?;
                Body::from(data)
            }
        };

        builder = builder.header("Content-Length", body.len().to_string());

        let body = if method == DavMethod::HEAD {
            Body::empty()
        } else {
            body
        };

        Ok(builder.body(body).unwrap())
    }
}
