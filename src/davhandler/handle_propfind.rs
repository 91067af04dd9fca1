//! PROPFIND (§4.4): walk the backend tree to the requested `Depth` and
//! report the five standard properties for every resource visited, as a
//! `207 Multistatus` response.
//!
//! `Depth: infinity` walks with an explicit stack rather than recursion
//! (DESIGN NOTES §9, the same discipline `json_export` uses for `?json`),
//! bounded by the same depth cap so a pathologically deep backend fails
//! cleanly instead of exhausting the native call stack.

use http::{Request, Response, StatusCode};
use xmltree::Element;

use crate::body::Body;
use crate::davpath::DavPath;
use crate::errors::{DavError, DavResult};
use crate::fs::{BackendErr, Kind, ResourceInfo};
use crate::util::systemtime_to_rfc1123;
use crate::xmltree_ext::{empty_element, parent, render, response_error, response_found, response_not_found, text_element, multistatus};

const MAX_DEPTH: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Depth {
    Zero,
    One,
    Infinity,
}

fn parse_depth(req: &Request<()>) -> DavResult<Depth> {
    match req.headers().get("depth").and_then(|v| v.to_str().ok()) {
        None => Ok(Depth::Infinity),
        Some(v) if v.eq_ignore_ascii_case("0") => Ok(Depth::Zero),
        Some(v) if v.eq_ignore_ascii_case("1") => Ok(Depth::One),
        Some(v) if v.eq_ignore_ascii_case("infinity") => Ok(Depth::Infinity),
        Some(_) => Err(DavError::Status(StatusCode::BAD_REQUEST)),
    }
}

fn property_elements(info: &ResourceInfo, display_name: &str) -> Vec<Element> {
    let mut props = vec![
        text_element("D:displayname", display_name.to_string()),
        text_element("D:getlastmodified", systemtime_to_rfc1123(info.mtime)),
    ];
    match info.kind {
        Kind::Directory => {
            props.push(parent("D:resourcetype", vec![empty_element("D:collection")]));
        }
        Kind::File => {
            props.push(empty_element("D:resourcetype"));
            props.push(text_element(
                "D:getcontentlength",
                info.size.unwrap_or(0).to_string(),
            ));
            props.push(text_element(
                "D:getcontenttype",
                info.content_type.clone().unwrap_or_else(|| "application/octet-stream".to_string()),
            ));
        }
    }
    props
}

impl crate::davhandler::DavHandler {
    pub(crate) fn handle_propfind(
        &self,
        req: &Request<()>,
        path: &DavPath,
        _body: &[u8],
    ) -> DavResult<Response<Body>> {
        let depth = parse_depth(req)?;

        // A missing PROPFIND target is still a 207 (§4.3, scenario S6): the
        // single response just carries a 404 propstat instead of properties.
        let root_info = match self.backend.info(path.segments()) {
            Ok(info) => info,
            Err(BackendErr::NotFound) => {
                let xml = render(&multistatus(vec![response_not_found(&path.as_href(false))]));
                let body = format!("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n{xml}");
                return Ok(Response::builder()
                    .status(StatusCode::from_u16(207).unwrap())
                    .header("Content-Type", "application/xml; charset=utf-8")
                    .header("Content-Length", body.len().to_string())
                    .body(Body::from(body))
                    .unwrap());
            }
            Err(e) => return Err(e.into()),
        };

        let mut responses = vec![response_found(
            &path.as_href(root_info.is_dir()),
            property_elements(&root_info, &path.display_name()),
        )];

        if depth != Depth::Zero && root_info.is_dir() {
            self.collect_children(path, depth, &mut responses)?;
        }

        let xml = render(&multistatus(responses));
        let body = format!("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n{xml}");

        Ok(Response::builder()
            .status(StatusCode::from_u16(207).unwrap())
            .header("Content-Type", "application/xml; charset=utf-8")
            .header("Content-Length", body.len().to_string())
            .body(Body::from(body))
            .unwrap())
    }

    /// Depth 1 visits only direct children; Depth infinity walks the whole
    /// subtree with an explicit work stack of paths still to expand.
    fn collect_children(&self, root: &DavPath, depth: Depth, out: &mut Vec<Element>) -> DavResult<()> {
        let mut frontier = vec![root.clone()];
        let mut visited_levels = 0usize;

        loop {
            if frontier.is_empty() {
                break;
            }
            if visited_levels > MAX_DEPTH {
                return Err(DavError::Backend(BackendErr::Failure(format!(
                    "PROPFIND traversal exceeded max depth of {MAX_DEPTH}"
                ))));
            }

            let mut next_frontier = Vec::new();
            for dir in &frontier {
                // A backend failure enumerating one directory only costs
                // that directory's children a 500 propstat each (§7); it
                // must not fail the whole multistatus.
                let names = match self.backend.list(dir.segments()) {
                    Ok(names) => names,
                    Err(BackendErr::NotFound) => continue,
                    Err(BackendErr::Failure(_)) => {
                        out.push(response_error(&dir.as_href(true)));
                        continue;
                    }
                };
                for name in names {
                    let child = dir.child(&name);
                    match self.backend.info(child.segments()) {
                        Ok(info) => {
                            out.push(response_found(&child.as_href(info.is_dir()), property_elements(&info, &child.display_name())));
                            if info.is_dir() && depth == Depth::Infinity {
                                next_frontier.push(child);
                            }
                        }
                        Err(BackendErr::NotFound) => {
                            out.push(response_not_found(&child.as_href(false)));
                        }
                        Err(BackendErr::Failure(_)) => {
                            out.push(response_error(&child.as_href(false)));
                        }
                    }
                }
            }

            if depth == Depth::One {
                break;
            }
            frontier = next_frontier;
            visited_levels += 1;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::davhandler::DavHandler;
    use crate::fs::memory::{self, Entry};

    fn handler() -> DavHandler {
        let backend = memory::new(Entry::Dir(vec![
            ("a.txt", Entry::File(b"hi\n".to_vec(), "text/plain")),
            ("sub", Entry::Dir(vec![("b.txt", Entry::File(vec![0u8; 5], "text/plain"))])),
        ]));
        DavHandler::builder(backend).build()
    }

    fn propfind_request(depth: Option<&str>) -> Request<()> {
        let mut builder = Request::builder().method("PROPFIND").uri("/");
        if let Some(d) = depth {
            builder = builder.header("Depth", d);
        }
        builder.body(()).unwrap()
    }

    #[test]
    fn depth_zero_reports_only_root() {
        let h = handler();
        let req = propfind_request(Some("0"));
        let resp = h.handle_propfind(&req, &DavPath::root(), b"").unwrap();
        assert_eq!(resp.status().as_u16(), 207);
        let body = String::from_utf8(resp.into_body().into_bytes().to_vec()).unwrap();
        assert_eq!(body.matches("D:response").count(), 2); // open+close tag
    }

    #[test]
    fn depth_one_reports_direct_children() {
        let h = handler();
        let req = propfind_request(Some("1"));
        let resp = h.handle_propfind(&req, &DavPath::root(), b"").unwrap();
        let body = String::from_utf8(resp.into_body().into_bytes().to_vec()).unwrap();
        assert!(body.contains("a.txt"));
        assert!(body.contains("sub"));
        assert!(!body.contains("b.txt"));
    }

    #[test]
    fn depth_infinity_reports_whole_subtree() {
        let h = handler();
        let req = propfind_request(None);
        let resp = h.handle_propfind(&req, &DavPath::root(), b"").unwrap();
        let body = String::from_utf8(resp.into_body().into_bytes().to_vec()).unwrap();
        assert!(body.contains("b.txt"));
    }

    #[test]
    fn invalid_depth_is_bad_request() {
        let h = handler();
        let req = propfind_request(Some("7"));
        assert!(h.handle_propfind(&req, &DavPath::root(), b"").is_err());
    }

    #[test]
    fn missing_target_is_207_with_a_single_404_propstat() {
        let h = handler();
        let req = propfind_request(Some("0"));
        let path = DavPath::parse("/does/not/exist").unwrap();
        let resp = h.handle_propfind(&req, &path, b"").unwrap();
        assert_eq!(resp.status().as_u16(), 207);
        let body = String::from_utf8(resp.into_body().into_bytes().to_vec()).unwrap();
        assert_eq!(body.matches("D:response").count(), 2);
        assert!(body.contains("404"));
    }
}
