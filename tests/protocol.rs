//! Cross-cutting protocol tests (spec.md §8: properties 7-11, scenarios
//! S5-S6) — the behaviors that belong to `DavHandler` itself rather than
//! to any one backend adapter, so they're exercised here against the
//! in-memory reference backend instead of inside a single `fs/*.rs` module.

use http::{Request, StatusCode};
use structdav::fs::memory::{self, Entry};
use structdav::DavHandler;

fn handler() -> DavHandler {
    let backend = memory::new(Entry::Dir(vec![
        ("a.txt", Entry::File(b"hi\n".to_vec(), "text/plain")),
        (
            "sub",
            Entry::Dir(vec![("b.txt", Entry::File(vec![0u8; 5], "text/plain"))]),
        ),
    ]));
    DavHandler::builder(backend).build()
}

fn req(method: &str, path: &str) -> Request<()> {
    Request::builder().method(method).uri(path).body(()).unwrap()
}

#[test]
fn options_advertises_exactly_four_verbs() {
    let h = handler();
    let resp = h.handle(&req("OPTIONS", "*"), b"");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("DAV").unwrap(), "1");
    assert_eq!(resp.headers().get("Allow").unwrap(), "OPTIONS, GET, HEAD, PROPFIND");
}

#[test]
fn disallowed_verbs_get_405_with_matching_allow_header() {
    let h = handler();
    for verb in ["PUT", "DELETE", "MKCOL", "PROPPATCH", "MOVE", "COPY", "LOCK", "UNLOCK", "PATCH"] {
        let resp = h.handle(&req(verb, "/a.txt"), b"ignored");
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED, "verb {verb}");
        assert_eq!(resp.headers().get("Allow").unwrap(), "OPTIONS, GET, HEAD, PROPFIND");
    }
}

#[test]
fn put_does_not_mutate_the_backend() {
    let h = handler();
    let before = h.handle(&req("GET", "/"), b"");
    h.handle(&req("PUT", "/new.txt"), b"whatever");
    let after = h.handle(&req("GET", "/"), b"");
    assert_eq!(before.into_body().as_slice(), after.into_body().as_slice());
}

#[test]
fn head_matches_get_headers_with_empty_body() {
    let h = handler();
    let get_resp = h.handle(&req("GET", "/a.txt"), b"");
    let head_resp = h.handle(&req("HEAD", "/a.txt"), b"");
    assert_eq!(get_resp.status(), head_resp.status());
    assert_eq!(get_resp.headers().get("Content-Length"), head_resp.headers().get("Content-Length"));
    assert_eq!(get_resp.headers().get("Content-Type"), head_resp.headers().get("Content-Type"));
    assert!(head_resp.into_body().is_empty());
    assert_eq!(get_resp.into_body().as_slice(), b"hi\n");
}

#[test]
fn missing_path_get_is_404() {
    let h = handler();
    let resp = h.handle(&req("GET", "/does/not/exist"), b"");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[test]
fn missing_path_propfind_is_207_with_404_propstat() {
    let h = handler();
    let req = Request::builder()
        .method("PROPFIND")
        .uri("/does/not/exist")
        .header("Depth", "0")
        .body(())
        .unwrap();
    let resp = h.handle(&req, b"");
    assert_eq!(resp.status().as_u16(), 207);
    let body = String::from_utf8(resp.into_body().into_bytes().to_vec()).unwrap();
    assert!(body.contains("404"));
}

#[test]
fn dotdot_and_nul_paths_are_400_before_touching_backend() {
    let h = handler();
    let resp = h.handle(&req("GET", "/../etc/passwd"), b"");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = h.handle(&req("GET", "/a%00b"), b"");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn json_export_round_trips_a_nested_document() {
    let backend = structdav::fs::json_fs::new(serde_json::json!({"k": 42, "sub": {"x": "y"}}));
    let h = DavHandler::builder(backend).build();
    let resp = h.handle(&req("GET", "/?json"), b"");
    assert_eq!(resp.status(), StatusCode::OK);
    let value: serde_json::Value = serde_json::from_slice(resp.into_body().as_slice()).unwrap();
    assert_eq!(value["k"], 42);
    assert_eq!(value["sub"]["x"], "y");
}
