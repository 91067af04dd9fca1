//! The listener (§5): a `tiny_http` accept loop handing each connection to
//! a plain `std::thread::spawn` worker. No async runtime, no connection
//! pooling beyond what the OS already does — one thread per in-flight
//! request, same concurrency model the spec calls for.

use std::io::Read;
use std::sync::Arc;

use log::{debug, error, info, warn};

use crate::body::Body;
use crate::davhandler::DavHandler;
use crate::errors::DavResult;

/// Translate a `tiny_http::Request` into the `http::Request<()>` the
/// handler expects, reading the whole body up front (§1 Non-goals: no
/// streaming request or response bodies).
fn read_body(request: &mut tiny_http::Request) -> std::io::Result<Vec<u8>> {
    let mut body = Vec::new();
    request.as_reader().read_to_end(&mut body)?;
    Ok(body)
}

fn to_http_request(request: &tiny_http::Request) -> DavResult<http::Request<()>> {
    let mut builder = http::Request::builder()
        .method(request.method().as_str())
        .uri(request.url());
    for header in request.headers() {
        builder = builder.header(header.field.as_str().as_str(), header.value.as_str());
    }
    Ok(builder.body(())?)
}

fn respond(request: tiny_http::Request, response: http::Response<Body>) {
    let status = response.status().as_u16();
    let body = response.body().as_slice().to_vec();
    let mut tiny_response = tiny_http::Response::from_data(body).with_status_code(status);
    for (name, value) in response.headers().iter() {
        if let Ok(header) = tiny_http::Header::from_bytes(name.as_str().as_bytes(), value.as_bytes()) {
            tiny_response = tiny_response.with_header(header);
        }
    }
    if let Err(e) = request.respond(tiny_response) {
        warn!("failed to write response: {e}");
    }
}

fn handle_one(handler: &DavHandler, mut request: tiny_http::Request) {
    let body = match read_body(&mut request) {
        Ok(b) => b,
        Err(e) => {
            error!("failed to read request body: {e}");
            let _ = request.respond(tiny_http::Response::empty(400));
            return;
        }
    };

    let http_req = match to_http_request(&request) {
        Ok(r) => r,
        Err(e) => {
            debug!("malformed request: {e}");
            let _ = request.respond(tiny_http::Response::empty(400));
            return;
        }
    };

    let response = handler.handle(&http_req, &body);
    respond(request, response);
}

/// Run the accept loop on the current thread, spawning one worker thread
/// per request (§5). Never returns under normal operation.
pub fn serve(addr: &str, backend: Arc<dyn crate::fs::Backend>) -> std::io::Result<()> {
    let server = tiny_http::Server::http(addr).map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    info!("listening on {addr}");

    let handler = Arc::new(DavHandler::builder(backend).build());

    for request in server.incoming_requests() {
        let handler = Arc::clone(&handler);
        std::thread::spawn(move || handle_one(&handler, request));
    }

    Ok(())
}
