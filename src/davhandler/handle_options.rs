use http::Response;

use crate::body::Body;
use crate::errors::DavResult;
use crate::util::DavMethod;

impl crate::davhandler::DavHandler {
    /// OPTIONS always succeeds the same way, independent of the target
    /// resource: no write methods to vary by collection-vs-file (§4.3).
    pub(crate) fn handle_options(&self) -> DavResult<Response<Body>> {
        let res = Response::builder()
            .status(http::StatusCode::OK)
            .header("DAV", "1")
            .header("Allow", DavMethod::allow_header())
            .header("Content-Length", "0")
            .body(Body::empty())
            .unwrap();
        Ok(res)
    }
}
