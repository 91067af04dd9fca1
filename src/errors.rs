//! Error types shared between the backend layer and the protocol frontend.

use std::fmt;

use http::StatusCode;

use crate::fs::BackendErr;

/// Top level error type returned by request handling.
///
/// Mirrors the shape of the original `DavError`: most variants carry enough
/// information to pick an HTTP status code, a few wrap a lower layer.
#[derive(Debug)]
pub enum DavError {
    /// The request could not even be parsed (bad URL, bad method, bad XML body).
    Status(StatusCode),
    /// The backend failed to answer the request.
    Backend(BackendErr),
    /// Low level I/O error while talking to the client.
    Io(std::io::Error),
}

pub type DavResult<T> = std::result::Result<T, DavError>;

impl DavError {
    /// HTTP status code this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            DavError::Status(s) => *s,
            DavError::Backend(BackendErr::NotFound) => StatusCode::NOT_FOUND,
            DavError::Backend(BackendErr::Failure(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            DavError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for DavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DavError::Status(s) => write!(f, "{}", s),
            DavError::Backend(e) => write!(f, "{}", e),
            DavError::Io(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for DavError {}

impl From<StatusCode> for DavError {
    fn from(s: StatusCode) -> DavError {
        DavError::Status(s)
    }
}

impl From<BackendErr> for DavError {
    fn from(e: BackendErr) -> DavError {
        DavError::Backend(e)
    }
}

impl From<std::io::Error> for DavError {
    fn from(e: std::io::Error) -> DavError {
        DavError::Io(e)
    }
}
