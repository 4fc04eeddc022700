//! Response-side context.
//!
//! Handlers share write access to one response per request. The first
//! `send` wins; later writes are ignored and logged at debug level, so a
//! late handler cannot clobber a response that already went out.

use std::sync::{Arc, Mutex};

use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};

/// Materialized response state.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
    sent: bool,
}

impl Response {
    fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: String::new(),
            sent: false,
        }
    }

    pub fn is_sent(&self) -> bool {
        self.sent
    }
}

/// Shared handle giving every handler in a traversal write access to the
/// same response.
#[derive(Debug, Clone)]
pub struct ResponseHandle {
    inner: Arc<Mutex<Response>>,
}

impl ResponseHandle {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Response::new())),
        }
    }

    /// Write status and body. Returns false if a response was already sent.
    pub fn send(&self, status: StatusCode, body: impl Into<String>) -> bool {
        let mut response = self.inner.lock().unwrap();
        if response.sent {
            tracing::debug!(status = %status, "response already sent; write ignored");
            return false;
        }
        response.status = status;
        response.body = body.into();
        response.sent = true;
        true
    }

    pub fn set_header(&self, name: HeaderName, value: HeaderValue) {
        self.inner.lock().unwrap().headers.insert(name, value);
    }

    pub fn is_sent(&self) -> bool {
        self.inner.lock().unwrap().sent
    }

    /// Clone out the current response state.
    pub fn snapshot(&self) -> Response {
        self.inner.lock().unwrap().clone()
    }
}

impl Default for ResponseHandle {
    fn default() -> Self {
        Self::new()
    }
}
