//! Shared utilities for instrumentation integration tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use http::header::{HeaderValue, HOST};
use http::{Method, StatusCode};
use stallwatch::{DiagnosticSink, Handler, Next, Request, ResponseHandle};

/// Sink that records every diagnostic line for later assertions.
#[derive(Default)]
pub struct RecordingSink {
    lines: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl DiagnosticSink for RecordingSink {
    fn emit(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_owned());
    }
}

/// Handler that waits `delay`, then hands off.
#[allow(dead_code)]
pub fn sleeper(label: &str, delay: Duration) -> Handler {
    Handler::named(label, move |_req, _res, next: Next| async move {
        tokio::time::sleep(delay).await;
        next.run(None).await;
        Ok(())
    })
}

/// Handler that responds 200 with `body` and still hands off.
#[allow(dead_code)]
pub fn responder(label: &str, body: &str) -> Handler {
    let body = body.to_owned();
    Handler::named(label, move |_req, res: ResponseHandle, next: Next| {
        let body = body.clone();
        async move {
            res.send(StatusCode::OK, body);
            next.run(None).await;
            Ok(())
        }
    })
}

/// GET request with a Host header.
#[allow(dead_code)]
pub fn request(host: &str, path: &str) -> Request {
    Request::new(Method::GET, path.parse().unwrap())
        .with_header(HOST, HeaderValue::from_str(host).unwrap())
}
