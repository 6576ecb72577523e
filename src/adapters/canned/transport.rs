//! Canned adapter for the `ChatTransport` port.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::ports::transport::{
    ChatTransport, HttpReply, HttpRequest, TransportFailure, TransportFuture,
};

/// Serves queued replies in order and records every request it receives.
#[derive(Debug, Default)]
pub struct CannedTransport {
    replies: Mutex<VecDeque<Result<HttpReply, TransportFailure>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl CannedTransport {
    /// Creates a transport with no queued replies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a `200 OK` reply with `body`.
    pub fn push_ok(&self, body: &str) {
        self.push_status(200, body);
    }

    /// Queues a reply with the given status and body.
    pub fn push_status(&self, status: u16, body: &str) {
        let reason = canonical_reason(status).map(str::to_string);
        self.push(Ok(HttpReply { status, reason, body: body.to_string() }));
    }

    /// Queues a transport failure.
    pub fn push_failure(&self, failure: TransportFailure) {
        self.push(Err(failure));
    }

    /// Requests received so far, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the request log mutex is poisoned.
    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("request log lock poisoned").clone()
    }

    fn push(&self, reply: Result<HttpReply, TransportFailure>) {
        self.replies.lock().expect("reply queue lock poisoned").push_back(reply);
    }
}

fn canonical_reason(status: u16) -> Option<&'static str> {
    match status {
        200 => Some("OK"),
        401 => Some("Unauthorized"),
        403 => Some("Forbidden"),
        404 => Some("Not Found"),
        429 => Some("Too Many Requests"),
        500 => Some("Internal Server Error"),
        503 => Some("Service Unavailable"),
        _ => None,
    }
}

impl ChatTransport for CannedTransport {
    fn post_json(&self, request: HttpRequest) -> TransportFuture<'_> {
        self.requests.lock().expect("request log lock poisoned").push(request);
        let reply = self
            .replies
            .lock()
            .expect("reply queue lock poisoned")
            .pop_front()
            .unwrap_or_else(|| panic!("CannedTransport: no reply queued for request"));
        Box::pin(async move { reply })
    }
}
