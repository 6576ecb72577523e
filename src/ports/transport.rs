//! Transport port: one JSON POST to a chat-completions endpoint.
//!
//! Hosted adapters shape the request and interpret the reply; the transport
//! only moves bytes. This keeps status mapping and response parsing testable
//! without a network.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Boxed future type alias used by [`ChatTransport`].
pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<HttpReply, TransportFailure>> + Send + 'a>>;

/// An outgoing JSON POST.
#[derive(Clone)]
pub struct HttpRequest {
    /// Absolute URL without query string.
    pub url: String,
    /// Query parameters appended to `url`.
    pub query: Vec<(String, String)>,
    /// Request headers. May contain credentials.
    pub headers: Vec<(String, String)>,
    /// JSON body.
    pub body: serde_json::Value,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl HttpRequest {
    /// Returns the value of the first header named `name` (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
    }
}

// Header values are never printed.
impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header_names: Vec<&str> = self.headers.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("HttpRequest")
            .field("url", &self.url)
            .field("query", &self.query)
            .field("headers", &header_names)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// A completed HTTP exchange, successful or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    /// Numeric status code.
    pub status: u16,
    /// Canonical reason phrase, when known.
    pub reason: Option<String>,
    /// Raw response body.
    pub body: String,
}

impl HttpReply {
    /// Returns `true` for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Why a request never produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    /// The request exceeded its timeout.
    Timeout,
    /// DNS resolution or connection setup failed.
    Connect,
    /// Any other transport-level failure.
    Other,
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportFailure::Timeout => f.write_str("the request timed out"),
            TransportFailure::Connect => f.write_str("the connection could not be established"),
            TransportFailure::Other => f.write_str("the request could not be sent"),
        }
    }
}

/// Sends JSON requests to a remote provider.
pub trait ChatTransport: Send + Sync {
    /// Posts `request` and returns the reply, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportFailure`] when no HTTP reply was received.
    fn post_json(&self, request: HttpRequest) -> TransportFuture<'_>;
}
