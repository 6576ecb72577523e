//! Live adapter for the `ChatTransport` port using `reqwest`.

use reqwest::Client;
use tracing::debug;

use crate::ports::transport::{
    ChatTransport, HttpReply, HttpRequest, TransportFailure, TransportFuture,
};

/// Sends requests over the network.
pub struct LiveHttpTransport {
    client: Client,
}

impl LiveHttpTransport {
    /// Creates a transport with a fresh connection pool.
    #[must_use]
    pub fn new() -> Self {
        Self { client: Client::new() }
    }
}

impl Default for LiveHttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn classify(err: &reqwest::Error) -> TransportFailure {
    if err.is_timeout() {
        TransportFailure::Timeout
    } else if err.is_connect() {
        TransportFailure::Connect
    } else {
        TransportFailure::Other
    }
}

impl ChatTransport for LiveHttpTransport {
    fn post_json(&self, request: HttpRequest) -> TransportFuture<'_> {
        Box::pin(async move {
            let mut builder = self
                .client
                .post(&request.url)
                .query(&request.query)
                .timeout(request.timeout)
                .json(&request.body);
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }

            let response = builder.send().await.map_err(|e| {
                // The error text can include the URL; only its kind is kept.
                let failure = classify(&e);
                debug!(url = %request.url, %failure, "chat request did not complete");
                failure
            })?;

            let status = response.status();
            let body = response.text().await.map_err(|e| classify(&e))?;

            Ok(HttpReply {
                status: status.as_u16(),
                reason: status.canonical_reason().map(str::to_string),
                body,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(url: String, timeout: Duration) -> HttpRequest {
        HttpRequest {
            url,
            query: vec![("api-version".into(), "2024-05-01-preview".into())],
            headers: vec![("api-key".into(), "k-123".into())],
            body: serde_json::json!({"model": "m"}),
            timeout,
        }
    }

    #[tokio::test]
    async fn posts_json_with_headers_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/chat/completions"))
            .and(query_param("api-version", "2024-05-01-preview"))
            .and(header("api-key", "k-123"))
            .and(body_json(serde_json::json!({"model": "m"})))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"ok\":true}"))
            .expect(1)
            .mount(&server)
            .await;

        let transport = LiveHttpTransport::new();
        let url = format!("{}/models/chat/completions", server.uri());
        let reply = transport.post_json(request(url, Duration::from_secs(5))).await.unwrap();

        assert_eq!(reply.status, 200);
        assert_eq!(reply.reason.as_deref(), Some("OK"));
        assert_eq!(reply.body, "{\"ok\":true}");
    }

    #[tokio::test]
    async fn non_success_status_is_a_reply_not_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("denied"))
            .mount(&server)
            .await;

        let transport = LiveHttpTransport::new();
        let reply =
            transport.post_json(request(server.uri(), Duration::from_secs(5))).await.unwrap();
        assert_eq!(reply.status, 401);
        assert!(!reply.is_success());
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let transport = LiveHttpTransport::new();
        let failure = transport
            .post_json(request(server.uri(), Duration::from_millis(100)))
            .await
            .unwrap_err();
        assert_eq!(failure, TransportFailure::Timeout);
    }
}
