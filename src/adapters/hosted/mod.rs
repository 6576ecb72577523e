//! Hosted chat-completion backends.
//!
//! GitHub Models, Foundry and OpenAI-compatible endpoints all speak the same
//! chat-completions dialect. This module holds what they share: prompts,
//! payload shape, status hints, and recovery of the verdict JSON from the
//! assistant message. Each provider module only knows its URL, headers and
//! configuration names.

pub mod foundry;
pub mod github_models;
pub mod openai_compatible;

pub use foundry::{FoundryConfig, FoundryTriager};
pub use github_models::{GitHubModelsConfig, GitHubModelsTriager};
pub use openai_compatible::{OpenAiCompatibleConfig, OpenAiCompatibleTriager};

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::SamplingKnobs;
use crate::error::TriageError;
use crate::ports::transport::{ChatTransport, HttpReply, HttpRequest, TransportFailure};
use crate::schema::TriageOutput;

const SYSTEM_PROMPT: &str = "You are a GitHub issue triage assistant. \
Return ONLY a JSON object that matches the schema. \
Do not wrap the JSON in markdown. \
The JSON must include: type, priority, labels, rationale. \
type is one of: bug, feature, docs, question. \
priority is one of: p0, p1, p2. \
labels is an array of strings. \
rationale is a short string.";

/// Builds the user message for one issue.
#[must_use]
pub fn user_prompt(title: &str, body: &str) -> String {
    format!(
        "Triage the following GitHub issue.\n\nTitle: {}\n\nBody:\n{}\n",
        title.trim(),
        body.trim()
    )
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Request body sent to every chat-completions endpoint.
#[derive(Serialize)]
struct ChatPayload<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

/// Builds the chat-completions JSON body.
#[must_use]
pub fn build_payload(model: &str, title: &str, body: &str, knobs: &SamplingKnobs) -> Value {
    let user = user_prompt(title, body);
    let payload = ChatPayload {
        model,
        messages: [
            ChatMessage { role: "system", content: SYSTEM_PROMPT },
            ChatMessage { role: "user", content: &user },
        ],
        temperature: knobs.temperature,
        seed: knobs.seed,
        response_format: knobs.json_mode.then_some(ResponseFormat { kind: "json_object" }),
    };
    serde_json::to_value(payload).unwrap_or(Value::Null)
}

/// Provider-specific wording for error hints.
///
/// Every string names configuration keys or public values only.
#[derive(Debug, Clone, Default)]
pub struct ProviderHints {
    /// Hints for 401/403.
    pub auth: Vec<String>,
    /// Hints for 404.
    pub not_found: Vec<String>,
    /// Hint for any other non-success status.
    pub other: String,
    /// Hint for network failures.
    pub unreachable: String,
}

/// Maps a non-success reply to [`TriageError::ProviderStatus`].
///
/// The response body is never included; it can echo request details.
#[must_use]
pub fn status_error(provider: &'static str, reply: &HttpReply, hints: &ProviderHints) -> TriageError {
    let hint = match reply.status {
        401 | 403 => hints.auth.join(" "),
        404 => hints.not_found.join(" "),
        429 => "You may be rate limited. Retry with backoff or reduce request rate.".to_string(),
        500..=599 => "Provider error. Retry later; if persistent, check provider status.".to_string(),
        _ => hints.other.clone(),
    };
    TriageError::ProviderStatus { provider, status: reply.status, reason: reply.reason.clone(), hint }
}

/// Maps a transport failure to [`TriageError::Transport`].
#[must_use]
pub fn transport_error(
    provider: &'static str,
    failure: TransportFailure,
    hints: &ProviderHints,
) -> TriageError {
    TriageError::Transport { provider, message: format!("Cause: {failure}. {}", hints.unreachable) }
}

/// Extracts the assistant text from a chat-completions response body.
///
/// Content may be a string or a list of parts; parts are strings or objects
/// with a `text` field and are joined with newlines.
///
/// # Errors
///
/// Returns [`TriageError::ResponseShape`] when the body is not JSON, has no
/// `choices[0].message.content`, or the content is blank.
pub fn chat_content(provider: &'static str, body: &str) -> Result<String, TriageError> {
    let shape = |message: &str| TriageError::ResponseShape { provider, message: message.into() };

    let value: Value =
        serde_json::from_str(body).map_err(|_| shape("response body is not JSON"))?;
    let content = value
        .pointer("/choices/0/message/content")
        .ok_or_else(|| shape("missing choices[0].message.content"))?;

    let text = match content {
        Value::String(text) => text.clone(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(|part| match part {
                Value::String(text) => Some(text.as_str()),
                Value::Object(fields) => fields.get("text").and_then(Value::as_str),
                _ => None,
            })
            .filter(|text| !text.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    };

    if text.trim().is_empty() {
        return Err(shape("provider returned empty content"));
    }
    Ok(text)
}

fn fenced_json() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?is)```(?:json)?\s*(\{.*?\})\s*```").expect("fence pattern is valid")
    })
}

/// Recovers the first JSON object from model output.
///
/// Prefers a fenced code block; otherwise takes the span from the first `{`
/// to the last `}`.
///
/// # Errors
///
/// Returns [`TriageError::ResponseShape`] when no object can be found.
pub fn extract_json_object<'t>(provider: &'static str, text: &'t str) -> Result<&'t str, TriageError> {
    if let Some(inner) = fenced_json().captures(text).and_then(|c| c.get(1)) {
        return Ok(inner.as_str());
    }
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end > start => Ok(&text[start..=end]),
        _ => Err(TriageError::ResponseShape {
            provider,
            message: "model response did not contain a JSON object".into(),
        }),
    }
}

/// Sends one chat-completions request and turns the reply into a verdict.
pub(crate) async fn complete(
    provider: &'static str,
    transport: &dyn ChatTransport,
    request: HttpRequest,
    hints: ProviderHints,
) -> Result<TriageOutput, TriageError> {
    debug!(provider, url = %request.url, "sending chat completion request");

    let reply =
        transport.post_json(request).await.map_err(|f| transport_error(provider, f, &hints))?;
    if !reply.is_success() {
        return Err(status_error(provider, &reply, &hints));
    }

    let content = chat_content(provider, &reply.body)?;
    let json_text = extract_json_object(provider, &content)?;
    serde_json::from_str(json_text)
        .map_err(|e| TriageError::SchemaValidation(format!("{provider} output: {e}")))
}
