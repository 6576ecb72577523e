//! Backend for any OpenAI-compatible chat-completions endpoint.

use std::sync::Arc;

use crate::config::{vars, SamplingKnobs, Secret, Settings};
use crate::error::TriageError;
use crate::ports::transport::{ChatTransport, HttpRequest};
use crate::ports::triager::{TriageFuture, Triager};

use super::{build_payload, complete, ProviderHints};

const PROVIDER: &str = "OpenAI-compatible provider";

/// Validated OpenAI-compatible configuration.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleConfig {
    /// Base URL, e.g. `https://api.openai.com`.
    pub base_url: String,
    /// Bearer API key.
    pub api_key: Secret,
    /// Model name.
    pub model: String,
    /// Shared sampling knobs.
    pub knobs: SamplingKnobs,
}

impl OpenAiCompatibleConfig {
    /// Builds the configuration from resolved settings.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::Configuration`] naming every missing value.
    pub fn from_settings(settings: &Settings) -> Result<Self, TriageError> {
        let openai = &settings.openai;
        match (&openai.base_url, &openai.api_key, &openai.model) {
            (Some(base_url), Some(api_key), Some(model)) => Ok(Self {
                base_url: base_url.clone(),
                api_key: api_key.clone(),
                model: model.clone(),
                knobs: settings.knobs.clone(),
            }),
            (base_url, api_key, model) => {
                let missing = [
                    (base_url.is_none(), vars::OPENAI_BASE_URL),
                    (api_key.is_none(), vars::OPENAI_API_KEY),
                    (model.is_none(), vars::OPENAI_MODEL),
                ]
                .into_iter()
                .filter(|(absent, _)| *absent)
                .map(|(_, name)| name.to_string())
                .collect();
                Err(TriageError::Configuration { provider: PROVIDER, missing })
            }
        }
    }

    /// Chat-completions URL.
    #[must_use]
    pub fn url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn hints(&self) -> ProviderHints {
        ProviderHints {
            auth: vec![format!("Check {}.", vars::OPENAI_API_KEY)],
            not_found: vec![
                format!("Verify {} (current: '{}').", vars::OPENAI_BASE_URL, self.base_url),
                format!("Verify {} is valid (current: '{}').", vars::OPENAI_MODEL, self.model),
            ],
            other: format!("Check {} and request configuration.", vars::OPENAI_MODEL),
            unreachable: format!(
                "Verify {} ('{}') is reachable from your environment.",
                vars::OPENAI_BASE_URL,
                self.base_url
            ),
        }
    }
}

/// Triager backed by an OpenAI-compatible endpoint.
pub struct OpenAiCompatibleTriager {
    config: OpenAiCompatibleConfig,
    transport: Arc<dyn ChatTransport>,
}

impl OpenAiCompatibleTriager {
    /// Creates a triager that sends requests through `transport`.
    pub fn new(config: OpenAiCompatibleConfig, transport: Arc<dyn ChatTransport>) -> Self {
        Self { config, transport }
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &OpenAiCompatibleConfig {
        &self.config
    }

    fn request(&self, title: &str, body: &str) -> HttpRequest {
        let config = &self.config;
        HttpRequest {
            url: config.url(),
            query: Vec::new(),
            headers: vec![("Authorization".into(), format!("Bearer {}", config.api_key.expose()))],
            body: build_payload(&config.model, title, body, &config.knobs),
            timeout: config.knobs.timeout,
        }
    }
}

impl Triager for OpenAiCompatibleTriager {
    fn name(&self) -> &'static str {
        "openai-compatible"
    }

    fn triage<'a>(&'a self, title: &'a str, body: &'a str) -> TriageFuture<'a> {
        let request = self.request(title, body);
        let hints = self.config.hints();
        Box::pin(complete(PROVIDER, self.transport.as_ref(), request, hints))
    }
}
