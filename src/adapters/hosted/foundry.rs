//! Microsoft Foundry (Azure AI model inference) backend.

use std::sync::Arc;

use crate::config::{vars, SamplingKnobs, Secret, Settings};
use crate::error::TriageError;
use crate::ports::transport::{ChatTransport, HttpRequest};
use crate::ports::triager::{TriageFuture, Triager};

use super::{build_payload, complete, ProviderHints};

const PROVIDER: &str = "Foundry";

/// Validated Foundry configuration.
#[derive(Debug, Clone)]
pub struct FoundryConfig {
    /// Inference endpoint, e.g. `https://<resource>.services.ai.azure.com/models`.
    pub endpoint: String,
    /// Value of the `api-key` header.
    pub api_key: Secret,
    /// Deployment name.
    pub model: String,
    /// `api-version` query parameter.
    pub api_version: String,
    /// Shared sampling knobs.
    pub knobs: SamplingKnobs,
}

impl FoundryConfig {
    /// Builds the configuration from resolved settings.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::Configuration`] naming every missing value.
    pub fn from_settings(settings: &Settings) -> Result<Self, TriageError> {
        let foundry = &settings.foundry;
        match (&foundry.endpoint, &foundry.api_key, &foundry.model) {
            (Some(endpoint), Some(api_key), Some(model)) => Ok(Self {
                endpoint: endpoint.clone(),
                api_key: api_key.clone(),
                model: model.clone(),
                api_version: foundry.api_version.clone(),
                knobs: settings.knobs.clone(),
            }),
            (endpoint, api_key, model) => {
                let missing = [
                    (endpoint.is_none(), vars::FOUNDRY_ENDPOINT),
                    (api_key.is_none(), vars::FOUNDRY_API_KEY),
                    (model.is_none(), vars::FOUNDRY_MODEL),
                ]
                .into_iter()
                .filter(|(absent, _)| *absent)
                .map(|(_, name)| name.to_string())
                .collect();
                Err(TriageError::Configuration { provider: PROVIDER, missing })
            }
        }
    }

    /// Chat-completions URL (without the `api-version` query).
    #[must_use]
    pub fn url(&self) -> String {
        format!("{}/chat/completions", self.endpoint.trim_end_matches('/'))
    }

    fn hints(&self) -> ProviderHints {
        ProviderHints {
            auth: vec![format!(
                "Check {} (or {}) and that the key belongs to this resource.",
                vars::FOUNDRY_API_KEY,
                vars::FOUNDRY_API_KEY_FALLBACK
            )],
            not_found: vec![
                format!("Verify {} (current: '{}').", vars::FOUNDRY_ENDPOINT, self.endpoint),
                format!(
                    "Verify {} names an existing deployment (current: '{}').",
                    vars::FOUNDRY_MODEL,
                    self.model
                ),
            ],
            other: format!(
                "Check {} and {} (current: '{}').",
                vars::FOUNDRY_MODEL,
                vars::FOUNDRY_API_VERSION,
                self.api_version
            ),
            unreachable: format!(
                "Verify {} ('{}') is reachable from your environment.",
                vars::FOUNDRY_ENDPOINT,
                self.endpoint
            ),
        }
    }
}

/// Triager backed by a Foundry inference endpoint.
pub struct FoundryTriager {
    config: FoundryConfig,
    transport: Arc<dyn ChatTransport>,
}

impl FoundryTriager {
    /// Creates a triager that sends requests through `transport`.
    pub fn new(config: FoundryConfig, transport: Arc<dyn ChatTransport>) -> Self {
        Self { config, transport }
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &FoundryConfig {
        &self.config
    }

    fn request(&self, title: &str, body: &str) -> HttpRequest {
        let config = &self.config;
        HttpRequest {
            url: config.url(),
            query: vec![("api-version".into(), config.api_version.clone())],
            headers: vec![
                ("api-key".into(), config.api_key.expose().to_string()),
                ("Content-Type".into(), "application/json".into()),
            ],
            body: build_payload(&config.model, title, body, &config.knobs),
            timeout: config.knobs.timeout,
        }
    }
}

impl Triager for FoundryTriager {
    fn name(&self) -> &'static str {
        "foundry"
    }

    fn triage<'a>(&'a self, title: &'a str, body: &'a str) -> TriageFuture<'a> {
        let request = self.request(title, body);
        let hints = self.config.hints();
        Box::pin(complete(PROVIDER, self.transport.as_ref(), request, hints))
    }
}
