//! GitHub Models inference backend.

use std::sync::Arc;

use crate::config::{vars, SamplingKnobs, Secret, Settings};
use crate::error::TriageError;
use crate::ports::transport::{ChatTransport, HttpRequest};
use crate::ports::triager::{TriageFuture, Triager};

use super::{build_payload, complete, ProviderHints};

const PROVIDER: &str = "GitHub Models";

/// Validated GitHub Models configuration.
#[derive(Debug, Clone)]
pub struct GitHubModelsConfig {
    /// Bearer token.
    pub token: Secret,
    /// Model identifier, e.g. `openai/gpt-4.1`.
    pub model: String,
    /// Organization to attribute inference to.
    pub org: Option<String>,
    /// Base URL, e.g. `https://models.github.ai`.
    pub base_url: String,
    /// `X-GitHub-Api-Version` header value.
    pub api_version: String,
    /// Shared sampling knobs.
    pub knobs: SamplingKnobs,
}

impl GitHubModelsConfig {
    /// Builds the configuration from resolved settings.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::Configuration`] when no token is set.
    pub fn from_settings(settings: &Settings) -> Result<Self, TriageError> {
        let github = &settings.github;
        let token = github.token.clone().ok_or_else(|| TriageError::Configuration {
            provider: PROVIDER,
            missing: vec![vars::GITHUB_TOKEN.to_string()],
        })?;
        Ok(Self {
            token,
            model: github.model.clone(),
            org: github.org.clone(),
            base_url: github.base_url.clone(),
            api_version: github.api_version.clone(),
            knobs: settings.knobs.clone(),
        })
    }

    /// Chat-completions URL, scoped to the organization when one is set.
    #[must_use]
    pub fn url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        match &self.org {
            Some(org) => format!("{base}/orgs/{org}/inference/chat/completions"),
            None => format!("{base}/inference/chat/completions"),
        }
    }

    fn hints(&self) -> ProviderHints {
        let mut auth = vec![format!(
            "Check {} (or {}). Ensure the token has access to GitHub Models.",
            vars::GITHUB_TOKEN,
            vars::GITHUB_TOKEN_FALLBACK
        )];
        let mut not_found = vec![
            format!(
                "Verify {} (current: '{}') and the inference path.",
                vars::GITHUB_BASE_URL,
                self.base_url
            ),
            format!("Verify {} is valid (current: '{}').", vars::GITHUB_MODEL, self.model),
        ];
        if self.org.is_some() {
            auth.push(format!(
                "If {} is set, ensure the token can access that organization.",
                vars::GITHUB_ORG
            ));
            not_found.push(format!(
                "If {} is set, verify the org slug is correct and the org supports inference.",
                vars::GITHUB_ORG
            ));
        }
        ProviderHints {
            auth,
            not_found,
            other: format!("Check {} and request configuration.", vars::GITHUB_MODEL),
            unreachable: format!(
                "Verify {} ('{}') is reachable from your environment and check proxies/firewall settings.",
                vars::GITHUB_BASE_URL,
                self.base_url
            ),
        }
    }
}

/// Triager backed by the GitHub Models chat-completions API.
pub struct GitHubModelsTriager {
    config: GitHubModelsConfig,
    transport: Arc<dyn ChatTransport>,
}

impl GitHubModelsTriager {
    /// Creates a triager that sends requests through `transport`.
    pub fn new(config: GitHubModelsConfig, transport: Arc<dyn ChatTransport>) -> Self {
        Self { config, transport }
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &GitHubModelsConfig {
        &self.config
    }

    fn request(&self, title: &str, body: &str) -> HttpRequest {
        let config = &self.config;
        HttpRequest {
            url: config.url(),
            query: Vec::new(),
            headers: vec![
                ("Accept".into(), "application/vnd.github+json".into()),
                ("Authorization".into(), format!("Bearer {}", config.token.expose())),
                ("X-GitHub-Api-Version".into(), config.api_version.clone()),
                ("Content-Type".into(), "application/json".into()),
            ],
            body: build_payload(&config.model, title, body, &config.knobs),
            timeout: config.knobs.timeout,
        }
    }
}

impl Triager for GitHubModelsTriager {
    fn name(&self) -> &'static str {
        "github-models"
    }

    fn triage<'a>(&'a self, title: &'a str, body: &'a str) -> TriageFuture<'a> {
        let request = self.request(title, body);
        let hints = self.config.hints();
        Box::pin(complete(PROVIDER, self.transport.as_ref(), request, hints))
    }
}
