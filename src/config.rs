//! Explicit configuration for backend selection and the hosted adapters.
//!
//! [`Settings`] is resolved once from a key/value lookup. The binary passes
//! the process environment; tests pass a map. Nothing else in the crate
//! reads environment variables.

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::time::Duration;

use tracing::warn;

/// Names of the configuration values read by [`Settings::from_lookup`].
pub mod vars {
    /// Explicit provider override.
    pub const PROVIDER: &str = "TRIAGE_PROVIDER";

    /// GitHub Models token.
    pub const GITHUB_TOKEN: &str = "TRIAGE_GITHUB_TOKEN";
    /// Fallback name for the GitHub Models token.
    pub const GITHUB_TOKEN_FALLBACK: &str = "GITHUB_TOKEN";
    /// GitHub Models model identifier.
    pub const GITHUB_MODEL: &str = "TRIAGE_GITHUB_MODEL";
    /// Organization to attribute GitHub Models inference to.
    pub const GITHUB_ORG: &str = "TRIAGE_GITHUB_ORG";
    /// GitHub Models base URL.
    pub const GITHUB_BASE_URL: &str = "TRIAGE_GITHUB_BASE_URL";
    /// GitHub REST API version header value.
    pub const GITHUB_API_VERSION: &str = "TRIAGE_GITHUB_API_VERSION";

    /// Foundry inference endpoint.
    pub const FOUNDRY_ENDPOINT: &str = "TRIAGE_FOUNDRY_ENDPOINT";
    /// Foundry API key.
    pub const FOUNDRY_API_KEY: &str = "TRIAGE_FOUNDRY_API_KEY";
    /// Fallback name for the Foundry API key.
    pub const FOUNDRY_API_KEY_FALLBACK: &str = "AZURE_INFERENCE_CREDENTIAL";
    /// Foundry deployment name.
    pub const FOUNDRY_MODEL: &str = "TRIAGE_FOUNDRY_MODEL";
    /// Foundry `api-version` query parameter.
    pub const FOUNDRY_API_VERSION: &str = "TRIAGE_FOUNDRY_API_VERSION";

    /// OpenAI-compatible base URL.
    pub const OPENAI_BASE_URL: &str = "TRIAGE_OPENAI_BASE_URL";
    /// OpenAI-compatible API key.
    pub const OPENAI_API_KEY: &str = "TRIAGE_OPENAI_API_KEY";
    /// OpenAI-compatible model name.
    pub const OPENAI_MODEL: &str = "TRIAGE_OPENAI_MODEL";

    /// Sampling temperature shared by hosted adapters.
    pub const TEMPERATURE: &str = "TRIAGE_TEMPERATURE";
    /// Random seed shared by hosted adapters.
    pub const SEED: &str = "TRIAGE_SEED";
    /// Whether to request JSON-mode responses.
    pub const JSON_MODE: &str = "TRIAGE_JSON_MODE";
    /// Request timeout in seconds.
    pub const TIMEOUT_SECS: &str = "TRIAGE_TIMEOUT_SECS";
}

const DEFAULT_GITHUB_MODEL: &str = "openai/gpt-4.1";
const DEFAULT_GITHUB_BASE_URL: &str = "https://models.github.ai";
const DEFAULT_GITHUB_API_VERSION: &str = "2022-11-28";
const DEFAULT_FOUNDRY_API_VERSION: &str = "2024-05-01-preview";
const DEFAULT_TEMPERATURE: f64 = 0.2;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A credential. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    /// Wraps a credential value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw value, for building request headers only.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Knobs shared by every hosted adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingKnobs {
    /// Sampling temperature.
    pub temperature: f64,
    /// Optional random seed.
    pub seed: Option<i64>,
    /// Request `response_format: json_object`.
    pub json_mode: bool,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for SamplingKnobs {
    fn default() -> Self {
        Self { temperature: DEFAULT_TEMPERATURE, seed: None, json_mode: true, timeout: DEFAULT_TIMEOUT }
    }
}

/// Raw GitHub Models values.
#[derive(Debug, Clone, PartialEq)]
pub struct GitHubModelsSettings {
    /// Token from `TRIAGE_GITHUB_TOKEN`, falling back to `GITHUB_TOKEN`.
    pub token: Option<Secret>,
    /// Model identifier.
    pub model: String,
    /// Optional organization slug.
    pub org: Option<String>,
    /// Base URL.
    pub base_url: String,
    /// `X-GitHub-Api-Version` header value.
    pub api_version: String,
}

impl GitHubModelsSettings {
    /// Returns `true` when a token is configured.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.token.is_some()
    }
}

/// Raw Foundry values.
#[derive(Debug, Clone, PartialEq)]
pub struct FoundrySettings {
    /// Inference endpoint, e.g. `https://<resource>.services.ai.azure.com/models`.
    pub endpoint: Option<String>,
    /// Key from `TRIAGE_FOUNDRY_API_KEY`, falling back to `AZURE_INFERENCE_CREDENTIAL`.
    pub api_key: Option<Secret>,
    /// Deployment name.
    pub model: Option<String>,
    /// `api-version` query parameter.
    pub api_version: String,
}

impl FoundrySettings {
    /// Returns `true` when endpoint, key and model are all configured.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.endpoint.is_some() && self.api_key.is_some() && self.model.is_some()
    }
}

/// Raw OpenAI-compatible values.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenAiSettings {
    /// Base URL, e.g. `https://api.openai.com`.
    pub base_url: Option<String>,
    /// API key.
    pub api_key: Option<Secret>,
    /// Model name.
    pub model: Option<String>,
}

impl OpenAiSettings {
    /// Returns `true` when base URL, key and model are all configured.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.base_url.is_some() && self.api_key.is_some() && self.model.is_some()
    }
}

/// All configuration consumed by backend selection and the hosted adapters.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Explicit provider name; wins over credential probing when set.
    pub provider_override: Option<String>,
    /// GitHub Models values.
    pub github: GitHubModelsSettings,
    /// Foundry values.
    pub foundry: FoundrySettings,
    /// OpenAI-compatible values.
    pub openai: OpenAiSettings,
    /// Shared knobs.
    pub knobs: SamplingKnobs,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Settings {
    /// Resolves settings from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Resolves settings from `(name, value)` pairs.
    pub fn from_vars<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: HashMap<String, String> =
            pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Self::from_lookup(|name| map.get(name).cloned())
    }

    /// Resolves settings through `lookup`. Values are trimmed; blank values
    /// count as absent. Fallback names are consulted only when the primary
    /// name is absent or blank.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |names: &[&str]| first_non_blank(&lookup, names);

        let github = GitHubModelsSettings {
            token: get(&[vars::GITHUB_TOKEN, vars::GITHUB_TOKEN_FALLBACK]).map(Secret),
            model: get(&[vars::GITHUB_MODEL]).unwrap_or_else(|| DEFAULT_GITHUB_MODEL.into()),
            org: get(&[vars::GITHUB_ORG]),
            base_url: get(&[vars::GITHUB_BASE_URL])
                .unwrap_or_else(|| DEFAULT_GITHUB_BASE_URL.into()),
            api_version: get(&[vars::GITHUB_API_VERSION])
                .unwrap_or_else(|| DEFAULT_GITHUB_API_VERSION.into()),
        };

        let foundry = FoundrySettings {
            endpoint: get(&[vars::FOUNDRY_ENDPOINT]),
            api_key: get(&[vars::FOUNDRY_API_KEY, vars::FOUNDRY_API_KEY_FALLBACK]).map(Secret),
            model: get(&[vars::FOUNDRY_MODEL]),
            api_version: get(&[vars::FOUNDRY_API_VERSION])
                .unwrap_or_else(|| DEFAULT_FOUNDRY_API_VERSION.into()),
        };

        let openai = OpenAiSettings {
            base_url: get(&[vars::OPENAI_BASE_URL]),
            api_key: get(&[vars::OPENAI_API_KEY]).map(Secret),
            model: get(&[vars::OPENAI_MODEL]),
        };

        let knobs = SamplingKnobs {
            temperature: parse_or(vars::TEMPERATURE, get(&[vars::TEMPERATURE]), DEFAULT_TEMPERATURE),
            seed: get(&[vars::SEED]).and_then(|raw| match raw.parse() {
                Ok(seed) => Some(seed),
                Err(_) => {
                    warn!(var = vars::SEED, value = %raw, "ignoring unparsable seed");
                    None
                }
            }),
            json_mode: lookup(vars::JSON_MODE).map_or(true, |raw| parse_flag(&raw)),
            timeout: get(&[vars::TIMEOUT_SECS])
                .and_then(|raw| {
                    let timeout = raw
                        .parse::<f64>()
                        .ok()
                        .filter(|secs| *secs > 0.0)
                        .and_then(|secs| Duration::try_from_secs_f64(secs).ok());
                    if timeout.is_none() {
                        warn!(var = vars::TIMEOUT_SECS, value = %raw, "ignoring invalid timeout");
                    }
                    timeout
                })
                .unwrap_or(DEFAULT_TIMEOUT),
        };

        Self { provider_override: get(&[vars::PROVIDER]), github, foundry, openai, knobs }
    }

    /// Replaces the provider override, e.g. with a command-line flag.
    #[must_use]
    pub fn with_provider_override(mut self, provider: impl Into<String>) -> Self {
        self.provider_override = Some(provider.into());
        self
    }
}

fn first_non_blank<F>(lookup: &F, names: &[&str]) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    names.iter().find_map(|name| {
        lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
    })
}

fn parse_or(name: &str, raw: Option<String>, default: f64) -> f64 {
    match raw {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(var = name, value = %raw, "ignoring unparsable number");
            default
        }),
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
