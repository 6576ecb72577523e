//! Backend selection.
//!
//! [`resolve`] decides which backend to use without building it; the
//! precedence is: explicit override, then GitHub Models, Foundry and
//! OpenAI-compatible credentials in that fixed order, then the offline
//! heuristic. [`Backend`] is the closed set of built backends.

use std::fmt;
use std::sync::Arc;

use tracing::info;

use crate::adapters::heuristic::HeuristicTriager;
use crate::adapters::hosted::{
    FoundryConfig, FoundryTriager, GitHubModelsConfig, GitHubModelsTriager,
    OpenAiCompatibleConfig, OpenAiCompatibleTriager,
};
use crate::config::Settings;
use crate::error::TriageError;
use crate::ports::transport::ChatTransport;
use crate::ports::triager::{TriageFuture, Triager};

/// Which backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// GitHub Models.
    GitHubModels,
    /// Microsoft Foundry / Azure AI inference.
    Foundry,
    /// Any OpenAI-compatible endpoint.
    OpenAiCompatible,
    /// The offline rule engine.
    Heuristic,
}

impl ProviderKind {
    /// Parses a provider name.
    ///
    /// Matching ignores case and surrounding whitespace and treats `_` like
    /// `-`.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::UnsupportedProvider`] for unknown names.
    pub fn parse(name: &str) -> Result<Self, TriageError> {
        let normalized = name.trim().to_lowercase().replace('_', "-");
        match normalized.as_str() {
            "github" | "github-models" => Ok(Self::GitHubModels),
            "foundry" | "azure-foundry" | "ai-foundry" => Ok(Self::Foundry),
            "openai" | "openai-compatible" => Ok(Self::OpenAiCompatible),
            "dummy" | "offline" => Ok(Self::Heuristic),
            _ => Err(TriageError::UnsupportedProvider(name.to_string())),
        }
    }

    /// Canonical short name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GitHubModels => "github-models",
            Self::Foundry => "foundry",
            Self::OpenAiCompatible => "openai-compatible",
            Self::Heuristic => "dummy",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Picks a backend from `settings` without reading any global state.
///
/// # Errors
///
/// Returns [`TriageError::UnsupportedProvider`] when the override names no
/// known backend, regardless of which credentials are present.
pub fn resolve(settings: &Settings) -> Result<ProviderKind, TriageError> {
    if let Some(name) = settings.provider_override.as_deref().filter(|n| !n.trim().is_empty()) {
        return ProviderKind::parse(name);
    }
    if settings.github.has_credentials() {
        return Ok(ProviderKind::GitHubModels);
    }
    if settings.foundry.has_credentials() {
        return Ok(ProviderKind::Foundry);
    }
    if settings.openai.has_credentials() {
        return Ok(ProviderKind::OpenAiCompatible);
    }
    Ok(ProviderKind::Heuristic)
}

/// A built backend.
pub enum Backend {
    /// Offline rule engine.
    Heuristic(HeuristicTriager),
    /// GitHub Models.
    GitHubModels(GitHubModelsTriager),
    /// Foundry.
    Foundry(FoundryTriager),
    /// OpenAI-compatible endpoint.
    OpenAiCompatible(OpenAiCompatibleTriager),
}

impl Backend {
    /// Builds the backend for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::Configuration`] when a remote backend is missing
    /// required values.
    pub fn build(
        kind: ProviderKind,
        settings: &Settings,
        transport: Arc<dyn ChatTransport>,
    ) -> Result<Self, TriageError> {
        Ok(match kind {
            ProviderKind::Heuristic => Self::Heuristic(HeuristicTriager::new()),
            ProviderKind::GitHubModels => Self::GitHubModels(GitHubModelsTriager::new(
                GitHubModelsConfig::from_settings(settings)?,
                transport,
            )),
            ProviderKind::Foundry => {
                Self::Foundry(FoundryTriager::new(FoundryConfig::from_settings(settings)?, transport))
            }
            ProviderKind::OpenAiCompatible => Self::OpenAiCompatible(OpenAiCompatibleTriager::new(
                OpenAiCompatibleConfig::from_settings(settings)?,
                transport,
            )),
        })
    }

    /// Resolves and builds in one step.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`resolve`] and [`Backend::build`].
    pub fn from_settings(
        settings: &Settings,
        transport: Arc<dyn ChatTransport>,
    ) -> Result<Self, TriageError> {
        let kind = resolve(settings)?;
        let explicit = settings.provider_override.is_some();
        info!(provider = %kind, explicit, "selected triage backend");
        Self::build(kind, settings, transport)
    }

    /// Which backend this is.
    #[must_use]
    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::Heuristic(_) => ProviderKind::Heuristic,
            Self::GitHubModels(_) => ProviderKind::GitHubModels,
            Self::Foundry(_) => ProviderKind::Foundry,
            Self::OpenAiCompatible(_) => ProviderKind::OpenAiCompatible,
        }
    }
}

impl Triager for Backend {
    fn name(&self) -> &'static str {
        self.kind().as_str()
    }

    fn triage<'a>(&'a self, title: &'a str, body: &'a str) -> TriageFuture<'a> {
        match self {
            Self::Heuristic(t) => t.triage(title, body),
            Self::GitHubModels(t) => t.triage(title, body),
            Self::Foundry(t) => t.triage(title, body),
            Self::OpenAiCompatible(t) => t.triage(title, body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::canned::CannedTransport;
    use crate::schema::IssueType;

    const GITHUB: (&str, &str) = ("GITHUB_TOKEN", "ghp_x");
    const FOUNDRY: [(&str, &str); 3] = [
        ("TRIAGE_FOUNDRY_ENDPOINT", "https://f.test/models"),
        ("TRIAGE_FOUNDRY_API_KEY", "fk"),
        ("TRIAGE_FOUNDRY_MODEL", "dep"),
    ];
    const OPENAI: [(&str, &str); 3] = [
        ("TRIAGE_OPENAI_BASE_URL", "https://o.test"),
        ("TRIAGE_OPENAI_API_KEY", "sk"),
        ("TRIAGE_OPENAI_MODEL", "gpt"),
    ];

    fn transport() -> Arc<dyn ChatTransport> {
        Arc::new(CannedTransport::new())
    }

    #[test]
    fn nothing_configured_selects_heuristic() {
        assert_eq!(resolve(&Settings::default()).unwrap(), ProviderKind::Heuristic);
    }

    #[test]
    fn probing_order_is_github_foundry_openai() {
        let all: Vec<(&str, &str)> =
            std::iter::once(GITHUB).chain(FOUNDRY).chain(OPENAI).collect();
        assert_eq!(resolve(&Settings::from_vars(all)).unwrap(), ProviderKind::GitHubModels);

        let no_github: Vec<(&str, &str)> = FOUNDRY.into_iter().chain(OPENAI).collect();
        assert_eq!(resolve(&Settings::from_vars(no_github)).unwrap(), ProviderKind::Foundry);

        assert_eq!(resolve(&Settings::from_vars(OPENAI)).unwrap(), ProviderKind::OpenAiCompatible);
    }

    #[test]
    fn partial_credentials_are_not_detected() {
        let partial = Settings::from_vars([FOUNDRY[0], FOUNDRY[1], OPENAI[0]]);
        assert_eq!(resolve(&partial).unwrap(), ProviderKind::Heuristic);
    }

    #[test]
    fn override_beats_detected_credentials() {
        let settings = Settings::from_vars([GITHUB, ("TRIAGE_PROVIDER", "Dummy")]);
        assert_eq!(resolve(&settings).unwrap(), ProviderKind::Heuristic);

        let settings = Settings::from_vars([GITHUB]).with_provider_override("ai_foundry");
        assert_eq!(resolve(&settings).unwrap(), ProviderKind::Foundry);
    }

    #[test]
    fn unsupported_override_fails_regardless_of_credentials() {
        let settings = Settings::from_vars([GITHUB, ("TRIAGE_PROVIDER", "anthropic")]);
        let err = resolve(&settings).unwrap_err();
        assert!(matches!(err, TriageError::UnsupportedProvider(ref name) if name == "anthropic"));
    }

    #[test]
    fn parse_accepts_every_alias() {
        let cases = [
            ("github", ProviderKind::GitHubModels),
            ("GitHub-Models", ProviderKind::GitHubModels),
            ("github_models", ProviderKind::GitHubModels),
            ("foundry", ProviderKind::Foundry),
            ("azure-foundry", ProviderKind::Foundry),
            ("ai-foundry", ProviderKind::Foundry),
            ("openai", ProviderKind::OpenAiCompatible),
            ("openai-compatible", ProviderKind::OpenAiCompatible),
            ("dummy", ProviderKind::Heuristic),
            (" offline ", ProviderKind::Heuristic),
        ];
        for (name, expected) in cases {
            assert_eq!(ProviderKind::parse(name).unwrap(), expected, "{name}");
        }
        assert!(ProviderKind::parse("auto").is_err());
    }

    #[test]
    fn explicit_remote_without_config_is_configuration_error() {
        let settings = Settings::default().with_provider_override("openai");
        let err = Backend::from_settings(&settings, transport()).err().unwrap();
        assert!(matches!(err, TriageError::Configuration { .. }));
    }

    #[test]
    fn builds_each_kind() {
        let all: Vec<(&str, &str)> =
            std::iter::once(GITHUB).chain(FOUNDRY).chain(OPENAI).collect();
        let settings = Settings::from_vars(all);
        for kind in [
            ProviderKind::Heuristic,
            ProviderKind::GitHubModels,
            ProviderKind::Foundry,
            ProviderKind::OpenAiCompatible,
        ] {
            let backend = Backend::build(kind, &settings, transport()).unwrap();
            assert_eq!(backend.kind(), kind);
            assert_eq!(backend.name(), kind.as_str());
        }
    }

    #[tokio::test]
    async fn heuristic_backend_triages_without_network() {
        let backend = Backend::from_settings(&Settings::default(), transport()).unwrap();
        let out = backend.triage("README typo", "spelling").await.unwrap();
        assert_eq!(out.issue_type(), IssueType::Docs);
    }
}
