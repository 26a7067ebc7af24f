//! Session-scoped provider configuration
//!
//! One [`ProviderConfigStore`] lives for one operator session. Input events
//! are applied to it one at a time through `&mut self`; nothing is persisted.

use attackgen_protocol::{CompanySize, Industry, OrganizationProfile, Provider};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::credentials::{CredentialField, Credentials, FieldKind, OllamaCredentials};
use crate::discovery::{ModelSource, DEFAULT_OLLAMA_URL};
use crate::error::ProviderUnavailable;
use crate::guidance;
use crate::target::GenerationTarget;

/// The operator's provider choice, its credentials and the organization profile
#[derive(Debug, Clone)]
pub struct ProviderConfiguration {
    credentials: Credentials,
    organization: OrganizationProfile,
}

impl Default for ProviderConfiguration {
    fn default() -> Self {
        Self {
            credentials: Credentials::empty(Provider::default()),
            organization: OrganizationProfile::default(),
        }
    }
}

impl ProviderConfiguration {
    /// Active provider
    pub fn provider(&self) -> Provider {
        self.credentials.provider()
    }

    /// Credentials of the active provider
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Organization profile
    pub fn organization(&self) -> &OrganizationProfile {
        &self.organization
    }
}

/// Kinds of user-visible notices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryKind {
    /// Model discovery failed
    ProviderUnavailable,
}

/// A recoverable problem to show the operator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Advisory {
    /// What happened
    pub kind: AdvisoryKind,
    /// Text for the operator
    pub message: String,
    /// Technical detail for logs and tooltips
    pub detail: String,
    /// When it was raised
    pub raised_at: DateTime<Utc>,
}

impl Advisory {
    fn provider_unavailable(err: &ProviderUnavailable) -> Self {
        Self {
            kind: AdvisoryKind::ProviderUnavailable,
            message: guidance::OLLAMA_UNAVAILABLE.to_string(),
            detail: err.to_string(),
            raised_at: Utc::now(),
        }
    }
}

/// One credential input as shown in a summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSummary {
    /// Input name
    pub field: FieldKind,
    /// Displayable value; API keys only ever show as "set"
    pub value: Option<String>,
}

/// Redacted snapshot of a session's configuration
#[derive(Debug, Clone, Serialize)]
pub struct ConfigurationSummary {
    /// Session id
    pub session_id: Uuid,
    /// Active provider
    pub provider: Provider,
    /// Inputs of the active provider
    pub fields: Vec<FieldSummary>,
    /// Organization profile
    pub organization: OrganizationProfile,
    /// Models found by the last Ollama discovery
    pub ollama_models: Vec<String>,
    /// Inputs still needed before generation can run
    pub missing: Vec<FieldKind>,
}

/// Holds one session's [`ProviderConfiguration`] and applies input events to it
#[derive(Debug)]
pub struct ProviderConfigStore {
    session_id: Uuid,
    config: ProviderConfiguration,
    ollama_models: Vec<String>,
    ollama_base_url: String,
    default_ollama_url: String,
    advisories: Vec<Advisory>,
}

impl Default for ProviderConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderConfigStore {
    /// Start a session with everything unset
    pub fn new() -> Self {
        let session_id = Uuid::new_v4();
        debug!(%session_id, "Starting configuration session");
        Self {
            session_id,
            config: ProviderConfiguration::default(),
            ollama_models: Vec::new(),
            ollama_base_url: DEFAULT_OLLAMA_URL.to_string(),
            default_ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            advisories: Vec::new(),
        }
    }

    /// Use `url` as the Ollama base URL until a discovery queries another one
    pub fn with_ollama_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.ollama_base_url = url.clone();
        self.default_ollama_url = url;
        self
    }

    /// Session id, for log correlation
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Current configuration
    pub fn configuration(&self) -> &ProviderConfiguration {
        &self.config
    }

    /// Active provider
    pub fn provider(&self) -> Provider {
        self.config.provider()
    }

    /// Credentials of the active provider
    pub fn credentials(&self) -> &Credentials {
        self.config.credentials()
    }

    /// Organization profile
    pub fn organization(&self) -> &OrganizationProfile {
        self.config.organization()
    }

    /// Model names from the last successful Ollama discovery
    pub fn ollama_models(&self) -> &[String] {
        &self.ollama_models
    }

    /// Select a provider
    ///
    /// Always replaces the credentials with an empty record for `provider`,
    /// even when it is already active. Discovered Ollama models are dropped and
    /// the Ollama base URL returns to the configured one.
    #[instrument(skip(self), fields(session = %self.session_id))]
    pub fn set_provider(&mut self, provider: Provider) {
        let previous = self.config.provider();
        self.config.credentials = Credentials::empty(provider);
        self.ollama_models.clear();
        self.ollama_base_url = self.default_ollama_url.clone();
        info!(%previous, %provider, "Provider selected");
    }

    /// Write one field of the active provider's credentials
    ///
    /// No format checks happen here. Returns `false` when the active provider
    /// has no such field; the write is then ignored.
    #[instrument(skip(self, field), fields(session = %self.session_id, field = %field.kind()))]
    pub fn set_credential_field(&mut self, field: CredentialField) -> bool {
        let applied = self.config.credentials.apply(field);
        if applied {
            debug!("Credential field updated");
        } else {
            warn!(provider = %self.config.provider(), "Field does not apply to active provider");
        }
        applied
    }

    /// Overwrite the organization profile
    #[instrument(skip(self), fields(session = %self.session_id))]
    pub fn set_organization_profile(&mut self, industry: Industry, company_size: CompanySize) {
        self.config.organization.set(industry, company_size);
        debug!("Organization profile updated");
    }

    /// List models installed on a local provider
    ///
    /// On success the names are kept in response order and returned. A
    /// previously chosen Ollama model that is no longer listed is cleared. On
    /// failure exactly one [`Advisory`] is recorded, the list is emptied and an
    /// empty vector is returned. Either way the queried URL becomes the base URL
    /// of the Ollama target.
    #[instrument(skip(self, source), fields(session = %self.session_id, base_url = %source.base_url()))]
    pub async fn discover_ollama_models<S>(&mut self, source: &S) -> Vec<String>
    where
        S: ModelSource + ?Sized,
    {
        self.ollama_base_url = source.base_url().to_string();
        match source.list_models().await {
            Ok(models) => {
                if let Credentials::Ollama(c) = &mut self.config.credentials {
                    if c.model.as_ref().is_some_and(|m| !models.contains(m)) {
                        debug!("Previously selected model no longer installed");
                        c.model = None;
                    }
                }
                self.ollama_models = models.clone();
                info!(model_count = models.len(), "Ollama models discovered");
                models
            }
            Err(e) => {
                warn!(error = %e, "Ollama discovery failed");
                self.ollama_models.clear();
                self.advisories.push(Advisory::provider_unavailable(&e));
                Vec::new()
            }
        }
    }

    /// Advisories raised since the last call, oldest first
    pub fn take_advisories(&mut self) -> Vec<Advisory> {
        std::mem::take(&mut self.advisories)
    }

    /// Inputs a generation call still needs
    ///
    /// Unset dropdowns are not listed: they fall back to their first choice,
    /// and an unset Ollama model falls back to the first discovered one. An
    /// Ollama model counts only when the last discovery listed it.
    pub fn missing_fields(&self) -> Vec<FieldKind> {
        let mut missing = Vec::new();
        match &self.config.credentials {
            Credentials::OpenAI(c) => {
                if c.api_key.is_none() {
                    missing.push(FieldKind::ApiKey);
                }
            }
            Credentials::AzureOpenAI(c) => {
                if c.api_key.is_none() {
                    missing.push(FieldKind::ApiKey);
                }
                if c.endpoint.is_none() {
                    missing.push(FieldKind::Endpoint);
                }
                if c.deployment_name.is_none() {
                    missing.push(FieldKind::DeploymentName);
                }
            }
            Credentials::Mistral(c) => {
                if c.api_key.is_none() {
                    missing.push(FieldKind::ApiKey);
                }
            }
            Credentials::Ollama(c) => {
                if self.resolve_ollama_model(c).is_none() {
                    missing.push(FieldKind::Model);
                }
            }
        }
        missing
    }

    /// Resolve the configuration into a backend for generation requests
    ///
    /// `None` while [`missing_fields`](Self::missing_fields) is non-empty.
    pub fn generation_target(&self) -> Option<GenerationTarget> {
        let target = match &self.config.credentials {
            Credentials::OpenAI(c) => GenerationTarget::OpenAI {
                api_key: c.api_key.clone()?,
                model: c.model.unwrap_or_default(),
            },
            Credentials::AzureOpenAI(c) => GenerationTarget::AzureOpenAI {
                api_key: c.api_key.clone()?,
                endpoint: c.endpoint.clone()?,
                deployment_name: c.deployment_name.clone()?,
                api_version: c.api_version.unwrap_or_default(),
            },
            Credentials::Mistral(c) => GenerationTarget::Mistral {
                api_key: c.api_key.clone()?,
                model: c.model.unwrap_or_default(),
            },
            Credentials::Ollama(c) => GenerationTarget::Ollama {
                base_url: self.ollama_base_url.clone(),
                model: self.resolve_ollama_model(c)?,
            },
        };
        Some(target)
    }

    fn resolve_ollama_model(&self, c: &OllamaCredentials) -> Option<String> {
        match &c.model {
            Some(m) if self.ollama_models.contains(m) => Some(m.clone()),
            Some(_) => None,
            None => self.ollama_models.first().cloned(),
        }
    }

    /// Redacted snapshot for display
    pub fn summary(&self) -> ConfigurationSummary {
        let provider = self.config.provider();
        let creds = &self.config.credentials;
        let fields = Credentials::fields(provider)
            .iter()
            .map(|&field| FieldSummary {
                field,
                value: display_value(creds, field),
            })
            .collect();

        ConfigurationSummary {
            session_id: self.session_id,
            provider,
            fields,
            organization: self.config.organization,
            ollama_models: self.ollama_models.clone(),
            missing: self.missing_fields(),
        }
    }
}

fn display_value(creds: &Credentials, field: FieldKind) -> Option<String> {
    match (creds, field) {
        (_, FieldKind::ApiKey) => creds.api_key().map(|_| "set".to_string()),
        (Credentials::OpenAI(c), FieldKind::Model) => c.model.map(|m| m.id().to_string()),
        (Credentials::Mistral(c), FieldKind::Model) => c.model.map(|m| m.id().to_string()),
        (Credentials::Ollama(c), FieldKind::Model) => c.model.clone(),
        (Credentials::AzureOpenAI(c), FieldKind::Endpoint) => c.endpoint.clone(),
        (Credentials::AzureOpenAI(c), FieldKind::DeploymentName) => c.deployment_name.clone(),
        (Credentials::AzureOpenAI(c), FieldKind::ApiVersion) => {
            c.api_version.map(|v| v.id().to_string())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UnavailableCause;
    use async_trait::async_trait;
    use attackgen_protocol::{MistralModel, OpenAiModel};
    use pretty_assertions::assert_eq;
    use secrecy::{ExposeSecret, SecretString};
    use url::Url;

    struct FixedSource {
        url: Url,
        result: Result<Vec<String>, ()>,
    }

    impl FixedSource {
        fn ok(names: &[&str]) -> Self {
            Self {
                url: Url::parse("http://localhost:11434").unwrap(),
                result: Ok(names.iter().map(|s| s.to_string()).collect()),
            }
        }

        fn down() -> Self {
            Self {
                url: Url::parse("http://localhost:11434").unwrap(),
                result: Err(()),
            }
        }

        fn at(mut self, url: &str) -> Self {
            self.url = Url::parse(url).unwrap();
            self
        }
    }

    #[async_trait]
    impl ModelSource for FixedSource {
        fn base_url(&self) -> &Url {
            &self.url
        }

        async fn list_models(&self) -> Result<Vec<String>, ProviderUnavailable> {
            self.result.clone().map_err(|_| {
                ProviderUnavailable::new(
                    "http://localhost:11434/api/tags",
                    UnavailableCause::Connect("connection refused".to_string()),
                )
            })
        }
    }

    fn key(s: &str) -> CredentialField {
        CredentialField::ApiKey(SecretString::new(s.into()))
    }

    #[test]
    fn session_starts_empty_on_first_provider() {
        let store = ProviderConfigStore::new();
        assert_eq!(store.provider(), Provider::OpenAI);
        assert!(store.credentials().is_empty());
        assert_eq!(*store.organization(), OrganizationProfile::default());
        assert!(store.ollama_models().is_empty());
        assert_eq!(store.missing_fields(), vec![FieldKind::ApiKey]);
        assert!(store.generation_target().is_none());
    }

    #[test]
    fn reselecting_same_provider_still_resets() {
        let mut store = ProviderConfigStore::new();
        store.set_credential_field(key("sk-1"));
        store.set_provider(Provider::OpenAI);
        assert!(store.credentials().is_empty());
    }

    #[test]
    fn provider_switch_keeps_organization_profile() {
        let mut store = ProviderConfigStore::new();
        store.set_organization_profile(Industry::FinanceBanking, CompanySize::Large);
        store.set_provider(Provider::Mistral);
        store.set_provider(Provider::Ollama);
        assert_eq!(
            *store.organization(),
            OrganizationProfile::new(Industry::FinanceBanking, CompanySize::Large)
        );
    }

    #[test]
    fn foreign_field_write_is_ignored() {
        let mut store = ProviderConfigStore::new();
        store.set_provider(Provider::Mistral);
        assert!(!store.set_credential_field(CredentialField::OpenAiModel(OpenAiModel::Gpt4)));
        assert!(store.set_credential_field(CredentialField::MistralModel(MistralModel::Small)));
        assert!(store.credentials().is_set(FieldKind::Model));
    }

    #[test]
    fn openai_target_defaults_model() -> anyhow::Result<()> {
        let mut store = ProviderConfigStore::new();
        store.set_credential_field(key("sk-abc"));
        let target = store.generation_target().ok_or_else(|| anyhow::anyhow!("incomplete"))?;
        match target {
            GenerationTarget::OpenAI { api_key, model } => {
                assert_eq!(api_key.expose_secret(), "sk-abc");
                assert_eq!(model, OpenAiModel::Gpt4TurboPreview);
            }
            other => panic!("unexpected target: {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn azure_needs_endpoint_and_deployment() {
        let mut store = ProviderConfigStore::new();
        store.set_provider(Provider::AzureOpenAI);
        store.set_credential_field(key("az"));
        assert_eq!(
            store.missing_fields(),
            vec![FieldKind::Endpoint, FieldKind::DeploymentName]
        );
        store.set_credential_field(CredentialField::Endpoint(
            "https://res.openai.azure.com/".to_string(),
        ));
        store.set_credential_field(CredentialField::DeploymentName("dep".to_string()));
        assert!(store.missing_fields().is_empty());
        assert!(store.generation_target().is_some());
    }

    #[tokio::test]
    async fn discovery_success_populates_models() {
        let mut store = ProviderConfigStore::new();
        store.set_provider(Provider::Ollama);
        assert_eq!(store.missing_fields(), vec![FieldKind::Model]);

        let models = store
            .discover_ollama_models(&FixedSource::ok(&["llama2", "mistral"]))
            .await;
        assert_eq!(models, vec!["llama2", "mistral"]);
        assert_eq!(store.ollama_models(), ["llama2", "mistral"]);
        assert!(store.take_advisories().is_empty());
        assert!(store.missing_fields().is_empty());

        match store.generation_target() {
            Some(GenerationTarget::Ollama { model, base_url }) => {
                assert_eq!(model, "llama2");
                assert_eq!(base_url, "http://localhost:11434/");
            }
            other => panic!("unexpected target: {other:?}"),
        }
    }

    #[tokio::test]
    async fn discovery_failure_raises_one_advisory() {
        let mut store = ProviderConfigStore::new();
        store.set_provider(Provider::Ollama);
        store.discover_ollama_models(&FixedSource::ok(&["phi"])).await;

        let models = store.discover_ollama_models(&FixedSource::down()).await;
        assert!(models.is_empty());
        assert!(store.ollama_models().is_empty());

        let advisories = store.take_advisories();
        assert_eq!(advisories.len(), 1);
        assert_eq!(advisories[0].kind, AdvisoryKind::ProviderUnavailable);
        assert_eq!(advisories[0].message, guidance::OLLAMA_UNAVAILABLE);
        assert!(advisories[0].detail.contains("connection refused"));
        assert!(store.take_advisories().is_empty());
    }

    #[tokio::test]
    async fn stale_ollama_selection_is_cleared() {
        let mut store = ProviderConfigStore::new();
        store.set_provider(Provider::Ollama);
        store.set_credential_field(CredentialField::OllamaModel("gone:latest".to_string()));
        store.discover_ollama_models(&FixedSource::ok(&["llama2"])).await;
        assert!(!store.credentials().is_set(FieldKind::Model));

        store.set_credential_field(CredentialField::OllamaModel("llama2".to_string()));
        store.discover_ollama_models(&FixedSource::ok(&["llama2", "phi"])).await;
        assert!(store.credentials().is_set(FieldKind::Model));
    }

    #[tokio::test]
    async fn failed_discovery_targets_the_queried_url() {
        let mut store = ProviderConfigStore::new();
        store.set_provider(Provider::Ollama);
        store
            .discover_ollama_models(&FixedSource::down().at("http://127.0.0.1:9"))
            .await;
        store.set_credential_field(CredentialField::OllamaModel("llama2".to_string()));

        assert_eq!(store.missing_fields(), vec![FieldKind::Model]);
        assert!(store.generation_target().is_none());

        store
            .discover_ollama_models(&FixedSource::ok(&["llama2"]).at("http://127.0.0.1:11500"))
            .await;
        match store.generation_target() {
            Some(target) => assert_eq!(target.chat_url(), "http://127.0.0.1:11500/api/chat"),
            None => panic!("expected a target after successful discovery"),
        }
    }

    #[tokio::test]
    async fn provider_switch_restores_configured_ollama_url() {
        let mut store = ProviderConfigStore::new().with_ollama_url("http://127.0.0.1:11500");
        store.set_provider(Provider::Ollama);
        store
            .discover_ollama_models(&FixedSource::ok(&["phi"]).at("http://localhost:40000"))
            .await;

        store.set_provider(Provider::OpenAI);
        store.set_provider(Provider::Ollama);
        assert_eq!(store.ollama_base_url, "http://127.0.0.1:11500");
        store.set_credential_field(CredentialField::OllamaModel("phi".to_string()));
        assert!(store.ollama_models().is_empty());
        assert!(store.generation_target().is_none());

        store
            .discover_ollama_models(&FixedSource::ok(&["phi"]).at("http://127.0.0.1:11500"))
            .await;
        match store.generation_target() {
            Some(GenerationTarget::Ollama { base_url, .. }) => {
                assert_eq!(base_url, "http://127.0.0.1:11500/")
            }
            other => panic!("unexpected target: {other:?}"),
        }
        assert_eq!(store.default_ollama_url, "http://127.0.0.1:11500");
        assert_eq!(store.ollama_base_url, "http://127.0.0.1:11500/");
    }

    #[test]
    fn unlisted_ollama_model_is_missing() {
        let mut store = ProviderConfigStore::new();
        store.set_provider(Provider::Ollama);
        store.set_credential_field(CredentialField::OllamaModel("llama2".to_string()));
        assert_eq!(store.missing_fields(), vec![FieldKind::Model]);
        assert!(store.generation_target().is_none());
    }

    #[test]
    fn summary_never_contains_secrets() -> anyhow::Result<()> {
        let mut store = ProviderConfigStore::new();
        store.set_provider(Provider::Mistral);
        store.set_credential_field(key("mistral-secret-key"));
        store.set_organization_profile(Industry::Healthcare, CompanySize::Small);

        let summary = store.summary();
        assert_eq!(
            summary.fields,
            vec![
                FieldSummary {
                    field: FieldKind::ApiKey,
                    value: Some("set".to_string()),
                },
                FieldSummary {
                    field: FieldKind::Model,
                    value: None,
                },
            ]
        );
        let json = serde_json::to_string(&summary)?;
        assert!(!json.contains("mistral-secret-key"));
        assert!(json.contains("\"provider\":\"mistral\""));
        Ok(())
    }
}
