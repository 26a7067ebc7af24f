//! Per-provider credential records
//!
//! [`Credentials`] is keyed by provider: each variant carries exactly the
//! fields that provider's form asks for, so consumers match on it instead of
//! probing optional fields. Every field starts out unset.

use attackgen_protocol::{AzureApiVersion, MistralModel, OpenAiModel, Provider};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// OpenAI API settings
#[derive(Debug, Clone, Default)]
pub struct OpenAiCredentials {
    /// API key from the OpenAI dashboard
    pub api_key: Option<SecretString>,
    /// Chosen chat model
    pub model: Option<OpenAiModel>,
}

/// Azure OpenAI Service deployment settings
#[derive(Debug, Clone, Default)]
pub struct AzureCredentials {
    /// API key from the Azure portal
    pub api_key: Option<SecretString>,
    /// Resource endpoint, e.g. `https://NAME.openai.azure.com/`. Not validated.
    pub endpoint: Option<String>,
    /// Name of the model deployment
    pub deployment_name: Option<String>,
    /// API version the deployment is pinned to
    pub api_version: Option<AzureApiVersion>,
}

/// Mistral API settings
#[derive(Debug, Clone, Default)]
pub struct MistralCredentials {
    /// API key from the Mistral console
    pub api_key: Option<SecretString>,
    /// Chosen chat model
    pub model: Option<MistralModel>,
}

/// Local Ollama settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OllamaCredentials {
    /// One of the names reported by discovery
    pub model: Option<String>,
}

/// Credential record for the active provider
#[derive(Debug, Clone)]
pub enum Credentials {
    /// OpenAI API
    OpenAI(OpenAiCredentials),
    /// Azure OpenAI Service
    AzureOpenAI(AzureCredentials),
    /// Mistral API
    Mistral(MistralCredentials),
    /// Ollama
    Ollama(OllamaCredentials),
}

/// Names of the inputs a provider form can have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Secret API key
    ApiKey,
    /// Model selection
    Model,
    /// Azure resource endpoint
    Endpoint,
    /// Azure deployment name
    DeploymentName,
    /// Azure API version
    ApiVersion,
}

impl FieldKind {
    /// Short name used in logs and summaries
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::ApiKey => "api_key",
            FieldKind::Model => "model",
            FieldKind::Endpoint => "endpoint",
            FieldKind::DeploymentName => "deployment_name",
            FieldKind::ApiVersion => "api_version",
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single credential write, carrying its value
///
/// Empty strings and empty secrets clear the field.
#[derive(Debug, Clone)]
pub enum CredentialField {
    /// API key (OpenAI, Azure, Mistral)
    ApiKey(SecretString),
    /// OpenAI model choice
    OpenAiModel(OpenAiModel),
    /// Mistral model choice
    MistralModel(MistralModel),
    /// Azure endpoint URL
    Endpoint(String),
    /// Azure deployment name
    DeploymentName(String),
    /// Azure API version
    ApiVersion(AzureApiVersion),
    /// Ollama model name
    OllamaModel(String),
}

impl CredentialField {
    /// Which input this write targets
    pub fn kind(&self) -> FieldKind {
        match self {
            CredentialField::ApiKey(_) => FieldKind::ApiKey,
            CredentialField::OpenAiModel(_)
            | CredentialField::MistralModel(_)
            | CredentialField::OllamaModel(_) => FieldKind::Model,
            CredentialField::Endpoint(_) => FieldKind::Endpoint,
            CredentialField::DeploymentName(_) => FieldKind::DeploymentName,
            CredentialField::ApiVersion(_) => FieldKind::ApiVersion,
        }
    }
}

impl Credentials {
    /// Empty record shaped for `provider`
    pub fn empty(provider: Provider) -> Self {
        match provider {
            Provider::OpenAI => Credentials::OpenAI(OpenAiCredentials::default()),
            Provider::AzureOpenAI => Credentials::AzureOpenAI(AzureCredentials::default()),
            Provider::Mistral => Credentials::Mistral(MistralCredentials::default()),
            Provider::Ollama => Credentials::Ollama(OllamaCredentials::default()),
        }
    }

    /// Provider this record belongs to
    pub fn provider(&self) -> Provider {
        match self {
            Credentials::OpenAI(_) => Provider::OpenAI,
            Credentials::AzureOpenAI(_) => Provider::AzureOpenAI,
            Credentials::Mistral(_) => Provider::Mistral,
            Credentials::Ollama(_) => Provider::Ollama,
        }
    }

    /// Inputs the provider's form shows, in display order
    pub fn fields(provider: Provider) -> &'static [FieldKind] {
        match provider {
            Provider::OpenAI | Provider::Mistral => &[FieldKind::ApiKey, FieldKind::Model],
            Provider::AzureOpenAI => &[
                FieldKind::ApiKey,
                FieldKind::Endpoint,
                FieldKind::DeploymentName,
                FieldKind::ApiVersion,
            ],
            Provider::Ollama => &[FieldKind::Model],
        }
    }

    /// True when no field has been set
    pub fn is_empty(&self) -> bool {
        match self {
            Credentials::OpenAI(c) => c.api_key.is_none() && c.model.is_none(),
            Credentials::AzureOpenAI(c) => {
                c.api_key.is_none()
                    && c.endpoint.is_none()
                    && c.deployment_name.is_none()
                    && c.api_version.is_none()
            }
            Credentials::Mistral(c) => c.api_key.is_none() && c.model.is_none(),
            Credentials::Ollama(c) => c.model.is_none(),
        }
    }

    /// The API key, if this provider has one and it is set
    pub fn api_key(&self) -> Option<&SecretString> {
        match self {
            Credentials::OpenAI(c) => c.api_key.as_ref(),
            Credentials::AzureOpenAI(c) => c.api_key.as_ref(),
            Credentials::Mistral(c) => c.api_key.as_ref(),
            Credentials::Ollama(_) => None,
        }
    }

    /// Whether `kind` holds a value
    pub fn is_set(&self, kind: FieldKind) -> bool {
        match (self, kind) {
            (_, FieldKind::ApiKey) => self.api_key().is_some(),
            (Credentials::OpenAI(c), FieldKind::Model) => c.model.is_some(),
            (Credentials::Mistral(c), FieldKind::Model) => c.model.is_some(),
            (Credentials::Ollama(c), FieldKind::Model) => c.model.is_some(),
            (Credentials::AzureOpenAI(c), FieldKind::Endpoint) => c.endpoint.is_some(),
            (Credentials::AzureOpenAI(c), FieldKind::DeploymentName) => {
                c.deployment_name.is_some()
            }
            (Credentials::AzureOpenAI(c), FieldKind::ApiVersion) => c.api_version.is_some(),
            _ => false,
        }
    }

    /// Write one field into this record
    ///
    /// Returns `false`, leaving the record untouched, when the variant has no
    /// such field.
    pub fn apply(&mut self, field: CredentialField) -> bool {
        match (self, field) {
            (Credentials::OpenAI(c), CredentialField::ApiKey(v)) => c.api_key = non_empty_secret(v),
            (Credentials::AzureOpenAI(c), CredentialField::ApiKey(v)) => {
                c.api_key = non_empty_secret(v)
            }
            (Credentials::Mistral(c), CredentialField::ApiKey(v)) => {
                c.api_key = non_empty_secret(v)
            }
            (Credentials::OpenAI(c), CredentialField::OpenAiModel(m)) => c.model = Some(m),
            (Credentials::Mistral(c), CredentialField::MistralModel(m)) => c.model = Some(m),
            (Credentials::AzureOpenAI(c), CredentialField::Endpoint(v)) => {
                c.endpoint = non_empty(v)
            }
            (Credentials::AzureOpenAI(c), CredentialField::DeploymentName(v)) => {
                c.deployment_name = non_empty(v)
            }
            (Credentials::AzureOpenAI(c), CredentialField::ApiVersion(v)) => {
                c.api_version = Some(v)
            }
            (Credentials::Ollama(c), CredentialField::OllamaModel(v)) => c.model = non_empty(v),
            _ => return false,
        }
        true
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn non_empty_secret(value: SecretString) -> Option<SecretString> {
    if value.expose_secret().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn secret(s: &str) -> SecretString {
        SecretString::new(s.into())
    }

    #[test]
    fn empty_matches_provider_shape() {
        for p in Provider::ALL {
            let c = Credentials::empty(*p);
            assert_eq!(c.provider(), *p);
            assert!(c.is_empty());
            for kind in Credentials::fields(*p) {
                assert!(!c.is_set(*kind));
            }
        }
    }

    #[test]
    fn apply_writes_matching_fields() {
        let mut c = Credentials::empty(Provider::AzureOpenAI);
        assert!(c.apply(CredentialField::ApiKey(secret("az-key"))));
        assert!(c.apply(CredentialField::Endpoint(
            "https://res.openai.azure.com/".to_string()
        )));
        assert!(c.apply(CredentialField::DeploymentName("gpt4".to_string())));
        assert!(c.apply(CredentialField::ApiVersion(AzureApiVersion::V2023_05_15)));

        match &c {
            Credentials::AzureOpenAI(a) => {
                assert_eq!(
                    a.api_key.as_ref().map(|k| k.expose_secret()),
                    Some("az-key")
                );
                assert_eq!(a.endpoint.as_deref(), Some("https://res.openai.azure.com/"));
                assert_eq!(a.deployment_name.as_deref(), Some("gpt4"));
                assert_eq!(a.api_version, Some(AzureApiVersion::V2023_05_15));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn apply_ignores_foreign_fields() {
        let mut c = Credentials::empty(Provider::Ollama);
        assert!(!c.apply(CredentialField::ApiKey(secret("sk-test"))));
        assert!(!c.apply(CredentialField::OpenAiModel(OpenAiModel::Gpt4)));
        assert!(c.is_empty());

        let mut c = Credentials::empty(Provider::OpenAI);
        assert!(!c.apply(CredentialField::MistralModel(MistralModel::Small)));
        assert!(!c.apply(CredentialField::Endpoint("https://x".to_string())));
        assert!(c.is_empty());
    }

    #[test]
    fn empty_values_clear_fields() {
        let mut c = Credentials::empty(Provider::Mistral);
        c.apply(CredentialField::ApiKey(secret("m-key")));
        assert!(c.is_set(FieldKind::ApiKey));

        c.apply(CredentialField::ApiKey(secret("")));
        assert!(!c.is_set(FieldKind::ApiKey));

        let mut c = Credentials::empty(Provider::AzureOpenAI);
        c.apply(CredentialField::DeploymentName("   ".to_string()));
        assert!(c.is_empty());
    }

    #[test]
    fn api_key_is_redacted_in_debug() {
        let mut c = Credentials::empty(Provider::OpenAI);
        c.apply(CredentialField::ApiKey(secret("sk-very-secret")));
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("sk-very-secret"));
    }

    #[test]
    fn field_kinds_map_writes() {
        assert_eq!(
            CredentialField::OllamaModel("llama2".into()).kind(),
            FieldKind::Model
        );
        assert_eq!(
            CredentialField::ApiVersion(AzureApiVersion::default()).kind(),
            FieldKind::ApiVersion
        );
        assert_eq!(FieldKind::DeploymentName.to_string(), "deployment_name");
    }
}
