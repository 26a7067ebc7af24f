//! Fully resolved backend for scenario generation requests

use attackgen_protocol::{AzureApiVersion, MistralModel, OpenAiModel, Provider};
use secrecy::SecretString;

/// Base URL of the OpenAI API
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
/// Base URL of the Mistral API
pub const MISTRAL_BASE_URL: &str = "https://api.mistral.ai/v1";

/// Everything a generation call needs to reach the chosen backend
///
/// Only produced from a complete configuration, so every field is present.
#[derive(Debug, Clone)]
pub enum GenerationTarget {
    /// OpenAI chat completions
    OpenAI {
        /// API key
        api_key: SecretString,
        /// Chat model
        model: OpenAiModel,
    },
    /// Azure OpenAI deployment
    AzureOpenAI {
        /// API key
        api_key: SecretString,
        /// Resource endpoint as entered
        endpoint: String,
        /// Deployment name
        deployment_name: String,
        /// API version
        api_version: AzureApiVersion,
    },
    /// Mistral chat completions
    Mistral {
        /// API key
        api_key: SecretString,
        /// Chat model
        model: MistralModel,
    },
    /// Local Ollama chat
    Ollama {
        /// Ollama base URL
        base_url: String,
        /// Installed model name
        model: String,
    },
}

impl GenerationTarget {
    /// Provider this target talks to
    pub fn provider(&self) -> Provider {
        match self {
            GenerationTarget::OpenAI { .. } => Provider::OpenAI,
            GenerationTarget::AzureOpenAI { .. } => Provider::AzureOpenAI,
            GenerationTarget::Mistral { .. } => Provider::Mistral,
            GenerationTarget::Ollama { .. } => Provider::Ollama,
        }
    }

    /// Model identifier sent with requests (the deployment name for Azure)
    pub fn model(&self) -> &str {
        match self {
            GenerationTarget::OpenAI { model, .. } => model.id(),
            GenerationTarget::AzureOpenAI {
                deployment_name, ..
            } => deployment_name,
            GenerationTarget::Mistral { model, .. } => model.id(),
            GenerationTarget::Ollama { model, .. } => model,
        }
    }

    /// API key, absent for Ollama
    pub fn api_key(&self) -> Option<&SecretString> {
        match self {
            GenerationTarget::OpenAI { api_key, .. }
            | GenerationTarget::AzureOpenAI { api_key, .. }
            | GenerationTarget::Mistral { api_key, .. } => Some(api_key),
            GenerationTarget::Ollama { .. } => None,
        }
    }

    /// URL a chat request is posted to
    pub fn chat_url(&self) -> String {
        match self {
            GenerationTarget::OpenAI { .. } => format!("{OPENAI_BASE_URL}/chat/completions"),
            GenerationTarget::Mistral { .. } => format!("{MISTRAL_BASE_URL}/chat/completions"),
            GenerationTarget::AzureOpenAI {
                endpoint,
                deployment_name,
                api_version,
                ..
            } => format!(
                "{}/openai/deployments/{}/chat/completions?api-version={}",
                endpoint.trim().trim_end_matches('/'),
                deployment_name.trim(),
                api_version.id()
            ),
            GenerationTarget::Ollama { base_url, .. } => {
                format!("{}/api/chat", base_url.trim_end_matches('/'))
            }
        }
    }
}
