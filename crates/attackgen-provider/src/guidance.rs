//! Operator-facing copy, looked up by provider and field

use attackgen_protocol::Provider;

use crate::credentials::FieldKind;

/// Introduction shown above the getting-started steps
pub const WELCOME: &str = "\
The MITRE ATT&CK framework is a powerful tool for understanding the tactics, techniques, and \
procedures (TTPs) used by threat actors; however, it can be difficult to translate this \
information into realistic scenarios for testing.

AttackGen solves this problem by using large language models to quickly generate attack \
scenarios based on a selection of a threat actor group's known techniques.";

/// Prompt for the provider dropdown
pub const PROVIDER_PROMPT: &str = "Select your preferred model provider:";

/// Help for the provider dropdown
pub const PROVIDER_HELP: &str = "Select the model provider you would like to use. \
This will determine the models available for selection.";

/// Prompt for the industry dropdown
pub const INDUSTRY_PROMPT: &str = "Select your company's industry:";

/// Prompt for the company size dropdown
pub const COMPANY_SIZE_PROMPT: &str = "Select your company's size:";

/// Shown when Ollama discovery fails
pub const OLLAMA_UNAVAILABLE: &str =
    "Ollama endpoint not found, please select a different model provider.";

const PAGES: &str = "Go to the `Threat Group Scenarios` page to generate a scenario based on a \
threat actor group's known techniques, or go to the `Custom Scenarios` page to generate a \
scenario based on your own selection of ATT&CK techniques.";

/// Numbered getting-started steps for `provider`
pub fn getting_started(provider: Provider) -> Vec<String> {
    let first = match provider {
        Provider::OpenAI => {
            "Enter your OpenAI API key, then select your preferred model, industry, and company \
             size from the sidebar."
        }
        Provider::AzureOpenAI => {
            "Enter the details of your Azure OpenAI Service model deployment, including the API \
             key, endpoint, deployment name, and API version."
        }
        Provider::Mistral => {
            "Enter your Mistral API key, then select your preferred model, industry, and company \
             size from the sidebar."
        }
        Provider::Ollama => {
            "Select your locally hosted model from the sidebar, then enter the details of the \
             application you would like to threat model."
        }
    };

    let mut steps = vec![first.to_string()];
    if provider == Provider::AzureOpenAI {
        steps.push("Select your industry and company size from the sidebar.".to_string());
    }
    steps.push(PAGES.to_string());
    steps
}

/// Input label for a provider's field
pub fn field_label(provider: Provider, field: FieldKind) -> &'static str {
    match (provider, field) {
        (Provider::OpenAI, FieldKind::ApiKey) => "Enter your OpenAI API key:",
        (Provider::AzureOpenAI, FieldKind::ApiKey) => "Azure OpenAI API key:",
        (Provider::Mistral, FieldKind::ApiKey) => "Enter your Mistral API key:",
        (_, FieldKind::ApiKey) => "API key:",
        (_, FieldKind::Model) => "Select the model you would like to use:",
        (_, FieldKind::Endpoint) => "Azure OpenAI endpoint:",
        (_, FieldKind::DeploymentName) => "Deployment name:",
        (_, FieldKind::ApiVersion) => "API version:",
    }
}

/// Help text for a provider's field, where the front-end shows any
pub fn field_help(provider: Provider, field: FieldKind) -> Option<&'static str> {
    match (provider, field) {
        (Provider::OpenAI, FieldKind::ApiKey) => Some(
            "You can find your OpenAI API key on the OpenAI dashboard \
             (https://platform.openai.com/account/api-keys).",
        ),
        (Provider::OpenAI, FieldKind::Model) => Some(
            "OpenAI have moved to continuous model upgrades so `gpt-3.5-turbo`, `gpt-4` and \
             `gpt-4-turbo-preview` point to the latest available version of each model.",
        ),
        (Provider::AzureOpenAI, FieldKind::ApiKey) => Some(
            "You can find your Azure OpenAI API key on the Azure portal \
             (https://portal.azure.com/).",
        ),
        (Provider::AzureOpenAI, FieldKind::Endpoint) => {
            Some("Example endpoint: https://YOUR_RESOURCE_NAME.openai.azure.com/")
        }
        (Provider::AzureOpenAI, FieldKind::ApiVersion) => {
            Some("Select OpenAI API version used by your deployment.")
        }
        (Provider::Mistral, FieldKind::ApiKey) => Some(
            "You can generate a Mistral API key in the Mistral console \
             (https://console.mistral.ai/api-keys/).",
        ),
        _ => None,
    }
}
