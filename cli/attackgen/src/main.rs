//! AttackGen provider setup CLI

use std::time::Duration;

use anyhow::{bail, Context};
use attackgen_protocol::{
    AzureApiVersion, CompanySize, Industry, MistralModel, OpenAiModel, Provider,
};
use attackgen_provider::{
    guidance, Advisory, CredentialField, Credentials, OllamaDiscoveryClient, ProviderConfigStore,
    Settings,
};
use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use secrecy::SecretString;
use serde_json::json;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "attackgen")]
#[command(about = "AttackGen - LLM provider setup for ATT&CK scenario generation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every provider, model, industry and company size choice
    Options {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the models installed on a local Ollama service
    Discover {
        /// Ollama base URL (defaults to ATTACKGEN_OLLAMA_URL or http://localhost:11434)
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Show the getting-started guide for a provider
    Guide {
        /// Provider (openai, azure, mistral, ollama)
        #[arg(short, long, default_value = "openai")]
        provider: Provider,
    },

    /// Configure a session and show what generation would use
    Configure(ConfigureArgs),
}

#[derive(clap::Args)]
struct ConfigureArgs {
    /// Provider (openai, azure, mistral, ollama)
    #[arg(short, long)]
    provider: Provider,

    /// API key; falls back to OPENAI_API_KEY, AZURE_OPENAI_API_KEY or MISTRAL_API_KEY
    #[arg(short = 'k', long)]
    api_key: Option<String>,

    /// Model name (OpenAI, Mistral or an installed Ollama model)
    #[arg(short, long)]
    model: Option<String>,

    /// Azure OpenAI endpoint
    #[arg(long)]
    endpoint: Option<String>,

    /// Azure deployment name
    #[arg(long)]
    deployment: Option<String>,

    /// Azure API version
    #[arg(long)]
    api_version: Option<AzureApiVersion>,

    /// Company industry
    #[arg(long, requires = "company_size")]
    industry: Option<Industry>,

    /// Company size band
    #[arg(long, requires = "industry")]
    company_size: Option<CompanySize>,

    /// Ollama base URL (defaults to ATTACKGEN_OLLAMA_URL or http://localhost:11434)
    #[arg(long)]
    ollama_url: Option<String>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Setup logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env();
    debug!(?settings, "Loaded settings");

    match cli.command {
        Commands::Options { json } => print_options(json),
        Commands::Discover { url } => discover(url.unwrap_or(settings.ollama_url)).await,
        Commands::Guide { provider } => {
            print_guide(provider, &settings);
            Ok(())
        }
        Commands::Configure(args) => configure(args, &settings).await,
    }
}

fn print_options(as_json: bool) -> anyhow::Result<()> {
    if as_json {
        let out = json!({
            "providers": Provider::ALL,
            "openai_models": OpenAiModel::ALL,
            "azure_api_versions": AzureApiVersion::ALL,
            "mistral_models": MistralModel::ALL,
            "industries": Industry::ALL,
            "company_sizes": CompanySize::ALL,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    print_choices("Providers", Provider::ALL.iter().map(|c| (c.id(), c.label())));
    print_choices("OpenAI models", OpenAiModel::ALL.iter().map(|c| (c.id(), c.label())));
    print_choices(
        "Azure API versions",
        AzureApiVersion::ALL.iter().map(|c| (c.id(), c.label())),
    );
    print_choices("Mistral models", MistralModel::ALL.iter().map(|c| (c.id(), c.label())));
    print_choices("Industries", Industry::ALL.iter().map(|c| (c.id(), c.label())));
    print_choices("Company sizes", CompanySize::ALL.iter().map(|c| (c.id(), c.label())));
    Ok(())
}

fn print_choices<'a>(title: &str, choices: impl Iterator<Item = (&'a str, &'a str)>) {
    println!("{}", style(title).bold());
    for (id, label) in choices {
        if id == label {
            println!("  {id}");
        } else {
            println!("  {:<26} {}", id, style(label).dim());
        }
    }
    println!();
}

async fn discover(url: String) -> anyhow::Result<()> {
    let client = OllamaDiscoveryClient::new(&url)
        .with_context(|| format!("cannot use Ollama URL {url}"))?;
    let mut store = ProviderConfigStore::new().with_ollama_url(url.as_str());
    store.set_provider(Provider::Ollama);

    let models = with_spinner("Querying Ollama...", store.discover_ollama_models(&client)).await;
    print_advisories(store.take_advisories());

    if models.is_empty() {
        println!("{}", style("No models available.").yellow());
    } else {
        println!("{}", style("Installed models:").bold());
        for name in models {
            println!("  {name}");
        }
    }
    Ok(())
}

fn print_guide(provider: Provider, settings: &Settings) {
    println!("{}", style("Welcome to AttackGen").bold().cyan());
    println!();
    println!("{}", guidance::WELCOME);
    println!();
    println!("{}", style(format!("Getting Started ({provider})")).bold());
    for (i, step) in guidance::getting_started(provider).iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }
    println!();
    println!("{}", style("Inputs").bold());
    println!("  {} {}", guidance::PROVIDER_PROMPT, provider);
    println!("      {}", style(guidance::PROVIDER_HELP).dim());
    for field in Credentials::fields(provider) {
        println!("  {}", guidance::field_label(provider, *field));
        if let Some(help) = guidance::field_help(provider, *field) {
            println!("      {}", style(help).dim());
        }
    }
    println!("  {}", guidance::INDUSTRY_PROMPT);
    println!("  {}", guidance::COMPANY_SIZE_PROMPT);
    if !settings.contact_email.is_empty() {
        println!();
        println!("Contact: {}", settings.contact_email);
    }
}

async fn configure(args: ConfigureArgs, settings: &Settings) -> anyhow::Result<()> {
    let provider = args.provider;
    let ollama_url = args
        .ollama_url
        .clone()
        .unwrap_or_else(|| settings.ollama_url.clone());
    let mut store = ProviderConfigStore::new().with_ollama_url(ollama_url.as_str());
    store.set_provider(provider);

    if let Some(var) = api_key_env(provider) {
        let key = args.api_key.or_else(|| std::env::var(var).ok());
        if let Some(key) = key {
            store.set_credential_field(CredentialField::ApiKey(SecretString::new(key.into())));
        }
    } else if args.api_key.is_some() {
        warn!(%provider, "Provider does not use an API key; ignoring --api-key");
    }

    match provider {
        Provider::OpenAI => {
            if let Some(m) = &args.model {
                let model: OpenAiModel = m.parse()?;
                store.set_credential_field(CredentialField::OpenAiModel(model));
            }
        }
        Provider::Mistral => {
            if let Some(m) = &args.model {
                let model: MistralModel = m.parse()?;
                store.set_credential_field(CredentialField::MistralModel(model));
            }
        }
        Provider::AzureOpenAI => {
            if args.model.is_some() {
                bail!("Azure OpenAI uses --deployment instead of --model");
            }
            if let Some(endpoint) = args.endpoint.clone() {
                store.set_credential_field(CredentialField::Endpoint(endpoint));
            }
            if let Some(deployment) = args.deployment.clone() {
                store.set_credential_field(CredentialField::DeploymentName(deployment));
            }
            if let Some(version) = args.api_version {
                store.set_credential_field(CredentialField::ApiVersion(version));
            }
        }
        Provider::Ollama => {
            let client = OllamaDiscoveryClient::new(&ollama_url)
                .with_context(|| format!("cannot use Ollama URL {ollama_url}"))?;
            let models =
                with_spinner("Querying Ollama...", store.discover_ollama_models(&client)).await;
            if let Some(m) = &args.model {
                if !models.is_empty() && !models.contains(m) {
                    warn!(model = %m, "Model is not installed on the Ollama service");
                }
                store.set_credential_field(CredentialField::OllamaModel(m.clone()));
            }
        }
    }

    if provider != Provider::AzureOpenAI
        && (args.endpoint.is_some() || args.deployment.is_some() || args.api_version.is_some())
    {
        warn!(%provider, "Azure-only options ignored");
    }

    if let (Some(industry), Some(size)) = (args.industry, args.company_size) {
        store.set_organization_profile(industry, size);
    }

    let advisories = store.take_advisories();
    let summary = store.summary();

    if args.json {
        let out = json!({
            "summary": summary,
            "advisories": advisories,
            "ready": store.generation_target().is_some(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    print_advisories(advisories);

    println!("{}", style(format!("Provider: {}", summary.provider)).bold());
    for f in &summary.fields {
        let label = guidance::field_label(provider, f.field);
        match &f.value {
            Some(v) => println!("  {label} {v}"),
            None => println!("  {label} {}", style("(unset)").dim()),
        }
    }
    if !summary.ollama_models.is_empty() {
        println!("  Installed: {}", summary.ollama_models.join(", "));
    }

    let org = summary.organization;
    println!(
        "Industry: {}",
        org.industry.map(|i| i.label()).unwrap_or("(unset)")
    );
    println!(
        "Company size: {}",
        org.company_size.map(|s| s.label()).unwrap_or("(unset)")
    );
    println!();

    match store.generation_target() {
        Some(target) => {
            println!(
                "{} {} via {}",
                style("Ready:").green().bold(),
                target.model(),
                target.chat_url()
            );
        }
        None => {
            let missing: Vec<String> = summary.missing.iter().map(|f| f.to_string()).collect();
            println!(
                "{} missing {}",
                style("Not ready:").yellow().bold(),
                missing.join(", ")
            );
            println!();
            for (i, step) in guidance::getting_started(provider).iter().enumerate() {
                println!("  {}. {}", i + 1, step);
            }
        }
    }
    Ok(())
}

/// Environment variable holding the provider's API key; `None` when it takes none
fn api_key_env(provider: Provider) -> Option<&'static str> {
    match provider {
        Provider::OpenAI => Some("OPENAI_API_KEY"),
        Provider::AzureOpenAI => Some("AZURE_OPENAI_API_KEY"),
        Provider::Mistral => Some("MISTRAL_API_KEY"),
        Provider::Ollama => None,
    }
}

fn print_advisories(advisories: Vec<Advisory>) {
    for a in advisories {
        eprintln!("{} {}", style("⚠").yellow().bold(), style(&a.message).yellow());
        debug!(detail = %a.detail, "Advisory detail");
    }
}

async fn with_spinner<F, T>(message: &'static str, fut: F) -> T
where
    F: std::future::Future<Output = T>,
{
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    let out = fut.await;
    pb.finish_and_clear();
    out
}
