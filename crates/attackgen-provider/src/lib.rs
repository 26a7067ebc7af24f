//! Provider configuration for AttackGen sessions
//!
//! Holds the operator's choice of LLM provider together with the credentials
//! that provider needs, and the organization profile scenario generation is
//! tailored to.
//!
//! # Features
//! - Per-provider credential records as a sum type ([`Credentials`])
//! - Clean-slate provider switching; the organization profile survives it
//! - Installed-model discovery against a local Ollama service
//! - Discovery failures downgraded to operator advisories
//! - Resolution into a [`GenerationTarget`] for downstream generation calls
//! - Guidance copy looked up by provider and field
//!
//! # Example
//!
//! ```rust,no_run
//! use attackgen_provider::{OllamaDiscoveryClient, ProviderConfigStore};
//! use attackgen_protocol::Provider;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let mut store = ProviderConfigStore::new();
//! store.set_provider(Provider::Ollama);
//!
//! let client = OllamaDiscoveryClient::local()?;
//! let models = store.discover_ollama_models(&client).await;
//! for advisory in store.take_advisories() {
//!     eprintln!("{}", advisory.message);
//! }
//! println!("{models:?}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

pub mod credentials;
pub mod discovery;
pub mod error;
pub mod guidance;
pub mod settings;
pub mod store;
pub mod target;

pub use credentials::*;
pub use discovery::{ModelSource, OllamaDiscoveryClient, DEFAULT_OLLAMA_URL};
pub use error::*;
pub use settings::Settings;
pub use store::*;
pub use target::*;

pub use attackgen_protocol as protocol;
