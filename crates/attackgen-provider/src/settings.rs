//! Environment-provided settings
//!
//! Every variable is optional. Invalid values are logged and replaced by the
//! default so a session can always start.

use std::env;

use tracing::warn;

use crate::discovery::{sanitize_base_url, DEFAULT_OLLAMA_URL};

/// Contact identifier pre-supplied to the front-end
pub const ENV_EMAIL: &str = "ATTACKGEN_EMAIL";
/// Override for the Ollama discovery base URL
pub const ENV_OLLAMA_URL: &str = "ATTACKGEN_OLLAMA_URL";

/// Settings read once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Contact identifier; empty when not provided
    pub contact_email: String,
    /// Base URL used for Ollama discovery
    pub ollama_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            contact_email: String::new(),
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
        }
    }
}

impl Settings {
    /// Read settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through an arbitrary lookup, e.g. a map in tests
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(email) = lookup(ENV_EMAIL) {
            settings.contact_email = email.trim().to_string();
        }

        if let Some(url) = lookup(ENV_OLLAMA_URL) {
            match sanitize_base_url(&url) {
                Ok(_) => settings.ollama_url = url.trim().to_string(),
                Err(e) => {
                    warn!("Invalid value '{}' for {}: {}. Using default.", url, ENV_OLLAMA_URL, e)
                }
            }
        }

        settings
    }
}
