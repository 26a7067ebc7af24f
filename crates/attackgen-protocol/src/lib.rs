//! AttackGen Protocol - Shared vocabulary for the AttackGen front-end
//!
//! This crate holds the closed choice sets an operator picks from while
//! setting up a session, plus the organization profile that scenario
//! generation reads. Everything here is plain data: no I/O, no secrets.
//!
//! # Core Types
//!
//! - [`Provider`] - The LLM backend selected for the session
//! - [`OpenAiModel`], [`AzureApiVersion`], [`MistralModel`] - Per-provider options
//! - [`Industry`], [`CompanySize`] - Organization profile choices
//! - [`OrganizationProfile`] - Industry and size, independent of the provider
//!
//! # Example
//!
//! ```rust
//! use attackgen_protocol::{CompanySize, Industry, OrganizationProfile, Provider};
//!
//! let provider: Provider = "Azure OpenAI Service".parse().unwrap();
//! assert_eq!(provider, Provider::AzureOpenAI);
//!
//! let mut profile = OrganizationProfile::default();
//! profile.set(Industry::Healthcare, CompanySize::Medium);
//! assert!(profile.is_complete());
//! ```

#![warn(missing_docs)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

#[macro_use]
mod choice;
/// Protocol models module
pub mod models;

pub use choice::ParseChoiceError;
pub use models::*;
