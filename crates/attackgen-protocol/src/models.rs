use serde::{Deserialize, Serialize};

choice_enum! {
    /// LLM backend selected for a session
    pub enum Provider: "provider" {
        /// OpenAI API (api.openai.com)
        OpenAI => ("openai", "OpenAI API"),
        /// Azure OpenAI Service deployment
        AzureOpenAI => ("azure", "Azure OpenAI Service"),
        /// Mistral API (api.mistral.ai)
        Mistral => ("mistral", "Mistral API"),
        /// Locally hosted Ollama instance
        Ollama => ("ollama", "Ollama"),
    }
}

/// The front-end preselects the first provider
impl Default for Provider {
    fn default() -> Self {
        Provider::OpenAI
    }
}

impl Provider {
    /// Whether this provider needs an API key
    pub fn requires_api_key(self) -> bool {
        !matches!(self, Provider::Ollama)
    }
}

choice_enum! {
    /// OpenAI chat models offered in the model dropdown
    ///
    /// OpenAI moved to continuous model upgrades, so each id points to the
    /// latest available version of that model.
    pub enum OpenAiModel: "OpenAI model" {
        /// gpt-4-turbo-preview
        Gpt4TurboPreview => ("gpt-4-turbo-preview", "gpt-4-turbo-preview"),
        /// gpt-4
        Gpt4 => ("gpt-4", "gpt-4"),
        /// gpt-3.5-turbo
        Gpt35Turbo => ("gpt-3.5-turbo", "gpt-3.5-turbo"),
    }
}

impl Default for OpenAiModel {
    fn default() -> Self {
        OpenAiModel::Gpt4TurboPreview
    }
}

choice_enum! {
    /// API versions an Azure OpenAI deployment may be pinned to
    pub enum AzureApiVersion: "Azure API version" {
        /// 2023-12-01-preview
        V2023_12_01Preview => ("2023-12-01-preview", "2023-12-01-preview"),
        /// 2023-05-15
        V2023_05_15 => ("2023-05-15", "2023-05-15"),
    }
}

impl Default for AzureApiVersion {
    fn default() -> Self {
        AzureApiVersion::V2023_12_01Preview
    }
}

choice_enum! {
    /// Mistral chat models offered in the model dropdown
    pub enum MistralModel: "Mistral model" {
        /// mistral-large-latest
        Large => ("mistral-large-latest", "mistral-large-latest"),
        /// mistral-medium-latest
        Medium => ("mistral-medium-latest", "mistral-medium-latest"),
        /// mistral-small-latest
        Small => ("mistral-small-latest", "mistral-small-latest"),
        /// open-mixtral-8x7b
        OpenMixtral8x7b => ("open-mixtral-8x7b", "open-mixtral-8x7b"),
    }
}

impl Default for MistralModel {
    fn default() -> Self {
        MistralModel::Large
    }
}

choice_enum! {
    /// Industry of the organization a scenario is generated for
    pub enum Industry: "industry" {
        /// Aerospace / Defense
        AerospaceDefense => ("aerospace_defense", "Aerospace / Defense"),
        /// Agriculture / Food Services
        AgricultureFoodServices => ("agriculture_food_services", "Agriculture / Food Services"),
        /// Automotive
        Automotive => ("automotive", "Automotive"),
        /// Construction
        Construction => ("construction", "Construction"),
        /// Education
        Education => ("education", "Education"),
        /// Energy / Utilities
        EnergyUtilities => ("energy_utilities", "Energy / Utilities"),
        /// Finance / Banking
        FinanceBanking => ("finance_banking", "Finance / Banking"),
        /// Government / Public Sector
        GovernmentPublicSector => ("government_public_sector", "Government / Public Sector"),
        /// Healthcare
        Healthcare => ("healthcare", "Healthcare"),
        /// Hospitality / Tourism
        HospitalityTourism => ("hospitality_tourism", "Hospitality / Tourism"),
        /// Insurance
        Insurance => ("insurance", "Insurance"),
        /// Legal Services
        LegalServices => ("legal_services", "Legal Services"),
        /// Manufacturing
        Manufacturing => ("manufacturing", "Manufacturing"),
        /// Media / Entertainment
        MediaEntertainment => ("media_entertainment", "Media / Entertainment"),
        /// Non-profit
        NonProfit => ("non_profit", "Non-profit"),
        /// Real Estate
        RealEstate => ("real_estate", "Real Estate"),
        /// Retail / E-commerce
        RetailEcommerce => ("retail_ecommerce", "Retail / E-commerce"),
        /// Technology / IT
        TechnologyIt => ("technology_it", "Technology / IT"),
        /// Telecommunication
        Telecommunication => ("telecommunication", "Telecommunication"),
        /// Transportation / Logistics
        TransportationLogistics => ("transportation_logistics", "Transportation / Logistics"),
    }
}

choice_enum! {
    /// Headcount band of the organization
    pub enum CompanySize: "company size" {
        /// 1-50 employees
        Small => ("small", "Small (1-50 employees)"),
        /// 51-200 employees
        Medium => ("medium", "Medium (51-200 employees)"),
        /// 201-1,000 employees
        Large => ("large", "Large (201-1,000 employees)"),
        /// 1,001-10,000 employees
        Enterprise => ("enterprise", "Enterprise (1,001-10,000 employees)"),
        /// 10,000+ employees
        LargeEnterprise => ("large_enterprise", "Large Enterprise (10,000+ employees)"),
    }
}

/// Organization the generated scenarios are tailored to
///
/// Independent of the provider: it survives provider switches untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationProfile {
    /// Selected industry, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<Industry>,
    /// Selected company size, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_size: Option<CompanySize>,
}

impl OrganizationProfile {
    /// Create a profile with both values set
    pub fn new(industry: Industry, company_size: CompanySize) -> Self {
        Self {
            industry: Some(industry),
            company_size: Some(company_size),
        }
    }

    /// Overwrite both values; the previous ones are not kept
    pub fn set(&mut self, industry: Industry, company_size: CompanySize) {
        self.industry = Some(industry);
        self.company_size = Some(company_size);
    }

    /// Whether both values have been chosen
    pub fn is_complete(&self) -> bool {
        self.industry.is_some() && self.company_size.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn choice_sets_have_expected_sizes() {
        assert_eq!(Provider::ALL.len(), 4);
        assert_eq!(OpenAiModel::ALL.len(), 3);
        assert_eq!(AzureApiVersion::ALL.len(), 2);
        assert_eq!(MistralModel::ALL.len(), 4);
        assert_eq!(Industry::ALL.len(), 20);
        assert_eq!(CompanySize::ALL.len(), 5);
    }

    #[test]
    fn industries_are_listed_alphabetically() {
        let labels: Vec<&str> = Industry::ALL.iter().map(|i| i.label()).collect();
        let mut sorted = labels.clone();
        sorted.sort_unstable();
        assert_eq!(labels, sorted);
    }

    #[test]
    fn provider_parses_label_and_id() -> anyhow::Result<()> {
        assert_eq!("OpenAI API".parse::<Provider>()?, Provider::OpenAI);
        assert_eq!("azure".parse::<Provider>()?, Provider::AzureOpenAI);
        assert_eq!("  MISTRAL ".parse::<Provider>()?, Provider::Mistral);
        assert_eq!("ollama".parse::<Provider>()?, Provider::Ollama);
        Ok(())
    }

    #[test]
    fn unknown_choice_is_rejected() {
        let err = "anthropic".parse::<Provider>().unwrap_err();
        assert_eq!(err.kind, "provider");
        assert_eq!(err.value, "anthropic");
        assert_eq!(err.to_string(), "unknown provider: \"anthropic\"");

        assert!("Huge (1M employees)".parse::<CompanySize>().is_err());
    }

    #[test]
    fn model_ids_round_trip_through_from_str() -> anyhow::Result<()> {
        for m in OpenAiModel::ALL {
            assert_eq!(m.id().parse::<OpenAiModel>()?, *m);
        }
        for m in MistralModel::ALL {
            assert_eq!(m.id().parse::<MistralModel>()?, *m);
        }
        assert_eq!(
            "2023-05-15".parse::<AzureApiVersion>()?,
            AzureApiVersion::V2023_05_15
        );
        Ok(())
    }

    #[test]
    fn defaults_are_first_choices() {
        assert_eq!(Provider::default(), Provider::ALL[0]);
        assert_eq!(OpenAiModel::default(), OpenAiModel::ALL[0]);
        assert_eq!(AzureApiVersion::default(), AzureApiVersion::ALL[0]);
        assert_eq!(MistralModel::default(), MistralModel::ALL[0]);
    }

    #[test]
    fn serde_uses_ids() -> anyhow::Result<()> {
        let json = serde_json::to_string(&Provider::AzureOpenAI)?;
        assert_eq!(json, "\"azure\"");

        let profile = OrganizationProfile::new(Industry::NonProfit, CompanySize::LargeEnterprise);
        let json = serde_json::to_value(profile)?;
        assert_eq!(
            json,
            serde_json::json!({"industry": "non_profit", "company_size": "large_enterprise"})
        );

        let back: OrganizationProfile = serde_json::from_value(json)?;
        assert_eq!(back, profile);
        Ok(())
    }

    #[test]
    fn organization_profile_keeps_only_latest_values() {
        let mut profile = OrganizationProfile::default();
        assert!(!profile.is_complete());

        profile.set(Industry::Insurance, CompanySize::Small);
        profile.set(Industry::Education, CompanySize::Enterprise);

        assert_eq!(profile.industry, Some(Industry::Education));
        assert_eq!(profile.company_size, Some(CompanySize::Enterprise));
    }

    #[test]
    fn only_ollama_skips_api_key() {
        let keyless: Vec<Provider> = Provider::ALL
            .iter()
            .copied()
            .filter(|p| !p.requires_api_key())
            .collect();
        assert_eq!(keyless, vec![Provider::Ollama]);
    }
}
