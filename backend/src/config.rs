use sqlgen_core::gateway::CompletionGateway;
use sqlgen_core::provider::{GeminiProvider, GroqProvider, Provider};
use sqlgen_core::Result;

/// Provider credentials resolved once at startup. A missing key disables
/// that provider with a warning; with no keys at all, startup fails listing
/// the missing variables.
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub groq_api_key: Option<String>,
}

impl Config {
    pub fn new(gemini_api_key: Option<String>, groq_api_key: Option<String>) -> Self {
        Self {
            gemini_api_key,
            groq_api_key,
        }
    }

    pub fn missing_keys(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.gemini_api_key.is_none() {
            missing.push("GEMINI_API_KEY");
        }
        if self.groq_api_key.is_none() {
            missing.push("GROQ_API_KEY");
        }
        missing
    }

    /// Ordered provider list: gemini first, groq as the fallback.
    pub fn build_gateway(&self) -> Result<CompletionGateway> {
        let mut providers: Vec<Box<dyn Provider>> = Vec::new();

        match &self.gemini_api_key {
            Some(key) => providers.push(Box::new(GeminiProvider::new(key.clone())?)),
            None => log::warn!("GEMINI_API_KEY is not set, gemini provider disabled"),
        }
        match &self.groq_api_key {
            Some(key) => providers.push(Box::new(GroqProvider::new(key.clone())?)),
            None => log::warn!("GROQ_API_KEY is not set, groq provider disabled"),
        }

        if providers.is_empty() {
            anyhow::bail!(
                "no completion provider configured, set {}",
                self.missing_keys().join(" and ")
            );
        }
        Ok(CompletionGateway::new(providers))
    }
}
