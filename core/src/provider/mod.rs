use crate::error::ProviderError;

pub mod gemini;
pub mod groq;

pub use gemini::GeminiProvider;
pub use groq::GroqProvider;

/// A remote text-generation service. Implementations own their HTTP client
/// and credentials; `generate` submits one prompt and returns the trimmed
/// completion text.
#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    fn type_name(&self) -> &'static str;
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}
