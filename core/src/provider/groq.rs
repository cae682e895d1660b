use serde::Deserialize;
use serde_json::json;

use super::Provider;
use crate::error::ProviderError;
use crate::http::{HttpClient, HttpClientBuilder};

const CHAT_COMPLETIONS_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

pub struct GroqProvider {
    client: HttpClient,
    api_key: String,
    model: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

impl GroqProvider {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        Self::with_model(api_key, DEFAULT_MODEL)
    }

    pub fn with_model(
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let client = HttpClientBuilder::new().build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
        })
    }
}

#[async_trait::async_trait]
impl Provider for GroqProvider {
    fn type_name(&self) -> &'static str {
        "groq"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        // Temperature fixed at 0.
        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": 0,
        });

        let rsp = self
            .client
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = rsp.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                code: status,
                body: rsp.text().await.unwrap_or_default(),
            });
        }

        let rsp: ChatCompletionResponse = rsp.json().await?;
        let text = rsp
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        let text = text.trim();
        if text.is_empty() {
            return Err(ProviderError::EmptyCompletion);
        }
        Ok(text.to_string())
    }
}
