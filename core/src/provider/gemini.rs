use serde::Deserialize;
use serde_json::json;

use super::Provider;
use crate::error::ProviderError;
use crate::http::{HttpClient, HttpClientBuilder};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

pub struct GeminiProvider {
    client: HttpClient,
    api_key: String,
    model: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

impl GeminiProvider {
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
impl Provider for GeminiProvider {
    fn type_name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let url = format!("{}/{}:generateContent", BASE_URL, self.model);
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        let rsp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
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

        let rsp: GenerateContentResponse = rsp.json().await?;
        let text: String = rsp
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        let text = text.trim();
        if text.is_empty() {
            return Err(ProviderError::EmptyCompletion);
        }
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate_content_response() {
        let data = r#"{
            "candidates": [
                { "content": { "parts": [ { "text": "SELECT * " }, { "text": "FROM users;" } ] } }
            ]
        }"#;
        let rsp: GenerateContentResponse = serde_json::from_str(data).unwrap();
        let text: String = rsp
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();
        assert_eq!(text, "SELECT * FROM users;");
    }

    #[test]
    fn test_parse_empty_candidates() {
        let rsp: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(rsp.candidates.is_empty());
    }
}
