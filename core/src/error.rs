use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Unexpected status {code}: {body}")]
    Status {
        code: reqwest::StatusCode,
        body: String,
    },
    #[error("No completion in response")]
    EmptyCompletion,
}

/// One failed call against a single provider, kept for the exhaustion report.
#[derive(Debug)]
pub struct Attempt {
    pub provider: &'static str,
    pub error: ProviderError,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("No provider configured")]
    NoProviders,
    #[error("All providers failed ({})", .0.len())]
    Exhausted(Vec<Attempt>),
}
