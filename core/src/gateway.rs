use crate::error::{Attempt, GatewayError};
use crate::provider::Provider;

/// Walks an ordered provider list with the same prompt until one answers.
/// Individual failures are logged and collected; only exhaustion of the whole
/// list is reported to the caller.
pub struct CompletionGateway {
    providers: Vec<Box<dyn Provider>>,
}

impl std::fmt::Debug for CompletionGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionGateway")
            .field("providers", &self.provider_names())
            .finish()
    }
}

impl CompletionGateway {
    pub fn new(providers: Vec<Box<dyn Provider>>) -> Self {
        Self { providers }
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.type_name()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        if self.providers.is_empty() {
            return Err(GatewayError::NoProviders);
        }

        let mut attempts = Vec::new();
        for provider in &self.providers {
            match provider.generate(prompt).await {
                Ok(text) => {
                    log::debug!(target: "gateway", "{} answered", provider.type_name());
                    return Ok(text);
                }
                Err(e) => {
                    log::warn!(target: "gateway", "{} failed: {}", provider.type_name(), e);
                    attempts.push(Attempt {
                        provider: provider.type_name(),
                        error: e,
                    });
                }
            }
        }
        Err(GatewayError::Exhausted(attempts))
    }
}
