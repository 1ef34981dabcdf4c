//! Completion service configuration

use super::{LlmService, LoggingService, OpenAIService};
use std::sync::Arc;

const DEFAULT_BASE_URL: &str = "https://api.perplexity.ai";
const DEFAULT_MODEL: &str = "sonar";
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Configuration for the completion service
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl LlmConfig {
    /// Read `LLM_*` variables; `PERPLEXITY_API_KEY` is accepted as the key too.
    ///
    /// A malformed `LLM_MAX_TOKENS` is reported as `Err` with the raw value.
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();
        let max_tokens = match std::env::var("LLM_MAX_TOKENS") {
            Ok(raw) => raw.trim().parse().map_err(|_| raw)?,
            Err(_) => defaults.max_tokens,
        };
        Ok(Self {
            api_key: std::env::var("LLM_API_KEY")
                .or_else(|_| std::env::var("PERPLEXITY_API_KEY"))
                .ok(),
            base_url: std::env::var("LLM_BASE_URL").unwrap_or(defaults.base_url),
            model: std::env::var("LLM_MODEL").unwrap_or(defaults.model),
            max_tokens,
        })
    }

    /// Build the logging-wrapped service; `None` without a usable key
    pub fn build_service(&self) -> Option<Arc<dyn LlmService>> {
        let api_key = self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())?;

        match OpenAIService::new(api_key.to_string(), self.model.clone(), &self.base_url) {
            Ok(service) => Some(Arc::new(LoggingService::new(Arc::new(service)))),
            Err(e) => {
                tracing::error!(error = %e, "Failed to create completion service");
                None
            }
        }
    }
}
