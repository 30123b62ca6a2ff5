//! Upstream text generation.
//!
//! The planner only needs one capability from a model: turn a prompt plus an
//! advisory output shape into text that is hopefully JSON. Handlers depend on
//! [`TextGenerator`] so tests can swap in a fake.

pub mod gemini;
pub mod openrouter;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::config::{Config, Provider};
use gemini::{GeminiConfig, GeminiGenerator};
use openrouter::OpenRouterGenerator;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Content filtered")]
    ContentFiltered,

    #[error("Upstream response contained no text")]
    EmptyResponse,

    #[error("Upstream text is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Sends `prompt` with `schema` as the requested output shape and returns
    /// the raw response text.
    async fn generate(&self, prompt: &str, schema: &Value) -> Result<String, GenerationError>;
}

/// Builds the generator selected by configuration
pub fn build_generator(config: &Config) -> anyhow::Result<Arc<dyn TextGenerator>> {
    match config.provider {
        Provider::Gemini => {
            let api_key = config
                .gemini_api_key
                .clone()
                .ok_or_else(|| anyhow::anyhow!("GEMINI_API_KEY not set"))?;
            let generator = GeminiGenerator::new(GeminiConfig {
                api_key,
                model: config.model.clone(),
                api_base: config.gemini_api_base.clone(),
            })?;
            Ok(Arc::new(generator))
        }
        Provider::OpenRouter => {
            let api_key = config
                .openrouter_api_key
                .clone()
                .ok_or_else(|| anyhow::anyhow!("OPENROUTER_API_KEY not set"))?;
            Ok(Arc::new(OpenRouterGenerator::new(api_key, config.model.clone())))
        }
    }
}
