use async_trait::async_trait;
use rig::{agent::Agent, completion::Prompt, providers::openrouter};
use serde_json::Value;
use tracing::debug;

use super::{GenerationError, TextGenerator};

const JSON_ONLY_PREAMBLE: &str = r#"You answer with a single JSON object and nothing else.
Do not wrap it in Markdown. Do not add commentary.
The object must follow this schema (Gemini-style types: OBJECT, ARRAY, STRING):
"#;

/// OpenRouter-backed generator built on rig agents.
///
/// OpenRouter has no portable structured-output switch, so the shape goes into
/// the preamble instead.
pub struct OpenRouterGenerator {
    client: openrouter::Client,
    model: String,
}

impl OpenRouterGenerator {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: openrouter::Client::new(&api_key),
            model,
        }
    }

    fn agent(&self, schema: &Value) -> Agent<openrouter::CompletionModel> {
        let preamble = format!("{}{}", JSON_ONLY_PREAMBLE, schema);
        self.client.agent(&self.model).preamble(&preamble).build()
    }
}

#[async_trait]
impl TextGenerator for OpenRouterGenerator {
    async fn generate(&self, prompt: &str, schema: &Value) -> Result<String, GenerationError> {
        debug!(
            model = %self.model,
            prompt_len = prompt.len(),
            "Sending request to OpenRouter"
        );

        let response = self
            .agent(schema)
            .prompt(prompt.to_string())
            .await
            .map_err(|e| GenerationError::Api(e.to_string()))?;

        let text = strip_code_fence(&response);
        if text.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

/// Chat models like to fence JSON even when told not to
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = body.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`) on the opening fence line.
    match body.split_once('\n') {
        Some((info, rest)) if !info.trim_start().starts_with('{') => rest.trim(),
        _ => body.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence(r#"{"a":1}"#), r#"{"a":1}"#);
        assert_eq!(strip_code_fence("  {\"a\":1}\n"), r#"{"a":1}"#);
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), r#"{"a":1}"#);
        assert_eq!(strip_code_fence("```\n{\"a\":1}\n```"), r#"{"a":1}"#);
        assert_eq!(strip_code_fence("```{\"a\":1}```"), r#"{"a":1}"#);
        assert_eq!(strip_code_fence("```json\n{\"a\":1}"), "```json\n{\"a\":1}");
    }
}
