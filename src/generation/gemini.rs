//! Gemini `generateContent` client with JSON-mode output.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{GenerationError, TextGenerator};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
}

pub struct GeminiGenerator {
    config: GeminiConfig,
    client: Client,
}

impl GeminiGenerator {
    pub fn new(config: GeminiConfig) -> anyhow::Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(anyhow::anyhow!("Gemini API key is empty"));
        }
        let client = Client::builder().build()?;
        Ok(Self { config, client })
    }

    /// The key travels in a header so it never shows up in request URLs.
    fn api_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str, schema: &Value) -> Result<String, GenerationError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: None,
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            },
        };

        debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(self.api_url())
            .header(API_KEY_HEADER, self.config.api_key.as_str())
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(GenerationError::RateLimited);
            }
            let error_text = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api(format!(
                "Gemini API error {}: {}",
                status, error_text
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| {
                GenerationError::Api(format!("Failed to parse response: {}", e.without_url()))
            })?;

        let candidate = body.candidates.into_iter().next();
        if candidate
            .as_ref()
            .and_then(|c| c.finish_reason.as_deref())
            == Some("SAFETY")
        {
            return Err(GenerationError::ContentFiltered);
        }

        candidate
            .and_then(|c| c.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .ok_or(GenerationError::EmptyResponse)
    }
}

// Gemini wire types, trimmed to the fields the planner uses.

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::{Path, RawQuery, State},
        http::{HeaderMap, StatusCode as AxumStatus, header},
        routing::post,
    };
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    const TEST_KEY: &str = "test-secret-key";

    #[derive(Debug)]
    struct SeenRequest {
        model_call: String,
        key: String,
        query: Option<String>,
        body: Value,
    }

    #[derive(Clone)]
    struct FakeGemini {
        status: AxumStatus,
        reply: String,
        seen: Arc<Mutex<Vec<SeenRequest>>>,
    }

    async fn generate_content(
        State(fake): State<FakeGemini>,
        Path(model_call): Path<String>,
        RawQuery(query): RawQuery,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (AxumStatus, [(header::HeaderName, &'static str); 1], String) {
        let key = headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        fake.seen.lock().unwrap().push(SeenRequest {
            model_call,
            key,
            query,
            body,
        });
        (
            fake.status,
            [(header::CONTENT_TYPE, "application/json")],
            fake.reply.clone(),
        )
    }

    /// Serves a canned Gemini reply on an ephemeral port
    async fn spawn_fake(status: AxumStatus, reply: Value) -> (GeminiGenerator, FakeGemini) {
        spawn_fake_raw(status, reply.to_string()).await
    }

    async fn spawn_fake_raw(status: AxumStatus, reply: String) -> (GeminiGenerator, FakeGemini) {
        let fake = FakeGemini {
            status,
            reply,
            seen: Arc::new(Mutex::new(Vec::new())),
        };
        let app = Router::new()
            .route("/v1beta/models/{model_call}", post(generate_content))
            .with_state(fake.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (generator_at(&format!("http://{}/v1beta/", addr)), fake)
    }

    fn generator_at(api_base: &str) -> GeminiGenerator {
        GeminiGenerator::new(GeminiConfig {
            api_key: TEST_KEY.to_string(),
            model: "gemini-test".to_string(),
            api_base: api_base.to_string(),
        })
        .unwrap()
    }

    fn text_reply(text: &str) -> Value {
        json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }]
        })
    }

    #[tokio::test]
    async fn test_generate_returns_first_text_part() {
        let (generator, fake) = spawn_fake(AxumStatus::OK, text_reply(r#"{"Timeline":[]}"#)).await;
        let schema = json!({ "type": "OBJECT" });

        let text = generator.generate("plan my party", &schema).await.unwrap();
        assert_eq!(text, r#"{"Timeline":[]}"#);

        let seen = fake.seen.lock().unwrap();
        let request = &seen[0];
        assert_eq!(request.model_call, "gemini-test:generateContent");
        assert_eq!(request.key, TEST_KEY);
        assert_eq!(request.query, None);
        assert_eq!(request.body["contents"][0]["parts"][0]["text"], "plan my party");
        assert_eq!(
            request.body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(request.body["generationConfig"]["responseSchema"], schema);
    }

    #[tokio::test]
    async fn test_refused_connection_hides_key_and_url() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let generator = generator_at(&format!("http://{}/v1beta", addr));

        let error = generator.generate("x", &json!({})).await.unwrap_err();

        assert!(matches!(error, GenerationError::Network(_)), "got {:?}", error);
        let text = error.to_string();
        assert!(!text.contains(TEST_KEY), "{}", text);
        assert!(!text.contains(&addr.to_string()), "{}", text);
        assert!(!text.contains("generateContent"), "{}", text);
    }

    #[tokio::test]
    async fn test_garbled_body_hides_key_and_url() {
        let (generator, _) =
            spawn_fake_raw(AxumStatus::OK, "<html>upstream proxy error</html>".to_string()).await;

        let error = generator.generate("x", &json!({})).await.unwrap_err();

        match &error {
            GenerationError::Api(message) => {
                assert!(message.starts_with("Failed to parse response"))
            }
            other => panic!("expected API error, got {:?}", other),
        }
        let text = error.to_string();
        assert!(!text.contains(TEST_KEY), "{}", text);
        assert!(!text.contains("127.0.0.1"), "{}", text);
        assert!(!text.contains("generateContent"), "{}", text);
    }

    #[tokio::test]
    async fn test_missing_candidates_is_empty_response() {
        let (generator, _) = spawn_fake(AxumStatus::OK, json!({ "candidates": [] })).await;
        let result = generator.generate("x", &json!({})).await;
        assert!(matches!(result, Err(GenerationError::EmptyResponse)));
    }

    #[tokio::test]
    async fn test_safety_stop_is_content_filtered() {
        let reply = json!({ "candidates": [{ "finishReason": "SAFETY" }] });
        let (generator, _) = spawn_fake(AxumStatus::OK, reply).await;
        let result = generator.generate("x", &json!({})).await;
        assert!(matches!(result, Err(GenerationError::ContentFiltered)));
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let (generator, _) =
            spawn_fake(AxumStatus::TOO_MANY_REQUESTS, json!({ "error": "slow down" })).await;
        let result = generator.generate("x", &json!({})).await;
        assert!(matches!(result, Err(GenerationError::RateLimited)));

        let (generator, _) =
            spawn_fake(AxumStatus::BAD_REQUEST, json!({ "error": "bad schema" })).await;
        match generator.generate("x", &json!({})).await {
            Err(GenerationError::Api(message)) => assert!(message.contains("bad schema")),
            other => panic!("expected API error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_key_rejected() {
        let result = GeminiGenerator::new(GeminiConfig {
            api_key: "  ".to_string(),
            model: "m".to_string(),
            api_base: "http://localhost".to_string(),
        });
        assert!(result.is_err());
    }
}
