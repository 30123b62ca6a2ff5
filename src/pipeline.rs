use axum::body::Bytes;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{AppError, AppResult, INVALID_JSON_MESSAGE, MISSING_FIELDS_MESSAGE};
use crate::generation::{GenerationError, TextGenerator};
use crate::models::PlanRequest;
use crate::recipe::Recipe;

/// Decodes a request body.
///
/// An empty body or JSON that is not an object carries no fields, so it is
/// reported as missing fields. Only malformed JSON gets its own message.
pub fn parse_request(body: &[u8]) -> AppResult<PlanRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::BadRequest(MISSING_FIELDS_MESSAGE.to_string()));
    }
    let value: Value = serde_json::from_slice(body)
        .map_err(|_| AppError::BadRequest(INVALID_JSON_MESSAGE.to_string()))?;
    if !value.is_object() {
        return Err(AppError::BadRequest(MISSING_FIELDS_MESSAGE.to_string()));
    }
    serde_json::from_value(value)
        .map_err(|_| AppError::BadRequest(MISSING_FIELDS_MESSAGE.to_string()))
}

/// validate -> render prompt -> call upstream -> parse
pub async fn run_recipe(
    generator: &dyn TextGenerator,
    recipe: &Recipe,
    body: Bytes,
) -> AppResult<Value> {
    let request = parse_request(&body)?;
    if !request.is_valid() {
        return Err(AppError::BadRequest(MISSING_FIELDS_MESSAGE.to_string()));
    }

    let prompt = recipe.render_prompt(&request);
    debug!(recipe = %recipe.kind, prompt_len = prompt.len(), "Rendered prompt");

    let plan = generate_plan(generator, recipe, &prompt)
        .await
        .map_err(|e| AppError::Generation {
            error: recipe.failure_message.to_string(),
            details: e.to_string(),
        })?;

    info!(recipe = %recipe.kind, "Plan generated");
    Ok(plan)
}

async fn generate_plan(
    generator: &dyn TextGenerator,
    recipe: &Recipe,
    prompt: &str,
) -> Result<Value, GenerationError> {
    let text = generator.generate(prompt, &recipe.schema()).await?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::{MENU, TIMELINE};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct Scripted {
        reply: Result<&'static str, &'static str>,
        prompts: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn new(reply: Result<&'static str, &'static str>) -> Self {
            Self {
                reply,
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for Scripted {
        async fn generate(&self, prompt: &str, _schema: &Value) -> Result<String, GenerationError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply
                .map(str::to_string)
                .map_err(|e| GenerationError::Network(e.to_string()))
        }
    }

    fn body(value: Value) -> Bytes {
        Bytes::from(value.to_string())
    }

    fn rejection(body: &[u8]) -> String {
        match parse_request(body) {
            Err(AppError::BadRequest(message)) => message,
            other => panic!("expected bad request, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_request_requires_object() {
        assert!(parse_request(b"{}").is_ok());
        assert_eq!(rejection(b"[1, 2]"), MISSING_FIELDS_MESSAGE);
        assert_eq!(rejection(br#""backyard birthday""#), MISSING_FIELDS_MESSAGE);
        assert_eq!(rejection(b"20"), MISSING_FIELDS_MESSAGE);
        assert_eq!(rejection(b""), MISSING_FIELDS_MESSAGE);
        assert_eq!(rejection(b"  \n"), MISSING_FIELDS_MESSAGE);
        assert_eq!(rejection(b"not json"), INVALID_JSON_MESSAGE);
    }

    #[tokio::test]
    async fn test_passes_plan_through() {
        let generator = Scripted::new(Ok(r#"{"Timeline":[{"time":"4:00 PM","activity":"Setup"}]}"#));
        let plan = run_recipe(
            &generator,
            &TIMELINE,
            body(json!({ "guests": 10, "partyDetails": "rooftop" })),
        )
        .await
        .unwrap();

        assert_eq!(
            plan,
            json!({ "Timeline": [{ "time": "4:00 PM", "activity": "Setup" }] })
        );
        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Event Details: rooftop. Guest Count: 10."));
    }

    #[tokio::test]
    async fn test_invalid_request_skips_upstream() {
        let generator = Scripted::new(Ok("{}"));
        let result = run_recipe(&generator, &MENU, body(json!({ "guests": 10 }))).await;

        match result {
            Err(AppError::BadRequest(message)) => assert_eq!(message, MISSING_FIELDS_MESSAGE),
            other => panic!("expected bad request, got {:?}", other),
        }
        assert!(generator.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unparsable_text_is_generation_error() {
        let generator = Scripted::new(Ok("Sure! Here is your menu:"));
        let result = run_recipe(
            &generator,
            &MENU,
            body(json!({ "guests": 3, "partyDetails": "picnic" })),
        )
        .await;

        match result {
            Err(AppError::Generation { error, details }) => {
                assert_eq!(error, MENU.failure_message);
                assert!(details.starts_with("Upstream text is not valid JSON"));
            }
            other => panic!("expected generation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_upstream_failure_carries_details() {
        let generator = Scripted::new(Err("connection reset"));
        let result = run_recipe(
            &generator,
            &TIMELINE,
            body(json!({ "guests": 3, "partyDetails": "picnic" })),
        )
        .await;

        match result {
            Err(AppError::Generation { error, details }) => {
                assert_eq!(error, TIMELINE.failure_message);
                assert_eq!(details, "Network error: connection reset");
            }
            other => panic!("expected generation error, got {:?}", other),
        }
    }
}
