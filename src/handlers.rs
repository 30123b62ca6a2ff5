use std::sync::Arc;

use axum::{body::Bytes, extract::State, response::Json as ResponseJson};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::generation::TextGenerator;
use crate::models::HealthResponse;
use crate::pipeline::run_recipe;
use crate::recipe::Recipe;

/// Shared handler state: the injected generation client
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn TextGenerator>,
}

impl AppState {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

/// Health check handler
/// Returns the service status and health information
pub async fn health_check() -> AppResult<ResponseJson<HealthResponse>> {
    debug!("Health check endpoint called");
    Ok(ResponseJson(HealthResponse::ok()))
}

/// Plan handler shared by every recipe route
pub async fn plan_handler(
    State(state): State<AppState>,
    recipe: &'static Recipe,
    body: Bytes,
) -> AppResult<ResponseJson<Value>> {
    info!("{} endpoint called", recipe.path);
    let plan = run_recipe(state.generator.as_ref(), recipe, body).await?;
    Ok(ResponseJson(plan))
}

/// Fallback for any method other than POST or OPTIONS on a plan route
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check() {
        let ResponseJson(body) = health_check().await.unwrap();
        assert_eq!(body.status, "ok");
        assert_eq!(body.message, "Service is healthy");
    }
}
