use axum::{
    Router,
    http::{Method, header},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::handlers::AppState;
use crate::routes::create_routes;

/// Initialize tracing and logging for the application.
/// `RUST_LOG` wins over `default_filter`.
pub fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Any origin may call; preflight (every OPTIONS request) is answered here
/// with an empty 200.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// Create and configure the Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    info!("Initializing application router");

    Router::new()
        .merge(create_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}
