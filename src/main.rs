use party_planner_svc::app::{create_app, init_tracing};
use party_planner_svc::config::{Config, DEFAULT_LOG_FILTER};
use party_planner_svc::generation::build_generator;
use party_planner_svc::handlers::AppState;
use party_planner_svc::recipe::PlanKind;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(DEFAULT_LOG_FILTER);
            error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&config.log_level);
    info!("Starting party planner service...");
    info!("Configuration loaded: {:?}", config);

    let generator = match build_generator(&config) {
        Ok(generator) => generator,
        Err(e) => {
            error!("Failed to create generation client: {:#}", e);
            std::process::exit(1);
        }
    };

    let app = create_app(AppState::new(generator));

    // Create TCP listener
    let listener = match tokio::net::TcpListener::bind(&config.bind_address()).await {
        Ok(listener) => {
            info!("Server running on {}", config.server_url());
            info!("Health check: GET /health");
            for kind in PlanKind::ALL {
                info!("Plan endpoint: POST {}", kind.recipe().path);
            }
            listener
        }
        Err(e) => {
            error!("Failed to bind to {}: {}", config.bind_address(), e);
            std::process::exit(1);
        }
    };

    // Start the server
    info!("Server starting...");
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
    } else {
        info!("Server shutdown gracefully");
    }
}
