pub mod app;
pub mod config;
pub mod error;
pub mod generation;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod recipe;
pub mod routes;

// Re-export key functions for convenience
pub use app::{create_app, init_tracing};
pub use handlers::AppState;
