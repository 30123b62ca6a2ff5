use crate::handlers::{AppState, health_check, method_not_allowed, plan_handler};
use crate::recipe::PlanKind;
use axum::{Router, body::Bytes, extract::State, routing::get, routing::post};

/// Creates and configures all application routes
pub fn create_routes() -> Router<AppState> {
    PlanKind::ALL
        .into_iter()
        .map(PlanKind::recipe)
        .fold(Router::new().route("/health", get(health_check)), |router, recipe| {
            router.route(
                recipe.path,
                post(move |state: State<AppState>, body: Bytes| plan_handler(state, recipe, body))
                    .fallback(method_not_allowed),
            )
        })
}
