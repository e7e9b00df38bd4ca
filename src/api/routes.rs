use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Reference content
        .route("/library", get(handlers::list_library))
        .route("/library/:id", get(handlers::get_library_item))
        .route("/dictionary", get(handlers::search_dictionary))
        // Mixer
        .route("/mixer/catalog", get(handlers::get_catalog))
        .route("/mixer/recommendations", post(handlers::recommend))
        .route("/mixer/sessions", post(handlers::create_session))
        .route("/mixer/sessions/:id", get(handlers::get_session))
        .route("/mixer/sessions/:id/submit", post(handlers::submit_session))
        .route("/mixer/sessions/:id/reset", post(handlers::reset_session))
}
