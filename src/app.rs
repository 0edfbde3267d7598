use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::routes;
use crate::state::AppState;

/// Build the HTTP router with all routes, request tracing and API docs
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(routes::INDEX, get(handlers::index_handler))
        .route(routes::HEALTH, get(handlers::health_handler))
        .route(routes::REDIS_HEALTH, get(handlers::store_health_handler))
        .route(routes::SET, post(handlers::set_handler))
        .route(routes::GET, get(handlers::get_handler))
        .route(routes::INCR, post(handlers::incr_handler))
        .with_state(state)
        .merge(SwaggerUi::new(routes::SWAGGER_UI).url(routes::OPENAPI_JSON, ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
}
