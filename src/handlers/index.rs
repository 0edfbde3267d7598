use crate::models::{Endpoints, IndexResponse, StoreInfo};
use crate::routes;
use crate::state::AppState;
use axum::{Json, extract::State};

pub const APP_NAME: &str = "Redis Migration Demo App";

/// GET / handler - Service description
///
/// Never touches the store; reports the current connection status as seen by
/// this process.
#[utoipa::path(
    get,
    path = routes::INDEX,
    responses(
        (status = 200, description = "Service description", body = IndexResponse)
    ),
    tag = "info"
)]
pub async fn index_handler(State(state): State<AppState>) -> Json<IndexResponse> {
    let status = state.store.status();

    Json(IndexResponse {
        message: APP_NAME.to_string(),
        redis: StoreInfo {
            host: state.config.redis_host.clone(),
            port: state.config.redis_port,
            connected: state.store.is_connected(),
            state: status,
        },
        endpoints: Endpoints {
            health: routes::HEALTH.to_string(),
            redis_health: routes::REDIS_HEALTH.to_string(),
            set: format!("POST {} {{ \"key\": \"...\", \"value\": \"...\" }}", routes::SET),
            get: format!("GET {}?key=...", routes::GET),
            incr: format!("POST {} {{ \"key\": \"counter\" }}", routes::INCR),
        },
    })
}
