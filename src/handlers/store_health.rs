use crate::error::UnhealthyResponse;
use crate::models::StoreHealthResponse;
use crate::routes;
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};

/// GET /redis-health handler - Store connectivity check
///
/// Sends a PING over the shared connection. Returns 200 with the reply, or
/// 500 with the store's error message.
#[utoipa::path(
    get,
    path = routes::REDIS_HEALTH,
    responses(
        (status = 200, description = "Store answered PING", body = StoreHealthResponse),
        (status = 500, description = "Store is unreachable or failed", body = UnhealthyResponse)
    ),
    tag = "health"
)]
pub async fn store_health_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<StoreHealthResponse>), (StatusCode, Json<UnhealthyResponse>)> {
    match state.store.ping().await {
        Ok(pong) => {
            tracing::debug!("Redis health check passed");
            Ok((
                StatusCode::OK,
                Json(StoreHealthResponse {
                    status: "ok".to_string(),
                    redis: "connected".to_string(),
                    ping: pong,
                }),
            ))
        }
        Err(e) => {
            tracing::error!("Redis health check failed: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(UnhealthyResponse {
                    status: "error".to_string(),
                    error: e.to_string(),
                }),
            ))
        }
    }
}
