use crate::error::HealthResponse;
use crate::routes;
use axum::Json;
use chrono::{SecondsFormat, Utc};

/// GET /health handler - Liveness check
///
/// Answers as long as the process can serve HTTP; the store is not consulted.
#[utoipa::path(
    get,
    path = routes::HEALTH,
    responses(
        (status = 200, description = "Service is running", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
