use crate::error::{ApiError, ErrorResponse, require_key};
use crate::models::{GetQuery, GetResponse};
use crate::routes;
use crate::state::AppState;
use axum::{Json, extract::Query, extract::State, http::StatusCode};

/// GET /get handler - Read the value stored under a key
///
/// A key that was never set is not an error: the response carries
/// `"value": null`.
#[utoipa::path(
    get,
    path = routes::GET,
    params(GetQuery),
    responses(
        (status = 200, description = "Lookup completed", body = GetResponse),
        (status = 400, description = "Key is missing or empty", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "kv"
)]
pub async fn get_handler(
    State(state): State<AppState>,
    Query(query): Query<GetQuery>,
) -> Result<(StatusCode, Json<GetResponse>), ApiError> {
    let key = require_key(query.key)?;

    let value = match state.store.get(&key).await {
        Ok(value) => value,
        Err(e) => {
            tracing::error!("Error in /get: {}", e);
            return Err(e.into());
        }
    };

    if value.is_some() {
        tracing::info!("Retrieved value for key: {}", key);
    } else {
        tracing::info!("No value stored for key: {}", key);
    }

    Ok((
        StatusCode::OK,
        Json(GetResponse {
            status: "ok".to_string(),
            key,
            value,
        }),
    ))
}
