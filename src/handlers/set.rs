use crate::body::json_or_default;
use crate::error::{ApiError, ErrorResponse, require_key};
use crate::models::{SetRequest, SetResponse};
use crate::routes;
use crate::state::AppState;
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use serde_json::Value as JsonValue;

/// POST /set handler - Store a value under a key
#[utoipa::path(
    post,
    path = routes::SET,
    request_body = SetRequest,
    responses(
        (status = 200, description = "Value stored", body = SetResponse),
        (status = 400, description = "Key missing or empty, malformed body, or non-scalar value", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "kv"
)]
pub async fn set_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<SetResponse>), ApiError> {
    let request: SetRequest = json_or_default(&headers, &body)?;
    let key = require_key(request.key)?;
    let text = stored_text(request.value.as_ref())?;

    if let Err(e) = state.store.set(&key, &text).await {
        tracing::error!("Error in /set: {}", e);
        return Err(e.into());
    }

    tracing::info!("Stored value for key: {}", key);
    Ok((
        StatusCode::OK,
        Json(SetResponse {
            status: "ok".to_string(),
            key,
            value: request.value,
        }),
    ))
}

/// Text written to the store for a request value
fn stored_text(value: Option<&JsonValue>) -> Result<String, ApiError> {
    match value {
        None | Some(JsonValue::Null) => Ok(String::new()),
        Some(JsonValue::String(s)) => Ok(s.clone()),
        Some(scalar @ (JsonValue::Number(_) | JsonValue::Bool(_))) => Ok(scalar.to_string()),
        Some(JsonValue::Array(_) | JsonValue::Object(_)) => Err(ApiError::InvalidValue),
    }
}
