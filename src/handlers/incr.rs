use crate::body::json_or_default;
use crate::error::{ApiError, ErrorResponse, require_key};
use crate::models::{IncrRequest, IncrResponse};
use crate::routes;
use crate::state::AppState;
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};

/// POST /incr handler - Atomically increment an integer counter
///
/// The store creates missing keys at 0 before incrementing. A non-numeric
/// existing value is rejected by the store and surfaces as a 500.
#[utoipa::path(
    post,
    path = routes::INCR,
    request_body = IncrRequest,
    responses(
        (status = 200, description = "Counter incremented", body = IncrResponse),
        (status = 400, description = "Key missing or empty, or malformed body", body = ErrorResponse),
        (status = 500, description = "Store error, including non-numeric values", body = ErrorResponse)
    ),
    tag = "kv"
)]
pub async fn incr_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<IncrResponse>), ApiError> {
    let request: IncrRequest = json_or_default(&headers, &body)?;
    let key = require_key(request.key)?;

    let value = match state.store.incr(&key).await {
        Ok(value) => value,
        Err(e) => {
            tracing::error!("Error in /incr: {}", e);
            return Err(e.into());
        }
    };

    tracing::info!("Incremented key {} to {}", key, value);
    Ok((
        StatusCode::OK,
        Json(IncrResponse {
            status: "ok".to_string(),
            key,
            value,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeRedis, read_json, setup_test_app, unreachable_config};
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    fn incr_request(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(routes::INCR)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_incr_missing_key() {
        let (app, _store) = setup_test_app(unreachable_config());

        let response = app
            .oneshot(incr_request(serde_json::json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error_response: ErrorResponse = read_json(response).await;
        assert_eq!(error_response.error, "Key is required");
    }

    #[tokio::test]
    async fn test_incr_without_body_or_content_type() {
        let (app, _store) = setup_test_app(unreachable_config());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(routes::INCR)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error_response: ErrorResponse = read_json(response).await;
        assert_eq!(error_response.error, "Key is required");
    }

    #[tokio::test]
    async fn test_incr_store_unreachable() {
        let (app, _store) = setup_test_app(unreachable_config());

        let response = app
            .oneshot(incr_request(serde_json::json!({ "key": "counter" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_incr_counts_up_from_one() {
        let redis = FakeRedis::start().await;
        let (app, _store) = setup_test_app(redis.config());

        for expected in 1..=3 {
            let response = app
                .clone()
                .oneshot(incr_request(serde_json::json!({ "key": "counter" })))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            let body: IncrResponse = read_json(response).await;
            assert_eq!(body.status, "ok");
            assert_eq!(body.key, "counter");
            assert_eq!(body.value, expected);
        }

        let sent: Vec<_> = redis
            .commands()
            .into_iter()
            .filter(|cmd| cmd[0] == "INCR")
            .collect();
        assert_eq!(sent.len(), 3);
        assert!(sent.iter().all(|cmd| cmd == &["INCR", "counter"]));
    }

    #[tokio::test]
    async fn test_incr_non_numeric_value() {
        let redis = FakeRedis::start().await;
        let (app, store) = setup_test_app(redis.config());
        store.set("greeting", "hello").await.unwrap();

        let response = app
            .oneshot(incr_request(serde_json::json!({ "key": "greeting" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let error_response: ErrorResponse = read_json(response).await;
        assert_eq!(
            error_response.error,
            "ERR value is not an integer or out of range"
        );
    }
}
