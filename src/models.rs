use crate::status::ConnectionStatus;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Store connection details shown on the index page
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct StoreInfo {
    pub host: String,
    pub port: u16,
    pub connected: bool,
    pub state: ConnectionStatus,
}

/// Usage hints for each endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Endpoints {
    pub health: String,
    pub redis_health: String,
    pub set: String,
    pub get: String,
    pub incr: String,
}

/// Response type for the index endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct IndexResponse {
    pub message: String,
    pub redis: StoreInfo,
    pub endpoints: Endpoints,
}

/// Response type for successful PING
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct StoreHealthResponse {
    pub status: String,
    pub redis: String,
    pub ping: String,
}

/// Request body for POST /set
#[derive(Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SetRequest {
    pub key: Option<String>,
    /// String, number or boolean; absent or null stores an empty string
    #[schema(value_type = Option<Object>)]
    pub value: Option<JsonValue>,
}

/// Response type for successful SET
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct SetResponse {
    pub status: String,
    pub key: String,
    #[schema(value_type = Option<Object>)]
    pub value: Option<JsonValue>,
}

/// Query parameters for GET /get
#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GetQuery {
    /// Key to read
    pub key: Option<String>,
}

/// Response type for GET /get; `value` is null when the key is absent
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct GetResponse {
    pub status: String,
    pub key: String,
    pub value: Option<String>,
}

/// Request body for POST /incr
#[derive(Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct IncrRequest {
    pub key: Option<String>,
}

/// Response type for successful INCR
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct IncrResponse {
    pub status: String,
    pub key: String,
    pub value: i64,
}
