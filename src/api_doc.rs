use utoipa::OpenApi;

use crate::error::{ErrorResponse, HealthResponse, UnhealthyResponse};
use crate::handlers;
use crate::models::{
    Endpoints, GetResponse, IncrRequest, IncrResponse, IndexResponse, SetRequest, SetResponse,
    StoreHealthResponse, StoreInfo,
};
use crate::status::ConnectionStatus;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "redis-kv-gateway API",
        version = "1.0.0",
        description = "A thin JSON HTTP front for a Redis key-value store"
    ),
    paths(
        handlers::index::index_handler,
        handlers::health::health_handler,
        handlers::store_health::store_health_handler,
        handlers::set::set_handler,
        handlers::get::get_handler,
        handlers::incr::incr_handler
    ),
    components(
        schemas(
            IndexResponse,
            StoreInfo,
            Endpoints,
            ConnectionStatus,
            StoreHealthResponse,
            SetRequest,
            SetResponse,
            GetResponse,
            IncrRequest,
            IncrResponse,
            ErrorResponse,
            HealthResponse,
            UnhealthyResponse
        )
    ),
    tags(
        (name = "info", description = "Service information"),
        (name = "health", description = "Health check operations"),
        (name = "kv", description = "Key-value store operations")
    )
)]
pub struct ApiDoc;
