// Route path constants - single source of truth for all API paths

pub const INDEX: &str = "/";
pub const HEALTH: &str = "/health";
pub const REDIS_HEALTH: &str = "/redis-health";
pub const SET: &str = "/set";
pub const GET: &str = "/get";
pub const INCR: &str = "/incr";

pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";
pub const SWAGGER_UI: &str = "/swagger-ui";
