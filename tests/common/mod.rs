//! Shared fixtures for integration tests.

use axum::http::Method;
use resource_router::{ApiRequest, MemorySet};
use serde_json::Value;

/// The country collection used across the REST scenarios.
pub fn country_set() -> MemorySet {
    MemorySet::new("country")
        .require("name")
        .field("sys_name")
        .require("iso")
        .require("iso3")
        .require("numcode")
        .field("phonecode")
}

/// Field values for one valid country record.
#[allow(dead_code)]
pub fn country_payload() -> Value {
    serde_json::json!({
        "name": "test",
        "sys_name": "test",
        "iso": "IT",
        "iso3": "ITA",
        "numcode": 666,
        "phonecode": 39,
    })
}

/// Build a JSON request the way a transport adapter would.
#[allow(dead_code)]
pub fn json_request(method: Method, path: &str, body: Option<&Value>) -> ApiRequest {
    let body = body.map(Value::to_string).unwrap_or_default();
    ApiRequest::new(method, path, Some("application/json"), body.as_bytes())
}
