//! Request intake.
//!
//! # Responsibilities
//! - Generate a unique request ID for log correlation
//! - Extract the method and normalized path
//! - Parse the body into a field map (JSON, or form-encoded fallback)
//!
//! # Design Decisions
//! - Request ID assigned at construction, before any dispatch work
//! - A missing JSON content type falls back to form-urlencoded parsing
//! - Malformed JSON degrades to an empty body with a warning, never a
//!   hard failure

use axum::body::Body;
use axum::http::{header, Method, Request};
use serde_json::Value;
use uuid::Uuid;

use crate::record::FieldMap;

/// Default cap on collected body bytes.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Unique id assigned to every request, carried through all log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// One incoming request, reduced to what dispatch needs.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: FieldMap,
    pub request_id: RequestId,
}

impl ApiRequest {
    /// Build a request from raw parts.
    pub fn new(
        method: Method,
        path: impl Into<String>,
        content_type: Option<&str>,
        body: &[u8],
    ) -> Self {
        let request_id = RequestId::new();
        let body = parse_body(content_type, body, request_id);
        Self {
            method,
            path: path.into(),
            body,
            request_id,
        }
    }

    /// A request with no body.
    pub fn bare(method: Method, path: impl Into<String>) -> Self {
        Self::new(method, path, None, &[])
    }

    /// Adapt an axum request, collecting at most `limit` body bytes.
    pub async fn from_http(request: Request<Body>, limit: usize) -> Self {
        let (parts, body) = request.into_parts();
        let content_type = parts
            .headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let bytes = axum::body::to_bytes(body, limit).await.unwrap_or_default();
        Self::new(
            parts.method,
            parts.uri.path(),
            content_type.as_deref(),
            &bytes,
        )
    }
}

fn parse_body(content_type: Option<&str>, body: &[u8], request_id: RequestId) -> FieldMap {
    if body.is_empty() {
        return FieldMap::new();
    }

    let is_json = content_type
        .map(|ct| ct.trim_start().starts_with("application/json"))
        .unwrap_or(false);

    if is_json {
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                tracing::warn!(
                    request_id = %request_id,
                    kind = %json_kind(&other),
                    "request body is not a JSON object, ignoring"
                );
                FieldMap::new()
            }
            Err(error) => {
                tracing::warn!(
                    request_id = %request_id,
                    error = %error,
                    "malformed JSON body, treating as empty"
                );
                FieldMap::new()
            }
        }
    } else {
        url::form_urlencoded::parse(body)
            .into_owned()
            .map(|(key, value)| (key, Value::String(value)))
            .collect()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
