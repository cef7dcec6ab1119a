//! Per-request verb dispatch.
//!
//! # Responsibilities
//! - Hold one request's method, path, body and response slot
//! - Run registered handlers when verb and pattern both match
//! - Convert handler results and failures into response envelopes
//!
//! # Design Decisions
//! - First match wins: once the slot is filled, later registrations are
//!   no-ops; emission is terminal for the request
//! - Handlers are plain closures over captured path values; no route
//!   table survives the request
//! - Every handler invocation is wrapped; failures become structured
//!   error envelopes, never panics across the boundary

use axum::http::Method;

use crate::config::ApiConfig;
use crate::http::request::{ApiRequest, RequestId};
use crate::http::response::{ApiError, Reply, ResponseEnvelope};
use crate::observability::metrics;
use crate::record::FieldMap;
use crate::routing::pattern::{match_path, PathValue};

/// Dispatch state for a single request.
///
/// Create one per request, register routes in priority order, then take
/// the envelope (if any) out of [`Api::into_response`].
pub struct Api {
    method: Method,
    path: String,
    body: FieldMap,
    request_id: RequestId,
    config: ApiConfig,
    response: Option<ResponseEnvelope>,
}

impl Api {
    pub fn new(request: ApiRequest) -> Self {
        Self::with_config(request, ApiConfig::default())
    }

    pub fn with_config(request: ApiRequest, config: ApiConfig) -> Self {
        tracing::debug!(
            request_id = %request.request_id,
            method = %request.method,
            path = %request.path,
            "dispatch started"
        );
        Self {
            method: request.method,
            path: request.path,
            body: request.body,
            request_id: request.request_id,
            config,
            response: None,
        }
    }

    /// Parsed request body fields.
    pub fn body(&self) -> &FieldMap {
        &self.body
    }

    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// True once an envelope has been emitted for this request.
    pub fn responded(&self) -> bool {
        self.response.is_some()
    }

    /// The emitted envelope, if any route answered.
    pub fn response(&self) -> Option<&ResponseEnvelope> {
        self.response.as_ref()
    }

    /// Consume the dispatcher, yielding the emitted envelope. `None`
    /// means no route answered; the transport decides what that becomes.
    pub fn into_response(self) -> Option<ResponseEnvelope> {
        self.response
    }

    /// Register a GET route.
    pub fn get<H>(&mut self, pattern: &str, handler: H)
    where
        H: FnOnce(Vec<PathValue>) -> Result<Reply, ApiError>,
    {
        self.route(Method::GET, pattern, handler);
    }

    /// Register a POST route.
    pub fn post<H>(&mut self, pattern: &str, handler: H)
    where
        H: FnOnce(Vec<PathValue>) -> Result<Reply, ApiError>,
    {
        self.route(Method::POST, pattern, handler);
    }

    /// Register a PATCH route.
    pub fn patch<H>(&mut self, pattern: &str, handler: H)
    where
        H: FnOnce(Vec<PathValue>) -> Result<Reply, ApiError>,
    {
        self.route(Method::PATCH, pattern, handler);
    }

    /// Register a PUT route.
    pub fn put<H>(&mut self, pattern: &str, handler: H)
    where
        H: FnOnce(Vec<PathValue>) -> Result<Reply, ApiError>,
    {
        self.route(Method::PUT, pattern, handler);
    }

    /// Register a DELETE route.
    pub fn delete<H>(&mut self, pattern: &str, handler: H)
    where
        H: FnOnce(Vec<PathValue>) -> Result<Reply, ApiError>,
    {
        self.route(Method::DELETE, pattern, handler);
    }

    fn route<H>(&mut self, method: Method, pattern: &str, handler: H)
    where
        H: FnOnce(Vec<PathValue>) -> Result<Reply, ApiError>,
    {
        let Some(vars) = self.try_match(&method, pattern) else {
            return;
        };
        tracing::debug!(
            request_id = %self.request_id,
            method = %method,
            pattern,
            captured = vars.len(),
            "route matched"
        );
        match handler(vars) {
            Ok(reply) => self.succeed(reply),
            Err(error) => self.fail(error),
        }
    }

    /// Check verb and pattern against this request, honoring the
    /// already-responded short-circuit.
    pub(crate) fn try_match(&self, method: &Method, pattern: &str) -> Option<Vec<PathValue>> {
        if self.responded() || self.method != *method {
            return None;
        }
        match_path(pattern, &self.path, self.config.field_lookup)
    }

    /// Emit a successful reply, unless something already answered.
    pub(crate) fn succeed(&mut self, reply: Reply) {
        if self.responded() {
            return;
        }
        match ResponseEnvelope::from_reply(reply, self.config.pretty) {
            Ok(Some(envelope)) => {
                metrics::record_response(self.method.as_str(), envelope.status.as_u16());
                tracing::debug!(
                    request_id = %self.request_id,
                    status = envelope.status.as_u16(),
                    "response emitted"
                );
                self.response = Some(envelope);
            }
            Ok(None) => {}
            Err(error) => self.fail(error),
        }
    }

    /// Emit an error envelope, unless something already answered.
    pub(crate) fn fail(&mut self, error: ApiError) {
        if self.responded() {
            return;
        }
        tracing::warn!(
            request_id = %self.request_id,
            code = error.code(),
            error = %error,
            "handler failure"
        );
        let envelope = ResponseEnvelope::from_error(&error, self.config.pretty);
        metrics::record_response(self.method.as_str(), envelope.status.as_u16());
        metrics::record_error(error.code());
        self.response = Some(envelope);
    }
}
