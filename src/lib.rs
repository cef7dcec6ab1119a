//! REST resource routing over record sets.
//!
//! Maps URL paths and HTTP verbs onto create/read/update/delete
//! operations against a record-oriented store and serializes results to
//! JSON. The store itself (persistence, typing, validation) and the HTTP
//! accept loop are external collaborators.
//!
//! # Architecture Overview
//!
//! ```text
//! transport (axum handler, test harness)
//!     → http::request   method + path + parsed body + request ID
//!     → routing::router one Api per request, verb DSL, response slot
//!     → routing::pattern segment walk, parameter capture
//!     → rest::dispatcher CRUD route group over a record source
//!     → record::RecordSet load / create / update / delete / export
//!     → http::response  reply or failure → JSON envelope
//! ```
//!
//! # Example
//!
//! ```
//! use axum::http::Method;
//! use resource_router::{Api, ApiRequest, MemorySet, Reply};
//! use serde_json::json;
//!
//! let countries = MemorySet::new("country").require("name").field("iso");
//!
//! let request = ApiRequest::new(
//!     Method::POST,
//!     "/country",
//!     Some("application/json"),
//!     br#"{"name": "Italy", "iso": "IT"}"#,
//! );
//! let mut api = Api::new(request);
//! api.get("/ping", |_| Ok(Reply::Value(json!("pong"))));
//! api.rest("/country", countries);
//!
//! let envelope = api.into_response().expect("created");
//! assert_eq!(envelope.status.as_u16(), 201);
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod record;
pub mod rest;
pub mod routing;

// Cross-cutting concerns
pub mod observability;

pub use config::ApiConfig;
pub use http::{ApiError, ApiRequest, Reply, RequestId, ResponseEnvelope};
pub use record::{Action, FieldMap, MemorySet, RecordError, RecordSet, SharedSet};
pub use rest::{ActionSet, FieldScope, ResourceSource};
pub use routing::{match_path, Api, PathValue};
