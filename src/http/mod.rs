//! HTTP boundary subsystem.
//!
//! # Data Flow
//! ```text
//! Transport (axum handler, test harness, ...)
//!     → request.rs (method + path + parsed body + request ID)
//!     → routing layer dispatches
//!     → response.rs (reply → envelope, failure → error payload)
//!     → back to the transport for emission
//! ```
//!
//! The accept loop, TLS and middleware remain the embedding server's
//! concern; this subsystem only shapes what crosses the boundary.

pub mod request;
pub mod response;

pub use request::{ApiRequest, RequestId, MAX_BODY_BYTES};
pub use response::{ApiError, Reply, ResponseEnvelope};
