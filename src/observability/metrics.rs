//! Metrics collection.
//!
//! # Metrics
//! - `api_requests_total` (counter): emitted responses by method, status
//! - `api_errors_total` (counter): error envelopes by code
//!
//! # Design Decisions
//! - Low-overhead updates (atomic increments), recorded once at emission
//! - The metrics facade only; installing a recorder/exporter is the
//!   embedding application's job

use metrics::counter;

/// Record an emitted response.
pub fn record_response(method: &str, status: u16) {
    counter!(
        "api_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record a handler failure converted to an error envelope.
pub fn record_error(code: u16) {
    counter!("api_errors_total", "code" => code.to_string()).increment(1);
}
