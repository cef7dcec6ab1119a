//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatch produces:
//!     → logging.rs (structured log events, request-id correlated)
//!     → metrics.rs (counters per method/status and error code)
//!
//! Consumers:
//!     → Log aggregation (stdout, file, remote)
//!     → Whatever metrics recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - Request ID flows through all log events of one dispatch
//! - Metrics are cheap (atomic increments) and recorded only at emission
//! - Exporter wiring stays with the embedding application

pub mod logging;
pub mod metrics;
