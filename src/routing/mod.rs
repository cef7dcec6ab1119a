//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (method, path, body)
//!     → router.rs (verb gate, response slot)
//!     → pattern.rs (segment walk, parameter capture)
//!     → handler runs with captured values
//!     → Reply / ApiError → response envelope
//! ```
//!
//! # Design Decisions
//! - Matching is pure and stateless; captured values are threaded to the
//!   handler, never stored on the router
//! - No regex in the match path (plain segment walk)
//! - Deterministic: same input always matches the same route
//! - First match wins (registration order)

pub mod pattern;
pub mod router;

pub use pattern::{match_path, PathValue};
pub use router::Api;
