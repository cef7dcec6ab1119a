//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Behavior switches for request dispatch.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Accept `field:value` addressing inside parameter segments.
    ///
    /// Deployments predating that addressing mode can turn it off; a
    /// `name:test` segment is then captured verbatim.
    pub field_lookup: bool,

    /// Pretty-print JSON response bodies.
    pub pretty: bool,

    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            field_lookup: true,
            pretty: true,
            max_body_bytes: crate::http::request::MAX_BODY_BYTES,
        }
    }
}
