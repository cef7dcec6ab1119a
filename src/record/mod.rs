//! Record-source collaborator contract.
//!
//! # Data Flow
//! ```text
//! REST dispatch
//!     → RecordSet (load / load_by / create / update / delete)
//!     → FieldMap (flat, field-name-keyed values)
//!     → field scope applied by the caller
//!     → serialized by the response writer
//! ```
//!
//! # Design Decisions
//! - Records cross this boundary as field-name-keyed JSON maps; the store
//!   owns typing, validation and persistence
//! - Metadata (title field, visible fields, action allow-lists) lives on
//!   the set, not on the dispatcher
//! - Errors carry a wire code so the dispatch boundary can map them
//!   without inspecting message text

use serde_json::Value;
use thiserror::Error;

pub mod memory;

pub use memory::{MemorySet, SharedSet};

/// Flat, field-name-keyed record values.
pub type FieldMap = serde_json::Map<String, Value>;

/// Operation class a field allow-list applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Reading field values out of a record or collection.
    Read,
    /// Writing field values from a request body.
    Modify,
}

/// Errors reported by a record source.
#[derive(Debug, Clone, Error)]
pub enum RecordError {
    /// No record matches the requested field/value.
    #[error("no record with {field} = {value}")]
    NotFound { field: String, value: String },

    /// A field name the set does not declare.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// A record failed validation before persistence.
    #[error("validation of {field} failed: {message}")]
    Validation { field: String, message: String },

    /// The backing store itself failed.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Result type for record operations.
pub type RecordResult<T> = Result<T, RecordError>;

/// A collection of records the REST dispatcher can drive.
///
/// Implementations own persistence, typing and validation; the dispatcher
/// only decides which operation runs and which fields are visible.
pub trait RecordSet {
    /// Name of the primary identifier field in exported maps.
    fn id_field(&self) -> &str {
        "id"
    }

    /// Default human-identifying field, used when a lookup value arrives
    /// without an explicit field name.
    fn title_field(&self) -> &str {
        "name"
    }

    /// Explicit visible-field restriction, when the resource declares one.
    fn visible_fields(&self) -> Option<Vec<String>> {
        None
    }

    /// Per-action field allow-list, when the resource declares one.
    fn action_fields(&self, _action: Action) -> Option<Vec<String>> {
        None
    }

    /// Load one record by primary id.
    fn load(&self, id: &str) -> RecordResult<FieldMap>;

    /// Load the first record where `field` equals `value`.
    fn load_by(&self, field: &str, value: &str) -> RecordResult<FieldMap>;

    /// Create a record from the given fields, persist it and return its
    /// full field values.
    fn create(&mut self, fields: FieldMap) -> RecordResult<FieldMap>;

    /// Apply field updates to the record with the given id, persist and
    /// return the updated field values. Fields absent from `fields` keep
    /// their stored values.
    fn update(&mut self, id: &str, fields: FieldMap) -> RecordResult<FieldMap>;

    /// Delete by primary id. Returns `true` once the record is gone.
    fn delete(&mut self, id: &str) -> RecordResult<bool>;

    /// Export every record as a flat field map.
    fn export_all(&self) -> RecordResult<Vec<FieldMap>>;
}

/// Render a primary-id value as the string key used on the wire.
pub fn id_to_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
