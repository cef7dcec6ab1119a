//! In-memory record set.
//!
//! # Responsibilities
//! - Hold records as field maps keyed by an auto-incremented id
//! - Enforce declared-field and required-field rules on write
//! - Serve lookups by primary id or by any declared field
//!
//! # Design Decisions
//! - Insert order is the export order (BTreeMap over numeric ids)
//! - Unknown fields in a write are an error; the dispatcher is expected
//!   to have dropped out-of-scope fields already
//! - `SharedSet` wraps a set in `Arc<Mutex>` so server state can live
//!   across requests

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::record::{Action, FieldMap, RecordError, RecordResult, RecordSet};

/// Record set backed by process memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySet {
    name: String,
    fields: Vec<String>,
    required: Vec<String>,
    title: Option<String>,
    visible: Option<Vec<String>>,
    read_allow: Option<Vec<String>>,
    modify_allow: Option<Vec<String>>,
    rows: BTreeMap<u64, FieldMap>,
    next_id: u64,
}

impl MemorySet {
    /// Create an empty set with the given collection name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            next_id: 1,
            ..Self::default()
        }
    }

    /// Declare a field.
    pub fn field(mut self, name: &str) -> Self {
        self.fields.push(name.to_string());
        self
    }

    /// Declare a field that must be present and non-null on every record.
    pub fn require(mut self, name: &str) -> Self {
        self.fields.push(name.to_string());
        self.required.push(name.to_string());
        self
    }

    /// Override the default title field.
    pub fn title(mut self, field: &str) -> Self {
        self.title = Some(field.to_string());
        self
    }

    /// Restrict the visible fields of this set.
    pub fn visible(mut self, fields: &[&str]) -> Self {
        self.visible = Some(fields.iter().map(|f| f.to_string()).collect());
        self
    }

    /// Declare a per-action field allow-list.
    pub fn allow(mut self, action: Action, fields: &[&str]) -> Self {
        let list = Some(fields.iter().map(|f| f.to_string()).collect());
        match action {
            Action::Read => self.read_allow = list,
            Action::Modify => self.modify_allow = list,
        }
        self
    }

    /// Collection name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when no records are stored.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn export_row(&self, id: u64, row: &FieldMap) -> FieldMap {
        let mut out = FieldMap::new();
        out.insert("id".to_string(), Value::from(id));
        for field in &self.fields {
            out.insert(
                field.clone(),
                row.get(field).cloned().unwrap_or(Value::Null),
            );
        }
        out
    }

    fn parse_id(&self, id: &str) -> RecordResult<u64> {
        id.parse().map_err(|_| RecordError::NotFound {
            field: "id".to_string(),
            value: id.to_string(),
        })
    }

    fn check_known(&self, fields: &FieldMap) -> RecordResult<()> {
        for key in fields.keys() {
            if key != "id" && !self.fields.contains(key) {
                return Err(RecordError::UnknownField(key.clone()));
            }
        }
        Ok(())
    }

    fn check_required(&self, row: &FieldMap) -> RecordResult<()> {
        for field in &self.required {
            let missing = match row.get(field) {
                None | Some(Value::Null) => true,
                Some(Value::String(s)) => s.is_empty(),
                Some(_) => false,
            };
            if missing {
                return Err(RecordError::Validation {
                    field: field.clone(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

fn value_matches(stored: &Value, wanted: &str) -> bool {
    match stored {
        Value::String(s) => s == wanted,
        Value::Null => false,
        other => other.to_string() == wanted,
    }
}

impl RecordSet for MemorySet {
    fn title_field(&self) -> &str {
        self.title.as_deref().unwrap_or("name")
    }

    fn visible_fields(&self) -> Option<Vec<String>> {
        self.visible.clone()
    }

    fn action_fields(&self, action: Action) -> Option<Vec<String>> {
        match action {
            Action::Read => self.read_allow.clone(),
            Action::Modify => self.modify_allow.clone(),
        }
    }

    fn load(&self, id: &str) -> RecordResult<FieldMap> {
        let key = self.parse_id(id)?;
        self.rows
            .get(&key)
            .map(|row| self.export_row(key, row))
            .ok_or_else(|| RecordError::NotFound {
                field: "id".to_string(),
                value: id.to_string(),
            })
    }

    fn load_by(&self, field: &str, value: &str) -> RecordResult<FieldMap> {
        if field == "id" {
            return self.load(value);
        }
        if !self.fields.contains(&field.to_string()) {
            return Err(RecordError::UnknownField(field.to_string()));
        }
        self.rows
            .iter()
            .find(|(_, row)| row.get(field).is_some_and(|v| value_matches(v, value)))
            .map(|(id, row)| self.export_row(*id, row))
            .ok_or_else(|| RecordError::NotFound {
                field: field.to_string(),
                value: value.to_string(),
            })
    }

    fn create(&mut self, fields: FieldMap) -> RecordResult<FieldMap> {
        self.check_known(&fields)?;
        let mut row = FieldMap::new();
        for field in &self.fields {
            row.insert(
                field.clone(),
                fields.get(field).cloned().unwrap_or(Value::Null),
            );
        }
        self.check_required(&row)?;

        let id = self.next_id;
        self.next_id += 1;
        self.rows.insert(id, row);
        tracing::debug!(set = %self.name, id, "record created");
        self.load(&id.to_string())
    }

    fn update(&mut self, id: &str, fields: FieldMap) -> RecordResult<FieldMap> {
        self.check_known(&fields)?;
        let key = self.parse_id(id)?;
        let mut merged = self
            .rows
            .get(&key)
            .cloned()
            .ok_or_else(|| RecordError::NotFound {
                field: "id".to_string(),
                value: id.to_string(),
            })?;

        for (field, value) in fields {
            if field != "id" {
                merged.insert(field, value);
            }
        }
        self.check_required(&merged)?;
        self.rows.insert(key, merged);
        tracing::debug!(set = %self.name, id = key, "record updated");
        self.load(id)
    }

    fn delete(&mut self, id: &str) -> RecordResult<bool> {
        let key = self.parse_id(id)?;
        if self.rows.remove(&key).is_none() {
            return Err(RecordError::NotFound {
                field: "id".to_string(),
                value: id.to_string(),
            });
        }
        tracing::debug!(set = %self.name, id = key, "record deleted");
        Ok(!self.rows.contains_key(&key))
    }

    fn export_all(&self) -> RecordResult<Vec<FieldMap>> {
        Ok(self
            .rows
            .iter()
            .map(|(id, row)| self.export_row(*id, row))
            .collect())
    }
}

/// A `MemorySet` shared behind `Arc<Mutex>`, for state that must survive
/// a single request (axum handlers, demo servers).
#[derive(Debug, Clone)]
pub struct SharedSet {
    inner: Arc<Mutex<MemorySet>>,
    title: String,
}

impl SharedSet {
    pub fn new(set: MemorySet) -> Self {
        let title = set.title_field().to_string();
        Self {
            inner: Arc::new(Mutex::new(set)),
            title,
        }
    }

    fn with<T>(&self, f: impl FnOnce(&mut MemorySet) -> RecordResult<T>) -> RecordResult<T> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| RecordError::Storage("poisoned set lock".to_string()))?;
        f(&mut guard)
    }
}

impl RecordSet for SharedSet {
    fn title_field(&self) -> &str {
        &self.title
    }

    fn visible_fields(&self) -> Option<Vec<String>> {
        self.with(|set| Ok(set.visible_fields())).unwrap_or(None)
    }

    fn action_fields(&self, action: Action) -> Option<Vec<String>> {
        self.with(|set| Ok(set.action_fields(action))).unwrap_or(None)
    }

    fn load(&self, id: &str) -> RecordResult<FieldMap> {
        self.with(|set| set.load(id))
    }

    fn load_by(&self, field: &str, value: &str) -> RecordResult<FieldMap> {
        self.with(|set| set.load_by(field, value))
    }

    fn create(&mut self, fields: FieldMap) -> RecordResult<FieldMap> {
        self.with(|set| set.create(fields))
    }

    fn update(&mut self, id: &str, fields: FieldMap) -> RecordResult<FieldMap> {
        self.with(|set| set.update(id, fields))
    }

    fn delete(&mut self, id: &str) -> RecordResult<bool> {
        self.with(|set| set.delete(id))
    }

    fn export_all(&self) -> RecordResult<Vec<FieldMap>> {
        self.with(|set| set.export_all())
    }
}
