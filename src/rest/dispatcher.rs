//! REST resource dispatch.
//!
//! # Responsibilities
//! - Expand one pattern + one record source into the verb/path routes of
//!   a resource (collection read, single read, modify, create, delete)
//! - Resolve captured identifiers to records (primary id, `field:value`,
//!   title-field fallback)
//! - Apply field-visibility scopes around every read and write
//!
//! # Design Decisions
//! - Routes are evaluated in a fixed order; the response slot makes the
//!   first hit terminal
//! - Identifier is always the last captured value; factories see only
//!   the values before it
//! - Bodies are narrowed to the modify scope before the store runs, and
//!   results re-narrowed to the read scope before serialization

use axum::http::Method;

use crate::http::response::{ApiError, Reply};
use crate::record::{id_to_key, Action, FieldMap, RecordSet};
use crate::rest::fields::{ActionSet, FieldScope};
use crate::rest::source::ResourceSource;
use crate::routing::pattern::PathValue;
use crate::routing::router::Api;

impl Api {
    /// Register the full CRUD route set for a resource.
    pub fn rest(&mut self, pattern: &str, source: impl Into<ResourceSource>) {
        self.rest_actions(pattern, source, ActionSet::ALL);
    }

    /// Register a resource's routes, limited to the given actions.
    pub fn rest_actions(
        &mut self,
        pattern: &str,
        source: impl Into<ResourceSource>,
        actions: ActionSet,
    ) {
        let mut source = source.into();
        let collection = pattern.trim_end_matches('/');
        let single = format!("{collection}/:id");

        // GET all records
        if actions.read {
            if let Some(vars) = self.try_match(&Method::GET, collection) {
                let outcome = read_all(&mut source, &vars);
                self.finish(outcome);
            }
        }

        // GET :id - one record
        if actions.read {
            if let Some(vars) = self.try_match(&Method::GET, &single) {
                let outcome = read_one(&mut source, vars);
                self.finish(outcome);
            }
        }

        // POST/PATCH/PUT :id - update one record
        if actions.modify {
            for method in [Method::PATCH, Method::POST, Method::PUT] {
                if let Some(vars) = self.try_match(&method, &single) {
                    let outcome = modify_one(&mut source, vars, self.body());
                    self.finish(outcome);
                }
            }
        }

        // POST - insert new record
        if actions.modify {
            if let Some(vars) = self.try_match(&Method::POST, collection) {
                let outcome = create_one(&mut source, &vars, self.body());
                self.finish(outcome);
            }
        }

        // DELETE :id - delete one record
        if actions.delete {
            if let Some(vars) = self.try_match(&Method::DELETE, &single) {
                let outcome = delete_one(&mut source, vars);
                self.finish(outcome);
            }
        }
    }

    fn finish(&mut self, outcome: Result<Reply, ApiError>) {
        match outcome {
            Ok(reply) => self.succeed(reply),
            Err(error) => self.fail(error),
        }
    }
}

fn read_all(source: &mut ResourceSource, params: &[PathValue]) -> Result<Reply, ApiError> {
    let set = source.resolve(params)?;
    let scope = FieldScope::for_action(&*set, Action::Read);
    let rows = set.export_all()?;
    Ok(Reply::Collection(
        rows.into_iter().map(|row| scope.apply(row)).collect(),
    ))
}

fn read_one(source: &mut ResourceSource, mut params: Vec<PathValue>) -> Result<Reply, ApiError> {
    let key = pop_identifier(&mut params)?;
    let set = source.resolve(&params)?;
    let scope = FieldScope::for_action(&*set, Action::Read);
    let record = locate(&*set, &key)?;
    Ok(Reply::Record(scope.apply(record)))
}

fn modify_one(
    source: &mut ResourceSource,
    mut params: Vec<PathValue>,
    body: &FieldMap,
) -> Result<Reply, ApiError> {
    let key = pop_identifier(&mut params)?;
    let mut set = source.resolve(&params)?;
    let writable = FieldScope::for_action(&*set, Action::Modify);
    let record = locate(&*set, &key)?;
    let id = primary_key(&*set, &record)?;
    let updated = set.update(&id, writable.apply(body.clone()))?;
    let readable = FieldScope::for_action(&*set, Action::Read);
    Ok(Reply::Record(readable.apply(updated)))
}

fn create_one(
    source: &mut ResourceSource,
    params: &[PathValue],
    body: &FieldMap,
) -> Result<Reply, ApiError> {
    let mut set = source.resolve(params)?;
    let writable = FieldScope::for_action(&*set, Action::Modify);
    let created = set.create(writable.apply(body.clone()))?;
    let readable = FieldScope::for_action(&*set, Action::Read);
    Ok(Reply::Created(readable.apply(created)))
}

fn delete_one(source: &mut ResourceSource, mut params: Vec<PathValue>) -> Result<Reply, ApiError> {
    let key = pop_identifier(&mut params)?;
    let mut set = source.resolve(&params)?;
    let id = match &key {
        PathValue::Plain(id) => id.clone(),
        PathValue::Lookup { .. } => {
            let record = locate(&*set, &key)?;
            primary_key(&*set, &record)?
        }
    };
    let gone = set.delete(&id)?;
    Ok(Reply::Removed(gone))
}

fn pop_identifier(params: &mut Vec<PathValue>) -> Result<PathValue, ApiError> {
    params
        .pop()
        .ok_or_else(|| ApiError::new("route pattern captured no identifier"))
}

/// Resolve a captured value to a record: plain values load by primary id,
/// lookup pairs load by the named field, and a pair without a field name
/// falls back to the set's title field.
fn locate(set: &dyn RecordSet, key: &PathValue) -> Result<FieldMap, ApiError> {
    let record = match key {
        PathValue::Plain(id) => set.load(id),
        PathValue::Lookup { field, value } => {
            let field = field.as_deref().unwrap_or_else(|| set.title_field());
            set.load_by(field, value)
        }
    }?;
    Ok(record)
}

fn primary_key(set: &dyn RecordSet, record: &FieldMap) -> Result<String, ApiError> {
    record.get(set.id_field()).map(id_to_key).ok_or_else(|| {
        ApiError::new(format!("record export lacks the {} field", set.id_field()))
    })
}
