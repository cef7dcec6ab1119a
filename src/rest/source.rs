//! Record-source union.
//!
//! # Responsibilities
//! - Represent "a record set, or a factory that builds one from path
//!   parameters" as a tagged type
//! - Resolve to a usable handle exactly once per fired route
//!
//! # Design Decisions
//! - Factories see only the parameters captured before the identifier
//!   segment (the dispatcher pops the id first)
//! - `Resolved` keeps borrowed and factory-owned handles behind one
//!   deref target so route bodies never branch on the variant

use std::ops::{Deref, DerefMut};

use crate::http::response::ApiError;
use crate::record::RecordSet;
use crate::routing::pattern::PathValue;

/// Factory building a record set from captured path parameters.
pub type SourceFactory =
    dyn FnMut(&[PathValue]) -> Result<Box<dyn RecordSet>, ApiError>;

/// Where a REST route group finds its records.
pub enum ResourceSource {
    /// A ready record set.
    Set(Box<dyn RecordSet>),
    /// Built per request from the captured path parameters.
    Factory(Box<SourceFactory>),
}

impl ResourceSource {
    /// Wrap a factory closure.
    pub fn factory<F>(factory: F) -> Self
    where
        F: FnMut(&[PathValue]) -> Result<Box<dyn RecordSet>, ApiError> + 'static,
    {
        Self::Factory(Box::new(factory))
    }

    /// Resolve to a record-set handle, invoking the factory if needed.
    pub(crate) fn resolve(&mut self, params: &[PathValue]) -> Result<Resolved<'_>, ApiError> {
        match self {
            Self::Set(set) => Ok(Resolved::Borrowed(set.as_mut())),
            Self::Factory(factory) => Ok(Resolved::Owned(factory(params)?)),
        }
    }
}

impl<S: RecordSet + 'static> From<S> for ResourceSource {
    fn from(set: S) -> Self {
        Self::Set(Box::new(set))
    }
}

/// A resolved record-set handle, borrowed or factory-owned.
pub enum Resolved<'a> {
    Borrowed(&'a mut (dyn RecordSet + 'static)),
    Owned(Box<dyn RecordSet>),
}

impl Deref for Resolved<'_> {
    type Target = dyn RecordSet;

    fn deref(&self) -> &Self::Target {
        match self {
            Resolved::Borrowed(set) => &**set,
            Resolved::Owned(set) => set.as_ref(),
        }
    }
}

impl DerefMut for Resolved<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match self {
            Resolved::Borrowed(set) => &mut **set,
            Resolved::Owned(set) => set.as_mut(),
        }
    }
}
