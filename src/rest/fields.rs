//! Field-visibility policy.
//!
//! # Responsibilities
//! - Combine a resource's visible-field restriction with its per-action
//!   allow-list into one effective scope
//! - Filter record exports and writable request bodies through the scope
//!
//! # Design Decisions
//! - Both inputs optional: intersection when both exist, either alone
//!   otherwise, unrestricted when neither
//! - Filtering is silent; a field outside the modify scope is dropped
//!   from the write, never erased on the record

use crate::record::{Action, FieldMap, RecordSet};

/// Which of the generated REST routes a resource exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionSet {
    pub read: bool,
    pub modify: bool,
    pub delete: bool,
}

impl ActionSet {
    /// Read, modify and delete all allowed.
    pub const ALL: Self = Self {
        read: true,
        modify: true,
        delete: true,
    };

    /// Collection and single-record reads only.
    pub const READ_ONLY: Self = Self {
        read: true,
        modify: false,
        delete: false,
    };
}

impl Default for ActionSet {
    fn default() -> Self {
        Self::ALL
    }
}

/// The effective set of field names visible to one action.
///
/// `None` means unrestricted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldScope(Option<Vec<String>>);

impl FieldScope {
    /// Unrestricted scope.
    pub fn all() -> Self {
        Self(None)
    }

    /// Derive the scope a record set grants for `action`.
    pub fn for_action(set: &dyn RecordSet, action: Action) -> Self {
        let visible = set.visible_fields();
        let allowed = set.action_fields(action);
        Self(match (visible, allowed) {
            (Some(visible), Some(allowed)) => Some(
                visible
                    .into_iter()
                    .filter(|field| allowed.contains(field))
                    .collect(),
            ),
            (Some(visible), None) => Some(visible),
            (None, Some(allowed)) => Some(allowed),
            (None, None) => None,
        })
    }

    /// Whether `field` is inside the scope.
    pub fn allows(&self, field: &str) -> bool {
        match &self.0 {
            None => true,
            Some(fields) => fields.iter().any(|f| f == field),
        }
    }

    /// Keep only in-scope fields of `map`.
    pub fn apply(&self, map: FieldMap) -> FieldMap {
        match &self.0 {
            None => map,
            Some(_) => map
                .into_iter()
                .filter(|(field, _)| self.allows(field))
                .collect(),
        }
    }
}
