//! REST resource subsystem.
//!
//! # Data Flow
//! ```text
//! rest(pattern, source)
//!     → up to six verb/path routes, evaluated in order
//!     → source.rs resolves the record set (direct or factory)
//!     → fields.rs narrows the visible/writable field scope
//!     → record located / created / mutated / deleted
//!     → re-scoped to read fields → Reply → envelope
//! ```
//!
//! # Design Decisions
//! - One registration call covers a whole resource; the action set gates
//!   which routes exist at all
//! - A captured identifier is either a primary id, a `field:value` pair,
//!   or a bare title-field value
//! - Failures from the record layer surface as structured error
//!   envelopes, never as transport faults

pub mod dispatcher;
pub mod fields;
pub mod source;

pub use fields::{ActionSet, FieldScope};
pub use source::{ResourceSource, SourceFactory};
