//! Errors surfaced to callers of the query surface.
//!
//! Malformed scores and missing fields are recovered inside the pipeline and
//! never reach these types.

use thiserror::Error;

/// Lookup of a name that the lecturer grouping does not contain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("Lecturer not found: {0}")]
    UnknownLecturer(String),
}

/// A field selector that does not name a canonical field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Unknown field: {0}")]
    Unknown(String),
}
