//! Error type for expression compilation
//!
//! Only mistakes in code or configuration are errors: an unknown field, an
//! unknown condition or a malformed term. Values that fail to convert and
//! references that fail to resolve are not errors; the affected term
//! compiles to an always-false predicate instead.

use thiserror::Error;

use crate::expression::{Condition, DocRef};

/// Errors raised while decoding or compiling an expression
#[derive(Error, Debug)]
pub enum MapperError {
    /// Term without a field name
    #[error("Expression term has no field")]
    MissingField,

    /// Term without a condition
    #[error("Expression term for field '{field}' has no condition")]
    MissingCondition { field: String },

    /// No handler, not ignored, no delegate
    #[error("No handler registered for field '{field}'")]
    MissingHandler { field: String },

    /// Condition the handler cannot compile
    #[error("Condition '{condition}' is not supported for field '{field}'")]
    UnsupportedCondition { field: String, condition: Condition },

    /// Doc ref name lookup failed while a name resolver is configured
    #[error("Unable to resolve name of {doc_type} with uuid {uuid}")]
    DocRefNotFound { doc_type: String, uuid: String },

    /// Expression nesting exceeds the configured limit
    #[error("Expression nesting exceeds maximum depth of {max_depth}")]
    DepthExceeded { max_depth: usize },

    /// Term rejected by validation against a field list
    #[error("Invalid term for field '{field}': {reason}")]
    InvalidTerm { field: String, reason: String },

    /// Expression JSON over the size limit
    #[error("Expression JSON exceeds maximum size of {limit} bytes")]
    ExpressionTooLarge { limit: usize },

    /// Decoded expression has too many items
    #[error("Expression has {count} items, maximum is {limit}")]
    TooManyItems { count: usize, limit: usize },

    /// Expression JSON could not be decoded
    #[error("Invalid expression JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl MapperError {
    /// Create a missing handler error
    pub fn missing_handler(field: &str) -> Self {
        Self::MissingHandler {
            field: field.to_string(),
        }
    }

    /// Create an unsupported condition error
    pub fn unsupported_condition(field: &str, condition: Condition) -> Self {
        Self::UnsupportedCondition {
            field: field.to_string(),
            condition,
        }
    }

    /// Create a doc ref not found error
    pub fn doc_ref_not_found(doc_ref: &DocRef) -> Self {
        Self::DocRefNotFound {
            doc_type: doc_ref.doc_type.clone(),
            uuid: doc_ref.uuid.clone().unwrap_or_default(),
        }
    }

    /// Create an invalid term error
    pub fn invalid_term(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidTerm {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Check if this error comes from the shape of a term (missing field or condition)
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::MissingField | Self::MissingCondition { .. })
    }
}
