//! Error types for building, encoding and decoding filter trees.

use thiserror::Error;

/// A specialized Result type for filter operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors that can occur while decoding, compiling or registering filters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    /// A tagged payload referenced a leaf type that is not registered.
    #[error("unknown criterion type tag: {tag}{}", suggestion_suffix(.suggestion))]
    UnknownTypeTag {
        /// The unregistered tag.
        tag: String,
        /// The closest registered tag, if one is near enough.
        suggestion: Option<String>,
    },

    /// A type tag was registered twice.
    #[error("criterion type tag already registered: {tag}")]
    DuplicateTypeTag {
        /// The tag that was already present.
        tag: String,
    },

    /// Tagged bytes were corrupt, truncated or structurally invalid.
    #[error("malformed tagged payload: {reason}")]
    MalformedTaggedPayload {
        /// What was wrong with the payload.
        reason: String,
    },

    /// Textual input could not be read back into a tree.
    #[error("malformed text payload at position {position}: {reason}")]
    MalformedTextPayload {
        /// Byte offset where reading failed.
        position: usize,
        /// What was wrong with the input.
        reason: String,
    },

    /// A tree nested deeper than either codec supports.
    #[error("filter nests deeper than {limit} levels")]
    NestingTooDeep {
        /// The supported depth.
        limit: usize,
    },

    /// A criterion could not produce its payload.
    #[error("cannot serialize {tag} criterion: {reason}")]
    InvalidCriterion {
        /// The criterion's type tag.
        tag: String,
        /// Why serialization failed.
        reason: String,
    },

    /// A conjunction operator ordinal outside the known set.
    #[error("unknown conjunction operator: {value}")]
    UnknownOperator {
        /// The unrecognized ordinal.
        value: i64,
    },

    /// A leaf or backend failed to construct a predicate.
    #[error("cannot build predicate: {reason}")]
    BackendPredicate {
        /// The backend's explanation.
        reason: String,
    },
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{s}'?)"),
        None => String::new(),
    }
}

impl FilterError {
    /// Creates an unknown type tag error.
    pub fn unknown_type_tag(tag: impl Into<String>, suggestion: Option<String>) -> Self {
        FilterError::UnknownTypeTag {
            tag: tag.into(),
            suggestion,
        }
    }

    /// Creates a malformed tagged payload error.
    pub fn malformed_tagged(reason: impl Into<String>) -> Self {
        FilterError::MalformedTaggedPayload {
            reason: reason.into(),
        }
    }

    /// Creates a malformed text payload error.
    pub fn malformed_text(position: usize, reason: impl Into<String>) -> Self {
        FilterError::MalformedTextPayload {
            position,
            reason: reason.into(),
        }
    }

    /// Creates a backend predicate error.
    pub fn backend(reason: impl Into<String>) -> Self {
        FilterError::BackendPredicate {
            reason: reason.into(),
        }
    }
}
