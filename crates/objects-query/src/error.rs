//! Error types for the objects-query crate.

use thiserror::Error;

/// Errors that can occur when building predicates, running queries or
/// aggregating groups.
///
/// Attribute absence inside predicate evaluation is not an error: it is
/// converted to the configured default boolean. Everywhere else a failure
/// surfaces to the caller unchanged.
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    /// Invalid regular expression pattern.
    #[error("invalid regex pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// Operator name in a condition key is not recognised.
    #[error("unknown operator '{name}' in condition key '{key}'")]
    UnknownOperator { key: String, name: String },

    /// Comparison operand cannot be used with the operator.
    #[error("operator '{op}' cannot take a {value_type} operand")]
    InvalidOperand {
        op: &'static str,
        value_type: &'static str,
    },

    /// Operator applied to values of incompatible types.
    #[error("type mismatch: cannot apply '{op}' to {left} and {right}")]
    TypeMismatch {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },

    /// A field required for grouping or sorting is absent on an object.
    #[error("field '{field}' is missing")]
    MissingField { field: String },

    /// Average requested for a group where no object carried the field.
    #[error("division by zero: no values for '{field}' in group")]
    DivisionByZero { field: String },

    /// Configuration rejected at construction.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl QueryError {
    pub(crate) fn type_mismatch(
        op: &'static str,
        left: &crate::Value,
        right: &crate::Value,
    ) -> Self {
        QueryError::TypeMismatch {
            op,
            left: left.type_name(),
            right: right.type_name(),
        }
    }

    pub(crate) fn missing(field: impl Into<String>) -> Self {
        QueryError::MissingField {
            field: field.into(),
        }
    }
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
