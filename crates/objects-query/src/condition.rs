//! Condition types for predicates.
//!
//! A [`Condition`] represents a single comparison: a field path, an
//! operator, and a comparison value.

use regex::Regex;

use crate::access::FieldPath;
use crate::error::{QueryError, Result};
use crate::op::Op;
use crate::value::Value;

/// A single comparison against one field of an object.
///
/// # Example
///
/// ```
/// use objects_query::{Condition, Op, Value};
///
/// let cond = Condition::parse("id__gt", 3, "__").unwrap();
/// assert_eq!(cond.op(), Op::Gt);
/// assert!(cond.matches(&Value::from(5)).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct Condition {
    field: FieldPath,
    op: Op,
    value: Value,
    pattern: Option<Regex>,
}

impl Condition {
    /// Creates a new condition.
    ///
    /// A `Regex` condition compiles its pattern here, so an invalid pattern
    /// or a non-string operand is reported at construction.
    pub fn new(field: impl Into<FieldPath>, op: Op, value: impl Into<Value>) -> Result<Self> {
        let value = value.into();
        let pattern = match (op, &value) {
            (Op::Regex, Value::String(p)) => Some(Regex::new(&format!(r"\A(?:{})", p))?),
            (Op::Regex, other) => {
                return Err(QueryError::InvalidOperand {
                    op: op.as_str(),
                    value_type: other.type_name(),
                })
            }
            _ => None,
        };
        Ok(Condition {
            field: field.into(),
            op,
            value,
            pattern,
        })
    }

    /// Creates an equality condition. Never fails.
    pub fn eq(field: impl Into<FieldPath>, value: impl Into<Value>) -> Self {
        Condition {
            field: field.into(),
            op: Op::Eq,
            value: value.into(),
            pattern: None,
        }
    }

    /// Parses a condition key of the form `field` or `field<sep>operator`.
    ///
    /// The key is split at the first occurrence of the separator.
    pub fn parse(key: &str, value: impl Into<Value>, separator: &str) -> Result<Self> {
        let (field, name) = key.split_once(separator).unwrap_or((key, ""));
        let op = Op::from_name(name).ok_or_else(|| QueryError::UnknownOperator {
            key: key.to_string(),
            name: name.to_string(),
        })?;
        Condition::new(field, op, value)
    }

    /// The field path this condition reads.
    pub fn field(&self) -> &FieldPath {
        &self.field
    }

    /// The comparison operator.
    pub fn op(&self) -> Op {
        self.op
    }

    /// The comparison value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Evaluates this condition against a field value.
    ///
    /// Equality and membership never fail. Ordering, prefix, suffix and
    /// regex operators fail with [`QueryError::TypeMismatch`] when the
    /// operands cannot be compared.
    pub fn matches(&self, field_value: &Value) -> Result<bool> {
        match self.op {
            Op::Eq if self.value.is_null() => Ok(field_value.is_null()),
            Op::Eq => Ok(*field_value == self.value),
            Op::Ne if self.value.is_null() => Ok(!field_value.is_null()),
            Op::Ne => Ok(*field_value != self.value),
            Op::In => self.value.contains(field_value),
            Op::Gt | Op::Gte | Op::Lt | Op::Lte => {
                let ordering = field_value.try_cmp(&self.value, self.op.as_str())?;
                Ok(self.op.eval_ordering(ordering))
            }
            Op::StartsWith => field_value.starts_with(&self.value),
            Op::EndsWith => field_value.ends_with(&self.value),
            Op::Regex => self.match_regex(field_value),
        }
    }

    fn match_regex(&self, field_value: &Value) -> Result<bool> {
        match (field_value, &self.pattern) {
            (Value::String(s), Some(regex)) => Ok(regex.is_match(s)),
            _ => Err(QueryError::type_mismatch("regex", field_value, &self.value)),
        }
    }
}
