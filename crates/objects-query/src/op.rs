//! Comparison operators for conditions.
//!
//! The [`Op`] enum defines the operators of the condition mini-language.
//! An operator is named in a condition key after the separator, as in
//! `"id__gte"`; a key without an operator uses [`Op::Eq`].

use std::cmp::Ordering;

/// Comparison operator for a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Op {
    /// Equality, or null test when the operand is null. The default.
    #[default]
    Eq,
    /// Inequality, or non-null test when the operand is null.
    Ne,
    /// Field value is a member of the operand.
    In,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Field value starts with the operand.
    StartsWith,
    /// Field value ends with the operand.
    EndsWith,
    /// Operand pattern matches at the start of the field value.
    Regex,
}

impl Op {
    /// Parses an operator name as it appears in a condition key.
    ///
    /// The empty name selects the default operator.
    pub fn from_name(name: &str) -> Option<Op> {
        match name {
            "" | "default" | "eq" | "exact" => Some(Op::Eq),
            "ne" => Some(Op::Ne),
            "in" => Some(Op::In),
            "gt" => Some(Op::Gt),
            "gte" => Some(Op::Gte),
            "lt" => Some(Op::Lt),
            "lte" => Some(Op::Lte),
            "startswith" => Some(Op::StartsWith),
            "endswith" => Some(Op::EndsWith),
            "regex" => Some(Op::Regex),
            _ => None,
        }
    }

    /// Returns `true` for the ordering operators.
    pub fn is_ordering(self) -> bool {
        matches!(self, Op::Gt | Op::Gte | Op::Lt | Op::Lte)
    }

    /// Evaluates an ordering operator given an ordering result.
    ///
    /// `None` (unordered, e.g. NaN) never satisfies an ordering.
    pub fn eval_ordering(self, ordering: Option<Ordering>) -> bool {
        let Some(ordering) = ordering else {
            return false;
        };
        match self {
            Op::Gt => ordering == Ordering::Greater,
            Op::Gte => ordering != Ordering::Less,
            Op::Lt => ordering == Ordering::Less,
            Op::Lte => ordering != Ordering::Greater,
            _ => false, // Not an ordering-based operator
        }
    }

    /// Returns the name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "default",
            Op::Ne => "ne",
            Op::In => "in",
            Op::Gt => "gt",
            Op::Gte => "gte",
            Op::Lt => "lt",
            Op::Lte => "lte",
            Op::StartsWith => "startswith",
            Op::EndsWith => "endswith",
            Op::Regex => "regex",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn op_from_name() {
        assert_eq!(Op::from_name(""), Some(Op::Eq));
        assert_eq!(Op::from_name("exact"), Some(Op::Eq));
        assert_eq!(Op::from_name("gte"), Some(Op::Gte));
        assert_eq!(Op::from_name("startswith"), Some(Op::StartsWith));
        assert_eq!(Op::from_name("regex"), Some(Op::Regex));
        assert_eq!(Op::from_name("contains"), None);
        assert_eq!(Op::from_name("GT"), None);
    }

    #[test]
    fn op_eval_ordering() {
        // Greater than
        assert!(!Op::Gt.eval_ordering(Some(Ordering::Equal)));
        assert!(Op::Gt.eval_ordering(Some(Ordering::Greater)));

        // Greater than or equal
        assert!(Op::Gte.eval_ordering(Some(Ordering::Equal)));
        assert!(!Op::Gte.eval_ordering(Some(Ordering::Less)));

        // Less than
        assert!(Op::Lt.eval_ordering(Some(Ordering::Less)));
        assert!(!Op::Lt.eval_ordering(Some(Ordering::Equal)));

        // Less than or equal
        assert!(Op::Lte.eval_ordering(Some(Ordering::Equal)));
        assert!(!Op::Lte.eval_ordering(Some(Ordering::Greater)));

        // Unordered never matches
        assert!(!Op::Gte.eval_ordering(None));
        assert!(!Op::Lte.eval_ordering(None));

        // Non-ordering operators never match here
        assert!(!Op::Eq.eval_ordering(Some(Ordering::Equal)));
    }

    #[test]
    fn op_display_round_trips_names() {
        for op in [Op::Eq, Op::Ne, Op::In, Op::Gt, Op::Lte, Op::EndsWith, Op::Regex] {
            assert_eq!(Op::from_name(&op.to_string()), Some(op));
        }
    }
}
