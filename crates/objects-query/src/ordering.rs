//! Ordering types for sorting query sets.
//!
//! Provides [`Dir`] for sort direction and [`OrderBy`] for field-based ordering.

use std::cmp::Ordering;

use crate::access::{FieldPath, Queryable};
use crate::error::{QueryError, Result};
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, Dir::Asc)
    }

    /// Returns `true` if this is descending order.
    pub fn is_desc(self) -> bool {
        matches!(self, Dir::Desc)
    }

    /// Applies this direction to an ordering.
    ///
    /// For `Asc`, returns the ordering unchanged.
    /// For `Desc`, reverses the ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single ordering clause specifying a field and direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// The field to sort by.
    pub field: FieldPath,
    /// The sort direction.
    pub dir: Dir,
}

impl OrderBy {
    /// Creates a new ascending ordering for the given field.
    pub fn asc(field: impl Into<FieldPath>) -> Self {
        OrderBy::new(field, Dir::Asc)
    }

    /// Creates a new descending ordering for the given field.
    pub fn desc(field: impl Into<FieldPath>) -> Self {
        OrderBy::new(field, Dir::Desc)
    }

    /// Creates a new ordering with the given direction.
    pub fn new(field: impl Into<FieldPath>, dir: Dir) -> Self {
        OrderBy {
            field: field.into(),
            dir,
        }
    }

    /// Compares two values according to this ordering.
    ///
    /// Equal values compare `Equal` whatever their kind, so two nulls never
    /// fail. Unordered values (NaN) also compare `Equal`.
    pub fn compare(&self, a: &Value, b: &Value) -> Result<Ordering> {
        if a == b {
            return Ok(Ordering::Equal);
        }
        let ordering = a.try_cmp(b, "sort")?.unwrap_or(Ordering::Equal);
        Ok(self.dir.apply(ordering))
    }
}

/// Extracts the sort key of an item: one value per ordering clause.
///
/// A missing field is an error; sorting needs every key.
pub fn sort_key<T: Queryable + ?Sized>(item: &T, orderings: &[OrderBy]) -> Result<Vec<Value>> {
    orderings
        .iter()
        .map(|order_by| {
            order_by
                .field
                .resolve(item)
                .ok_or_else(|| QueryError::missing(order_by.field.as_str()))
        })
        .collect()
}

/// Compares two sort keys using a list of ordering clauses.
///
/// Uses the first clause as the primary sort key, the second to break ties, etc.
/// If all clauses compare equal, returns `Equal`.
pub fn compare_keys(a: &[Value], b: &[Value], orderings: &[OrderBy]) -> Result<Ordering> {
    for ((val_a, val_b), order_by) in a.iter().zip(b).zip(orderings) {
        let ordering = order_by.compare(val_a, val_b)?;
        if ordering != Ordering::Equal {
            return Ok(ordering);
        }
    }
    Ok(Ordering::Equal)
}
