//! Composable predicates.
//!
//! A [`Q`] node holds an optional [`Filter`] built from its own conditions
//! and an ordered chain of `(child, connector)` pairs. Evaluation is a
//! strict left-to-right fold over that chain:
//!
//! ```text
//! result = leaf(obj)            (true when there is no leaf)
//! AND  -> result = result && child(obj)
//! OR   -> result = result || child(obj)
//! NOT  -> result = result && !child(obj)
//! ```
//!
//! There is no operator precedence inside a chain; the order in which the
//! combinators were applied is the order of evaluation. Combinators take
//! their operands by value and return the combined node, so a node can only
//! appear in two expressions through an explicit `clone()`, which copies the
//! whole subtree.

use std::ops::{BitAnd, BitOr, Not};

use crate::access::{FieldPath, Queryable};
use crate::condition::Condition;
use crate::config::FilterConfig;
use crate::error::Result;
use crate::filter::Filter;
use crate::op::Op;
use crate::value::Value;

/// How a child node joins the running result of its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connector {
    /// `result && child`
    And,
    /// `result || child`
    Or,
    /// `result && !child`
    Not,
}

impl Connector {
    /// Returns the display name of this connector.
    pub fn as_str(self) -> &'static str {
        match self {
            Connector::And => "AND",
            Connector::Or => "OR",
            Connector::Not => "NOT",
        }
    }
}

impl std::fmt::Display for Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A predicate tree node.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use objects_query::{Q, Value};
///
/// let q = Q::eq("kind", 1) & !Q::eq("id", 5);
///
/// let mut obj = BTreeMap::new();
/// obj.insert("kind".to_string(), Value::from(1));
/// obj.insert("id".to_string(), Value::from(2));
/// assert!(q.evaluate(&obj).unwrap());
///
/// obj.insert("id".to_string(), Value::from(5));
/// assert!(!q.evaluate(&obj).unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Q {
    leaf: Option<Filter>,
    chain: Vec<(Q, Connector)>,
}

impl Q {
    /// Creates an empty node. It matches every object.
    pub fn new() -> Self {
        Q::default()
    }

    /// Creates a node from keyword-style `(key, value)` pairs using the
    /// default configuration.
    ///
    /// Keys follow the `field` / `field__operator` mini-language.
    pub fn kw<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        Q::kw_with(pairs, &FilterConfig::default())
    }

    /// Creates a node from keyword-style pairs with an explicit configuration.
    pub fn kw_with<I, K, V>(pairs: I, config: &FilterConfig) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        Ok(Q::leaf(Filter::from_pairs(pairs, config)?))
    }

    /// Wraps an existing filter as the leaf of a new node.
    pub fn leaf(filter: Filter) -> Self {
        Q {
            leaf: Some(filter),
            chain: Vec::new(),
        }
    }

    /// Creates a node that ANDs all operands, in order.
    pub fn all<I>(operands: I) -> Self
    where
        I: IntoIterator<Item = Q>,
    {
        Q {
            leaf: None,
            chain: operands.into_iter().map(|q| (q, Connector::And)).collect(),
        }
    }

    /// Single equality condition, evaluated with the default configuration.
    pub fn eq(field: impl Into<FieldPath>, value: impl Into<Value>) -> Self {
        Q::eq_with(field, value, &FilterConfig::default())
    }

    /// Single equality condition evaluated with `config`.
    pub fn eq_with(
        field: impl Into<FieldPath>,
        value: impl Into<Value>,
        config: &FilterConfig,
    ) -> Self {
        Q::leaf(Filter::with_config(config).condition(Condition::eq(field, value)))
    }

    /// Single condition with an explicit operator and the default
    /// configuration.
    pub fn cond(field: impl Into<FieldPath>, op: Op, value: impl Into<Value>) -> Result<Self> {
        Q::cond_with(field, op, value, &FilterConfig::default())
    }

    /// Single condition with an explicit operator, evaluated with `config`.
    pub fn cond_with(
        field: impl Into<FieldPath>,
        op: Op,
        value: impl Into<Value>,
        config: &FilterConfig,
    ) -> Result<Self> {
        let condition = Condition::new(field, op, value)?;
        Ok(Q::leaf(Filter::with_config(config).condition(condition)))
    }

    /// Appends `other` with AND.
    pub fn and(self, other: Q) -> Self {
        self.push(other, Connector::And)
    }

    /// Appends `other` with OR.
    pub fn or(self, other: Q) -> Self {
        self.push(other, Connector::Or)
    }

    /// Appends every operand with AND, in order.
    ///
    /// `Q::kw(pairs)?.and_all([a, b])` evaluates as `leaf && a && b`.
    pub fn and_all<I>(self, operands: I) -> Self
    where
        I: IntoIterator<Item = Q>,
    {
        operands
            .into_iter()
            .fold(self, |node, operand| node.push(operand, Connector::And))
    }

    /// Returns a new node that is true exactly when `self` is false.
    pub fn negate(self) -> Self {
        Q::new().push(self, Connector::Not)
    }

    fn push(mut self, other: Q, connector: Connector) -> Self {
        self.chain.push((other, connector));
        self
    }

    /// The node's own conditions, if any.
    pub fn filter(&self) -> Option<&Filter> {
        self.leaf.as_ref()
    }

    /// The chained children, in the order they were applied.
    pub fn chain(&self) -> &[(Q, Connector)] {
        &self.chain
    }

    /// Returns `true` if this node has neither conditions nor children.
    pub fn is_empty(&self) -> bool {
        self.leaf.as_ref().map_or(true, Filter::is_empty) && self.chain.is_empty()
    }

    /// Evaluates the predicate against an object.
    pub fn evaluate<T: Queryable + ?Sized>(&self, obj: &T) -> Result<bool> {
        let mut result = match &self.leaf {
            Some(filter) => filter.evaluate(obj)?,
            None => true,
        };
        for (child, connector) in &self.chain {
            result = match connector {
                Connector::And => result && child.evaluate(obj)?,
                Connector::Or => result || child.evaluate(obj)?,
                Connector::Not => result && !child.evaluate(obj)?,
            };
        }
        Ok(result)
    }
}

impl From<Filter> for Q {
    fn from(filter: Filter) -> Self {
        Q::leaf(filter)
    }
}

impl BitAnd for Q {
    type Output = Q;

    fn bitand(self, rhs: Q) -> Q {
        self.and(rhs)
    }
}

impl BitOr for Q {
    type Output = Q;

    fn bitor(self, rhs: Q) -> Q {
        self.or(rhs)
    }
}

impl Not for Q {
    type Output = Q;

    fn not(self) -> Q {
        self.negate()
    }
}

/// Builds a [`Q`] from keyword-style conditions.
///
/// Expands to [`Q::kw`], so it evaluates to `Result<Q>`. Keys are plain
/// identifiers or string literals; Rust keywords such as `type` have to be
/// written as literals. A leading bracketed list of nodes is ANDed after
/// the keyword conditions, as with [`Q::and_all`].
///
/// ```
/// use objects_query::{q, Q};
///
/// let q = q!(kind = 1, id__gte = 2, name__regex = "ab+").unwrap();
/// assert_eq!(q.filter().unwrap().conditions().len(), 3);
///
/// let q = q!("type" = 1, id__lt = 9).unwrap();
/// assert_eq!(q.filter().unwrap().conditions().len(), 2);
///
/// let q = q!([Q::eq("a", 1) | Q::eq("b", 2)], "type" = 3).unwrap();
/// assert_eq!(q.chain().len(), 1);
/// ```
#[macro_export]
macro_rules! q {
    () => {
        ::core::result::Result::<$crate::Q, $crate::QueryError>::Ok($crate::Q::new())
    };
    ([$($operand:expr),* $(,)?] $(, $key:tt = $value:expr)* $(,)?) => {{
        let pairs: ::std::vec::Vec<(&'static str, $crate::Value)> =
            ::std::vec![$(($crate::__q_key!($key), $crate::Value::from($value))),*];
        $crate::Q::kw(pairs).map(|q| q.and_all([$($operand),*]))
    }};
    ($($key:tt = $value:expr),+ $(,)?) => {
        $crate::Q::kw([$(($crate::__q_key!($key), $crate::Value::from($value))),+])
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __q_key {
    ($key:ident) => {
        stringify!($key)
    };
    ($key:literal) => {
        $key
    };
}
