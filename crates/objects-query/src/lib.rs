//! Objects Query - keyword-style filtering, sorting and aggregation over
//! in-memory Rust collections.
//!
//! The crate provides:
//!
//! - Keyword predicates: `id__gt = 3`, `name__regex = "ab+"`, dotted paths
//! - Composable predicate trees ([`Q`]) with `&`, `|` and `!`
//! - Lazy, single-pass [`QuerySet`]s with chained filter, exclude and sort
//! - Grouped aggregation ([`Aggregator`]) with Count, Sum, Avg, Min, Max
//! - Record adapters that expose key/value mappings as queryable objects
//!
//! # Quick Start
//!
//! ```rust
//! use objects_query::{q, Queryable, QuerySet, Value, Q};
//!
//! #[derive(Clone)]
//! struct Task {
//!     name: String,
//!     priority: i64,
//!     archived: bool,
//! }
//!
//! impl Queryable for Task {
//!     fn field_value(&self, field: &str) -> Option<Value> {
//!         match field {
//!             "name" => Some(Value::from(&self.name)),
//!             "priority" => Some(Value::from(self.priority)),
//!             "archived" => Some(Value::from(self.archived)),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let tasks = vec![
//!     Task { name: "Write docs".into(), priority: 3, archived: false },
//!     Task { name: "Fix bug".into(), priority: 5, archived: false },
//!     Task { name: "Old task".into(), priority: 1, archived: true },
//! ];
//!
//! let mut all = QuerySet::new(tasks);
//! let mut open = all.filter(q!(priority__gte = 3).unwrap() & !Q::eq("archived", true));
//! let mut sorted = open.sort(&["priority"], true).unwrap();
//!
//! let names: Vec<_> = sorted
//!     .fetch_all()
//!     .unwrap()
//!     .iter()
//!     .map(|t| t.name.as_str())
//!     .collect();
//! assert_eq!(names, vec!["Fix bug", "Write docs"]);
//! ```
//!
//! # Predicate Semantics
//!
//! A keyword key is `field` or `field__operator`, split at the first
//! separator. A [`Filter`] is the conjunction of its conditions; every
//! condition is evaluated. A [`Q`] folds its chain left to right with
//! short-circuit:
//!
//! ```text
//! result = leaf(obj)
//! AND -> result && child     OR -> result || child     NOT -> result && !child
//! ```
//!
//! # Operators
//!
//! | Name | Meaning |
//! |------|---------|
//! | *(none)* | equality; against null, a null test |
//! | `ne` | inequality; against null, a not-null test |
//! | `in` | membership in a list, substring, or map key |
//! | `gt` `gte` `lt` `lte` | ordering; incomparable types are an error |
//! | `startswith` `endswith` | string prefix / suffix |
//! | `regex` | pattern anchored at the start of the string |
//!
//! # Errors
//!
//! Construction problems (unknown operator, bad regex) and evaluation
//! problems (type mismatch, missing sort or group field, empty average) are
//! all reported as [`QueryError`].

mod access;
mod aggregate;
mod condition;
mod config;
mod error;
mod filter;
mod op;
mod ordering;
mod predicate;
mod queryset;
pub mod record;
mod value;

// Re-export public API
pub use access::{FieldPath, Queryable};
pub use aggregate::{Accumulator, AggregateRow, Aggregator, Avg, Count, Max, Min, Sum};
pub use condition::Condition;
pub use config::{FilterConfig, DEFAULT_SEPARATOR};
pub use error::{QueryError, Result};
pub use filter::Filter;
pub use op::Op;
pub use ordering::{compare_keys, sort_key, Dir, OrderBy};
pub use predicate::{Connector, Q};
pub use queryset::QuerySet;
pub use record::{LiveRecord, SharedMapping, SnapshotRecord};
pub use value::{Mapping, Number, Timestamp, Value};

#[cfg(feature = "derive")]
pub use objects_query_macros::Queryable;
