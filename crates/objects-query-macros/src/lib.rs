//! Proc macros for objects-query.
//!
//! # Available Macros
//!
//! - [`Queryable`] - Generate field access for query-enabled structs
//!
//! The derive is re-exported by `objects-query` behind its default `derive`
//! feature; depend on that crate rather than on this one.

mod query;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Queryable` trait for a struct with named fields.
///
/// Every field is queryable under its own name unless annotated otherwise.
/// Field values are converted with `Value::from`, so each field type must
/// implement `Clone` and `Into<Value>`.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `skip` | Exclude this field from queries |
/// | `rename = "..."` | Use a custom name for queries |
///
/// # Generated Code
///
/// The macro generates:
///
/// 1. Field name constants (e.g., `Task::NAME`, `Task::PRIORITY`)
/// 2. Implementation of `Queryable::field_value()`
///
/// # Example
///
/// ```ignore
/// use objects_query::{Queryable, QuerySet, Q};
///
/// #[derive(Clone, Queryable)]
/// struct Task {
///     name: String,
///     #[query(rename = "type")]
///     kind: i64,
///     #[query(skip)]
///     internal_id: u64,
/// }
///
/// let tasks = vec![
///     Task { name: "Write docs".into(), kind: 1, internal_id: 1 },
///     Task { name: "Fix bug".into(), kind: 3, internal_id: 2 },
/// ];
///
/// let mut qs = QuerySet::new(tasks);
/// let mut docs = qs.filter(Q::eq(Task::TYPE, 1));
/// assert_eq!(docs.count().unwrap(), 1);
/// ```
#[proc_macro_derive(Queryable, attributes(query))]
pub fn queryable_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    query::queryable_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
