//! Implementation of the `#[derive(Queryable)]` macro.
//!
//! Generates field access and field name constants for structs queried
//! through objects-query.

mod attrs;
mod derive;

pub use derive::queryable_derive_impl;
