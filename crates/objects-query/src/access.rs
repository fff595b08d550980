//! Field access for queryable objects.
//!
//! This module provides the [`Queryable`] trait, implemented by hand or via
//! `#[derive(Queryable)]`, and [`FieldPath`], a dotted attribute path parsed
//! once and resolved against many objects.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::value::Value;

/// Trait for types whose fields can be read by name.
///
/// This trait is typically derived using `#[derive(Queryable)]`, but can also
/// be implemented manually.
///
/// # Manual Implementation
///
/// ```
/// use objects_query::{Queryable, Value};
///
/// struct Task {
///     name: String,
///     priority: u8,
/// }
///
/// impl Queryable for Task {
///     fn field_value(&self, field: &str) -> Option<Value> {
///         match field {
///             "name" => Some(Value::from(&self.name)),
///             "priority" => Some(Value::from(self.priority)),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Queryable {
    /// Returns the value of a field for query comparison.
    ///
    /// Returns `None` if the object has no such field. A field that exists
    /// but holds nothing should be reported as `Some(Value::Null)`.
    fn field_value(&self, field: &str) -> Option<Value>;

    /// Returns `true` if the object has the named field.
    fn has_field(&self, field: &str) -> bool {
        self.field_value(field).is_some()
    }
}

impl<T: Queryable + ?Sized> Queryable for &T {
    fn field_value(&self, field: &str) -> Option<Value> {
        (**self).field_value(field)
    }
}

impl<T: Queryable + ?Sized> Queryable for Box<T> {
    fn field_value(&self, field: &str) -> Option<Value> {
        (**self).field_value(field)
    }
}

impl<T: Queryable + ?Sized> Queryable for Rc<T> {
    fn field_value(&self, field: &str) -> Option<Value> {
        (**self).field_value(field)
    }
}

impl<T: Queryable + ?Sized> Queryable for Arc<T> {
    fn field_value(&self, field: &str) -> Option<Value> {
        (**self).field_value(field)
    }
}

impl Queryable for BTreeMap<String, Value> {
    fn field_value(&self, field: &str) -> Option<Value> {
        self.get(field).cloned()
    }
}

impl<S: std::hash::BuildHasher> Queryable for HashMap<String, Value, S> {
    fn field_value(&self, field: &str) -> Option<Value> {
        self.get(field).cloned()
    }
}

impl Queryable for serde_json::Map<String, serde_json::Value> {
    fn field_value(&self, field: &str) -> Option<Value> {
        self.get(field).cloned().map(Value::from)
    }
}

/// A field name, possibly dotted for nested access.
///
/// The first segment is read through [`Queryable::field_value`]; every
/// further segment walks into the returned value (map key or list index).
///
/// ```
/// use std::collections::BTreeMap;
/// use objects_query::{FieldPath, Value};
///
/// let mut owner = BTreeMap::new();
/// owner.insert("name".to_string(), Value::from("ana"));
/// let mut task = BTreeMap::new();
/// task.insert("owner".to_string(), Value::Map(owner));
///
/// let path = FieldPath::parse("owner.name");
/// assert_eq!(path.resolve(&task), Some(Value::from("ana")));
/// assert_eq!(FieldPath::parse("owner.email").resolve(&task), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    name: String,
    segments: Vec<String>,
}

impl FieldPath {
    /// Parses a dotted path.
    pub fn parse(name: impl Into<String>) -> Self {
        let name = name.into();
        let segments = name.split('.').map(str::to_string).collect();
        FieldPath { name, segments }
    }

    /// The path as written.
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Returns `true` if the path has more than one segment.
    pub fn is_nested(&self) -> bool {
        self.segments.len() > 1
    }

    /// Resolves the path against an object, or `None` if any step is absent.
    pub fn resolve<T: Queryable + ?Sized>(&self, obj: &T) -> Option<Value> {
        let (first, rest) = self.segments.split_first()?;
        let root = obj.field_value(first)?;
        if rest.is_empty() {
            return Some(root);
        }
        let mut current = &root;
        for segment in rest {
            current = current.child(segment)?;
        }
        Some(current.clone())
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for FieldPath {
    fn from(name: &str) -> Self {
        FieldPath::parse(name)
    }
}

impl From<String> for FieldPath {
    fn from(name: String) -> Self {
        FieldPath::parse(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestItem {
        name: String,
        count: i32,
    }

    impl Queryable for TestItem {
        fn field_value(&self, field: &str) -> Option<Value> {
            match field {
                "name" => Some(Value::from(&self.name)),
                "count" => Some(Value::from(self.count)),
                _ => None,
            }
        }
    }

    #[test]
    fn queryable_manual_impl() {
        let item = TestItem {
            name: "test".to_string(),
            count: 42,
        };

        assert_eq!(item.field_value("name"), Some(Value::from("test")));
        assert_eq!(item.field_value("count"), Some(Value::from(42)));
        assert_eq!(item.field_value("unknown"), None);
        assert!(item.has_field("count"));
        assert!(!item.has_field("unknown"));
    }

    #[test]
    fn smart_pointers_forward() {
        let item = Rc::new(TestItem {
            name: "rc".to_string(),
            count: 1,
        });
        assert_eq!(item.field_value("name"), Some(Value::from("rc")));

        let boxed: Box<dyn Queryable> = Box::new(TestItem {
            name: "boxed".to_string(),
            count: 2,
        });
        assert_eq!(boxed.field_value("count"), Some(Value::from(2)));
    }

    #[test]
    fn simple_path_resolves_directly() {
        let item = TestItem {
            name: "x".to_string(),
            count: 3,
        };
        let path = FieldPath::parse("count");
        assert!(!path.is_nested());
        assert_eq!(path.resolve(&item), Some(Value::from(3)));
        assert_eq!(FieldPath::parse("missing").resolve(&item), None);
    }

    #[test]
    fn nested_path_through_list() {
        let mut obj = BTreeMap::new();
        obj.insert("tags".to_string(), Value::from(vec!["a", "b"]));

        assert_eq!(FieldPath::parse("tags.0").resolve(&obj), Some(Value::from("a")));
        assert_eq!(FieldPath::parse("tags.5").resolve(&obj), None);
        // scalar has no children
        assert_eq!(FieldPath::parse("tags.0.x").resolve(&obj), None);
    }

    #[test]
    fn json_map_access() {
        let json = serde_json::json!({"id": 7});
        let map = json.as_object().unwrap();
        assert_eq!(map.field_value("id"), Some(Value::from(7)));
    }

    #[test]
    fn path_display() {
        assert_eq!(FieldPath::parse("a.b").to_string(), "a.b");
        assert_eq!(FieldPath::from("a").as_str(), "a");
    }
}
