//! Runtime value types for field comparison.
//!
//! The [`Value`] enum represents the value of a field extracted from an
//! object. Every accessor returns owned values, so the same type is used for
//! comparison operands, group keys and aggregation results.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, Result};

/// A key/value mapping of field names to values.
pub type Mapping = BTreeMap<String, Value>;

/// Runtime value for comparison.
///
/// `Null` is the null sentinel: a field that is present but holds no value.
/// A field that does not exist at all is reported by the accessor as `None`
/// instead (see [`crate::Queryable`]).
///
/// # Example
///
/// ```
/// use objects_query::{Value, Number};
///
/// assert_eq!(Value::from(3i32), Value::Number(Number::I64(3)));
/// assert_eq!(Value::from(3u8), Value::from(3.0f64));
/// assert!(Value::from(None::<i32>).is_null());
/// ```
///
/// # Serde
///
/// The representation is untagged. A `Timestamp` serializes as its bare
/// millisecond count, so deserializing it yields a `Number`. Deserialize
/// into [`Timestamp`] directly where the schema is known.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null sentinel.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(Number),
    /// String value.
    String(String),
    /// Timestamp value (milliseconds since Unix epoch).
    Timestamp(Timestamp),
    /// Ordered sequence of values.
    List(Vec<Value>),
    /// Nested mapping. Never adapted further into an object.
    Map(Mapping),
}

impl Value {
    /// Returns the null sentinel.
    pub fn null() -> Self {
        Value::Null
    }

    /// Returns `true` if this is the null sentinel.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if this is a `String` value.
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns `true` if this is a `Number` value.
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extracts the timestamp value, if present.
    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// Extracts the list items, if present.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Extracts the nested mapping, if present.
    pub fn as_map(&self) -> Option<&Mapping> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Short name of the value's kind, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Timestamp(_) => "timestamp",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    /// Looks up one path segment inside a container value.
    ///
    /// Maps are indexed by key, lists by a decimal position. Scalars have
    /// no children.
    pub fn child(&self, segment: &str) -> Option<&Value> {
        match self {
            Value::Map(map) => map.get(segment),
            Value::List(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    /// Orders two values of the same kind.
    ///
    /// Returns `Ok(None)` when the values are comparable in principle but
    /// unordered (NaN). Values of different kinds, nulls, and maps cannot
    /// be ordered and yield a [`QueryError::TypeMismatch`] tagged with `op`.
    pub fn try_cmp(&self, other: &Value, op: &'static str) -> Result<Option<Ordering>> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => Ok(a.compare(*b)),
            (Value::String(a), Value::String(b)) => Ok(Some(a.cmp(b))),
            (Value::Timestamp(a), Value::Timestamp(b)) => Ok(Some(a.cmp(b))),
            (Value::Bool(a), Value::Bool(b)) => Ok(Some(a.cmp(b))),
            (Value::List(a), Value::List(b)) => {
                for (x, y) in a.iter().zip(b) {
                    if x == y {
                        continue;
                    }
                    return x.try_cmp(y, op);
                }
                Ok(Some(a.len().cmp(&b.len())))
            }
            _ => Err(QueryError::type_mismatch(op, self, other)),
        }
    }

    /// Membership test with `self` as the container.
    ///
    /// Lists test element equality, strings test for a substring and maps
    /// test key presence.
    pub fn contains(&self, item: &Value) -> Result<bool> {
        match (self, item) {
            (Value::List(items), _) => Ok(items.iter().any(|v| v == item)),
            (Value::String(haystack), Value::String(needle)) => Ok(haystack.contains(needle.as_str())),
            (Value::Map(map), Value::String(key)) => Ok(map.contains_key(key)),
            (Value::Map(_), _) => Ok(false),
            _ => Err(QueryError::type_mismatch("in", item, self)),
        }
    }

    /// Prefix test for strings and lists.
    pub fn starts_with(&self, prefix: &Value) -> Result<bool> {
        match (self, prefix) {
            (Value::String(s), Value::String(p)) => Ok(s.starts_with(p.as_str())),
            (Value::List(items), Value::List(p)) => Ok(items.starts_with(p)),
            _ => Err(QueryError::type_mismatch("startswith", self, prefix)),
        }
    }

    /// Suffix test for strings and lists.
    pub fn ends_with(&self, suffix: &Value) -> Result<bool> {
        match (self, suffix) {
            (Value::String(s), Value::String(p)) => Ok(s.ends_with(p.as_str())),
            (Value::List(items), Value::List(p)) => Ok(items.ends_with(p)),
            _ => Err(QueryError::type_mismatch("endswith", self, suffix)),
        }
    }
}

/// Equality across kinds is never an error: values of different kinds are
/// simply unequal. Numbers compare by value regardless of variant.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Timestamp(t) => write!(f, "@{}", t.0),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}: {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Numeric value supporting all common numeric types.
///
/// Numbers are stored in one of three variants to preserve precision:
/// - `I64` for signed integers
/// - `U64` for unsigned integers
/// - `F64` for floating point
///
/// Comparisons between different numeric types are handled by converting
/// to the appropriate common type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64 for comparison.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Returns `true` for the integer variants.
    pub fn is_integer(self) -> bool {
        !matches!(self, Number::F64(_))
    }

    /// Compares two numbers, handling mixed types.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            // Same type comparisons
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::F64(a), Number::F64(b)) => a.partial_cmp(&b),

            // Mixed integers are exact in i128
            (Number::I64(a), Number::U64(b)) => Some((a as i128).cmp(&(b as i128))),
            (Number::U64(a), Number::I64(b)) => Some((a as i128).cmp(&(b as i128))),

            // Mixed with float - convert to f64
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }

    /// Adds two numbers.
    ///
    /// Integer sums stay integral and fall back to `F64` only when the
    /// result fits neither `i64` nor `u64`.
    pub fn add(self, other: Number) -> Number {
        match (self, other) {
            (Number::U64(a), Number::U64(b)) => match a.checked_add(b) {
                Some(sum) => Number::U64(sum),
                None => Number::F64(a as f64 + b as f64),
            },
            (Number::I64(_) | Number::U64(_), Number::I64(_) | Number::U64(_)) => {
                Number::from_i128(self.as_i128() + other.as_i128())
            }
            _ => Number::F64(self.to_f64() + other.to_f64()),
        }
    }

    fn as_i128(self) -> i128 {
        match self {
            Number::I64(n) => n as i128,
            Number::U64(n) => n as i128,
            Number::F64(n) => n as i128,
        }
    }

    fn from_i128(n: i128) -> Number {
        if let Ok(v) = i64::try_from(n) {
            Number::I64(v)
        } else if let Ok(v) = u64::try_from(n) {
            Number::U64(v)
        } else {
            Number::F64(n as f64)
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.compare(*other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{}", n),
            Number::U64(n) => write!(f, "{}", n),
            Number::F64(n) => write!(f, "{}", n),
        }
    }
}

macro_rules! number_from {
    ($variant:ident as $target:ty: $($source:ty),*) => {
        $(
            impl From<$source> for Number {
                fn from(n: $source) -> Self {
                    Number::$variant(n as $target)
                }
            }

            impl From<$source> for Value {
                fn from(n: $source) -> Self {
                    Value::Number(Number::from(n))
                }
            }
        )*
    };
}

number_from!(I64 as i64: i8, i16, i32, i64, isize);
number_from!(U64 as u64: u8, u16, u32, u64, usize);
number_from!(F64 as f64: f32, f64);

/// Timestamp value represented as milliseconds since Unix epoch.
///
/// This provides a simple, timezone-agnostic representation suitable
/// for comparison operations.
///
/// # Example
///
/// ```
/// use objects_query::Timestamp;
///
/// assert!(Timestamp(1000) < Timestamp(2000));
/// assert_eq!(Timestamp::from_secs(2).as_millis(), 2000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Creates a new timestamp from milliseconds since Unix epoch.
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    /// Creates a new timestamp from seconds since Unix epoch.
    pub fn from_secs(secs: i64) -> Self {
        Timestamp(secs * 1000)
    }

    /// Returns the timestamp as milliseconds since Unix epoch.
    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// Returns the timestamp as seconds since Unix epoch.
    pub fn as_secs(self) -> i64 {
        self.0 / 1000
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<Timestamp> for Value {
    fn from(t: Timestamp) -> Self {
        Value::Timestamp(t)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Value::Map(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Number(Number::I64(i))
                } else if let Some(u) = n.as_u64() {
                    Value::Number(Number::U64(u))
                } else {
                    Value::Number(Number::F64(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_type_checks() {
        assert!(Value::from("test").is_string());
        assert!(Value::from(42).is_number());
        assert!(Value::Null.is_null());
        assert!(!Value::from(false).is_null());
    }

    #[test]
    fn value_extractors() {
        assert_eq!(Value::from("hello").as_str(), Some("hello"));
        assert_eq!(Value::from(42i64).as_number(), Some(Number::I64(42)));
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(
            Value::from(Timestamp(1000)).as_timestamp(),
            Some(Timestamp(1000))
        );

        // Wrong type returns None
        assert_eq!(Value::from("test").as_number(), None);
        assert_eq!(Value::from(1).as_str(), None);
    }

    #[test]
    fn number_comparisons_same_type() {
        assert_eq!(
            Number::I64(5).compare(Number::I64(10)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Number::U64(5).compare(Number::U64(10)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Number::F64(5.0).compare(Number::F64(10.0)),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn number_comparisons_mixed_types() {
        assert_eq!(
            Number::I64(-1).compare(Number::U64(u64::MAX)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Number::I64(5).compare(Number::F64(5.0)),
            Some(Ordering::Equal)
        );
        assert_eq!(
            Number::U64(10).compare(Number::F64(5.5)),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn number_nan_comparison() {
        assert_eq!(Number::F64(f64::NAN).compare(Number::F64(1.0)), None);
        assert_ne!(Number::F64(f64::NAN), Number::F64(f64::NAN));
    }

    #[test]
    fn number_addition_stays_integral() {
        assert!(matches!(Number::I64(2).add(Number::I64(3)), Number::I64(5)));
        assert!(matches!(Number::I64(-2).add(Number::U64(3)), Number::I64(1)));
        assert!(matches!(
            Number::I64(i64::MAX).add(Number::I64(1)),
            Number::U64(_)
        ));
        assert!(matches!(
            Number::I64(1).add(Number::F64(0.5)),
            Number::F64(f) if f == 1.5
        ));
    }

    #[test]
    fn cross_kind_equality_is_false() {
        assert_ne!(Value::from(1), Value::from("1"));
        assert_ne!(Value::Null, Value::from(0));
        assert_eq!(Value::from(1u8), Value::from(1i64));
    }

    #[test]
    fn try_cmp_rejects_mismatched_kinds() {
        let err = Value::from(1).try_cmp(&Value::from("a"), "gt").unwrap_err();
        assert!(matches!(err, QueryError::TypeMismatch { op: "gt", .. }));

        assert!(Value::Null.try_cmp(&Value::Null, "lt").is_err());
    }

    #[test]
    fn try_cmp_lists_lexicographically() {
        let a = Value::from(vec![1, 2, 3]);
        let b = Value::from(vec![1, 3]);
        assert_eq!(a.try_cmp(&b, "lt").unwrap(), Some(Ordering::Less));
        let c = Value::from(vec![1, 2]);
        assert_eq!(c.try_cmp(&a, "lt").unwrap(), Some(Ordering::Less));
    }

    #[test]
    fn contains_by_container_kind() {
        let list = Value::from(vec![1, 2, 3]);
        assert!(list.contains(&Value::from(2)).unwrap());
        assert!(!list.contains(&Value::from("2")).unwrap());

        let s = Value::from("hello world");
        assert!(s.contains(&Value::from("o w")).unwrap());
        assert!(s.contains(&Value::from(1)).is_err());

        assert!(Value::from(5).contains(&Value::from(5)).is_err());
    }

    #[test]
    fn prefix_and_suffix() {
        let s = Value::from("aaa111");
        assert!(s.starts_with(&Value::from("aaa")).unwrap());
        assert!(s.ends_with(&Value::from("11")).unwrap());
        assert!(Value::from(vec![1, 2, 3])
            .starts_with(&Value::from(vec![1, 2]))
            .unwrap());
        assert!(Value::from(12).starts_with(&Value::from("1")).is_err());
    }

    #[test]
    fn child_lookup() {
        let mut inner = Mapping::new();
        inner.insert("city".to_string(), Value::from("Lisbon"));
        let v = Value::Map(inner);
        assert_eq!(v.child("city"), Some(&Value::from("Lisbon")));
        assert_eq!(v.child("zip"), None);

        let list = Value::from(vec!["a", "b"]);
        assert_eq!(list.child("1"), Some(&Value::from("b")));
        assert_eq!(list.child("x"), None);
        assert_eq!(Value::from(1).child("0"), None);
    }

    #[test]
    fn from_json() {
        let json = serde_json::json!({"id": 1, "tags": ["a"], "price": 1.5, "note": null});
        let v = Value::from(json);
        let map = v.as_map().unwrap();
        assert_eq!(map["id"], Value::from(1));
        assert_eq!(map["tags"], Value::from(vec!["a"]));
        assert_eq!(map["price"], Value::from(1.5));
        assert!(map["note"].is_null());
    }

    #[test]
    fn serializes_untagged() {
        let v = Value::from(vec![Value::from(1), Value::from("x"), Value::Null]);
        assert_eq!(serde_json::to_string(&v).unwrap(), r#"[1,"x",null]"#);
    }

    #[test]
    fn timestamp_deserializes_as_number() {
        let json = serde_json::to_string(&Value::from(Timestamp(1500))).unwrap();
        assert_eq!(json, "1500");
        let back: Value = serde_json::from_str(&json).unwrap();
        assert!(matches!(back, Value::Number(Number::I64(1500)) | Value::Number(Number::U64(1500))));
        let stamp: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(stamp, Timestamp(1500));
    }

    #[test]
    fn timestamp_conversions() {
        assert_eq!(Timestamp::from_secs(1).as_millis(), 1000);
        assert_eq!(Timestamp::from_millis(5000).as_secs(), 5);
    }
}
