//! Attribute-style records over key/value mappings.
//!
//! Two adapters expose a [`Mapping`] as a [`Queryable`] object:
//!
//! - [`LiveRecord`] shares the mapping. Writes through the record are
//!   visible in the original mapping and vice versa.
//! - [`SnapshotRecord`] copies the mapping at construction. Writes stay
//!   local to the record.
//!
//! Either kind can be fed straight into a [`QuerySet`](crate::QuerySet) or an
//! [`Aggregator`](crate::Aggregator).

use std::cell::RefCell;
use std::rc::Rc;

use crate::access::Queryable;
use crate::error::{QueryError, Result};
use crate::value::{Mapping, Value};

/// A mapping shared between its owner and any number of live records.
pub type SharedMapping = Rc<RefCell<Mapping>>;

/// Wraps a mapping so it can be shared with [`LiveRecord`]s.
pub fn shared(mapping: Mapping) -> SharedMapping {
    Rc::new(RefCell::new(mapping))
}

/// A record backed by a shared mapping.
///
/// # Example
///
/// ```
/// use objects_query::{record, LiveRecord, Value};
///
/// let data = record::shared([("id".to_string(), Value::from(1))].into());
/// let rec = LiveRecord::new(data.clone());
///
/// rec.set("id", 2);
/// assert_eq!(data.borrow().get("id"), Some(&Value::from(2)));
/// ```
#[derive(Debug, Clone)]
pub struct LiveRecord {
    data: SharedMapping,
}

impl LiveRecord {
    pub fn new(data: SharedMapping) -> Self {
        LiveRecord { data }
    }

    /// Reads a key. Absent keys return `None`.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.data.borrow().get(key).cloned()
    }

    /// Writes a key into the shared mapping.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.data.borrow_mut().insert(key.into(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.borrow().contains_key(key)
    }

    /// The shared mapping behind this record.
    pub fn shared(&self) -> &SharedMapping {
        &self.data
    }
}

impl Queryable for LiveRecord {
    fn field_value(&self, field: &str) -> Option<Value> {
        self.get(field)
    }
}

/// A record holding its own copy of a mapping.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SnapshotRecord {
    data: Mapping,
}

impl SnapshotRecord {
    /// Copies `data` into a new record.
    pub fn new(data: &Mapping) -> Self {
        SnapshotRecord { data: data.clone() }
    }

    /// Builds a record from a JSON object.
    pub fn from_json(json: serde_json::Value) -> Result<Self> {
        match Value::from(json) {
            Value::Map(data) => Ok(SnapshotRecord { data }),
            other => Err(QueryError::InvalidOperand {
                op: "record",
                value_type: other.type_name(),
            }),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Writes a key into this record only.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.data.insert(key.into(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn as_mapping(&self) -> &Mapping {
        &self.data
    }

    pub fn into_mapping(self) -> Mapping {
        self.data
    }
}

impl From<Mapping> for SnapshotRecord {
    fn from(data: Mapping) -> Self {
        SnapshotRecord { data }
    }
}

impl Queryable for SnapshotRecord {
    fn field_value(&self, field: &str) -> Option<Value> {
        self.data.get(field).cloned()
    }
}

/// Adapts shared mappings into live records.
pub fn live_records<I>(mappings: I) -> impl Iterator<Item = LiveRecord>
where
    I: IntoIterator<Item = SharedMapping>,
{
    mappings.into_iter().map(LiveRecord::new)
}

/// Adapts borrowed mappings into snapshot records.
pub fn snapshot_records<'m, I>(mappings: I) -> impl Iterator<Item = SnapshotRecord> + 'm
where
    I: IntoIterator<Item = &'m Mapping>,
    I::IntoIter: 'm,
{
    mappings.into_iter().map(SnapshotRecord::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Aggregator, Max, QuerySet, Q};

    fn mapping(kind: i64, id: i64) -> Mapping {
        let mut m = Mapping::new();
        m.insert("type".to_string(), Value::from(kind));
        m.insert("id".to_string(), Value::from(id));
        m
    }

    #[test]
    fn live_write_is_visible_in_original() {
        let data = shared(mapping(1, 2));
        let rec = LiveRecord::new(Rc::clone(&data));
        rec.set("id", 9);
        assert_eq!(data.borrow().get("id"), Some(&Value::from(9)));

        data.borrow_mut().insert("extra".to_string(), Value::from(true));
        assert!(rec.contains("extra"));
    }

    #[test]
    fn snapshot_write_is_isolated() {
        let original = mapping(1, 2);
        let mut rec = SnapshotRecord::new(&original);
        rec.set("id", 9);
        assert_eq!(rec.get("id"), Some(&Value::from(9)));
        assert_eq!(original.get("id"), Some(&Value::from(2)));
    }

    #[test]
    fn missing_key_is_absent() {
        let rec = SnapshotRecord::new(&mapping(1, 2));
        assert_eq!(rec.get("name"), None);
        assert!(!rec.has_field("name"));
        assert_eq!(LiveRecord::new(shared(Mapping::new())).get("name"), None);
    }

    #[test]
    fn from_json_requires_object() {
        let rec = SnapshotRecord::from_json(serde_json::json!({"id": 3, "tags": ["a"]})).unwrap();
        assert_eq!(rec.get("id"), Some(&Value::from(3)));
        assert!(SnapshotRecord::from_json(serde_json::json!([1, 2])).is_err());
    }

    #[test]
    fn records_feed_a_queryset() {
        let rows = vec![mapping(1, 2), mapping(1, 1), mapping(3, 5)];
        let mut qs = QuerySet::new(snapshot_records(&rows));
        let mut hits = qs.filter(Q::eq("type", 1) & !Q::eq("id", 5));
        let ids: Vec<_> = hits
            .fetch_all()
            .unwrap()
            .iter()
            .map(|r| r.get("id").cloned())
            .collect();
        assert_eq!(ids, vec![Some(Value::from(2)), Some(Value::from(1))]);
    }

    #[test]
    fn live_records_feed_an_aggregator() {
        let data: Vec<_> = [(1, 2), (1, 1), (3, 5)]
            .into_iter()
            .map(|(k, i)| shared(mapping(k, i)))
            .collect();
        let rows = Aggregator::new(live_records(data.iter().cloned()), ["type"])
            .aggregate("mx", Max::new("id"))
            .into_rows()
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("mx"), Some(&Value::from(5)));
    }
}
