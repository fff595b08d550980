//! Grouped aggregation.
//!
//! An [`Aggregator`] groups a source of objects by the values of one or more
//! fields and feeds every object into a fresh set of [`Accumulator`]s owned
//! by its group. Each group yields one [`AggregateRow`], in the order the
//! groups were first seen.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use objects_query::{Aggregator, Count, Max, Value};
//!
//! let rows: Vec<BTreeMap<String, Value>> = [(1, 2), (1, 1), (3, 5)]
//!     .into_iter()
//!     .map(|(kind, id)| {
//!         BTreeMap::from([
//!             ("kind".to_string(), Value::from(kind)),
//!             ("id".to_string(), Value::from(id)),
//!         ])
//!     })
//!     .collect();
//!
//! let mut agg = Aggregator::new(rows, ["kind"])
//!     .aggregate("mx", Max::new("id"))
//!     .aggregate("n", Count::new("id"));
//!
//! let result = agg.fetch_all().unwrap();
//! assert_eq!(result.len(), 2);
//! assert_eq!(result[0].get("mx"), Some(&Value::from(2)));
//! assert_eq!(result[1].get("n"), Some(&Value::from(1)));
//! ```

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

use crate::access::{FieldPath, Queryable};
use crate::error::{QueryError, Result};
use crate::value::{Mapping, Number, Value};

/// Running state of one aggregate function within one group.
///
/// Implementations read their own field from each object handed to
/// [`Accumulator::add_value`] and report the final value from
/// [`Accumulator::result`].
pub trait Accumulator {
    /// Folds one object into the running state.
    fn add_value(&mut self, obj: &dyn Queryable) -> Result<()>;

    /// Returns the aggregate of everything added so far.
    fn result(&self) -> Result<Value>;
}

/// Counts the objects carrying the field.
#[derive(Debug, Clone)]
pub struct Count {
    field: FieldPath,
    count: u64,
}

impl Count {
    pub fn new(field: impl Into<FieldPath>) -> Self {
        Count {
            field: field.into(),
            count: 0,
        }
    }
}

impl Accumulator for Count {
    fn add_value(&mut self, obj: &dyn Queryable) -> Result<()> {
        if self.field.resolve(obj).is_some() {
            self.count += 1;
        }
        Ok(())
    }

    fn result(&self) -> Result<Value> {
        Ok(Value::from(self.count))
    }
}

/// Sums the field over the objects carrying it. Starts at integer zero.
#[derive(Debug, Clone)]
pub struct Sum {
    field: FieldPath,
    total: Number,
}

impl Sum {
    pub fn new(field: impl Into<FieldPath>) -> Self {
        Sum {
            field: field.into(),
            total: Number::I64(0),
        }
    }
}

impl Accumulator for Sum {
    fn add_value(&mut self, obj: &dyn Queryable) -> Result<()> {
        if let Some(value) = self.field.resolve(obj) {
            self.total = add_number(self.total, &value, "sum")?;
        }
        Ok(())
    }

    fn result(&self) -> Result<Value> {
        Ok(Value::Number(self.total))
    }
}

/// Arithmetic mean of the field over the objects carrying it.
///
/// [`Accumulator::result`] fails with [`QueryError::DivisionByZero`] when no
/// object in the group had the field.
#[derive(Debug, Clone)]
pub struct Avg {
    field: FieldPath,
    total: Number,
    count: u64,
}

impl Avg {
    pub fn new(field: impl Into<FieldPath>) -> Self {
        Avg {
            field: field.into(),
            total: Number::I64(0),
            count: 0,
        }
    }
}

impl Accumulator for Avg {
    fn add_value(&mut self, obj: &dyn Queryable) -> Result<()> {
        if let Some(value) = self.field.resolve(obj) {
            self.total = add_number(self.total, &value, "avg")?;
            self.count += 1;
        }
        Ok(())
    }

    fn result(&self) -> Result<Value> {
        if self.count == 0 {
            return Err(QueryError::DivisionByZero {
                field: self.field.to_string(),
            });
        }
        Ok(Value::from(self.total.to_f64() / self.count as f64))
    }
}

fn add_number(total: Number, value: &Value, op: &'static str) -> Result<Number> {
    match value {
        Value::Number(n) => Ok(total.add(*n)),
        other => Err(QueryError::type_mismatch(op, &Value::Number(total), other)),
    }
}

/// Smallest value of the field, compared against a start value.
///
/// The start value defaults to `0`, so a group of only positive values
/// reports `0`. Use [`Min::start`] to pick a seed that fits the data.
#[derive(Debug, Clone)]
pub struct Min {
    field: FieldPath,
    current: Value,
}

impl Min {
    pub fn new(field: impl Into<FieldPath>) -> Self {
        Min {
            field: field.into(),
            current: Value::from(0),
        }
    }

    /// Sets the start value.
    pub fn start(mut self, value: impl Into<Value>) -> Self {
        self.current = value.into();
        self
    }
}

impl Accumulator for Min {
    fn add_value(&mut self, obj: &dyn Queryable) -> Result<()> {
        if let Some(value) = self.field.resolve(obj) {
            if value.try_cmp(&self.current, "min")? == Some(std::cmp::Ordering::Less) {
                self.current = value;
            }
        }
        Ok(())
    }

    fn result(&self) -> Result<Value> {
        Ok(self.current.clone())
    }
}

/// Largest value of the field, compared against a start value.
///
/// The start value defaults to `0`, so a group of only negative values
/// reports `0`. Use [`Max::start`] to pick a seed that fits the data.
#[derive(Debug, Clone)]
pub struct Max {
    field: FieldPath,
    current: Value,
}

impl Max {
    pub fn new(field: impl Into<FieldPath>) -> Self {
        Max {
            field: field.into(),
            current: Value::from(0),
        }
    }

    /// Sets the start value.
    pub fn start(mut self, value: impl Into<Value>) -> Self {
        self.current = value.into();
        self
    }
}

impl Accumulator for Max {
    fn add_value(&mut self, obj: &dyn Queryable) -> Result<()> {
        if let Some(value) = self.field.resolve(obj) {
            if value.try_cmp(&self.current, "max")? == Some(std::cmp::Ordering::Greater) {
                self.current = value;
            }
        }
        Ok(())
    }

    fn result(&self) -> Result<Value> {
        Ok(self.current.clone())
    }
}

/// One output row: group-by values followed by aggregate results.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregateRow {
    columns: Vec<(String, Value)>,
}

impl AggregateRow {
    /// Looks up a column by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value)
    }

    /// Sets a column, replacing an existing one of the same name in place.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.columns.iter_mut().find(|(column, _)| *column == name) {
            Some((_, slot)) => *slot = value,
            None => self.columns.push((name, value)),
        }
    }

    /// Columns in output order.
    pub fn columns(&self) -> &[(String, Value)] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Converts the row into a mapping (column order is not kept).
    pub fn into_mapping(self) -> Mapping {
        self.columns.into_iter().collect()
    }
}

impl Queryable for AggregateRow {
    fn field_value(&self, field: &str) -> Option<Value> {
        self.get(field).cloned()
    }
}

impl Serialize for AggregateRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

type Factory = Box<dyn Fn() -> Box<dyn Accumulator>>;

/// Hashable group key. Numbers that compare equal hash equal.
struct GroupKey(Vec<Value>);

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for GroupKey {}

impl Hash for GroupKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.len().hash(state);
        for value in &self.0 {
            hash_value(value, state);
        }
    }
}

fn hash_value<H: Hasher>(value: &Value, state: &mut H) {
    match value {
        Value::Null => 0u8.hash(state),
        Value::Bool(b) => {
            1u8.hash(state);
            b.hash(state);
        }
        Value::Number(n) => {
            2u8.hash(state);
            // Any two numbers that compare equal share their f64 image.
            // Distinct integers above 2^53 may collide, which is allowed.
            let f = n.to_f64();
            let f = if f == 0.0 { 0.0 } else { f };
            f.to_bits().hash(state);
        }
        Value::String(s) => {
            3u8.hash(state);
            s.hash(state);
        }
        Value::Timestamp(t) => {
            4u8.hash(state);
            t.hash(state);
        }
        Value::List(items) => {
            5u8.hash(state);
            items.len().hash(state);
            for item in items {
                hash_value(item, state);
            }
        }
        Value::Map(map) => {
            6u8.hash(state);
            map.len().hash(state);
            for (k, v) in map {
                k.hash(state);
                hash_value(v, state);
            }
        }
    }
}

/// Groups a source by field values and aggregates each group.
///
/// The source is consumed on the first call to [`Aggregator::fetch_all`]
/// (or anything that needs the rows); the rows are cached afterwards.
/// A failed computation is cached too: every later call returns the same
/// error instead of an empty result.
///
/// Accumulators are created per group from the registered templates or
/// factories, so no state is shared between groups and the templates are
/// never touched.
pub struct Aggregator<'a, T> {
    source: Option<Box<dyn Iterator<Item = T> + 'a>>,
    group_by: Vec<FieldPath>,
    aggregates: Vec<(String, Factory)>,
    cache: Option<Vec<AggregateRow>>,
    failure: Option<QueryError>,
}

impl<'a, T> std::fmt::Debug for Aggregator<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field("group_by", &self.group_by)
            .field(
                "aggregates",
                &self.aggregates.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .field("cached", &self.cache.as_ref().map(Vec::len))
            .field("failure", &self.failure)
            .finish()
    }
}

impl<'a, T: Queryable + 'a> Aggregator<'a, T> {
    /// Creates an aggregator over `source`, grouped by the given fields.
    ///
    /// With no group-by fields every object falls into a single group.
    pub fn new<I, F>(source: I, group_by: impl IntoIterator<Item = F>) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
        F: Into<FieldPath>,
    {
        Aggregator {
            source: Some(Box::new(source.into_iter())),
            group_by: group_by.into_iter().map(Into::into).collect(),
            aggregates: Vec::new(),
            cache: None,
            failure: None,
        }
    }

    /// Registers a named aggregate; each group gets its own copy of `template`.
    pub fn aggregate<A>(self, name: impl Into<String>, template: A) -> Self
    where
        A: Accumulator + Clone + 'static,
    {
        self.aggregate_with(name, move || template.clone())
    }

    /// Registers a named aggregate built by `factory` once per group.
    pub fn aggregate_with<A, F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        A: Accumulator + 'static,
        F: Fn() -> A + 'static,
    {
        self.aggregates.push((
            name.into(),
            Box::new(move || Box::new(factory()) as Box<dyn Accumulator>),
        ));
        self
    }

    /// The group-by fields.
    pub fn group_by(&self) -> &[FieldPath] {
        &self.group_by
    }

    /// Computes (once) and returns the result rows.
    ///
    /// A missing group-by field, a type mismatch inside an accumulator or
    /// an average over an empty group aborts the whole computation.
    pub fn fetch_all(&mut self) -> Result<&[AggregateRow]> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        if self.cache.is_none() {
            match self.compute() {
                Ok(rows) => self.cache = Some(rows),
                Err(err) => {
                    self.failure = Some(err.clone());
                    return Err(err);
                }
            }
        }
        Ok(self.cache.as_deref().unwrap_or_default())
    }

    /// Number of groups.
    pub fn len(&mut self) -> Result<usize> {
        Ok(self.fetch_all()?.len())
    }

    /// Returns `true` if the source produced no groups.
    pub fn is_empty(&mut self) -> Result<bool> {
        Ok(self.fetch_all()?.is_empty())
    }

    /// Iterates the result rows.
    pub fn iter(&mut self) -> Result<std::slice::Iter<'_, AggregateRow>> {
        Ok(self.fetch_all()?.iter())
    }

    /// Consumes the aggregator and returns the result rows.
    pub fn into_rows(mut self) -> Result<Vec<AggregateRow>> {
        self.fetch_all()?;
        Ok(self.cache.unwrap_or_default())
    }

    fn compute(&mut self) -> Result<Vec<AggregateRow>> {
        let source = self
            .source
            .take()
            .unwrap_or_else(|| Box::new(std::iter::empty()));

        let mut index: HashMap<GroupKey, usize> = HashMap::new();
        let mut groups: Vec<(Vec<Value>, Vec<Box<dyn Accumulator>>)> = Vec::new();
        let mut seen = 0usize;

        for obj in source {
            seen += 1;
            let key = self
                .group_by
                .iter()
                .map(|path| {
                    path.resolve(&obj)
                        .ok_or_else(|| QueryError::missing(path.as_str()))
                })
                .collect::<Result<Vec<Value>>>()?;

            let key = GroupKey(key);
            let slot = match index.get(&key) {
                Some(&slot) => slot,
                None => {
                    let accumulators = self.aggregates.iter().map(|(_, make)| make()).collect();
                    groups.push((key.0.clone(), accumulators));
                    index.insert(key, groups.len() - 1);
                    groups.len() - 1
                }
            };

            for accumulator in groups[slot].1.iter_mut() {
                accumulator.add_value(&obj)?;
            }
        }

        let mut rows = Vec::with_capacity(groups.len());
        for (key, accumulators) in groups {
            let mut row = AggregateRow::default();
            for (path, value) in self.group_by.iter().zip(key) {
                row.set(path.as_str(), value);
            }
            for ((name, _), accumulator) in self.aggregates.iter().zip(&accumulators) {
                row.set(name.as_str(), accumulator.result()?);
            }
            rows.push(row);
        }

        debug!(
            objects = seen,
            groups = rows.len(),
            aggregates = self.aggregates.len(),
            "aggregation finished"
        );
        Ok(rows)
    }
}
