//! Lazily materialized collections.
//!
//! A [`QuerySet`] wraps a single-pass source of objects. `filter` and
//! `exclude` stack predicate views on top of that source without consuming
//! it; `fetch_all`, `count`, `sort` and friends materialize it into a cache
//! that is computed once and replayed afterwards.
//!
//! # Single-pass sources
//!
//! Before materialization the source can be read exactly once. Iterating an
//! unmaterialized query set drains it, and so does consuming a query set
//! derived from it through `filter`/`exclude`. A second read then sees
//! nothing:
//!
//! ```
//! use std::collections::BTreeMap;
//! use objects_query::{QuerySet, Value};
//!
//! let rows: Vec<BTreeMap<String, Value>> = (0..3)
//!     .map(|i| BTreeMap::from([("id".to_string(), Value::from(i))]))
//!     .collect();
//!
//! let mut all = QuerySet::new(rows);
//! assert_eq!(all.iter().count(), 3);
//! assert_eq!(all.iter().count(), 0); // source exhausted
//! ```
//!
//! Call [`QuerySet::fetch_all`] first when a collection has to be read more
//! than once.

use std::cmp::Ordering;

use tracing::{debug, trace};

use crate::access::Queryable;
use crate::config::FilterConfig;
use crate::error::Result;
use crate::ordering::{compare_keys, sort_key, Dir, OrderBy};
use crate::predicate::Q;
use crate::value::Value;

type Source<'a, T> = Box<dyn Iterator<Item = Result<T>> + 'a>;

/// A lazily evaluated, cache-once collection of objects.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use objects_query::{QuerySet, Q, Value};
///
/// let rows: Vec<BTreeMap<String, Value>> = [(1, 2), (1, 1), (3, 5)]
///     .into_iter()
///     .map(|(kind, id)| {
///         BTreeMap::from([
///             ("kind".to_string(), Value::from(kind)),
///             ("id".to_string(), Value::from(id)),
///         ])
///     })
///     .collect();
///
/// let mut qs = QuerySet::new(rows);
/// let mut ones = qs.filter(Q::eq("kind", 1)).sort(&["id"], false).unwrap();
/// let ids: Vec<_> = ones.iter().map(|r| r.unwrap()["id"].clone()).collect();
/// assert_eq!(ids, vec![Value::from(1), Value::from(2)]);
/// ```
pub struct QuerySet<'a, T> {
    source: Option<Source<'a, T>>,
    cache: Option<Vec<T>>,
    config: FilterConfig,
}

impl<'a, T> std::fmt::Debug for QuerySet<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuerySet")
            .field("materialized", &self.cache.is_some())
            .field("cached", &self.cache.as_ref().map(Vec::len))
            .field("config", &self.config)
            .finish()
    }
}

impl<'a, T: Clone + 'a> QuerySet<'a, T> {
    /// Wraps a source of objects.
    pub fn new<I>(source: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        QuerySet::from_results(source.into_iter().map(Ok))
    }

    /// Wraps a source whose items may already be failures.
    pub fn from_results<I>(source: I) -> Self
    where
        I: IntoIterator<Item = Result<T>>,
        I::IntoIter: 'a,
    {
        QuerySet {
            source: Some(Box::new(source.into_iter())),
            cache: None,
            config: FilterConfig::default(),
        }
    }

    /// Sets the configuration used by keyword filters.
    ///
    /// It applies to the conditions this collection parses itself, in
    /// [`QuerySet::filter_kw`] and [`QuerySet::exclude_kw`]. A [`Q`] handed
    /// to [`QuerySet::filter`] keeps the configuration it was built with;
    /// use [`Q::kw_with`], [`Q::eq_with`] or [`Q::cond_with`] to match.
    /// Derived query sets inherit it.
    pub fn with_config(mut self, config: FilterConfig) -> Self {
        self.config = config;
        self
    }

    /// The configuration used by keyword filters.
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Returns `true` once the cache has been computed.
    pub fn is_materialized(&self) -> bool {
        self.cache.is_some()
    }

    /// Loads every remaining object of the source into the cache.
    ///
    /// The cache is computed at most once. If an item fails (for example a
    /// predicate raised a type mismatch) the error is returned, the cache
    /// stays unset and the items read so far are lost.
    pub fn fetch_all(&mut self) -> Result<&[T]> {
        if self.cache.is_none() {
            let mut source = self
                .source
                .take()
                .unwrap_or_else(|| Box::new(std::iter::empty()));
            let mut items = Vec::new();
            for item in source.by_ref() {
                match item {
                    Ok(obj) => items.push(obj),
                    Err(err) => {
                        self.source = Some(source);
                        return Err(err);
                    }
                }
            }
            debug!(items = items.len(), "query set materialized");
            self.cache = Some(items);
        }
        Ok(self.cache.as_deref().unwrap_or_default())
    }

    /// Number of objects; materializes the collection.
    pub fn count(&mut self) -> Result<usize> {
        Ok(self.fetch_all()?.len())
    }

    /// Returns `true` if the collection holds at least one object.
    pub fn exists(&mut self) -> Result<bool> {
        Ok(!self.fetch_all()?.is_empty())
    }

    /// First object, if any; materializes the collection.
    pub fn first(&mut self) -> Result<Option<T>> {
        Ok(self.fetch_all()?.first().cloned())
    }

    /// Iterates the collection.
    ///
    /// A materialized collection replays its cache, as often as needed and
    /// always in the same order. Otherwise this drains the source.
    pub fn iter(&mut self) -> Box<dyn Iterator<Item = Result<T>> + '_> {
        if let Some(ref cache) = self.cache {
            return Box::new(cache.iter().cloned().map(Ok));
        }
        match self.source.as_mut() {
            Some(source) => Box::new(source),
            None => Box::new(std::iter::empty()),
        }
    }

    /// Hands the objects to a derived collection.
    ///
    /// A materialized collection gives away a copy of its cache and stays
    /// usable; otherwise the source itself moves and `self` is left empty.
    fn take_stream(&mut self) -> Source<'a, T> {
        match self.cache {
            Some(ref cache) => Box::new(cache.clone().into_iter().map(Ok)),
            None => self
                .source
                .take()
                .unwrap_or_else(|| Box::new(std::iter::empty())),
        }
    }

    fn derive(&self, source: Source<'a, T>) -> Self {
        QuerySet {
            source: Some(source),
            cache: None,
            config: self.config.clone(),
        }
    }
}

impl<'a, T: Queryable + Clone + 'a> QuerySet<'a, T> {
    /// Returns a collection of the objects matching `q`.
    ///
    /// Nothing is evaluated until the new collection is consumed; the
    /// relative order of the objects is kept. `q` is evaluated with its own
    /// configuration, not this collection's.
    pub fn filter(&mut self, q: Q) -> Self {
        let stream = self.take_stream().filter_map(move |item| match item {
            Ok(obj) => match q.evaluate(&obj) {
                Ok(true) => Some(Ok(obj)),
                Ok(false) => None,
                Err(err) => Some(Err(err)),
            },
            Err(err) => Some(Err(err)),
        });
        self.derive(Box::new(stream))
    }

    /// [`QuerySet::filter`] with keyword-style conditions, parsed with this
    /// collection's configuration.
    pub fn filter_kw<I, K, V>(&mut self, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let q = Q::kw_with(pairs, &self.config)?;
        Ok(self.filter(q))
    }

    /// Returns a collection of the objects not matching `q`.
    pub fn exclude(&mut self, q: Q) -> Self {
        self.filter(!q)
    }

    /// [`QuerySet::exclude`] with keyword-style conditions.
    pub fn exclude_kw<I, K, V>(&mut self, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let q = Q::kw_with(pairs, &self.config)?;
        Ok(self.exclude(q))
    }

    /// Returns a new collection sorted by the tuple of the named fields.
    ///
    /// Materializes `self`. The sort is stable, also when `reverse` is set.
    pub fn sort(&mut self, fields: &[&str], reverse: bool) -> Result<Self> {
        let dir = if reverse { Dir::Desc } else { Dir::Asc };
        let orderings: Vec<OrderBy> = fields.iter().map(|f| OrderBy::new(*f, dir)).collect();
        self.sort_by_fields(&orderings)
    }

    /// Returns a new collection sorted by explicit ordering clauses.
    pub fn sort_by_fields(&mut self, orderings: &[OrderBy]) -> Result<Self> {
        let items = self.fetch_all()?;
        let mut keyed = items
            .iter()
            .map(|item| Ok((sort_key(item, orderings)?, item.clone())))
            .collect::<Result<Vec<(Vec<Value>, T)>>>()?;

        let mut failure = None;
        keyed.sort_by(|(a, _), (b, _)| match compare_keys(a, b, orderings) {
            Ok(ordering) => ordering,
            Err(err) => {
                failure.get_or_insert(err);
                Ordering::Equal
            }
        });
        if let Some(err) = failure {
            return Err(err);
        }

        trace!(items = keyed.len(), keys = orderings.len(), "query set sorted");
        let sorted: Vec<T> = keyed.into_iter().map(|(_, item)| item).collect();
        Ok(self.derive(Box::new(sorted.into_iter().map(Ok))))
    }
}

impl<'a, T: 'a> IntoIterator for QuerySet<'a, T> {
    type Item = Result<T>;
    type IntoIter = Box<dyn Iterator<Item = Result<T>> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        match (self.cache, self.source) {
            (Some(cache), _) => Box::new(cache.into_iter().map(Ok)),
            (None, Some(source)) => source,
            (None, None) => Box::new(std::iter::empty()),
        }
    }
}
