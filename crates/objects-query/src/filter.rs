//! Conjunction of conditions evaluated against one object.

use crate::access::Queryable;
use crate::condition::Condition;
use crate::config::FilterConfig;
use crate::error::Result;
use crate::value::Value;

/// An unordered set of conditions joined by AND.
///
/// A condition whose field is missing on the object does not fail the
/// evaluation; it contributes the configured `default_on_error` value
/// instead. Every condition is evaluated, so a type mismatch in a later
/// condition surfaces even after an earlier one failed to match.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use objects_query::{Filter, FilterConfig, Value};
///
/// let filter = Filter::from_pairs([("kind", Value::from(1)), ("id__lt", Value::from(5))], &FilterConfig::default()).unwrap();
///
/// let mut obj = BTreeMap::new();
/// obj.insert("kind".to_string(), Value::from(1));
/// obj.insert("id".to_string(), Value::from(2));
/// assert!(filter.evaluate(&obj).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct Filter {
    conditions: Vec<Condition>,
    initial: bool,
    default_on_error: bool,
}

impl Default for Filter {
    fn default() -> Self {
        Filter::with_config(&FilterConfig::default())
    }
}

impl Filter {
    /// Creates an empty filter with the default configuration.
    ///
    /// An empty filter matches every object.
    pub fn new() -> Self {
        Filter::default()
    }

    /// Creates an empty filter with the given configuration.
    pub fn with_config(config: &FilterConfig) -> Self {
        Filter {
            conditions: Vec::new(),
            initial: config.initial,
            default_on_error: config.default_on_error,
        }
    }

    /// Builds a filter from keyword-style `(key, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I, config: &FilterConfig) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        config.validate()?;
        let mut filter = Filter::with_config(config);
        for (key, value) in pairs {
            filter.push(Condition::parse(key.as_ref(), value, &config.separator)?);
        }
        Ok(filter)
    }

    /// Adds a condition.
    pub fn push(&mut self, condition: Condition) {
        self.conditions.push(condition);
    }

    /// Adds a condition, builder style.
    pub fn condition(mut self, condition: Condition) -> Self {
        self.push(condition);
        self
    }

    /// Returns the conditions.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Returns `true` if this filter holds no conditions.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Evaluates all conditions against an object.
    pub fn evaluate<T: Queryable + ?Sized>(&self, obj: &T) -> Result<bool> {
        let mut result = self.initial;
        for condition in &self.conditions {
            let matched = match condition.field().resolve(obj) {
                Some(value) => condition.matches(&value)?,
                None => self.default_on_error,
            };
            result = result && matched;
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;
    use crate::value::Mapping;

    fn obj(pairs: &[(&str, Value)]) -> Mapping {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn filter(pairs: &[(&str, Value)]) -> Filter {
        Filter::from_pairs(pairs.iter().cloned(), &FilterConfig::default()).unwrap()
    }

    #[test]
    fn empty_filter_matches_everything() {
        let f = Filter::new();
        assert!(f.is_empty());
        assert!(f.evaluate(&obj(&[])).unwrap());
        assert!(f.evaluate(&obj(&[("id", Value::from(1))])).unwrap());
    }

    #[test]
    fn conditions_are_anded() {
        let f = filter(&[("kind", Value::from(1)), ("id__gt", Value::from(1))]);
        assert!(f
            .evaluate(&obj(&[("kind", Value::from(1)), ("id", Value::from(2))]))
            .unwrap());
        assert!(!f
            .evaluate(&obj(&[("kind", Value::from(1)), ("id", Value::from(1))]))
            .unwrap());
        assert!(!f
            .evaluate(&obj(&[("kind", Value::from(3)), ("id", Value::from(5))]))
            .unwrap());
    }

    #[test]
    fn missing_field_uses_default_on_error() {
        let target = obj(&[("id", Value::from(1))]);

        let f = filter(&[("name", Value::from("x"))]);
        assert!(!f.evaluate(&target).unwrap());

        let lenient = Filter::from_pairs(
            [("name", Value::from("x"))],
            &FilterConfig::new().default_on_error(true),
        )
        .unwrap();
        assert!(lenient.evaluate(&target).unwrap());
    }

    #[test]
    fn missing_field_never_raises_type_mismatch() {
        let f = filter(&[("name__gt", Value::from(3))]);
        assert!(!f.evaluate(&obj(&[])).unwrap());
    }

    #[test]
    fn later_mismatch_surfaces_after_failed_match() {
        let f = filter(&[("id", Value::from(99)), ("name__gt", Value::from(3))]);
        let err = f
            .evaluate(&obj(&[("id", Value::from(1)), ("name", Value::from("a"))]))
            .unwrap_err();
        assert!(matches!(err, QueryError::TypeMismatch { .. }));
    }

    #[test]
    fn initial_value_is_configurable() {
        let f = Filter::with_config(&FilterConfig::new().initial(false));
        assert!(!f.evaluate(&obj(&[])).unwrap());
    }

    #[test]
    fn empty_separator_rejected_on_build() {
        let err = Filter::from_pairs([("id", 1)], &FilterConfig::new().separator("")).unwrap_err();
        assert!(matches!(err, QueryError::InvalidConfig(_)));
    }

    #[test]
    fn nested_paths() {
        let mut owner = Mapping::new();
        owner.insert("name".to_string(), Value::from("ana"));
        let target = obj(&[("owner", Value::Map(owner))]);

        assert!(filter(&[("owner.name__startswith", Value::from("an"))])
            .evaluate(&target)
            .unwrap());
        assert!(!filter(&[("owner.age__gt", Value::from(1))])
            .evaluate(&target)
            .unwrap());
    }
}
