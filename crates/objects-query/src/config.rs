//! Predicate evaluation settings.

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, Result};

/// Default separator between a field name and an operator name.
pub const DEFAULT_SEPARATOR: &str = "__";

/// Settings that control how condition keys are parsed and evaluated.
///
/// Missing keys take their defaults when deserializing, so a partial
/// document is enough:
///
/// ```
/// use objects_query::FilterConfig;
///
/// let config: FilterConfig = serde_json::from_str(r#"{"default_on_error": true}"#).unwrap();
/// assert!(config.default_on_error);
/// assert_eq!(config.separator, "__");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Result of a filter that holds no conditions.
    pub initial: bool,
    /// Result of a condition whose field is missing on the object.
    pub default_on_error: bool,
    /// Token between field and operator in a condition key.
    pub separator: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            initial: true,
            default_on_error: false,
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

impl FilterConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        FilterConfig::default()
    }

    /// Sets the result used for missing fields.
    pub fn default_on_error(mut self, value: bool) -> Self {
        self.default_on_error = value;
        self
    }

    /// Sets the field/operator separator.
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Sets the result of an empty filter.
    pub fn initial(mut self, value: bool) -> Self {
        self.initial = value;
        self
    }

    /// Checks the configuration for values that cannot work.
    pub fn validate(&self) -> Result<()> {
        if self.separator.is_empty() {
            return Err(QueryError::InvalidConfig(
                "separator must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = FilterConfig::default();
        assert!(config.initial);
        assert!(!config.default_on_error);
        assert_eq!(config.separator, DEFAULT_SEPARATOR);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_setters() {
        let config = FilterConfig::new().default_on_error(true).separator("::");
        assert!(config.default_on_error);
        assert_eq!(config.separator, "::");
    }

    #[test]
    fn empty_separator_rejected() {
        let err = FilterConfig::new().separator("").validate().unwrap_err();
        assert!(matches!(err, QueryError::InvalidConfig(_)));
    }

    #[test]
    fn loads_from_yaml() {
        let config: FilterConfig = serde_yaml::from_str("separator: '--'\n").unwrap();
        assert_eq!(config.separator, "--");
        assert!(config.initial);
    }
}
