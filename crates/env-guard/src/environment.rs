//! Read-only view over a loaded environment description.
//!
//! The description is produced by configuration loading elsewhere in the
//! suite. Here it is only ever read, with default-on-missing lookups.

use serde_json::Value;

/// Nested configuration data describing the deployment under test.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnvironmentDescription {
    root: Value,
}

impl EnvironmentDescription {
    /// Wrap an already-loaded configuration value.
    #[must_use]
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// An empty description; every lookup misses.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_value(Value::Object(serde_json::Map::new()))
    }

    /// Look up a nested value by key path.
    ///
    /// Returns `None` if any segment is missing or an intermediate value is
    /// not a mapping. An empty path yields the root.
    #[must_use]
    pub fn lookup(&self, path: &[&str]) -> Option<&Value> {
        path.iter()
            .try_fold(&self.root, |value, key| value.as_object()?.get(*key))
    }

    /// String at `path`, or `default` when missing or not a string.
    #[must_use]
    pub fn str_or<'a>(&'a self, path: &[&str], default: &'a str) -> &'a str {
        self.lookup(path)
            .and_then(Value::as_str)
            .unwrap_or(default)
    }

    /// Boolean at `path`, or `default` when missing or not a boolean.
    #[must_use]
    pub fn bool_or(&self, path: &[&str], default: bool) -> bool {
        self.lookup(path)
            .and_then(Value::as_bool)
            .unwrap_or(default)
    }

    /// Top-level section, e.g. the `prometheus` or `nodes` block.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Value> {
        self.lookup(&[name])
    }

    #[must_use]
    pub fn contains_section(&self, name: &str) -> bool {
        self.section(name).is_some()
    }

    /// The underlying value.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.root
    }
}

impl From<Value> for EnvironmentDescription {
    fn from(root: Value) -> Self {
        Self::from_value(root)
    }
}
