//! Registry of named environment predicates ("guards").
//!
//! A guard is a pure function of the environment description whose name starts
//! with `is_` or `has_`. The registry is built once at startup, then shared by
//! reference with every guard evaluation.

use crate::environment::EnvironmentDescription;
use crate::error::RegistryError;
use std::collections::BTreeMap;

/// Signature of a guard predicate.
///
/// A plain function pointer: predicates cannot capture state, so repeated
/// evaluation for every test is always safe.
pub type PredicateFn = fn(&EnvironmentDescription) -> bool;

const GUARD_PREFIXES: [&str; 2] = ["is_", "has_"];

/// Whether `name` follows the `is_*` / `has_*` guard naming rule.
#[must_use]
pub fn is_valid_guard_name(name: &str) -> bool {
    GUARD_PREFIXES
        .iter()
        .any(|prefix| name.len() > prefix.len() && name.starts_with(prefix))
}

/// Anything guard identifiers can be resolved against.
pub trait PredicateSource {
    /// Resolve a guard by name.
    fn predicate(&self, name: &str) -> Option<PredicateFn>;
}

/// Named predicates available to guard expressions.
#[derive(Debug, Clone, Default)]
pub struct PredicateRegistry {
    predicates: BTreeMap<String, PredicateFn>,
}

impl PredicateRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the suite's built-in guards.
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for (name, predicate) in BUILTIN_GUARDS {
            let registered = registry.register(name, predicate);
            debug_assert!(registered.is_ok(), "built-in guard {name}: {registered:?}");
        }
        registry
    }

    /// Register a guard.
    ///
    /// # Errors
    ///
    /// - `RegistryError::InvalidPredicateName` - name lacks the `is_`/`has_` prefix
    /// - `RegistryError::DuplicatePredicate` - name already registered
    pub fn register(
        &mut self,
        name: impl Into<String>,
        predicate: PredicateFn,
    ) -> Result<(), RegistryError> {
        let name = name.into();

        if !is_valid_guard_name(&name) {
            return Err(RegistryError::InvalidPredicateName(name));
        }
        if self.predicates.contains_key(&name) {
            return Err(RegistryError::DuplicatePredicate(name));
        }

        tracing::debug!(target: "env_guard.predicates", guard = %name, "Registered guard");
        self.predicates.insert(name, predicate);
        Ok(())
    }

    /// Look up a guard by name.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::PredicateNotFound` if no guard has that name.
    pub fn lookup(&self, name: &str) -> Result<PredicateFn, RegistryError> {
        self.predicates
            .get(name)
            .copied()
            .ok_or_else(|| RegistryError::PredicateNotFound(name.to_string()))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.predicates.contains_key(name)
    }

    /// Registered guard names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.predicates.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl PredicateSource for PredicateRegistry {
    fn predicate(&self, name: &str) -> Option<PredicateFn> {
        self.predicates.get(name).copied()
    }
}

const BUILTIN_GUARDS: [(&str, PredicateFn); 2] = [("is_mk", is_mk), ("is_fuel", is_fuel)];

/// MK (salt model driven) deployment: `env.type == "mk"`.
#[must_use]
pub fn is_mk(env: &EnvironmentDescription) -> bool {
    env.str_or(&["env", "type"], "") == "mk"
}

/// Fuel deployment: `env.type == "fuel"`.
#[must_use]
pub fn is_fuel(env: &EnvironmentDescription) -> bool {
    env.str_or(&["env", "type"], "") == "fuel"
}
