//! Error types for guard evaluation and topology queries.

use thiserror::Error;

/// Errors raised while building or querying the predicate registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Predicate name does not start with `is_` or `has_`
    #[error("Guard must start with \"is_\" or \"has_\", got {0} instead")]
    InvalidPredicateName(String),

    /// A predicate with the same name is already registered
    #[error("Guard with name {0} is already registered")]
    DuplicatePredicate(String),

    /// No predicate registered under this name
    #[error("Guard with name {0} not found")]
    PredicateNotFound(String),
}

/// Errors raised while parsing or evaluating a guard expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardError {
    /// Identifier is not present in the predicate source
    #[error("Guard with name {name} not found in expression '{expression}'")]
    UnknownGuard { name: String, expression: String },

    /// Bad naming, unbalanced parentheses or an invalid token sequence
    #[error("Malformed guard expression '{expression}': {reason}")]
    MalformedGuard { expression: String, reason: String },
}

impl GuardError {
    pub(crate) fn malformed(expression: &str, reason: impl Into<String>) -> Self {
        GuardError::MalformedGuard {
            expression: expression.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while building or querying a cluster topology.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    /// Host construction invariant violated
    #[error("Invalid host: {reason}")]
    InvalidHost { reason: String },

    /// A host record at `index` could not be turned into a host
    #[error("Invalid cluster: host record #{index} rejected: {source}")]
    InvalidCluster {
        index: usize,
        #[source]
        source: Box<TopologyError>,
    },

    /// Selection ran against an empty set of hosts
    #[error("No hosts available for selection ({selection})")]
    EmptyCluster { selection: String },

    /// Lookup found no matching host
    #[error("No valid host found for condition: {condition}")]
    NoValidHost { condition: String },

    /// Positional access outside the cluster
    #[error("Host index {index} out of range for cluster of {len} hosts")]
    IndexOutOfRange { index: usize, len: usize },
}
