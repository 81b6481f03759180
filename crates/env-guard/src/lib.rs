//! Environment guards and cluster topology for the StackLight end-to-end suite.
//!
//! This crate holds the pure, I/O-free core the suite uses to decide whether a
//! test applies to the deployment under test, and which hosts it should target.
//!
//! - [`environment`]: read-only view over the loaded environment description
//! - [`predicates`]: registry of named `is_*` / `has_*` guards
//! - [`guard`]: tokenizer, parser and evaluator for guard expressions
//! - [`host`] / [`topology`]: hosts with roles and the ordered cluster model
//! - [`actions`]: capability trait implemented by remote-execution adapters
//!
//! # Example
//!
//! ```
//! use env_guard::environment::EnvironmentDescription;
//! use env_guard::guard::evaluate;
//! use env_guard::predicates::PredicateRegistry;
//!
//! let registry = PredicateRegistry::with_builtin();
//! let env = EnvironmentDescription::from_value(serde_json::json!({"env": {"type": "mk"}}));
//!
//! assert_eq!(evaluate("is_mk and not is_fuel", &registry, &env), Ok(true));
//! ```

#![warn(clippy::pedantic)]

/// Module for remote host capabilities
pub mod actions;

/// Module for the environment description
pub mod environment;

/// Module for error types
pub mod error;

/// Module for guard expressions
pub mod guard;

/// Module for hosts
pub mod host;

/// Module for the predicate registry
pub mod predicates;

/// Module for the cluster topology
pub mod topology;

pub use environment::EnvironmentDescription;
pub use error::{GuardError, RegistryError, TopologyError};
pub use guard::{GuardExpression, GuardOutcome};
pub use host::{Host, HostRecord};
pub use predicates::{PredicateFn, PredicateRegistry, PredicateSource};
pub use topology::ClusterTopology;
