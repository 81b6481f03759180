//! Test selection for the StackLight end-to-end suite.
//!
//! Each test in the suite carries guard markers describing the deployments it
//! applies to, and acts on hosts picked from the cluster topology by role. This
//! crate turns both into decisions the test harness can act on.
//!
//! # Configuration
//!
//! - `ENV_TESTS_RANDOM_SEED`: seed for random target selection (replayable runs)
//! - `ENV_TESTS_GUARD_ERRORS`: `fail` (default) or `skip` on broken guard markers
//! - `ENV_TESTS_LOG_FILTER`: tracing filter for test output
//! - `ENV_TESTS_LOG_FORMAT`: `text` (default) or `json` test output
//!
//! # Usage
//!
//! ```
//! use env_guard::{ClusterTopology, EnvironmentDescription, HostRecord, PredicateRegistry};
//! use env_tests::config::SelectionConfig;
//! use env_tests::selection::{Decision, TestSelector};
//!
//! let registry = PredicateRegistry::with_builtin();
//! let env = EnvironmentDescription::from_value(serde_json::json!({"env": {"type": "mk"}}));
//! let config = SelectionConfig::default();
//! let selector = TestSelector::new(&registry, &env, &config);
//!
//! assert_eq!(selector.decide(&["is_mk and not is_fuel"]), Ok(Decision::Run));
//!
//! let topology = ClusterTopology::from_records(vec![HostRecord {
//!     address: "10.0.0.1".to_string(),
//!     roles: vec!["controller".to_string()],
//!     hostname: Some("ctl01.domain.local".to_string()),
//! }])
//! .unwrap();
//! let mut rng = config.rng();
//! let target = selector.pick_target(&topology, "controller", &mut rng).unwrap();
//! assert_eq!(target.hostname(), "ctl01");
//! ```

pub mod config;
pub mod selection;
pub mod telemetry;
