//! Per-test run/skip decisions and target resolution.
//!
//! A test declares the environments it applies to with guard markers, e.g.
//! `["is_mk", "not has_ceph"]`. The selector evaluates them against the loaded
//! environment description and resolves the hosts a test should act on.

use crate::config::{GuardErrorPolicy, SelectionConfig};
use env_guard::{
    ClusterTopology, EnvironmentDescription, GuardError, GuardExpression, Host,
    PredicateRegistry, TopologyError,
};
use rand::Rng;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error(transparent)]
    Guard(#[from] GuardError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error("Requires {0} section in config")]
    MissingSection(String),
}

/// Whether a test runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Run,
    Skip { reason: String },
}

impl Decision {
    #[must_use]
    pub fn should_run(&self) -> bool {
        matches!(self, Decision::Run)
    }
}

/// Decides which tests run and against which hosts.
pub struct TestSelector<'a> {
    registry: &'a PredicateRegistry,
    env: &'a EnvironmentDescription,
    config: &'a SelectionConfig,
}

impl<'a> TestSelector<'a> {
    pub fn new(
        registry: &'a PredicateRegistry,
        env: &'a EnvironmentDescription,
        config: &'a SelectionConfig,
    ) -> Self {
        Self {
            registry,
            env,
            config,
        }
    }

    /// Decide whether a test with these guard markers runs.
    ///
    /// A test without markers always runs.
    ///
    /// # Errors
    ///
    /// Returns `GuardError` if a marker is malformed or names an unknown guard.
    pub fn decide<S: AsRef<str>>(&self, markers: &[S]) -> Result<Decision, GuardError> {
        if markers.is_empty() {
            return Ok(Decision::Run);
        }

        let expression = GuardExpression::from_markers(markers)?;
        let outcome = expression.evaluate_detailed(self.registry, self.env)?;

        if outcome.value {
            return Ok(Decision::Run);
        }

        let reason = format!(
            "Requires criteria: {}, computed instead: {}",
            expression, outcome.computed
        );
        tracing::info!(target: "env_tests.selection", reason = %reason, "Skipping test");
        Ok(Decision::Skip { reason })
    }

    /// Like [`TestSelector::decide`], applying the configured guard error policy.
    ///
    /// # Errors
    ///
    /// Returns `GuardError` only under `GuardErrorPolicy::Fail`.
    pub fn decide_or_skip<S: AsRef<str>>(&self, markers: &[S]) -> Result<Decision, GuardError> {
        match self.decide(markers) {
            Ok(decision) => Ok(decision),
            Err(e) if self.config.guard_errors == GuardErrorPolicy::Skip => {
                tracing::warn!(
                    target: "env_tests.selection",
                    error = %e,
                    "Guard could not be evaluated, skipping test"
                );
                Ok(Decision::Skip {
                    reason: e.to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Configuration section an application test depends on.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::MissingSection` when the section is absent.
    pub fn require_section(&self, name: &str) -> Result<&'a Value, SelectionError> {
        self.env.section(name).ok_or_else(|| {
            tracing::info!(target: "env_tests.selection", section = %name, "Config section missing");
            SelectionError::MissingSection(name.to_string())
        })
    }

    /// Hosts with `role`, in topology order.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EmptyCluster` if no host has the role.
    pub fn resolve_targets(
        &self,
        topology: &ClusterTopology,
        role: &str,
    ) -> Result<ClusterTopology, SelectionError> {
        let targets = topology.filter_by_role(role);
        if targets.is_empty() {
            return Err(TopologyError::EmptyCluster {
                selection: format!("role == {role}"),
            }
            .into());
        }

        tracing::debug!(
            target: "env_tests.selection",
            role = %role,
            target_count = targets.len(),
            "Resolved targets"
        );
        Ok(targets)
    }

    /// One uniformly chosen host with `role`.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EmptyCluster` if no host has the role.
    pub fn pick_target<'t, R>(
        &self,
        topology: &'t ClusterTopology,
        role: &str,
        rng: &mut R,
    ) -> Result<&'t Host, SelectionError>
    where
        R: Rng + ?Sized,
    {
        Ok(topology.get_random_by_role(role, rng)?)
    }
}
