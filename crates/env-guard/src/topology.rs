//! Cluster topology: the ordered set of hosts in the deployment under test.
//!
//! Built once per test session from host records, then only queried. Iteration
//! order is insertion order, and every lookup returns the first match in that
//! order. Addresses are not required to be unique.

use crate::error::TopologyError;
use crate::host::{Host, HostRecord};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;

pub const ROLE_CONTROLLER: &str = "controller";
pub const ROLE_COMPUTE: &str = "compute";

/// Ordered collection of hosts with role-based selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterTopology {
    hosts: Vec<Host>,
}

impl ClusterTopology {
    #[must_use]
    pub fn new(hosts: Vec<Host>) -> Self {
        Self { hosts }
    }

    /// Build a topology from host records, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::InvalidCluster` naming the first record that
    /// does not form a valid host.
    pub fn from_records<I>(records: I) -> Result<Self, TopologyError>
    where
        I: IntoIterator<Item = HostRecord>,
    {
        let hosts = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                Host::try_from(record).map_err(|source| TopologyError::InvalidCluster {
                    index,
                    source: Box::new(source),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            target: "env_guard.topology",
            host_count = hosts.len(),
            "Built cluster topology"
        );

        Ok(Self::new(hosts))
    }

    pub fn add_host(&mut self, host: Host) {
        self.hosts.push(host);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Host> {
        self.hosts.iter()
    }

    #[must_use]
    pub fn hosts(&self) -> &[Host] {
        &self.hosts
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Host> {
        self.hosts.get(index)
    }

    /// Replace the host at `index`, returning the previous one.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::IndexOutOfRange` if `index` is past the end.
    pub fn replace(&mut self, index: usize, host: Host) -> Result<Host, TopologyError> {
        let len = self.hosts.len();
        let slot = self
            .hosts
            .get_mut(index)
            .ok_or(TopologyError::IndexOutOfRange { index, len })?;
        Ok(std::mem::replace(slot, host))
    }

    /// Remove the host at `index`, shifting later hosts down.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::IndexOutOfRange` if `index` is past the end.
    pub fn remove(&mut self, index: usize) -> Result<Host, TopologyError> {
        let len = self.hosts.len();
        if index >= len {
            return Err(TopologyError::IndexOutOfRange { index, len });
        }
        Ok(self.hosts.remove(index))
    }

    /// First host in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EmptyCluster` if there are no hosts.
    pub fn first(&self) -> Result<&Host, TopologyError> {
        self.hosts.first().ok_or_else(|| TopologyError::EmptyCluster {
            selection: "first host".to_string(),
        })
    }

    /// Hosts carrying `role`, in original order. May be empty.
    #[must_use]
    pub fn filter_by_role(&self, role: &str) -> ClusterTopology {
        self.hosts
            .iter()
            .filter(|host| host.has_role(role))
            .cloned()
            .collect()
    }

    /// First host with exactly this address.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::NoValidHost` if no host has the address.
    pub fn get_by_address(&self, address: &str) -> Result<&Host, TopologyError> {
        self.hosts
            .iter()
            .find(|host| host.address() == address)
            .ok_or_else(|| TopologyError::NoValidHost {
                condition: format!("address == {address}"),
            })
    }

    /// First host, in insertion order, whose fqdn equals or contains `name`.
    ///
    /// Exact and substring matches rank equally: with hosts `ctl01.domain.local`
    /// and `ctl01` (in that order), `get_by_hostname("ctl01")` returns the
    /// former. An empty `name` matches nothing.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::NoValidHost` if no host matches.
    pub fn get_by_hostname(&self, name: &str) -> Result<&Host, TopologyError> {
        let not_found = || TopologyError::NoValidHost {
            condition: format!("hostname == {name}"),
        };

        if name.is_empty() {
            return Err(not_found());
        }

        self.hosts
            .iter()
            .find(|host| host.fqdn() == name || host.fqdn().contains(name))
            .ok_or_else(not_found)
    }

    #[must_use]
    pub fn get_controllers(&self) -> ClusterTopology {
        self.filter_by_role(ROLE_CONTROLLER)
    }

    #[must_use]
    pub fn get_computes(&self) -> ClusterTopology {
        self.filter_by_role(ROLE_COMPUTE)
    }

    /// Uniformly pick one host carrying `role`.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EmptyCluster` if no host has the role.
    pub fn get_random_by_role<R>(&self, role: &str, rng: &mut R) -> Result<&Host, TopologyError>
    where
        R: Rng + ?Sized,
    {
        let candidates: Vec<&Host> = self.hosts.iter().filter(|host| host.has_role(role)).collect();

        let Some(host) = candidates.choose(rng) else {
            tracing::warn!(
                target: "env_guard.topology",
                role = %role,
                "No hosts available for random selection"
            );
            return Err(TopologyError::EmptyCluster {
                selection: format!("role == {role}"),
            });
        };

        tracing::debug!(
            target: "env_guard.topology",
            role = %role,
            candidate_count = candidates.len(),
            selected = %host.address(),
            "Selected random host"
        );

        Ok(*host)
    }

    /// # Errors
    ///
    /// Returns `TopologyError::EmptyCluster` if there are no controllers.
    pub fn get_random_controller<R>(&self, rng: &mut R) -> Result<&Host, TopologyError>
    where
        R: Rng + ?Sized,
    {
        self.get_random_by_role(ROLE_CONTROLLER, rng)
    }

    /// # Errors
    ///
    /// Returns `TopologyError::EmptyCluster` if there are no computes.
    pub fn get_random_compute<R>(&self, rng: &mut R) -> Result<&Host, TopologyError>
    where
        R: Rng + ?Sized,
    {
        self.get_random_by_role(ROLE_COMPUTE, rng)
    }

    /// Distinct roles across all hosts, sorted.
    #[must_use]
    pub fn roles(&self) -> BTreeSet<&str> {
        self.hosts
            .iter()
            .flat_map(|host| host.roles().iter().map(String::as_str))
            .collect()
    }
}

impl FromIterator<Host> for ClusterTopology {
    fn from_iter<T: IntoIterator<Item = Host>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ClusterTopology {
    type Item = &'a Host;
    type IntoIter = std::slice::Iter<'a, Host>;

    fn into_iter(self) -> Self::IntoIter {
        self.hosts.iter()
    }
}

impl IntoIterator for ClusterTopology {
    type Item = Host;
    type IntoIter = std::vec::IntoIter<Host>;

    fn into_iter(self) -> Self::IntoIter {
        self.hosts.into_iter()
    }
}
