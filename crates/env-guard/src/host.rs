//! Hosts of the deployment under test.

use crate::error::TopologyError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Host-construction record as supplied by topology loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRecord {
    pub address: String,
    #[serde(default)]
    pub roles: Vec<String>,
    /// Fully-qualified name; the address is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

/// A single host: stable address, role set and fully-qualified name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    address: String,
    roles: BTreeSet<String>,
    fqdn: String,
}

impl Host {
    /// Create a host.
    ///
    /// Duplicate roles collapse into one.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::InvalidHost` if the address or fqdn is blank.
    pub fn new<I, R>(
        address: impl Into<String>,
        roles: I,
        fqdn: impl Into<String>,
    ) -> Result<Self, TopologyError>
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        let address = address.into();
        let fqdn = fqdn.into();

        if address.trim().is_empty() {
            return Err(TopologyError::InvalidHost {
                reason: "address must not be empty".to_string(),
            });
        }
        if fqdn.trim().is_empty() {
            return Err(TopologyError::InvalidHost {
                reason: format!("fqdn of host {address} must not be empty"),
            });
        }

        Ok(Self {
            address,
            roles: roles.into_iter().map(Into::into).collect(),
            fqdn,
        })
    }

    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    #[must_use]
    pub fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }

    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    #[must_use]
    pub fn fqdn(&self) -> &str {
        &self.fqdn
    }

    /// Short hostname: the first label of the fqdn.
    #[must_use]
    pub fn hostname(&self) -> &str {
        self.fqdn.split('.').next().unwrap_or(&self.fqdn)
    }
}

impl TryFrom<HostRecord> for Host {
    type Error = TopologyError;

    fn try_from(record: HostRecord) -> Result<Self, Self::Error> {
        let fqdn = record
            .hostname
            .unwrap_or_else(|| record.address.clone());
        Host::new(record.address, record.roles, fqdn)
    }
}
