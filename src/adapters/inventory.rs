// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Inventory-backed cloud adapter.
//!
//! [`InventoryCloud`] answers account, compute and DNS calls from an [`Inventory`]
//! document (YAML or JSON) and keeps the records it is asked to change in memory.
//! It behaves like the managed services where it matters to the reconcilers:
//!
//! - zone listings do not include VPC attachments, which must be fetched per zone
//! - an upsert creates or replaces a record
//! - deleting a record that does not exist with the same value is an error
//!
//! # Example
//!
//! ```rust
//! use dnsync::adapters::InventoryCloud;
//!
//! let cloud = InventoryCloud::from_yaml(r#"
//! zones:
//!   - id: Z1
//!     name: corp.internal.
//!     private: true
//!     vpcs: [vpc-1]
//! "#).unwrap();
//! assert!(cloud.submitted().unwrap().is_empty());
//! ```

use crate::providers::{AccountDirectory, ComputeApi, DnsApi};
use crate::types::{
    AccountInfo, ChangeAction, DhcpOptionSet, DnsChange, InstanceDescription, ManagedZone,
    RecordType, VpcDescription, ZoneVisibility,
};
use anyhow::{anyhow, bail, Context as AnyhowContext, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// A zone entry in the inventory document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryZone {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub private: bool,
    /// VPCs a private zone is attached to
    #[serde(default)]
    pub vpcs: Vec<String>,
}

impl InventoryZone {
    fn visibility(&self) -> ZoneVisibility {
        if self.private {
            ZoneVisibility::Private
        } else {
            ZoneVisibility::Public
        }
    }
}

/// Everything the adapter knows about the cloud.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub accounts: Vec<AccountInfo>,
    #[serde(default)]
    pub instances: Vec<InstanceDescription>,
    #[serde(default)]
    pub vpcs: Vec<VpcDescription>,
    #[serde(default)]
    pub dhcp_options: Vec<DhcpOptionSet>,
    #[serde(default)]
    pub zones: Vec<InventoryZone>,
}

type RecordKey = (String, RecordType, String);

#[derive(Debug, Default)]
struct InventoryState {
    inventory: Inventory,
    records: BTreeMap<RecordKey, String>,
    submitted: Vec<DnsChange>,
    failing_zones: HashSet<String>,
}

/// Cloud adapter answering from an [`Inventory`]. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct InventoryCloud {
    state: Arc<Mutex<InventoryState>>,
}

impl InventoryCloud {
    #[must_use]
    pub fn new(inventory: Inventory) -> Self {
        Self {
            state: Arc::new(Mutex::new(InventoryState {
                inventory,
                ..InventoryState::default()
            })),
        }
    }

    /// Parse an inventory document. JSON is accepted as well as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not parse.
    pub fn from_yaml(document: &str) -> Result<Self> {
        let inventory: Inventory =
            serde_yaml::from_str(document).context("Failed to parse inventory document")?;
        Ok(Self::new(inventory))
    }

    /// Load an inventory document from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn load(path: &Path) -> Result<Self> {
        let document = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read inventory {}", path.display()))?;
        Self::from_yaml(&document).with_context(|| format!("Invalid inventory {}", path.display()))
    }

    fn state(&self) -> Result<MutexGuard<'_, InventoryState>> {
        self.state
            .lock()
            .map_err(|_| anyhow!("inventory state lock poisoned"))
    }

    /// Every change submitted so far, successful or not, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned.
    pub fn submitted(&self) -> Result<Vec<DnsChange>> {
        Ok(self.state()?.submitted.clone())
    }

    /// Current value of a record, if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned.
    pub fn record(&self, zone_id: &str, record_type: RecordType, name: &str) -> Result<Option<String>> {
        let key = (
            zone_id.to_string(),
            record_type,
            name.trim_end_matches('.').to_string(),
        );
        Ok(self.state()?.records.get(&key).cloned())
    }

    /// Number of records currently held.
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned.
    pub fn record_count(&self) -> Result<usize> {
        Ok(self.state()?.records.len())
    }

    /// Make every later submission to `zone_id` fail.
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned.
    pub fn fail_submissions_to(&self, zone_id: &str) -> Result<()> {
        self.state()?.failing_zones.insert(zone_id.to_string());
        Ok(())
    }
}

#[async_trait]
impl AccountDirectory for InventoryCloud {
    async fn account(&self, account_id: &str) -> Result<AccountInfo> {
        let state = self.state()?;
        state
            .inventory
            .accounts
            .iter()
            .find(|account| account.account_id == account_id)
            .cloned()
            .ok_or_else(|| anyhow!("account {account_id} not found"))
    }

    async fn compute_client(&self, role_arn: &str, region: &str) -> Result<Arc<dyn ComputeApi>> {
        debug!(role_arn, region, "Inventory compute client requested");
        Ok(Arc::new(self.clone()))
    }
}

#[async_trait]
impl ComputeApi for InventoryCloud {
    async fn describe_instances(&self, instance_id: &str) -> Result<Vec<InstanceDescription>> {
        let state = self.state()?;
        Ok(state
            .inventory
            .instances
            .iter()
            .filter(|instance| instance.instance_id == instance_id)
            .cloned()
            .collect())
    }

    async fn describe_vpcs(&self, vpc_id: &str) -> Result<Vec<VpcDescription>> {
        let state = self.state()?;
        Ok(state
            .inventory
            .vpcs
            .iter()
            .filter(|vpc| vpc.vpc_id == vpc_id)
            .cloned()
            .collect())
    }

    async fn describe_dhcp_options(&self, dhcp_options_id: &str) -> Result<Vec<DhcpOptionSet>> {
        let state = self.state()?;
        Ok(state
            .inventory
            .dhcp_options
            .iter()
            .filter(|set| set.dhcp_options_id == dhcp_options_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl DnsApi for InventoryCloud {
    async fn list_zones(&self, visibility: ZoneVisibility) -> Result<Vec<ManagedZone>> {
        let state = self.state()?;
        Ok(state
            .inventory
            .zones
            .iter()
            .filter(|zone| zone.visibility() == visibility)
            .map(|zone| ManagedZone {
                id: zone.id.clone(),
                name: zone.name.clone(),
                visibility,
                attached_networks: None,
            })
            .collect())
    }

    async fn zone_attachments(&self, zone_id: &str) -> Result<Vec<String>> {
        let state = self.state()?;
        state
            .inventory
            .zones
            .iter()
            .find(|zone| zone.id == zone_id)
            .map(|zone| zone.vpcs.clone())
            .ok_or_else(|| anyhow!("hosted zone {zone_id} not found"))
    }

    async fn submit_change(&self, change: &DnsChange) -> Result<()> {
        let mut state = self.state()?;
        state.submitted.push(change.clone());

        if state.failing_zones.contains(&change.zone_id) {
            bail!("zone {} rejected the change", change.zone_id);
        }
        if !state.inventory.zones.iter().any(|zone| zone.id == change.zone_id) {
            bail!("hosted zone {} not found", change.zone_id);
        }

        let key = (
            change.zone_id.clone(),
            change.record_type,
            change.name.clone(),
        );
        match change.action {
            ChangeAction::Upsert => {
                state.records.insert(key, change.value.clone());
            }
            ChangeAction::Delete => {
                let exists = state
                    .records
                    .get(&key)
                    .is_some_and(|value| *value == change.value);
                if !exists {
                    bail!(
                        "record {} {} with value {} not found",
                        change.submitted_name(),
                        change.record_type,
                        change.value
                    );
                }
                state.records.remove(&key);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "inventory_tests.rs"]
mod inventory_tests;
