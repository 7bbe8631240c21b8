// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Core data types shared by the resolvers, reconcilers and adapters.

use crate::constants::{DNS_RECORD_TTL_SECS, PRIVATE_ALIAS_PATH, PUBLIC_ALIAS_PATH};
use crate::dns_errors::InstanceError;
use crate::tags::{RawTag, TagSet};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use tracing::warn;

// ============================================================================
// Zones
// ============================================================================

/// Whether a managed zone answers on the internet or only inside attached VPCs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneVisibility {
    Public,
    Private,
}

impl ZoneVisibility {
    /// Lowercase name, also used as the alias tag sub-path.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => PUBLIC_ALIAS_PATH,
            Self::Private => PRIVATE_ALIAS_PATH,
        }
    }
}

impl fmt::Display for ZoneVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A zone in the managed DNS service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedZone {
    /// Zone identifier (e.g. `/hostedzone/Z123`)
    pub id: String,
    /// Zone name, normally terminated with a dot
    pub name: String,
    pub visibility: ZoneVisibility,
    /// VPCs the zone is attached to, when the listing includes them
    #[serde(default)]
    pub attached_networks: Option<Vec<String>>,
}

// ============================================================================
// Instances
// ============================================================================

/// Instance description exactly as the compute API reports it.
///
/// Every field is optional here; [`InstanceFacts::from_description`] is the single
/// place where absence is checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceDescription {
    pub instance_id: String,
    #[serde(default)]
    pub private_ip: Option<String>,
    #[serde(default)]
    pub public_ip: Option<String>,
    #[serde(default)]
    pub vpc_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<RawTag>,
}

/// Validated facts about one instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceFacts {
    pub instance_id: String,
    pub private_ip: Ipv4Addr,
    pub public_ip: Option<Ipv4Addr>,
    pub vpc_id: String,
    pub tags: TagSet,
}

/// Treat empty strings from the API as absent.
fn present(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

impl InstanceFacts {
    /// Validate a raw instance description.
    ///
    /// # Errors
    ///
    /// Returns an error if the private IP is missing or not IPv4, or if the VPC id
    /// is missing. An unparseable public IP is logged and treated as absent.
    pub fn from_description(description: &InstanceDescription) -> Result<Self, InstanceError> {
        let instance_id = description.instance_id.clone();

        let raw_private = present(description.private_ip.as_ref()).ok_or_else(|| {
            InstanceError::MissingPrivateIp {
                instance_id: instance_id.clone(),
            }
        })?;
        let private_ip =
            raw_private
                .parse::<Ipv4Addr>()
                .map_err(|_| InstanceError::InvalidPrivateIp {
                    instance_id: instance_id.clone(),
                    value: raw_private.to_string(),
                })?;

        let vpc_id = present(description.vpc_id.as_ref())
            .ok_or_else(|| InstanceError::MissingVpcId {
                instance_id: instance_id.clone(),
            })?
            .to_string();

        let public_ip = present(description.public_ip.as_ref()).and_then(|raw| {
            raw.parse::<Ipv4Addr>()
                .map_err(|_| {
                    warn!(
                        instance_id = %instance_id,
                        public_ip = raw,
                        "Ignoring unparseable public IP"
                    );
                })
                .ok()
        });

        Ok(Self {
            tags: TagSet::from_raw(&description.tags),
            instance_id,
            private_ip,
            public_ip,
            vpc_id,
        })
    }
}

/// A VPC as reported by the compute API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpcDescription {
    pub vpc_id: String,
    #[serde(default)]
    pub dhcp_options_id: Option<String>,
}

/// One key of a DHCP option set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DhcpConfiguration {
    pub key: String,
    #[serde(default)]
    pub values: Vec<String>,
}

/// A DHCP option set as reported by the compute API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DhcpOptionSet {
    pub dhcp_options_id: String,
    #[serde(default)]
    pub configurations: Vec<DhcpConfiguration>,
}

/// An account as reported by the account directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub account_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tags: Vec<RawTag>,
}

// ============================================================================
// Names
// ============================================================================

/// A hostname split into its host label and domain.
///
/// The fields are private so `fqdn == hostname + "." + domain` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    hostname: String,
    domain: String,
    fqdn: String,
}

impl ResolvedIdentity {
    /// Join a bare hostname and a domain.
    #[must_use]
    pub fn new(hostname: &str, domain: &str) -> Self {
        let hostname = hostname.trim().trim_end_matches('.').to_string();
        let domain = domain.trim().trim_matches('.').to_string();
        let fqdn = format!("{hostname}.{domain}");
        Self {
            hostname,
            domain,
            fqdn,
        }
    }

    /// Split an already-qualified name into hostname and domain.
    ///
    /// Returns `None` for a bare hostname (no dot) and for a name whose first
    /// label is empty, such as `.corp.internal`.
    #[must_use]
    pub fn qualified(raw: &str) -> Option<Self> {
        let raw = raw.trim().trim_end_matches('.');
        let (hostname, domain) = raw.split_once('.')?;
        if hostname.is_empty() {
            return None;
        }
        Some(Self::new(hostname, domain))
    }

    /// Resolve a raw name: a qualified name keeps its own domain, a bare
    /// hostname gets `default_domain`.
    ///
    /// Callers check [`has_host_label`] first.
    #[must_use]
    pub fn resolve(raw: &str, default_domain: &str) -> Self {
        Self::qualified(raw).unwrap_or_else(|| Self::new(raw, default_domain))
    }

    #[must_use]
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    #[must_use]
    pub fn fqdn(&self) -> &str {
        &self.fqdn
    }
}

/// Whether a raw name starts with a non-empty host label.
///
/// False for blank names and for names like `.corp.internal` or `.`.
#[must_use]
pub fn has_host_label(raw: &str) -> bool {
    raw.trim()
        .trim_end_matches('.')
        .split('.')
        .next()
        .is_some_and(|label| !label.is_empty())
}

impl fmt::Display for ResolvedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fqdn)
    }
}

/// An additional name configured through alias tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasSpec {
    /// The alias token from the alias list
    pub key: String,
    pub visibility: ZoneVisibility,
    /// Hostname override from the per-alias hostname tag
    pub hostname: Option<String>,
    /// Zone id override from the per-alias zone id tag
    pub zone_id: Option<String>,
}

impl AliasSpec {
    /// The raw name to register: the override when present, else the alias token.
    #[must_use]
    pub fn raw_hostname(&self) -> &str {
        self.hostname.as_deref().unwrap_or(&self.key)
    }
}

// ============================================================================
// Record changes
// ============================================================================

/// Record types managed by dnsync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    A,
    Ptr,
}

impl RecordType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Ptr => "PTR",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Change actions submitted to the DNS service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeAction {
    Upsert,
    Delete,
}

impl ChangeAction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upsert => "UPSERT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One record change. A registration run produces a list of upserts, which is
/// persisted so the run can later be reversed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DnsChange {
    pub zone_id: String,
    pub record_type: RecordType,
    /// Record name without the trailing dot
    pub name: String,
    pub value: String,
    pub action: ChangeAction,
}

impl DnsChange {
    #[must_use]
    pub fn upsert(zone_id: &str, record_type: RecordType, name: &str, value: &str) -> Self {
        Self {
            zone_id: zone_id.to_string(),
            record_type,
            name: name.trim_end_matches('.').to_string(),
            value: value.to_string(),
            action: ChangeAction::Upsert,
        }
    }

    /// The change that undoes this one.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let action = match self.action {
            ChangeAction::Upsert => ChangeAction::Delete,
            ChangeAction::Delete => ChangeAction::Upsert,
        };
        Self {
            action,
            ..self.clone()
        }
    }

    /// Record name as submitted to the DNS service (dot-terminated).
    #[must_use]
    pub fn submitted_name(&self) -> String {
        format!("{}.", self.name)
    }

    /// TTL for every managed record.
    #[must_use]
    pub fn ttl(&self) -> u32 {
        DNS_RECORD_TTL_SECS
    }
}

impl fmt::Display for DnsChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} -> {} (zone {})",
            self.action, self.record_type, self.name, self.value, self.zone_id
        )
    }
}

/// The records registered for one instance, as kept by the registration store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationEntry {
    pub instance_id: String,
    pub registered_at: DateTime<Utc>,
    pub records: Vec<DnsChange>,
}

impl RegistrationEntry {
    #[must_use]
    pub fn new(instance_id: &str, records: Vec<DnsChange>) -> Self {
        Self {
            instance_id: instance_id.to_string(),
            registered_at: Utc::now(),
            records,
        }
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
