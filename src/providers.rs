// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Collaborator interfaces.
//!
//! The reconcilers never talk to a cloud SDK directly. Each external system is a
//! trait, implemented by an adapter and injected through [`crate::context::Context`]:
//!
//! - [`AccountDirectory`] - account metadata and per-account compute credentials
//! - [`ComputeApi`] - instance, VPC and DHCP option set descriptions
//! - [`DnsApi`] - managed zone listings and record change submission
//! - [`RegistrationStore`] - records registered per instance, for later removal
//!
//! Implementations perform one request per call and leave retries to the transport.

use crate::types::{
    AccountInfo, DhcpOptionSet, DnsChange, InstanceDescription, ManagedZone, RegistrationEntry,
    VpcDescription, ZoneVisibility,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Account metadata and credential assumption.
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Describe an account and its tags.
    async fn account(&self, account_id: &str) -> Result<AccountInfo>;

    /// Obtain a compute client acting as `role_arn` in `region`.
    async fn compute_client(&self, role_arn: &str, region: &str) -> Result<Arc<dyn ComputeApi>>;
}

/// Compute inventory lookups.
#[async_trait]
pub trait ComputeApi: Send + Sync {
    /// Describe instances matching an instance id. Callers expect exactly one.
    async fn describe_instances(&self, instance_id: &str) -> Result<Vec<InstanceDescription>>;

    /// Describe VPCs matching a VPC id.
    async fn describe_vpcs(&self, vpc_id: &str) -> Result<Vec<VpcDescription>>;

    /// Describe DHCP option sets matching an option set id.
    async fn describe_dhcp_options(&self, dhcp_options_id: &str) -> Result<Vec<DhcpOptionSet>>;
}

/// Managed DNS service.
#[async_trait]
pub trait DnsApi: Send + Sync {
    /// List the managed zones of one visibility.
    async fn list_zones(&self, visibility: ZoneVisibility) -> Result<Vec<ManagedZone>>;

    /// VPC ids attached to a private zone.
    async fn zone_attachments(&self, zone_id: &str) -> Result<Vec<String>>;

    /// Submit one record change. Names are submitted dot-terminated with the
    /// fixed TTL (see [`DnsChange::submitted_name`] and [`DnsChange::ttl`]).
    async fn submit_change(&self, change: &DnsChange) -> Result<()>;
}

/// Durable record of what was registered for each instance.
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    /// Store (or replace) the entry for an instance.
    async fn put(&self, entry: &RegistrationEntry) -> Result<()>;

    /// Fetch the entry for an instance, if any.
    async fn fetch(&self, instance_id: &str) -> Result<Option<RegistrationEntry>>;

    /// Remove the entry for an instance. Removing a missing entry is not an error.
    async fn delete(&self, instance_id: &str) -> Result<()>;
}
