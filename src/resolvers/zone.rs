// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Managed zone lookup.
//!
//! Zones are usually delegated somewhere above the name being registered, so the
//! locator tries the full name first and then walks up one label at a time:
//!
//! ```text
//! web1.dev.corp.example.  ->  dev.corp.example.  ->  corp.example.  (stop: 2 labels)
//! ```
//!
//! The first zone found at the deepest level wins. A private zone only counts if it
//! is attached to the instance's VPC; an unattached zone with the right name is
//! skipped and the search goes on (another private zone may share the name).

use crate::constants::MIN_ZONE_LABELS;
use crate::dns_errors::ZoneError;
use crate::metrics;
use crate::providers::DnsApi;
use crate::resolvers::domain::default_private_domain;
use crate::types::{ManagedZone, ZoneVisibility};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Candidate zone names for `name`, most specific first, each dot-terminated.
///
/// Candidates with fewer than two labels are never produced, so a bare TLD
/// can't match.
#[must_use]
pub fn candidate_zone_names(name: &str) -> Vec<String> {
    let labels: Vec<&str> = name
        .trim()
        .trim_matches('.')
        .split('.')
        .filter(|label| !label.is_empty())
        .collect();

    if labels.len() < MIN_ZONE_LABELS {
        return Vec::new();
    }

    (0..=labels.len() - MIN_ZONE_LABELS)
        .map(|start| format!("{}.", labels[start..].join(".")))
        .collect()
}

/// Compare a zone's name with a dot-terminated candidate, ignoring case and a
/// missing trailing dot on the zone name.
fn zone_name_matches(zone_name: &str, candidate: &str) -> bool {
    zone_name
        .trim_end_matches('.')
        .eq_ignore_ascii_case(candidate.trim_end_matches('.'))
}

/// Finds the managed zone for a name, caching zone listings for one invocation.
pub struct ZoneLocator<'a> {
    dns: &'a dyn DnsApi,
    region: &'a str,
    listings: Mutex<HashMap<ZoneVisibility, Vec<ManagedZone>>>,
}

impl<'a> ZoneLocator<'a> {
    #[must_use]
    pub fn new(dns: &'a dyn DnsApi, region: &'a str) -> Self {
        Self {
            dns,
            region,
            listings: Mutex::new(HashMap::new()),
        }
    }

    /// Find the zone that should hold records under `name`.
    ///
    /// `network_id` is required for private lookups. Returns `None` when no zone
    /// qualifies; callers skip the record in that case.
    pub async fn find_zone(
        &self,
        name: &str,
        visibility: ZoneVisibility,
        network_id: Option<&str>,
    ) -> Option<String> {
        let found = self.search(name, visibility, network_id).await;
        metrics::record_zone_lookup(visibility, found.is_some());
        found
    }

    async fn search(
        &self,
        name: &str,
        visibility: ZoneVisibility,
        network_id: Option<&str>,
    ) -> Option<String> {
        if self.is_default_domain(name) {
            info!(name, "Default private zone in use - skipping zone ID lookup");
            return None;
        }

        let candidates = candidate_zone_names(name);
        if candidates.is_empty() {
            debug!(name, "Name has fewer than two labels - no zone can match");
            return None;
        }

        let network_id = match (visibility, network_id) {
            (ZoneVisibility::Private, None) => {
                warn!(name, "Private zone lookup without a VPC id - skipping");
                return None;
            }
            (_, network_id) => network_id,
        };

        let zones = self.zones(visibility).await;
        for candidate in &candidates {
            info!("Searching for matching {visibility} zone: {candidate}");
            for zone in zones
                .iter()
                .filter(|zone| zone_name_matches(&zone.name, candidate))
            {
                match (visibility, network_id) {
                    (ZoneVisibility::Private, Some(vpc_id)) => {
                        info!(
                            "Found matching zone ID: {} -- verifying VPC attachment",
                            zone.id
                        );
                        if self.is_attached(zone, vpc_id).await {
                            info!(zone_id = %zone.id, vpc_id, "Zone is attached to VPC");
                            return Some(zone.id.clone());
                        }
                        info!(zone_id = %zone.id, vpc_id, "Zone is not attached to VPC");
                    }
                    _ => return Some(zone.id.clone()),
                }
            }
        }
        None
    }

    fn is_default_domain(&self, name: &str) -> bool {
        name.trim_end_matches('.')
            .eq_ignore_ascii_case(&default_private_domain(self.region))
    }

    async fn is_attached(&self, zone: &ManagedZone, vpc_id: &str) -> bool {
        if let Some(networks) = &zone.attached_networks {
            return networks.iter().any(|network| network == vpc_id);
        }

        match self.dns.zone_attachments(&zone.id).await {
            Ok(networks) => networks.iter().any(|network| network == vpc_id),
            Err(e) => {
                let err = ZoneError::AttachmentLookupFailed {
                    zone_id: zone.id.clone(),
                    reason: format!("{e:#}"),
                };
                error!("{err}");
                false
            }
        }
    }

    /// Zones of one visibility, listed once per locator. Failed listings are not cached.
    async fn zones(&self, visibility: ZoneVisibility) -> Vec<ManagedZone> {
        let mut listings = self.listings.lock().await;
        if let Some(zones) = listings.get(&visibility) {
            return zones.clone();
        }

        match self.dns.list_zones(visibility).await {
            Ok(zones) => {
                let zones: Vec<ManagedZone> = zones
                    .into_iter()
                    .filter(|zone| zone.visibility == visibility)
                    .collect();
                debug!(count = zones.len(), "Listed {visibility} zones");
                listings.insert(visibility, zones.clone());
                zones
            }
            Err(e) => {
                let err = ZoneError::ListFailed {
                    visibility: visibility.to_string(),
                    reason: format!("{e:#}"),
                };
                error!("{err}");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
#[path = "zone_tests.rs"]
mod zone_tests;
