// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! DNS domain resolution for instances with a bare hostname.
//!
//! The domain is chosen as follows:
//! 1. The instance's DNS domain tag, if set, wins unconditionally.
//! 2. Otherwise the `domain-name` of the DHCP option set attached to the VPC.
//! 3. Otherwise `<region>.compute.internal`.
//!
//! Lookup problems on the DHCP path are logged and fall through to the region
//! default; resolution never fails.

use crate::constants::{COMPUTE_INTERNAL_SUFFIX, DHCP_DOMAIN_NAME_KEY};
use crate::providers::ComputeApi;
use crate::tags::{TagConventions, TagSet};
use tracing::{debug, error, info};

/// The synthetic private domain every instance in `region` gets by default.
#[must_use]
pub fn default_private_domain(region: &str) -> String {
    format!("{region}.{COMPUTE_INTERNAL_SUFFIX}")
}

/// Domain name configured in the DHCP option set attached to a VPC.
///
/// Returns `None` unless the VPC lookup yields exactly one VPC, the option set
/// lookup yields exactly one set, and its `domain-name` key has exactly one value.
pub async fn dhcp_options_domain(compute: &dyn ComputeApi, vpc_id: &str) -> Option<String> {
    let vpcs = match compute.describe_vpcs(vpc_id).await {
        Ok(vpcs) => vpcs,
        Err(e) => {
            error!(vpc_id, "Failed to describe VPC: {e:#}");
            return None;
        }
    };
    if vpcs.len() != 1 {
        error!(
            "describe_vpcs returned {} VPCs instead of expected 1",
            vpcs.len()
        );
        return None;
    }

    let Some(dhcp_options_id) = vpcs[0]
        .dhcp_options_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
    else {
        error!(vpc_id, "VPC is missing DhcpOptionsId");
        return None;
    };

    let option_sets = match compute.describe_dhcp_options(dhcp_options_id).await {
        Ok(sets) => sets,
        Err(e) => {
            error!(dhcp_options_id, "Failed to describe DHCP options: {e:#}");
            return None;
        }
    };
    if option_sets.len() != 1 {
        error!(
            "describe_dhcp_options returned {} options instead of expected 1",
            option_sets.len()
        );
        return None;
    }

    let domain = option_sets[0]
        .configurations
        .iter()
        .filter(|config| config.key == DHCP_DOMAIN_NAME_KEY)
        .find_map(|config| match config.values.as_slice() {
            [value] => Some(value.trim().trim_matches('.').to_string()),
            _ => None,
        })
        .filter(|domain| !domain.is_empty());

    if domain.is_none() {
        info!(dhcp_options_id, "DHCP Options Set has no domain-name value set");
    }
    domain
}

/// Resolve the DNS domain of an instance.
pub async fn resolve_domain(
    compute: &dyn ComputeApi,
    tags: &TagSet,
    conventions: &TagConventions,
    vpc_id: &str,
    region: &str,
) -> String {
    if let Some(domain) = tags.get_non_empty(&conventions.dns_domain_tag) {
        debug!(tag = %conventions.dns_domain_tag, "Using DNS domain from instance tag");
        return domain.trim_matches('.').to_string();
    }

    match dhcp_options_domain(compute, vpc_id).await {
        Some(domain) => {
            debug!(vpc_id, "Using DNS domain from DHCP options");
            domain
        }
        None => {
            let fallback = default_private_domain(region);
            debug!(vpc_id, domain = %fallback, "Using default region domain");
            fallback
        }
    }
}

#[cfg(test)]
#[path = "domain_tests.rs"]
mod domain_tests;
