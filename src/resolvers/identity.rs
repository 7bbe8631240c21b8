// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Hostnames, aliases and reverse names.

use crate::constants::{IN_ADDR_ARPA, NAME_TAG};
use crate::tags::{TagConventions, TagSet};
use crate::types::{has_host_label, AliasSpec, ZoneVisibility};
use std::net::Ipv4Addr;
use tracing::debug;

/// The raw canonical hostname of an instance.
///
/// Reads the configured hostname tag, then the `Name` tag. Blank values and values
/// without a host label (`.corp.internal`) count as absent.
#[must_use]
pub fn canonical_hostname<'t>(tags: &'t TagSet, conventions: &TagConventions) -> Option<&'t str> {
    [conventions.hostname_tag.as_str(), NAME_TAG]
        .into_iter()
        .filter_map(|key| tags.get(key))
        .map(str::trim)
        .find(|value| has_host_label(value))
}

/// Aliases of one visibility configured on an instance.
///
/// The alias list tag holds comma-separated tokens; blank and repeated tokens are
/// dropped. Each alias may carry its own hostname and zone id tags.
#[must_use]
pub fn alias_specs(
    tags: &TagSet,
    conventions: &TagConventions,
    visibility: ZoneVisibility,
) -> Vec<AliasSpec> {
    let Some(list) = tags.get(&conventions.alias_list_tag(visibility)) else {
        return Vec::new();
    };

    let mut specs: Vec<AliasSpec> = Vec::new();
    for key in list.split(',').map(str::trim).filter(|key| !key.is_empty()) {
        if specs.iter().any(|spec| spec.key == key) {
            continue;
        }

        let hostname = tags
            .get_non_empty(&conventions.alias_hostname_tag(visibility, key))
            .map(ToString::to_string);
        if hostname.is_none() {
            debug!("No hostname found for {visibility} alias '{key}' - using alias as hostname");
        }
        let zone_id = tags
            .get_non_empty(&conventions.alias_zone_id_tag(visibility, key))
            .map(ToString::to_string);

        specs.push(AliasSpec {
            key: key.to_string(),
            visibility,
            hostname,
            zone_id,
        });
    }
    specs
}

/// Reverse DNS names for an IPv4 address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverseNames {
    /// PTR record name, e.g. `3.2.1.10.in-addr.arpa`
    pub ptr_name: String,
    /// Containing /24 reverse zone, e.g. `2.1.10.in-addr.arpa`
    pub zone_name: String,
}

#[must_use]
pub fn reverse_names(ip: Ipv4Addr) -> ReverseNames {
    let [a, b, c, d] = ip.octets();
    ReverseNames {
        ptr_name: format!("{d}.{c}.{b}.{a}.{IN_ADDR_ARPA}"),
        zone_name: format!("{c}.{b}.{a}.{IN_ADDR_ARPA}"),
    }
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod identity_tests;
