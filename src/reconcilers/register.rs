// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Record registration for a running instance.
//!
//! Records are emitted in a fixed order:
//!
//! 1. canonical A record in the private zone
//! 2. private alias A records
//! 3. PTR record in the private reverse zone
//! 4. public alias A records (only when the instance has a public IP)
//!
//! A record whose zone can't be found is skipped. A failed submission is logged and
//! the remaining records are still attempted; the emitted change is returned either
//! way so a later removal covers it.

use super::submit_change;
use crate::context::Context;
use crate::dns_errors::{InstanceError, SyncError};
use crate::providers::{ComputeApi, DnsApi};
use crate::resolvers::{
    alias_specs, canonical_hostname, resolve_domain, reverse_names, ZoneLocator,
};
use crate::tags::{TagConventions, TagSet};
use crate::types::{
    has_host_label, DnsChange, InstanceFacts, RecordType, ResolvedIdentity, ZoneVisibility,
};
use std::net::Ipv4Addr;
use tracing::{debug, info, warn};

/// Fetch and validate the facts for one instance.
///
/// # Errors
///
/// Returns an error if the lookup fails, does not return exactly one instance, or
/// the instance lacks a private IPv4 address or VPC id.
pub async fn fetch_instance(
    compute: &dyn ComputeApi,
    instance_id: &str,
) -> Result<InstanceFacts, InstanceError> {
    let descriptions = compute
        .describe_instances(instance_id)
        .await
        .map_err(|e| InstanceError::LookupFailed {
            instance_id: instance_id.to_string(),
            reason: format!("{e:#}"),
        })?;

    let [description] = descriptions.as_slice() else {
        return Err(InstanceError::UnexpectedCount {
            instance_id: instance_id.to_string(),
            count: descriptions.len(),
        });
    };

    let facts = InstanceFacts::from_description(description)?;
    info!(
        instance_id = %facts.instance_id,
        private_ip = %facts.private_ip,
        public_ip = ?facts.public_ip,
        vpc_id = %facts.vpc_id,
        "Fetched instance metadata"
    );
    Ok(facts)
}

/// Changes emitted during one registration run.
struct Emitter<'a> {
    dns: &'a dyn DnsApi,
    records: Vec<DnsChange>,
}

impl Emitter<'_> {
    async fn upsert(&mut self, zone_id: &str, record_type: RecordType, name: &str, value: &str) {
        let change = DnsChange::upsert(zone_id, record_type, name, value);
        if self.records.contains(&change) {
            debug!(%change, "Change already submitted in this run - skipping");
            return;
        }
        submit_change(self.dns, &change).await;
        self.records.push(change);
    }
}

/// Register the DNS records of a running instance.
///
/// `account_tags` feed the tag-name indirection; pass `None` to use instance tags
/// and defaults only.
///
/// # Errors
///
/// Returns an error only when the instance facts can't be established. An instance
/// without a hostname yields an empty list.
pub async fn register_instance(
    ctx: &Context,
    compute: &dyn ComputeApi,
    account_tags: Option<&TagSet>,
    region: &str,
    instance_id: &str,
) -> Result<Vec<DnsChange>, SyncError> {
    let facts = fetch_instance(compute, instance_id).await?;
    let conventions = TagConventions::resolve(&ctx.settings, account_tags, &facts.tags);

    let Some(raw_hostname) = canonical_hostname(&facts.tags, &conventions) else {
        warn!(
            instance_id,
            "No hostname is defined for the instance - skipping registration"
        );
        return Ok(Vec::new());
    };

    // The domain resolver only runs for bare hostnames
    let identity = match ResolvedIdentity::qualified(raw_hostname) {
        Some(identity) => identity,
        None => {
            let domain =
                resolve_domain(compute, &facts.tags, &conventions, &facts.vpc_id, region).await;
            ResolvedIdentity::new(raw_hostname, &domain)
        }
    };
    info!(
        hostname = identity.hostname(),
        dns_domain = identity.domain(),
        fqdn = identity.fqdn(),
        "Resolved instance identity"
    );

    let reverse = reverse_names(facts.private_ip);
    debug!(ptr_record = %reverse.ptr_name, arpa_zone = %reverse.zone_name, "Derived reverse names");

    let locator = ZoneLocator::new(ctx.dns.as_ref(), region);
    let mut emitter = Emitter {
        dns: ctx.dns.as_ref(),
        records: Vec::new(),
    };
    let private_ip = facts.private_ip.to_string();

    info!("--- private record registration ---");
    match locator
        .find_zone(identity.domain(), ZoneVisibility::Private, Some(&facts.vpc_id))
        .await
    {
        Some(zone_id) => {
            emitter
                .upsert(&zone_id, RecordType::A, identity.fqdn(), &private_ip)
                .await;
        }
        None => info!(
            "No matching private zone for DNS domain attached to VPC - skipping A record registration"
        ),
    }

    info!("--- private alias registration ---");
    register_aliases(
        &locator,
        &mut emitter,
        &facts,
        &conventions,
        &identity,
        ZoneVisibility::Private,
        facts.private_ip,
    )
    .await;

    info!("--- ARPA record registration ---");
    match locator
        .find_zone(&reverse.zone_name, ZoneVisibility::Private, Some(&facts.vpc_id))
        .await
    {
        Some(zone_id) => {
            let target = format!("{}.", identity.fqdn());
            emitter
                .upsert(&zone_id, RecordType::Ptr, &reverse.ptr_name, &target)
                .await;
        }
        None => info!(
            "No matching private ARPA zone attached to VPC - skipping PTR record registration"
        ),
    }

    let Some(public_ip) = facts.public_ip else {
        info!(instance_id, "Host does not have a public IP");
        return Ok(emitter.records);
    };

    info!("--- public alias registration ---");
    register_aliases(
        &locator,
        &mut emitter,
        &facts,
        &conventions,
        &identity,
        ZoneVisibility::Public,
        public_ip,
    )
    .await;

    Ok(emitter.records)
}

async fn register_aliases(
    locator: &ZoneLocator<'_>,
    emitter: &mut Emitter<'_>,
    facts: &InstanceFacts,
    conventions: &TagConventions,
    identity: &ResolvedIdentity,
    visibility: ZoneVisibility,
    address: Ipv4Addr,
) {
    let network_id = match visibility {
        ZoneVisibility::Private => Some(facts.vpc_id.as_str()),
        ZoneVisibility::Public => None,
    };
    let address = address.to_string();

    for alias in alias_specs(&facts.tags, conventions, visibility) {
        info!("Updating {visibility} alias: {}", alias.key);
        if !has_host_label(alias.raw_hostname()) {
            warn!(
                alias = %alias.key,
                hostname = alias.raw_hostname(),
                "Alias hostname has no host label - skipping A record registration"
            );
            continue;
        }
        let alias_identity = ResolvedIdentity::resolve(alias.raw_hostname(), identity.domain());

        let zone_id = match alias.zone_id {
            Some(zone_id) => Some(zone_id),
            None => {
                locator
                    .find_zone(alias_identity.domain(), visibility, network_id)
                    .await
            }
        };
        let Some(zone_id) = zone_id else {
            info!(
                alias = %alias.key,
                "No matching zone ID was found - skipping A record registration"
            );
            continue;
        };

        emitter
            .upsert(&zone_id, RecordType::A, alias_identity.fqdn(), &address)
            .await;
    }
}

#[cfg(test)]
#[path = "register_tests.rs"]
mod register_tests;
