// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `register.rs`

use super::*;
use crate::adapters::{Inventory, InventoryCloud};
use crate::constants::{DEFAULT_DNS_DOMAIN_TAG_NAME, DEFAULT_HOSTNAME_TAG_NAME};
use crate::reconcilers::test_helpers::*;
use crate::tags::RawTag;
use crate::types::ChangeAction;

async fn register(cloud: &InventoryCloud) -> Result<Vec<DnsChange>, SyncError> {
    let (ctx, _store) = create_test_context(cloud);
    register_instance(&ctx, cloud, None, REGION, INSTANCE_ID).await
}

#[tokio::test]
async fn test_fetch_instance_requires_exactly_one() {
    let cloud = InventoryCloud::new(Inventory::default());

    let err = fetch_instance(&cloud, INSTANCE_ID).await.unwrap_err();
    assert_eq!(
        err,
        InstanceError::UnexpectedCount {
            instance_id: INSTANCE_ID.to_string(),
            count: 0,
        }
    );

    let instance = create_test_instance(&[("Name", "web1")], None);
    let cloud = InventoryCloud::new(Inventory {
        instances: vec![instance.clone(), instance],
        ..Inventory::default()
    });
    let err = fetch_instance(&cloud, INSTANCE_ID).await.unwrap_err();
    assert!(matches!(err, InstanceError::UnexpectedCount { count: 2, .. }));
}

#[tokio::test]
async fn test_missing_vpc_is_fatal() {
    let mut instance = create_test_instance(&[("Name", "web1")], None);
    instance.vpc_id = None;
    let cloud = InventoryCloud::new(create_test_inventory(instance));

    let err = register(&cloud).await.unwrap_err();
    assert_eq!(err.status_reason(), "VpcIdMissing");
    assert!(cloud.submitted().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_private_ip_is_fatal() {
    let mut instance = create_test_instance(&[("Name", "web1")], None);
    instance.private_ip = Some(String::new());
    let cloud = InventoryCloud::new(create_test_inventory(instance));

    let err = register(&cloud).await.unwrap_err();
    assert_eq!(err.status_reason(), "PrivateIpMissing");
}

#[tokio::test]
async fn test_private_only_instance() {
    let cloud = InventoryCloud::new(create_test_inventory(create_test_instance(
        &[("Name", "web1")],
        None,
    )));

    let records = register(&cloud).await.unwrap();

    assert_eq!(
        records,
        vec![
            DnsChange::upsert(PRIVATE_ZONE, RecordType::A, "web1.corp.internal", "10.1.2.3"),
            DnsChange::upsert(
                REVERSE_ZONE,
                RecordType::Ptr,
                "3.2.1.10.in-addr.arpa",
                "web1.corp.internal."
            ),
        ]
    );
    assert!(records.iter().all(|r| r.action == ChangeAction::Upsert));
    assert_eq!(
        cloud
            .record(PRIVATE_ZONE, RecordType::A, "web1.corp.internal")
            .unwrap(),
        Some("10.1.2.3".to_string())
    );
}

#[tokio::test]
async fn test_no_reverse_zone_skips_ptr() {
    let mut inventory = create_test_inventory(create_test_instance(&[("Name", "web1")], None));
    inventory.zones.retain(|zone| zone.id != REVERSE_ZONE);
    let cloud = InventoryCloud::new(inventory);

    let records = register(&cloud).await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].record_type, RecordType::A);
}

#[tokio::test]
async fn test_no_hostname_registers_nothing() {
    let cloud = InventoryCloud::new(create_test_inventory(create_test_instance(
        &[("Owner", "team-a")],
        Some("54.1.2.3"),
    )));

    let records = register(&cloud).await.unwrap();

    assert!(records.is_empty());
    assert!(cloud.submitted().unwrap().is_empty());
}

#[tokio::test]
async fn test_hostname_without_host_label_registers_nothing() {
    let cloud = InventoryCloud::new(create_test_inventory(create_test_instance(
        &[(DEFAULT_HOSTNAME_TAG_NAME, ".corp.internal")],
        Some("54.1.2.3"),
    )));

    let records = register(&cloud).await.unwrap();

    assert!(records.is_empty());
    assert!(cloud.submitted().unwrap().is_empty());
}

#[tokio::test]
async fn test_alias_without_host_label_is_skipped() {
    let alias_tag = private_aliases_tag();
    let override_tag = format!("{alias_tag}/db/hostname");
    let cloud = InventoryCloud::new(create_test_inventory(create_test_instance(
        &[
            ("Name", "web1"),
            (alias_tag.as_str(), "db, cache"),
            (override_tag.as_str(), ".corp.internal"),
        ],
        None,
    )));

    let records = register(&cloud).await.unwrap();
    let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();

    assert_eq!(
        names,
        vec![
            "web1.corp.internal",
            "cache.corp.internal",
            "3.2.1.10.in-addr.arpa"
        ]
    );
}

#[tokio::test]
async fn test_hostname_tag_wins_over_name() {
    let cloud = InventoryCloud::new(create_test_inventory(create_test_instance(
        &[("Name", "web1"), (DEFAULT_HOSTNAME_TAG_NAME, "app7")],
        None,
    )));

    let records = register(&cloud).await.unwrap();
    assert_eq!(records[0].name, "app7.corp.internal");
}

#[tokio::test]
async fn test_qualified_hostname_keeps_its_domain() {
    let mut inventory = create_test_inventory(create_test_instance(
        &[("Name", "db1.data.corp.internal")],
        None,
    ));
    inventory.dhcp_options.clear();
    let cloud = InventoryCloud::new(inventory);

    let records = register(&cloud).await.unwrap();

    assert_eq!(records[0].zone_id, PRIVATE_ZONE);
    assert_eq!(records[0].name, "db1.data.corp.internal");
    assert_eq!(records[1].value, "db1.data.corp.internal.");
}

#[tokio::test]
async fn test_default_region_domain_registers_no_a_record() {
    let mut inventory = create_test_inventory(create_test_instance(&[("Name", "web1")], None));
    inventory.dhcp_options.clear();
    let cloud = InventoryCloud::new(inventory);

    let records = register(&cloud).await.unwrap();

    // Only the PTR survives, pointing at the region default name
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].record_type, RecordType::Ptr);
    assert_eq!(records[0].value, "web1.us-east-1.compute.internal.");
}

#[tokio::test]
async fn test_public_aliases() {
    let cloud = InventoryCloud::new(create_test_inventory(create_test_instance(
        &[
            ("Name", "web1"),
            (DEFAULT_DNS_DOMAIN_TAG_NAME, "example.com"),
            (public_aliases_tag().as_str(), "www, api"),
        ],
        Some("54.1.2.3"),
    )));

    let records = register(&cloud).await.unwrap();
    let public: Vec<&DnsChange> = records
        .iter()
        .filter(|r| r.zone_id == PUBLIC_ZONE)
        .collect();

    assert_eq!(
        public,
        vec![
            &DnsChange::upsert(PUBLIC_ZONE, RecordType::A, "www.example.com", "54.1.2.3"),
            &DnsChange::upsert(PUBLIC_ZONE, RecordType::A, "api.example.com", "54.1.2.3"),
        ]
    );
}

#[tokio::test]
async fn test_public_aliases_need_a_public_ip() {
    let cloud = InventoryCloud::new(create_test_inventory(create_test_instance(
        &[
            ("Name", "web1"),
            (DEFAULT_DNS_DOMAIN_TAG_NAME, "example.com"),
            (public_aliases_tag().as_str(), "www"),
        ],
        None,
    )));

    let records = register(&cloud).await.unwrap();
    assert!(records.iter().all(|r| r.zone_id != PUBLIC_ZONE));
}

#[tokio::test]
async fn test_private_alias_with_overrides() {
    let hostname_tag = format!("{}/db/hostname", private_aliases_tag());
    let zone_tag = format!("{}/db/zone_id", private_aliases_tag());
    let cloud = InventoryCloud::new(create_test_inventory(create_test_instance(
        &[
            ("Name", "web1"),
            (private_aliases_tag().as_str(), "db, cache"),
            (hostname_tag.as_str(), "primary-db.corp.internal"),
            (zone_tag.as_str(), "ZPINNED"),
        ],
        None,
    )));

    let records = register(&cloud).await.unwrap();
    let names: Vec<(&str, &str)> = records
        .iter()
        .map(|r| (r.zone_id.as_str(), r.name.as_str()))
        .collect();

    assert_eq!(
        names,
        vec![
            (PRIVATE_ZONE, "web1.corp.internal"),
            ("ZPINNED", "primary-db.corp.internal"),
            (PRIVATE_ZONE, "cache.corp.internal"),
            (REVERSE_ZONE, "3.2.1.10.in-addr.arpa"),
        ]
    );
    // The pinned zone does not exist, so the submission failed but is still reported
    assert_eq!(cloud.record_count().unwrap(), 3);
}

#[tokio::test]
async fn test_alias_without_zone_is_skipped() {
    let cloud = InventoryCloud::new(create_test_inventory(create_test_instance(
        &[
            ("Name", "web1"),
            (public_aliases_tag().as_str(), "www.unmanaged.org"),
        ],
        Some("54.1.2.3"),
    )));

    let records = register(&cloud).await.unwrap();
    assert!(records.iter().all(|r| !r.name.contains("unmanaged")));
}

#[tokio::test]
async fn test_submission_failure_does_not_stop_later_records() {
    let cloud = InventoryCloud::new(create_test_inventory(create_test_instance(
        &[("Name", "web1")],
        None,
    )));
    cloud.fail_submissions_to(PRIVATE_ZONE).unwrap();

    let records = register(&cloud).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(cloud.submitted().unwrap().len(), 2);
    assert!(cloud
        .record(REVERSE_ZONE, RecordType::Ptr, "3.2.1.10.in-addr.arpa")
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_alias_matching_canonical_name_is_submitted_once() {
    let cloud = InventoryCloud::new(create_test_inventory(create_test_instance(
        &[("Name", "web1"), (private_aliases_tag().as_str(), "web1")],
        None,
    )));

    let records = register(&cloud).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(cloud.submitted().unwrap().len(), 2);
}

#[tokio::test]
async fn test_registration_is_idempotent() {
    let cloud = InventoryCloud::new(create_test_inventory(create_test_instance(
        &[("Name", "web1")],
        None,
    )));

    let first = register(&cloud).await.unwrap();
    let second = register(&cloud).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(cloud.record_count().unwrap(), 2);
}

#[tokio::test]
async fn test_account_tags_redirect_hostname_tag() {
    let cloud = InventoryCloud::new(create_test_inventory(create_test_instance(
        &[("Name", "web1"), ("team/host", "svc9")],
        None,
    )));
    let (ctx, _store) = create_test_context(&cloud);
    let account_tags = TagSet::from_raw(&[RawTag::new(
        ctx.settings.hostname_tag_name_account_tag.clone(),
        "team/host",
    )]);

    let records = register_instance(&ctx, &cloud, Some(&account_tags), REGION, INSTANCE_ID)
        .await
        .unwrap();

    assert_eq!(records[0].name, "svc9.corp.internal");
}
