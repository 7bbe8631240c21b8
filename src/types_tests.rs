// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `types.rs`

use super::*;

fn description() -> InstanceDescription {
    InstanceDescription {
        instance_id: "i-0abc".to_string(),
        private_ip: Some("10.1.2.3".to_string()),
        public_ip: Some("203.0.113.7".to_string()),
        vpc_id: Some("vpc-1".to_string()),
        tags: vec![RawTag::new("Name", "web1")],
    }
}

#[test]
fn test_instance_facts_from_description() {
    let facts = InstanceFacts::from_description(&description()).unwrap();

    assert_eq!(facts.instance_id, "i-0abc");
    assert_eq!(facts.private_ip, Ipv4Addr::new(10, 1, 2, 3));
    assert_eq!(facts.public_ip, Some(Ipv4Addr::new(203, 0, 113, 7)));
    assert_eq!(facts.vpc_id, "vpc-1");
    assert_eq!(facts.tags.get("Name"), Some("web1"));
}

#[test]
fn test_empty_strings_are_absent() {
    let mut desc = description();
    desc.public_ip = Some(String::new());
    let facts = InstanceFacts::from_description(&desc).unwrap();
    assert_eq!(facts.public_ip, None);

    desc.private_ip = Some(String::new());
    assert_eq!(
        InstanceFacts::from_description(&desc),
        Err(InstanceError::MissingPrivateIp {
            instance_id: "i-0abc".to_string()
        })
    );
}

#[test]
fn test_missing_vpc_is_an_error() {
    let mut desc = description();
    desc.vpc_id = None;

    assert_eq!(
        InstanceFacts::from_description(&desc),
        Err(InstanceError::MissingVpcId {
            instance_id: "i-0abc".to_string()
        })
    );
}

#[test]
fn test_invalid_private_ip_is_an_error() {
    let mut desc = description();
    desc.private_ip = Some("fd00::1".to_string());

    assert!(matches!(
        InstanceFacts::from_description(&desc),
        Err(InstanceError::InvalidPrivateIp { .. })
    ));
}

#[test]
fn test_unparseable_public_ip_is_ignored() {
    let mut desc = description();
    desc.public_ip = Some("not-an-ip".to_string());

    let facts = InstanceFacts::from_description(&desc).unwrap();
    assert_eq!(facts.public_ip, None);
}

#[test]
fn test_identity_from_bare_hostname() {
    let identity = ResolvedIdentity::resolve("web1", "corp.internal");

    assert_eq!(identity.hostname(), "web1");
    assert_eq!(identity.domain(), "corp.internal");
    assert_eq!(identity.fqdn(), "web1.corp.internal");
}

#[test]
fn test_identity_from_qualified_name_ignores_default_domain() {
    let identity = ResolvedIdentity::resolve("db.prod.example.com", "corp.internal");

    assert_eq!(identity.hostname(), "db");
    assert_eq!(identity.domain(), "prod.example.com");
    assert_eq!(identity.fqdn(), "db.prod.example.com");
}

#[test]
fn test_identity_round_trips_for_any_split() {
    for (host, domain) in [
        ("a", "b.c"),
        ("web-01", "eu-west-1.compute.internal"),
        ("x", "example.org"),
    ] {
        let joined = format!("{host}.{domain}");
        let qualified = ResolvedIdentity::resolve(&joined, "unused.example");
        let bare = ResolvedIdentity::resolve(host, domain);

        assert_eq!(qualified, bare);
        assert_eq!(qualified.fqdn(), joined);
    }
}

#[test]
fn test_identity_strips_trailing_dot() {
    let identity = ResolvedIdentity::resolve("web1.corp.internal.", "unused");
    assert_eq!(identity.fqdn(), "web1.corp.internal");
    assert_eq!(identity.domain(), "corp.internal");
}

#[test]
fn test_names_without_host_label_are_not_qualified() {
    assert_eq!(ResolvedIdentity::qualified(".corp.internal"), None);
    assert_eq!(ResolvedIdentity::qualified("."), None);
    assert_eq!(ResolvedIdentity::qualified("web1"), None);

    assert!(!has_host_label(".corp.internal"));
    assert!(!has_host_label("."));
    assert!(!has_host_label("  "));
    assert!(has_host_label("web1"));
    assert!(has_host_label("web1.corp.internal."));
}

#[test]
fn test_change_inverse_and_submitted_name() {
    let change = DnsChange::upsert("Z1", RecordType::A, "web1.corp.internal.", "10.1.2.3");

    assert_eq!(change.name, "web1.corp.internal");
    assert_eq!(change.submitted_name(), "web1.corp.internal.");
    assert_eq!(change.ttl(), 300);

    let inverse = change.inverse();
    assert_eq!(inverse.action, ChangeAction::Delete);
    assert_eq!(inverse.name, change.name);
    assert_eq!(inverse.inverse(), change);
}

#[test]
fn test_change_serializes_with_uppercase_enums() {
    let change = DnsChange::upsert(
        "Z9",
        RecordType::Ptr,
        "3.2.1.10.in-addr.arpa",
        "web1.corp.internal.",
    );
    let json = serde_json::to_value(&change).unwrap();

    assert_eq!(json["record_type"], "PTR");
    assert_eq!(json["action"], "UPSERT");
}

#[test]
fn test_alias_raw_hostname_defaults_to_key() {
    let alias = AliasSpec {
        key: "www".to_string(),
        visibility: ZoneVisibility::Public,
        hostname: None,
        zone_id: None,
    };
    assert_eq!(alias.raw_hostname(), "www");

    let alias = AliasSpec {
        hostname: Some("api.example.com".to_string()),
        ..alias
    };
    assert_eq!(alias.raw_hostname(), "api.example.com");
}
