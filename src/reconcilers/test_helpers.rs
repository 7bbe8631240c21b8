// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Shared fixtures for the reconciler unit tests.

use crate::adapters::{Inventory, InventoryCloud, InventoryZone, MemoryStore};
use crate::constants::{DEFAULT_ACCOUNT_STATE_TAG, DEFAULT_ALIASES_TAG_NAME};
use crate::context::Context;
use crate::event::{EventDetail, LifecycleEvent};
use crate::settings::Settings;
use crate::tags::RawTag;
use crate::types::{
    AccountInfo, DhcpConfiguration, DhcpOptionSet, InstanceDescription, VpcDescription,
};
use std::sync::Arc;

pub const ACCOUNT_ID: &str = "111122223333";
pub const REGION: &str = "us-east-1";
pub const INSTANCE_ID: &str = "i-0web1";
pub const VPC_ID: &str = "vpc-1";

pub const PRIVATE_ZONE: &str = "ZPRIVATE";
pub const REVERSE_ZONE: &str = "ZREVERSE";
pub const PUBLIC_ZONE: &str = "ZPUBLIC";

pub fn create_test_zone(id: &str, name: &str, private: bool, vpcs: &[&str]) -> InventoryZone {
    InventoryZone {
        id: id.to_string(),
        name: name.to_string(),
        private,
        vpcs: vpcs.iter().map(ToString::to_string).collect(),
    }
}

pub fn create_test_instance(tags: &[(&str, &str)], public_ip: Option<&str>) -> InstanceDescription {
    InstanceDescription {
        instance_id: INSTANCE_ID.to_string(),
        private_ip: Some("10.1.2.3".to_string()),
        public_ip: public_ip.map(ToString::to_string),
        vpc_id: Some(VPC_ID.to_string()),
        tags: tags.iter().map(|(k, v)| RawTag::new(*k, *v)).collect(),
    }
}

pub fn create_test_account(state: &str) -> AccountInfo {
    AccountInfo {
        account_id: ACCOUNT_ID.to_string(),
        name: Some("dev".to_string()),
        tags: vec![RawTag::new(DEFAULT_ACCOUNT_STATE_TAG, state)],
    }
}

/// Account, VPC with `corp.internal` DHCP domain, and private, reverse and public zones.
pub fn create_test_inventory(instance: InstanceDescription) -> Inventory {
    Inventory {
        accounts: vec![create_test_account("enabled")],
        instances: vec![instance],
        vpcs: vec![VpcDescription {
            vpc_id: VPC_ID.to_string(),
            dhcp_options_id: Some("dopt-1".to_string()),
        }],
        dhcp_options: vec![DhcpOptionSet {
            dhcp_options_id: "dopt-1".to_string(),
            configurations: vec![DhcpConfiguration {
                key: "domain-name".to_string(),
                values: vec!["corp.internal".to_string()],
            }],
        }],
        zones: vec![
            create_test_zone(PRIVATE_ZONE, "corp.internal.", true, &[VPC_ID]),
            create_test_zone(REVERSE_ZONE, "2.1.10.in-addr.arpa.", true, &[VPC_ID]),
            create_test_zone(PUBLIC_ZONE, "example.com.", false, &[]),
        ],
    }
}

pub fn create_test_context(cloud: &InventoryCloud) -> (Context, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let ctx = Context::new(
        Settings::default(),
        Arc::new(cloud.clone()),
        Arc::new(cloud.clone()),
        store.clone(),
    );
    (ctx, store)
}

pub fn create_test_event(state: &str) -> LifecycleEvent {
    LifecycleEvent {
        account: Some(ACCOUNT_ID.to_string()),
        region: Some(REGION.to_string()),
        detail: Some(EventDetail {
            instance_id: Some(INSTANCE_ID.to_string()),
            state: Some(state.to_string()),
        }),
    }
}

pub fn public_aliases_tag() -> String {
    format!("{DEFAULT_ALIASES_TAG_NAME}/public")
}

pub fn private_aliases_tag() -> String {
    format!("{DEFAULT_ALIASES_TAG_NAME}/private")
}
