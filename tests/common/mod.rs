// Common test utilities for integration tests

#![allow(dead_code)]

use dnsync::adapters::{InventoryCloud, JsonFileStore};
use dnsync::context::Context;
use dnsync::event::LifecycleEvent;
use dnsync::settings::Settings;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

/// Inventory with one enabled account, one running instance and three zones.
///
/// `{tags}` and `{public_ip}` are substituted by [`inventory`].
const INVENTORY_TEMPLATE: &str = r#"
accounts:
  - account_id: "111122223333"
    name: dev
    tags:
      - Key: fn.aws.joshhogle.com/update-route53-host-records/account/state
        Value: enabled
instances:
  - instance_id: i-0web1
    private_ip: 10.1.2.3
    public_ip: "{public_ip}"
    vpc_id: vpc-1
    tags: {tags}
vpcs:
  - vpc_id: vpc-1
    dhcp_options_id: dopt-1
dhcp_options:
  - dhcp_options_id: dopt-1
    configurations:
      - key: domain-name
        values: [corp.internal]
zones:
  - id: ZPRIVATE
    name: corp.internal.
    private: true
    vpcs: [vpc-1]
  - id: ZREVERSE
    name: 2.1.10.in-addr.arpa.
    private: true
    vpcs: [vpc-1]
  - id: ZPUBLIC
    name: corp.internal.
"#;

/// Build an inventory cloud for the instance `i-0web1`.
pub fn inventory(tags: &[(&str, &str)], public_ip: Option<&str>) -> InventoryCloud {
    let tags = json!(tags
        .iter()
        .map(|(k, v)| json!({"Key": k, "Value": v}))
        .collect::<Vec<_>>());
    let document = INVENTORY_TEMPLATE
        .replace("{tags}", &tags.to_string())
        .replace("{public_ip}", public_ip.unwrap_or_default());
    InventoryCloud::from_yaml(&document).expect("inventory template should parse")
}

/// Context wired to the inventory cloud and a file store under `dir`.
pub fn context(cloud: &InventoryCloud, dir: &Path) -> Context {
    let settings = Settings::default();
    let store = JsonFileStore::new(dir, &settings.table_name);
    Context::new(
        settings,
        Arc::new(cloud.clone()),
        Arc::new(cloud.clone()),
        Arc::new(store),
    )
}

/// Lifecycle event for `i-0web1` in the given state.
pub fn event(state: &str) -> LifecycleEvent {
    LifecycleEvent::from_json(
        &json!({
            "version": "0",
            "detail-type": "EC2 Instance State-change Notification",
            "account": "111122223333",
            "region": "us-east-1",
            "detail": {"instance-id": "i-0web1", "state": state}
        })
        .to_string(),
    )
    .expect("event should parse")
}
