// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for dnsync.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// Tag Namespace Constants
// ============================================================================

/// Conventional instance name tag, used when no hostname tag is set
pub const NAME_TAG: &str = "Name";

/// Sub-path of the aliases tag holding public aliases
pub const PUBLIC_ALIAS_PATH: &str = "public";

/// Sub-path of the aliases tag holding private aliases
pub const PRIVATE_ALIAS_PATH: &str = "private";

/// Per-alias tag suffix overriding the alias hostname
pub const ALIAS_HOSTNAME_SUFFIX: &str = "hostname";

/// Per-alias tag suffix pinning the alias to a zone id
pub const ALIAS_ZONE_ID_SUFFIX: &str = "zone_id";

// ============================================================================
// Settings Defaults
// ============================================================================

/// Default name of the table holding registered records per instance
pub const DEFAULT_TABLE_NAME: &str = "update-route53-host-records";

/// Default account tag whose value enables or disables processing
pub const DEFAULT_ACCOUNT_STATE_TAG: &str =
    "fn.aws.joshhogle.com/update-route53-host-records/account/state";

/// Default colon-separated list of account state values meaning "enabled"
pub const DEFAULT_ACCOUNT_ENABLED_VALUES: &str = "enabled";

/// Default account tag naming the IAM role to assume
pub const DEFAULT_IAM_ROLE_TAG: &str = "fn.aws.joshhogle.com/update-route53-host-records/iam/role";

/// Default IAM role assumed in member accounts
pub const DEFAULT_IAM_ROLE: &str = "STS-UpdateRoute53HostRecords";

/// Default indirection tag naming the hostname tag
pub const DEFAULT_HOSTNAME_TAG_NAME_ACCOUNT_TAG: &str =
    "fn.aws.joshhogle.com/update-route53-host-records/tags/hostname";

/// Default hostname tag
pub const DEFAULT_HOSTNAME_TAG_NAME: &str =
    "fn.aws.joshhogle.com/update-route53-host-records/hostname";

/// Default indirection tag naming the DNS domain tag
pub const DEFAULT_DNS_DOMAIN_TAG_NAME_ACCOUNT_TAG: &str =
    "fn.aws.joshhogle.com/update-route53-host-records/tags/dns_domain";

/// Default DNS domain tag
pub const DEFAULT_DNS_DOMAIN_TAG_NAME: &str =
    "fn.aws.joshhogle.com/update-route53-host-records/dns_domain";

/// Default indirection tag naming the aliases tag
pub const DEFAULT_ALIASES_TAG_NAME_ACCOUNT_TAG: &str =
    "fn.aws.joshhogle.com/update-route53-host-records/tags/aliases";

/// Default aliases tag
pub const DEFAULT_ALIASES_TAG_NAME: &str =
    "fn.aws.joshhogle.com/update-route53-host-records/aliases";

// ============================================================================
// DNS Constants
// ============================================================================

/// TTL applied to every record dnsync manages (5 minutes)
pub const DNS_RECORD_TTL_SECS: u32 = 300;

/// Suffix of the synthetic per-region private domain
pub const COMPUTE_INTERNAL_SUFFIX: &str = "compute.internal";

/// Reverse lookup domain for IPv4 PTR records
pub const IN_ADDR_ARPA: &str = "in-addr.arpa";

/// DHCP option key carrying the search domain
pub const DHCP_DOMAIN_NAME_KEY: &str = "domain-name";

/// Minimum label count for a zone candidate (a bare TLD never matches)
pub const MIN_ZONE_LABELS: usize = 2;

// ============================================================================
// Lifecycle Event Constants
// ============================================================================

/// Instance state that triggers registration
pub const STATE_RUNNING: &str = "running";

/// Instance states that trigger unregistration
pub const UNREGISTER_STATES: [&str; 2] = ["shutting-down", "stopping"];

// ============================================================================
// Metrics Constants
// ============================================================================

/// Namespace prefix for all dnsync metrics
pub const METRICS_NAMESPACE: &str = "dnsync";
