// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Name and zone resolution.
//!
//! These modules turn an instance's tags and network facts into DNS names and the
//! managed zones that should hold them:
//!
//! - [`domain`] - effective DNS domain (tag override, DHCP option set, region default)
//! - [`identity`] - canonical hostname, aliases and reverse (PTR) names
//! - [`zone`] - hierarchical lookup of the most specific managed zone
//!
//! Nothing here submits record changes; see [`crate::reconcilers`] for that.

pub mod domain;
pub mod identity;
pub mod zone;

pub use domain::{default_private_domain, dhcp_options_domain, resolve_domain};
pub use identity::{alias_specs, canonical_hostname, reverse_names, ReverseNames};
pub use zone::{candidate_zone_names, ZoneLocator};
