// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # dnsync - DNS record synchronization for compute instances
//!
//! dnsync reacts to instance lifecycle events and keeps records in a managed DNS
//! service in step with the instance: records are created when an instance starts
//! running and removed when it shuts down or stops.
//!
//! ## Overview
//!
//! For a running instance dnsync works out:
//!
//! - the instance's hostname and DNS domain, from tags, DHCP options or the region
//! - which managed zones hold its names, walking up the domain hierarchy
//! - the A records for its canonical name and aliases, and its PTR record
//!
//! The changes are submitted one by one and persisted per instance so they can be
//! reversed later.
//!
//! ## Modules
//!
//! - [`event`] - Lifecycle event parsing and validation
//! - [`reconcilers`] - Registration and unregistration of records
//! - [`resolvers`] - Domain, identity and zone resolution
//! - [`tags`] - Tag model and tag-name conventions
//! - [`providers`] - Collaborator traits for accounts, compute, DNS and storage
//! - [`adapters`] - Inventory-backed cloud and registration stores
//! - [`context`] - Shared context passed to the reconcilers
//!
//! ## Example
//!
//! ```rust,no_run
//! use dnsync::resolvers::{candidate_zone_names, reverse_names};
//! use std::net::Ipv4Addr;
//!
//! let names = reverse_names(Ipv4Addr::new(10, 1, 2, 3));
//! assert_eq!(names.ptr_name, "3.2.1.10.in-addr.arpa");
//!
//! let candidates = candidate_zone_names("web1.dev.corp.example");
//! assert_eq!(candidates[0], "web1.dev.corp.example.");
//! ```

pub mod adapters;
pub mod constants;
pub mod context;
pub mod dns_errors;
pub mod event;
pub mod metrics;
pub mod providers;
pub mod reconcilers;
pub mod resolvers;
pub mod settings;
pub mod tags;
pub mod types;
