// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Shared context for the event handler and reconcilers.
//!
//! The context bundles the settings with every collaborator the reconcilers need.
//! Collaborators are trait objects so the binary can wire real adapters while tests
//! wire in-memory ones.

use crate::providers::{AccountDirectory, DnsApi, RegistrationStore};
use crate::settings::Settings;
use std::sync::Arc;

/// Shared context passed to the event handler.
///
/// The compute client is not part of the context: it is obtained per event from
/// [`AccountDirectory::compute_client`] because it acts inside the instance's account.
#[derive(Clone)]
pub struct Context {
    /// Tag conventions, account gating and store settings
    pub settings: Settings,

    /// Account metadata and credential assumption
    pub accounts: Arc<dyn AccountDirectory>,

    /// Managed DNS service
    pub dns: Arc<dyn DnsApi>,

    /// Records registered per instance
    pub store: Arc<dyn RegistrationStore>,
}

impl Context {
    #[must_use]
    pub fn new(
        settings: Settings,
        accounts: Arc<dyn AccountDirectory>,
        dns: Arc<dyn DnsApi>,
        store: Arc<dyn RegistrationStore>,
    ) -> Self {
        Self {
            settings,
            accounts,
            dns,
            store,
        }
    }
}
