// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! DNS record reconciliation for instance lifecycle events.
//!
//! # Reconciliation Flow
//!
//! 1. **Validate** - Check the event carries account, region, instance id and state
//! 2. **Gate** - Skip accounts whose state tag is not one of the enabled values
//! 3. **Reconcile** - Register records for a running instance, or remove the
//!    records registered earlier for an instance that is going away
//! 4. **Persist** - Store what was registered so it can be removed later, keeping
//!    earlier records the new registration does not replace
//!
//! # Available Reconcilers
//!
//! - [`handle_event`] - Entry point for one lifecycle event
//! - [`register_instance`] - Creates A and PTR records for an instance
//! - [`unregister_instance`] - Deletes the records registered for an instance
//!
//! # Example
//!
//! ```rust,no_run
//! use dnsync::context::Context;
//! use dnsync::event::LifecycleEvent;
//! use dnsync::reconcilers::handle_event;
//!
//! async fn on_event(ctx: &Context, payload: &str) -> anyhow::Result<()> {
//!     let event = LifecycleEvent::from_json(payload)?;
//!     let outcome = handle_event(ctx, &event).await?;
//!     println!("{outcome:?}");
//!     Ok(())
//! }
//! ```

pub mod register;
pub mod unregister;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use register::{fetch_instance, register_instance};
pub use unregister::{unregister_instance, UnregisterSummary};

use crate::context::Context;
use crate::dns_errors::{AccountError, RecordError, StoreError, SyncError};
use crate::event::{LifecycleAction, LifecycleEvent};
use crate::metrics;
use crate::providers::DnsApi;
use crate::tags::TagSet;
use crate::types::{DnsChange, RegistrationEntry};
use std::time::Instant;
use tracing::{error, info, warn};

/// How a lifecycle event was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// The state transition needs no DNS changes
    Ignored { state: String },

    /// The account is not enabled for DNS synchronization
    AccountDisabled { account_id: String },

    /// Records were registered (the list may be empty)
    Registered {
        instance_id: String,
        records: Vec<DnsChange>,
    },

    /// Records registered earlier were removed
    Unregistered {
        instance_id: String,
        summary: UnregisterSummary,
    },
}

impl EventOutcome {
    /// Metric label for the outcome.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ignored { .. } => "ignored",
            Self::AccountDisabled { .. } => "account_disabled",
            Self::Registered { .. } => "registered",
            Self::Unregistered { .. } => "unregistered",
        }
    }
}

/// Role ARN assumed in a member account.
#[must_use]
pub fn role_arn(account_id: &str, role: &str) -> String {
    format!("arn:aws:iam::{account_id}:role/{role}")
}

/// Handle one lifecycle event.
///
/// # Errors
///
/// Returns an error for invalid events, account or credential failures, instance
/// data problems, and store failures. Zone lookup and record submission problems
/// are logged and never returned.
pub async fn handle_event(ctx: &Context, event: &LifecycleEvent) -> Result<EventOutcome, SyncError> {
    let start = Instant::now();
    info!("=== Started DNS synchronization ===");

    let result = dispatch(ctx, event).await;
    match &result {
        Ok(outcome) => metrics::record_event(outcome.label(), start.elapsed()),
        Err(e) => {
            error!(reason = e.status_reason(), "DNS synchronization failed: {e}");
            metrics::record_error(e.status_reason());
            metrics::record_event("error", start.elapsed());
        }
    }

    info!("=== Finished DNS synchronization ===");
    result
}

async fn dispatch(ctx: &Context, event: &LifecycleEvent) -> Result<EventOutcome, SyncError> {
    let event = event.validate()?;
    let action = event.action();
    if action == LifecycleAction::Ignore {
        info!("Nothing to do... state is '{}'", event.state);
        return Ok(EventOutcome::Ignored { state: event.state });
    }
    info!(
        instance_id = %event.instance_id,
        region = %event.region,
        state = %event.state,
        "Handling instance state change"
    );

    let account = ctx
        .accounts
        .account(&event.account_id)
        .await
        .map_err(|e| AccountError::LookupFailed {
            account_id: event.account_id.clone(),
            reason: format!("{e:#}"),
        })?;
    let account_name = account.name.as_deref().unwrap_or(&event.account_id);
    let account_tags = TagSet::from_raw(&account.tags);

    let enabled_values = ctx.settings.enabled_values();
    let enabled = account_tags
        .get(&ctx.settings.account_state_tag)
        .is_some_and(|state| enabled_values.iter().any(|value| value == state));
    if !enabled {
        info!("Skipping disabled account: {account_name} ({})", event.account_id);
        return Ok(EventOutcome::AccountDisabled {
            account_id: event.account_id,
        });
    }
    info!("Updating records for account: {account_name} ({})", event.account_id);

    let role = account_tags
        .get_non_empty(&ctx.settings.iam_role_tag)
        .unwrap_or(&ctx.settings.default_iam_role);
    let role_arn = role_arn(&event.account_id, role);
    info!(role_arn = %role_arn, "Using account role");

    match action {
        LifecycleAction::Register => {
            let compute = ctx
                .accounts
                .compute_client(&role_arn, &event.region)
                .await
                .map_err(|e| AccountError::CredentialsFailed {
                    role_arn: role_arn.clone(),
                    reason: format!("{e:#}"),
                })?;

            let records = register_instance(
                ctx,
                compute.as_ref(),
                Some(&account_tags),
                &event.region,
                &event.instance_id,
            )
            .await?;

            let previous = ctx
                .store
                .fetch(&event.instance_id)
                .await
                .map_err(|e| StoreError::ReadFailed {
                    instance_id: event.instance_id.clone(),
                    reason: format!("{e:#}"),
                })?;

            let mut stored = records.clone();
            if let Some(previous) = previous {
                let retained = retained_records(previous.records, &records);
                if !retained.is_empty() {
                    warn!(
                        instance_id = %event.instance_id,
                        count = retained.len(),
                        "Keeping earlier records that are not replaced by this registration"
                    );
                    stored.extend(retained);
                }
            }

            let entry = RegistrationEntry::new(&event.instance_id, stored);
            ctx.store
                .put(&entry)
                .await
                .map_err(|e| StoreError::WriteFailed {
                    instance_id: event.instance_id.clone(),
                    reason: format!("{e:#}"),
                })?;

            Ok(EventOutcome::Registered {
                instance_id: event.instance_id,
                records,
            })
        }
        LifecycleAction::Unregister => {
            let summary = unregister_instance(ctx, &event.instance_id).await?;
            Ok(EventOutcome::Unregistered {
                instance_id: event.instance_id,
                summary,
            })
        }
        LifecycleAction::Ignore => Ok(EventOutcome::Ignored { state: event.state }),
    }
}

/// Stored changes that a new registration does not replace.
///
/// A change is kept when no new change has the same zone, record type and name.
/// These are usually deletes that failed during an earlier unregistration.
fn retained_records(previous: Vec<DnsChange>, current: &[DnsChange]) -> Vec<DnsChange> {
    previous
        .into_iter()
        .filter(|old| {
            !current.iter().any(|new| {
                new.zone_id == old.zone_id
                    && new.record_type == old.record_type
                    && new.name == old.name
            })
        })
        .collect()
}

/// Submit one change, logging the result. Returns whether it succeeded.
pub async fn submit_change(dns: &dyn DnsApi, change: &DnsChange) -> bool {
    match dns.submit_change(change).await {
        Ok(()) => {
            info!(
                "{} successful for {} record: {} -> {}",
                change.action, change.record_type, change.name, change.value
            );
            metrics::record_change(change, true);
            true
        }
        Err(e) => {
            let err = RecordError::SubmissionFailed {
                action: change.action.to_string(),
                record_type: change.record_type.to_string(),
                name: change.name.clone(),
                value: change.value.clone(),
                zone_id: change.zone_id.clone(),
                reason: format!("{e:#}"),
            };
            error!("{err}");
            metrics::record_change(change, false);
            false
        }
    }
}
