// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Record removal for an instance that is shutting down or stopping.
//!
//! The records to remove come from the registration store, never from the
//! instance's current tags, so a tag edit after boot can't orphan a record.

use super::submit_change;
use crate::context::Context;
use crate::dns_errors::{StoreError, SyncError};
use crate::types::RegistrationEntry;
use tracing::{info, warn};

/// Result of one unregistration run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnregisterSummary {
    /// Records deleted from the DNS service
    pub removed: usize,
    /// Records whose delete failed and which remain in the store
    pub failed: usize,
}

/// Delete every record registered for an instance.
///
/// Records are deleted newest first. When every delete succeeds the store entry is
/// removed; otherwise the entry is rewritten with the records still to delete.
///
/// # Errors
///
/// Returns an error if the store can't be read or updated.
pub async fn unregister_instance(
    ctx: &Context,
    instance_id: &str,
) -> Result<UnregisterSummary, SyncError> {
    let entry = ctx
        .store
        .fetch(instance_id)
        .await
        .map_err(|e| StoreError::ReadFailed {
            instance_id: instance_id.to_string(),
            reason: format!("{e:#}"),
        })?;

    let Some(entry) = entry else {
        info!(instance_id, "No registered records found - nothing to remove");
        return Ok(UnregisterSummary::default());
    };
    info!(
        instance_id,
        records = entry.records.len(),
        registered_at = %entry.registered_at.to_rfc3339(),
        "Removing registered records"
    );

    let mut summary = UnregisterSummary::default();
    let mut remaining = Vec::new();
    for record in entry.records.iter().rev() {
        if submit_change(ctx.dns.as_ref(), &record.inverse()).await {
            summary.removed += 1;
        } else {
            remaining.push(record.clone());
        }
    }

    if remaining.is_empty() {
        ctx.store
            .delete(instance_id)
            .await
            .map_err(|e| StoreError::DeleteFailed {
                instance_id: instance_id.to_string(),
                reason: format!("{e:#}"),
            })?;
        return Ok(summary);
    }

    summary.failed = remaining.len();
    warn!(
        instance_id,
        failed = summary.failed,
        "Some records could not be removed - keeping them for a later attempt"
    );
    remaining.reverse();
    let retained = RegistrationEntry {
        records: remaining,
        ..entry
    };
    ctx.store
        .put(&retained)
        .await
        .map_err(|e| StoreError::WriteFailed {
            instance_id: instance_id.to_string(),
            reason: format!("{e:#}"),
        })?;

    Ok(summary)
}

#[cfg(test)]
#[path = "unregister_tests.rs"]
mod unregister_tests;
