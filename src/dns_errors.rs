// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for instance DNS synchronization.
//!
//! This module provides specialized error types for:
//! - Lifecycle event validation
//! - Account lookup and credential assumption
//! - Instance metadata lookups and data integrity checks
//! - Managed zone discovery
//! - DNS record change submissions
//! - The registered-records store
//!
//! Event, account, instance and store errors abort an invocation and are returned
//! as [`SyncError`]. Zone and record errors are only logged by the reconciler; the
//! run carries on with the remaining records.

use thiserror::Error;

/// Errors raised while validating an incoming lifecycle event.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    /// A required field is absent from the event payload
    #[error("'{field}' is missing from the event")]
    MissingField {
        /// Dotted path of the missing field (e.g. `detail.instance-id`)
        field: &'static str,
    },

    /// The event payload is not valid JSON for a lifecycle event
    #[error("Malformed lifecycle event: {reason}")]
    Malformed {
        /// Parser error message
        reason: String,
    },
}

/// Errors related to the account owning the instance.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    /// The account directory could not describe the account
    #[error("Failed to look up account {account_id}: {reason}")]
    LookupFailed {
        /// The account identifier
        account_id: String,
        /// Reason reported by the account directory
        reason: String,
    },

    /// A compute client could not be obtained for the account role
    #[error("Failed to obtain credentials for role {role_arn}: {reason}")]
    CredentialsFailed {
        /// The role that was to be assumed
        role_arn: String,
        /// Reason reported by the account directory
        reason: String,
    },
}

/// Errors raised while fetching instance facts.
///
/// All of these are data-integrity failures: without a single instance carrying a
/// private IPv4 address and a VPC there is nothing to register.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InstanceError {
    /// The instance lookup did not return exactly one instance
    #[error("Unexpected result when retrieving instance data for {instance_id}: {count} instances")]
    UnexpectedCount {
        /// The instance that was looked up
        instance_id: String,
        /// Number of instances returned
        count: usize,
    },

    /// The instance lookup call itself failed
    #[error("Failed to describe instance {instance_id}: {reason}")]
    LookupFailed {
        /// The instance that was looked up
        instance_id: String,
        /// Reason reported by the compute API
        reason: String,
    },

    /// The instance has no private IP address
    #[error("Instance {instance_id} is missing its private IP")]
    MissingPrivateIp {
        /// The instance identifier
        instance_id: String,
    },

    /// The private IP address is not a valid IPv4 address
    #[error("Instance {instance_id} has an invalid private IP '{value}'")]
    InvalidPrivateIp {
        /// The instance identifier
        instance_id: String,
        /// The unparseable value
        value: String,
    },

    /// The instance is not attached to a VPC
    #[error("Instance {instance_id} is missing its VPC ID")]
    MissingVpcId {
        /// The instance identifier
        instance_id: String,
    },
}

/// Errors that can occur while discovering managed zones.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ZoneError {
    /// Listing the managed zones failed
    #[error("Failed to list {visibility} zones: {reason}")]
    ListFailed {
        /// Zone visibility that was being listed
        visibility: String,
        /// Reason reported by the DNS API
        reason: String,
    },

    /// Reading the VPC attachments of a private zone failed
    #[error("Failed to read VPC attachments of zone {zone_id}: {reason}")]
    AttachmentLookupFailed {
        /// The zone identifier
        zone_id: String,
        /// Reason reported by the DNS API
        reason: String,
    },
}

/// Errors that can occur while submitting DNS record changes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The DNS service rejected or failed a change
    #[error("{action} failed for {record_type} record '{name}' -> '{value}' in zone {zone_id}: {reason}")]
    SubmissionFailed {
        /// Change action (`UPSERT` or `DELETE`)
        action: String,
        /// Record type (`A` or `PTR`)
        record_type: String,
        /// Record name without the trailing dot
        name: String,
        /// Record value
        value: String,
        /// Target zone
        zone_id: String,
        /// Reason reported by the DNS API
        reason: String,
    },
}

/// Errors related to the registered-records store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Reading the entry for an instance failed
    #[error("Failed to read registered records for {instance_id}: {reason}")]
    ReadFailed {
        /// The instance identifier
        instance_id: String,
        /// Reason reported by the store
        reason: String,
    },

    /// Writing the entry for an instance failed
    #[error("Failed to write registered records for {instance_id}: {reason}")]
    WriteFailed {
        /// The instance identifier
        instance_id: String,
        /// Reason reported by the store
        reason: String,
    },

    /// Removing the entry for an instance failed
    #[error("Failed to delete registered records for {instance_id}: {reason}")]
    DeleteFailed {
        /// The instance identifier
        instance_id: String,
        /// Reason reported by the store
        reason: String,
    },
}

/// Composite error type returned by the event handler and reconcilers.
///
/// Every variant aborts the invocation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// Lifecycle event validation error
    #[error(transparent)]
    Event(#[from] EventError),

    /// Account lookup or credential error
    #[error(transparent)]
    Account(#[from] AccountError),

    /// Instance lookup or data-integrity error
    #[error(transparent)]
    Instance(#[from] InstanceError),

    /// Registered-records store error
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SyncError {
    /// Returns a stable, machine-readable reason code for this error.
    ///
    /// Used as the `reason` label on error metrics.
    #[must_use]
    pub fn status_reason(&self) -> &'static str {
        match self {
            Self::Event(EventError::MissingField { .. }) => "EventFieldMissing",
            Self::Event(EventError::Malformed { .. }) => "EventMalformed",

            Self::Account(AccountError::LookupFailed { .. }) => "AccountLookupFailed",
            Self::Account(AccountError::CredentialsFailed { .. }) => "CredentialsFailed",

            Self::Instance(InstanceError::UnexpectedCount { .. }) => "InstanceCountMismatch",
            Self::Instance(InstanceError::LookupFailed { .. }) => "InstanceLookupFailed",
            Self::Instance(InstanceError::MissingPrivateIp { .. }) => "PrivateIpMissing",
            Self::Instance(InstanceError::InvalidPrivateIp { .. }) => "PrivateIpInvalid",
            Self::Instance(InstanceError::MissingVpcId { .. }) => "VpcIdMissing",

            Self::Store(StoreError::ReadFailed { .. }) => "StoreReadFailed",
            Self::Store(StoreError::WriteFailed { .. }) => "StoreWriteFailed",
            Self::Store(StoreError::DeleteFailed { .. }) => "StoreDeleteFailed",
        }
    }
}

#[cfg(test)]
#[path = "dns_errors_tests.rs"]
mod dns_errors_tests;
