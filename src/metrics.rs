// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for dnsync.
//!
//! All metrics use the `dnsync` namespace prefix.
//!
//! # Metrics Categories
//!
//! - **Event Metrics** - Lifecycle events handled, by outcome, and their duration
//! - **Record Metrics** - Record changes submitted, by type, action and status
//! - **Zone Metrics** - Zone lookups, by visibility and result
//! - **Error Metrics** - Failed events, by status reason
//!
//! # Example
//!
//! ```rust,no_run
//! use dnsync::metrics::{gather_metrics, record_event};
//!
//! record_event("registered", std::time::Duration::from_millis(250));
//! println!("{}", gather_metrics().unwrap());
//! ```

use crate::constants::METRICS_NAMESPACE;
use crate::types::{DnsChange, ZoneVisibility};
use prometheus::{CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::sync::LazyLock;
use std::time::Duration;

// ============================================================================
// Global Metrics Registry
// ============================================================================

/// Global Prometheus metrics registry
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// ============================================================================
// Event Metrics
// ============================================================================

/// Total number of lifecycle events handled
///
/// Labels:
/// - `outcome`: `registered`, `unregistered`, `ignored`, `account_disabled` or `error`
pub static EVENTS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_events_total"),
        "Total number of lifecycle events handled by outcome",
    );
    let counter = CounterVec::new(opts, &["outcome"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Duration of event handling in seconds
///
/// Labels:
/// - `outcome`: Same values as [`EVENTS_TOTAL`]
pub static EVENT_DURATION_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_event_duration_seconds"),
        "Duration of lifecycle event handling in seconds by outcome",
    )
    .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0]);
    let histogram = HistogramVec::new(opts, &["outcome"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .unwrap();
    histogram
});

// ============================================================================
// Record Metrics
// ============================================================================

/// Total number of record changes submitted
///
/// Labels:
/// - `record_type`: `A` or `PTR`
/// - `action`: `UPSERT` or `DELETE`
/// - `status`: `success` or `error`
pub static RECORD_CHANGES_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_record_changes_total"),
        "Total number of record changes submitted by type, action and status",
    );
    let counter = CounterVec::new(opts, &["record_type", "action", "status"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Zone Metrics
// ============================================================================

/// Total number of zone lookups
///
/// Labels:
/// - `visibility`: `public` or `private`
/// - `result`: `found` or `not_found`
pub static ZONE_LOOKUPS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_zone_lookups_total"),
        "Total number of zone lookups by visibility and result",
    );
    let counter = CounterVec::new(opts, &["visibility", "result"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Error Metrics
// ============================================================================

/// Total number of failed events
///
/// Labels:
/// - `reason`: Status reason of the error (e.g., `VpcIdMissing`)
pub static ERRORS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_errors_total"),
        "Total number of failed events by reason",
    );
    let counter = CounterVec::new(opts, &["reason"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Helper Functions
// ============================================================================

/// Record a handled lifecycle event
///
/// # Arguments
/// * `outcome` - How the event ended (e.g., `registered`)
/// * `duration` - Time spent handling the event
pub fn record_event(outcome: &str, duration: Duration) {
    EVENTS_TOTAL.with_label_values(&[outcome]).inc();
    EVENT_DURATION_SECONDS
        .with_label_values(&[outcome])
        .observe(duration.as_secs_f64());
}

/// Record a submitted record change
pub fn record_change(change: &DnsChange, success: bool) {
    let status = if success { "success" } else { "error" };
    RECORD_CHANGES_TOTAL
        .with_label_values(&[change.record_type.as_str(), change.action.as_str(), status])
        .inc();
}

/// Record a zone lookup
pub fn record_zone_lookup(visibility: ZoneVisibility, found: bool) {
    let result = if found { "found" } else { "not_found" };
    ZONE_LOOKUPS_TOTAL
        .with_label_values(&[visibility.as_str(), result])
        .inc();
}

/// Record a failed event
///
/// # Arguments
/// * `reason` - Status reason of the error
pub fn record_error(reason: &str) {
    ERRORS_TOTAL.with_label_values(&[reason]).inc();
}

/// Gather and encode all metrics in Prometheus text format
///
/// # Errors
/// Returns error if encoding fails
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
}
