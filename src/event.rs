// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Instance lifecycle events.
//!
//! Events arrive as JSON in the cloud event bus envelope:
//!
//! ```json
//! {
//!   "account": "111122223333",
//!   "region": "us-east-1",
//!   "detail": { "instance-id": "i-0abc", "state": "running" }
//! }
//! ```
//!
//! Every field is optional on the wire; [`LifecycleEvent::validate`] turns the
//! envelope into an [`InstanceEvent`] or reports the first missing field.

use crate::constants::{STATE_RUNNING, UNREGISTER_STATES};
use crate::dns_errors::EventError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDetail {
    #[serde(rename = "instance-id", default)]
    pub instance_id: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

/// Lifecycle event envelope as received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleEvent {
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub detail: Option<EventDetail>,
}

/// A validated lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceEvent {
    pub account_id: String,
    pub region: String,
    pub instance_id: String,
    pub state: String,
}

/// What an instance state transition asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    Register,
    Unregister,
    Ignore,
}

impl LifecycleAction {
    #[must_use]
    pub fn from_state(state: &str) -> Self {
        if state == STATE_RUNNING {
            Self::Register
        } else if UNREGISTER_STATES.contains(&state) {
            Self::Unregister
        } else {
            Self::Ignore
        }
    }
}

fn required(value: Option<&String>, field: &'static str) -> Result<String, EventError> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
        .ok_or(EventError::MissingField { field })
}

impl LifecycleEvent {
    /// Parse an event from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Malformed`] if the payload is not a JSON object of the
    /// expected shape.
    pub fn from_json(payload: &str) -> Result<Self, EventError> {
        serde_json::from_str(payload).map_err(|e| EventError::Malformed {
            reason: e.to_string(),
        })
    }

    /// Check that every field is present.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::MissingField`] naming the first absent or blank field.
    pub fn validate(&self) -> Result<InstanceEvent, EventError> {
        let account_id = required(self.account.as_ref(), "account")?;
        let region = required(self.region.as_ref(), "region")?;
        let detail = self
            .detail
            .as_ref()
            .ok_or(EventError::MissingField { field: "detail" })?;
        let instance_id = required(detail.instance_id.as_ref(), "detail.instance-id")?;
        let state = required(detail.state.as_ref(), "detail.state")?;

        Ok(InstanceEvent {
            account_id,
            region,
            instance_id,
            state,
        })
    }
}

impl InstanceEvent {
    #[must_use]
    pub fn action(&self) -> LifecycleAction {
        LifecycleAction::from_state(&self.state)
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod event_tests;
