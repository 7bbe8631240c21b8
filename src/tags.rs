// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Tag model and tag-name conventions.
//!
//! Cloud APIs hand back tags as a list of `{Key, Value}` or `{Key, Values}` entries.
//! [`TagSet::from_raw`] turns such a list into a flat key/value lookup, and
//! [`TagConventions`] decides which tag keys carry the hostname, DNS domain and
//! aliases of an instance.

use crate::constants::{ALIAS_HOSTNAME_SUFFIX, ALIAS_ZONE_ID_SUFFIX};
use crate::settings::Settings;
use crate::types::ZoneVisibility;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// A single tag entry exactly as the cloud API returns it.
///
/// Either field may be missing; such entries are dropped by [`TagSet::from_raw`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTag {
    #[serde(rename = "Key", default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(rename = "Value", default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(rename = "Values", default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
}

/// The value carried by a tag entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValue {
    /// A plain `Value`
    Single(String),
    /// A `Values` list
    List(Vec<String>),
}

impl TagValue {
    /// Flatten to the string stored in a [`TagSet`]. Lists are comma-joined.
    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            Self::Single(value) => value,
            Self::List(values) => values.join(","),
        }
    }
}

impl RawTag {
    /// Build a `{Key, Value}` entry.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            value: Some(value.into()),
            values: None,
        }
    }

    /// The entry's value. `Values` takes precedence over `Value` when both are present.
    #[must_use]
    pub fn tag_value(&self) -> Option<TagValue> {
        match (&self.values, &self.value) {
            (Some(values), _) => Some(TagValue::List(values.clone())),
            (None, Some(value)) => Some(TagValue::Single(value.clone())),
            (None, None) => None,
        }
    }
}

/// Immutable tag lookup keyed by tag key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSet(BTreeMap<String, String>);

impl TagSet {
    /// Convert a raw tag list into a lookup.
    ///
    /// Entries without a key, or without both `Value` and `Values`, are skipped.
    /// A later entry with the same key replaces an earlier one.
    pub fn from_raw<'a, I>(raw: I) -> Self
    where
        I: IntoIterator<Item = &'a RawTag>,
    {
        let mut tags = BTreeMap::new();
        for entry in raw {
            let Some(key) = entry.key.as_ref() else {
                debug!("Dropping tag entry without a key");
                continue;
            };
            let Some(value) = entry.tag_value() else {
                debug!(tag = %key, "Dropping tag entry without a value");
                continue;
            };
            tags.insert(key.clone(), value.into_string());
        }
        Self(tags)
    }

    /// Look up a tag value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Look up a tag value, treating blank values as absent.
    #[must_use]
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for TagSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// The tag keys that carry an instance's DNS settings.
///
/// Each key goes through one level of indirection: an "account tag" (whose key comes
/// from [`Settings`]) may name the instance tag to read instead of the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagConventions {
    /// Instance tag holding the hostname
    pub hostname_tag: String,
    /// Instance tag holding the DNS domain override
    pub dns_domain_tag: String,
    /// Base path of the alias tags
    pub aliases_tag: String,
}

impl TagConventions {
    /// Resolve the conventions for one instance.
    ///
    /// Indirection tags are looked up in the account tags first, then in the instance
    /// tags; when neither carries one, the default tag name from settings is used.
    #[must_use]
    pub fn resolve(settings: &Settings, account_tags: Option<&TagSet>, instance_tags: &TagSet) -> Self {
        let pick = |indirection: &str, default: &str| -> String {
            account_tags
                .and_then(|tags| tags.get_non_empty(indirection))
                .or_else(|| instance_tags.get_non_empty(indirection))
                .unwrap_or(default)
                .to_string()
        };

        let conventions = Self {
            hostname_tag: pick(
                &settings.hostname_tag_name_account_tag,
                &settings.default_hostname_tag_name,
            ),
            dns_domain_tag: pick(
                &settings.dns_domain_tag_name_account_tag,
                &settings.default_dns_domain_tag_name,
            ),
            aliases_tag: pick(
                &settings.aliases_tag_name_account_tag,
                &settings.default_aliases_tag_name,
            ),
        };

        debug!(
            hostname_tag = %conventions.hostname_tag,
            dns_domain_tag = %conventions.dns_domain_tag,
            aliases_tag = %conventions.aliases_tag,
            "Resolved tag conventions"
        );
        conventions
    }

    /// Tag holding the comma-separated alias list for a visibility.
    #[must_use]
    pub fn alias_list_tag(&self, visibility: ZoneVisibility) -> String {
        format!("{}/{}", self.aliases_tag, visibility.as_str())
    }

    /// Tag overriding the hostname of one alias.
    #[must_use]
    pub fn alias_hostname_tag(&self, visibility: ZoneVisibility, alias: &str) -> String {
        format!(
            "{}/{}/{}/{ALIAS_HOSTNAME_SUFFIX}",
            self.aliases_tag,
            visibility.as_str(),
            alias
        )
    }

    /// Tag pinning one alias to a zone id.
    #[must_use]
    pub fn alias_zone_id_tag(&self, visibility: ZoneVisibility, alias: &str) -> String {
        format!(
            "{}/{}/{}/{ALIAS_ZONE_ID_SUFFIX}",
            self.aliases_tag,
            visibility.as_str(),
            alias
        )
    }
}

#[cfg(test)]
#[path = "tags_tests.rs"]
mod tags_tests;
