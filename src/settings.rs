// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Runtime settings.
//!
//! Every setting can be given as a command-line flag or through its environment
//! variable, and falls back to the defaults in [`crate::constants`].

use crate::constants::{
    DEFAULT_ACCOUNT_ENABLED_VALUES, DEFAULT_ACCOUNT_STATE_TAG, DEFAULT_ALIASES_TAG_NAME,
    DEFAULT_ALIASES_TAG_NAME_ACCOUNT_TAG, DEFAULT_DNS_DOMAIN_TAG_NAME,
    DEFAULT_DNS_DOMAIN_TAG_NAME_ACCOUNT_TAG, DEFAULT_HOSTNAME_TAG_NAME,
    DEFAULT_HOSTNAME_TAG_NAME_ACCOUNT_TAG, DEFAULT_IAM_ROLE, DEFAULT_IAM_ROLE_TAG,
    DEFAULT_TABLE_NAME,
};
use clap::{Args, Parser};

/// Settings shared by the event handler and the reconcilers.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct Settings {
    /// Table holding the records registered for each instance
    #[arg(long, env = "DYNAMO_TABLE_NAME", default_value = DEFAULT_TABLE_NAME)]
    pub table_name: String,

    /// Account tag whose value enables processing for the account
    #[arg(long, env = "ACCOUNT_STATE_TAG", default_value = DEFAULT_ACCOUNT_STATE_TAG)]
    pub account_state_tag: String,

    /// Colon-separated account state values meaning "enabled"
    #[arg(long, env = "ACCOUNT_ENABLED_VALUES", default_value = DEFAULT_ACCOUNT_ENABLED_VALUES)]
    pub account_enabled_values: String,

    /// Account tag naming the IAM role to assume
    #[arg(long, env = "IAM_ROLE_TAG", default_value = DEFAULT_IAM_ROLE_TAG)]
    pub iam_role_tag: String,

    /// Role assumed when the account has no role tag
    #[arg(long, env = "DEFAULT_IAM_ROLE", default_value = DEFAULT_IAM_ROLE)]
    pub default_iam_role: String,

    /// Tag naming the instance tag that holds the hostname
    #[arg(
        long,
        env = "HOSTNAME_TAG_NAME_ACCOUNT_TAG",
        default_value = DEFAULT_HOSTNAME_TAG_NAME_ACCOUNT_TAG
    )]
    pub hostname_tag_name_account_tag: String,

    /// Instance tag holding the hostname
    #[arg(long, env = "DEFAULT_HOSTNAME_TAG_NAME", default_value = DEFAULT_HOSTNAME_TAG_NAME)]
    pub default_hostname_tag_name: String,

    /// Tag naming the instance tag that holds the DNS domain
    #[arg(
        long,
        env = "DNS_DOMAIN_TAG_NAME_ACCOUNT_TAG",
        default_value = DEFAULT_DNS_DOMAIN_TAG_NAME_ACCOUNT_TAG
    )]
    pub dns_domain_tag_name_account_tag: String,

    /// Instance tag holding the DNS domain
    #[arg(
        long,
        env = "DEFAULT_DNS_DOMAIN_TAG_NAME",
        default_value = DEFAULT_DNS_DOMAIN_TAG_NAME
    )]
    pub default_dns_domain_tag_name: String,

    /// Tag naming the base path of the alias tags
    #[arg(
        long,
        env = "ALIASES_TAG_NAME_ACCOUNT_TAG",
        default_value = DEFAULT_ALIASES_TAG_NAME_ACCOUNT_TAG
    )]
    pub aliases_tag_name_account_tag: String,

    /// Base path of the alias tags
    #[arg(long, env = "DEFAULT_ALIASES_TAG_NAME", default_value = DEFAULT_ALIASES_TAG_NAME)]
    pub default_aliases_tag_name: String,
}

/// Standalone parser used to read [`Settings`] from the environment only.
#[derive(Parser)]
#[command(no_binary_name = true)]
struct EnvSettings {
    #[command(flatten)]
    settings: Settings,
}

impl Settings {
    /// Read settings from the environment, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable holds an invalid value.
    pub fn from_env() -> Result<Self, clap::Error> {
        EnvSettings::try_parse_from(std::iter::empty::<String>()).map(|parsed| parsed.settings)
    }

    /// Account state values that enable processing.
    #[must_use]
    pub fn enabled_values(&self) -> Vec<String> {
        self.account_enabled_values
            .split(':')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(ToString::to_string)
            .collect()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            account_state_tag: DEFAULT_ACCOUNT_STATE_TAG.to_string(),
            account_enabled_values: DEFAULT_ACCOUNT_ENABLED_VALUES.to_string(),
            iam_role_tag: DEFAULT_IAM_ROLE_TAG.to_string(),
            default_iam_role: DEFAULT_IAM_ROLE.to_string(),
            hostname_tag_name_account_tag: DEFAULT_HOSTNAME_TAG_NAME_ACCOUNT_TAG.to_string(),
            default_hostname_tag_name: DEFAULT_HOSTNAME_TAG_NAME.to_string(),
            dns_domain_tag_name_account_tag: DEFAULT_DNS_DOMAIN_TAG_NAME_ACCOUNT_TAG.to_string(),
            default_dns_domain_tag_name: DEFAULT_DNS_DOMAIN_TAG_NAME.to_string(),
            aliases_tag_name_account_tag: DEFAULT_ALIASES_TAG_NAME_ACCOUNT_TAG.to_string(),
            default_aliases_tag_name: DEFAULT_ALIASES_TAG_NAME.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod settings_tests;
