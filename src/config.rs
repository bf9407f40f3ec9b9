//! Provider configuration and its resolution against the environment.
//!
//! Explicit values from the provider configuration block win, even when empty;
//! absent values fall back to `DBSNAPPER_AUTHTOKEN` and `DBSNAPPER_BASE_URL`.
//! An empty base URL then defaults to the public API. A missing auth token is an error
//! diagnostic on the `authtoken` attribute.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::schema::{Attribute, Diagnostic, Schema};

/// Environment variable holding the API auth token.
pub const AUTHTOKEN_ENV: &str = "DBSNAPPER_AUTHTOKEN";
/// Environment variable holding the API base URL.
pub const BASE_URL_ENV: &str = "DBSNAPPER_BASE_URL";
/// Base URL used when neither configuration nor environment sets one.
pub const DEFAULT_BASE_URL: &str = "https://app.dbsnapper.com/api/v3";

/// The provider configuration block as written by the user.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// API auth token.
    pub authtoken: Option<String>,
    /// API base URL.
    pub base_url: Option<String>,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("authtoken", &self.authtoken.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Settings after precedence and defaults have been applied.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// API auth token, never empty.
    pub authtoken: String,
    /// API base URL, never empty.
    pub base_url: String,
}

impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ProviderConfig {
    /// Decode the configuration block. A null block is an empty configuration.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ProviderError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Schema of the provider configuration block.
    pub fn schema() -> Schema {
        Schema::v0()
            .with_attribute(
                "authtoken",
                Attribute::optional_string()
                    .with_description(format!(
                        "DBSnapper API auth token. Can also be set with {}",
                        AUTHTOKEN_ENV
                    ))
                    .sensitive(),
            )
            .with_attribute(
                "base_url",
                Attribute::optional_string().with_description(format!(
                    "DBSnapper API base URL. Can also be set with {}. Defaults to {}",
                    BASE_URL_ENV, DEFAULT_BASE_URL
                )),
            )
    }

    /// Resolve using `lookup` for environment variables.
    pub fn resolve_with<F>(&self, lookup: F) -> Result<ResolvedConfig, Vec<Diagnostic>>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Any explicit value, empty included, shadows the environment.
        let pick = |explicit: &Option<String>, env: &str| {
            explicit
                .clone()
                .or_else(|| lookup(env))
                .filter(|v| !v.is_empty())
        };

        let base_url =
            pick(&self.base_url, BASE_URL_ENV).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        match pick(&self.authtoken, AUTHTOKEN_ENV) {
            Some(authtoken) => Ok(ResolvedConfig {
                authtoken,
                base_url,
            }),
            None => Err(vec![Diagnostic::error("Missing DBSnapper API AuthToken")
                .with_detail(format!(
                    "The provider cannot create the DBSnapper API client because the auth token \
                     is missing or empty. Set the authtoken value in the provider configuration \
                     or use the {} environment variable.",
                    AUTHTOKEN_ENV
                ))
                .with_attribute("authtoken")]),
        }
    }
}
