//! Client configuration.
//!
//! Configuration is fixed when the client is built. It can be assembled by
//! hand, through [`SpaceClientBuilder`](crate::SpaceClientBuilder), or from
//! the environment:
//!
//! | Variable              | Field        | Default                 |
//! |-----------------------|--------------|-------------------------|
//! | `DXSPACES_URL`        | `base_url`   | `http://localhost:8080` |
//! | `DXSPACES_API_PREFIX` | `api_prefix` | `dspaces`               |
//! | `DXSPACES_DEBUG`      | `debug`      | `false`                 |

use crate::error::{Result, SpaceError};

/// Default server address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Default path prefix of every endpoint.
pub const DEFAULT_API_PREFIX: &str = "dspaces";

pub const ENV_BASE_URL: &str = "DXSPACES_URL";
pub const ENV_API_PREFIX: &str = "DXSPACES_API_PREFIX";
pub const ENV_DEBUG: &str = "DXSPACES_DEBUG";

/// Immutable client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server address, e.g. `http://host:8080`.
    pub base_url: String,
    /// Path segment between the address and each endpoint.
    pub api_prefix: String,
    /// Log every request URL at `info` level.
    pub debug: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            debug: false,
        }
    }
}

impl ClientConfig {
    /// Default configuration pointed at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Read configuration from `DXSPACES_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`SpaceError::InvalidConfig`] if `DXSPACES_DEBUG` is not a
    /// recognized boolean or the resulting URL is unusable.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(url) = lookup(ENV_BASE_URL) {
            config.base_url = url;
        }
        if let Some(prefix) = lookup(ENV_API_PREFIX) {
            config.api_prefix = prefix;
        }
        if let Some(debug) = lookup(ENV_DEBUG) {
            config.debug = parse_flag(&debug).ok_or_else(|| {
                SpaceError::InvalidConfig(format!("{ENV_DEBUG}={debug:?} is not a boolean"))
            })?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Check that the base URL is an absolute http(s) address.
    pub fn validate(&self) -> Result<()> {
        let url = self.base_url.trim();
        let has_scheme = url.starts_with("http://") || url.starts_with("https://");
        if !has_scheme || url.trim_end_matches('/').ends_with(':') {
            return Err(SpaceError::InvalidConfig(format!(
                "base URL {:?} is not an http(s) address",
                self.base_url
            )));
        }
        Ok(())
    }

    /// Absolute URL of an endpoint path such as `obj/a/1/`.
    ///
    /// The endpoint's own trailing slash is kept; the server distinguishes
    /// `obj/{name}/{version}/` from `obj/{name}/{version}`.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.trim().trim_end_matches('/');
        let prefix = self.api_prefix.trim_matches('/');
        let path = path.trim_start_matches('/');
        if prefix.is_empty() {
            format!("{base}/{path}")
        } else {
            format!("{base}/{prefix}/{path}")
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
