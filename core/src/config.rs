//! Client configuration loaded from the environment or deserialized by a host.

use serde::Deserialize;
use thiserror::Error;

pub const COMPANY_DOMAIN_VAR: &str = "BAMBOOHR_COMPANY_DOMAIN";
pub const API_KEY_VAR: &str = "BAMBOOHR_API_KEY";
pub const API_ROOT_VAR: &str = "BAMBOOHR_API_ROOT";

/// Per-tenant settings needed to construct a `BambooClient`.
#[derive(Clone, Deserialize)]
pub struct ClientConfig {
    pub company_domain: String,
    pub api_key: String,
    /// Overrides the `https://api.bamboohr.com` origin.
    #[serde(default)]
    pub api_root: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &'static str| lookup(name).filter(|value| !value.trim().is_empty());
        Ok(Self {
            company_domain: read(COMPANY_DOMAIN_VAR).ok_or(ConfigError::Missing(COMPANY_DOMAIN_VAR))?,
            api_key: read(API_KEY_VAR).ok_or(ConfigError::Missing(API_KEY_VAR))?,
            api_root: read(API_ROOT_VAR),
        })
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("company_domain", &self.company_domain)
            .field("api_key", &"<redacted>")
            .field("api_root", &self.api_root)
            .finish()
    }
}
