//! Client configuration.
//!
//! Values come from `BANK_`-prefixed environment variables, after an
//! optional `.env` file has been loaded:
//!
//! | variable | default |
//! |---|---|
//! | `BANK_API_URL` | `http://localhost:8000/api/v1` |
//! | `BANK_TIMEOUT_MS` | `10000` |
//! | `BANK_API_TOKEN` | unset |

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
const ENV_PREFIX: &str = "BANK_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Env(#[from] envy::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub api_token: Option<String>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_ms: default_timeout_ms(),
            api_token: None,
        }
    }
}

impl ClientConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let config = envy::prefixed(ENV_PREFIX).from_env::<ClientConfig>()?;
        Ok(config.normalized())
    }

    /// Read from an explicit set of variables instead of the process
    /// environment.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: ClientConfig = envy::prefixed(ENV_PREFIX).from_iter(vars)?;
        Ok(config.normalized())
    }

    /// A blank `BANK_API_TOKEN` means no token.
    fn normalized(mut self) -> Self {
        self.api_token = self.api_token.filter(|token| !token.trim().is_empty());
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
