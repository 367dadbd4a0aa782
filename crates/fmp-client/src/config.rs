//! Environment-backed configuration for the FMP client.

use crate::error::{FmpError, Result};
use std::time::Duration;
use url::Url;

/// Default API base, matching the public v3 REST surface.
pub const DEFAULT_BASE_URL: &str = "https://financialmodelingprep.com/api/v3";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for [`crate::FmpClient`].
#[derive(Debug, Clone)]
pub struct FmpConfig {
    pub api_key: String,
    pub base_url: Url,
    pub timeout: Duration,
}

impl FmpConfig {
    /// Build a config from explicit values.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or the base URL does not
    /// parse as an HTTP(S) URL.
    pub fn new(api_key: impl Into<String>, base_url: &str, timeout: Duration) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(FmpError::MissingApiKey);
        }

        let base_url = Url::parse(base_url)
            .map_err(|e| FmpError::Config(format!("Invalid base URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(FmpError::Config(format!(
                "Invalid base URL '{base_url}': cannot be a base"
            )));
        }

        Ok(Self {
            api_key,
            base_url,
            timeout,
        })
    }

    /// Read configuration from `FMP_API_KEY`, `FMP_BASE_URL`, and
    /// `FMP_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns an error if `FMP_API_KEY` is unset or any value is invalid.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    // Factored out so tests can resolve without touching process environment.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("FMP_API_KEY").unwrap_or_default();
        let base_url = lookup("FMP_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let timeout = match lookup("FMP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    FmpError::Config(format!("Invalid FMP_TIMEOUT_SECS '{raw}': expected seconds"))
                })?;
                Duration::from_secs(secs)
            }
            None => DEFAULT_TIMEOUT,
        };
        Self::new(api_key, &base_url, timeout)
    }
}
