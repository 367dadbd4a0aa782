//! Error types for the FMP client.

use thiserror::Error;
use url::Url;

/// Main error type for FMP API calls.
#[derive(Error, Debug)]
pub enum FmpError {
    /// No API key was provided.
    #[error("FMP API key is required (set FMP_API_KEY)")]
    MissingApiKey,

    /// Configuration errors (invalid base URL, client construction failure)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport errors (connect/timeout/TLS), with the URL redacted
    #[error("HTTP transport error: {0}")]
    Transport(String),

    /// Upstream returned a non-2xx status
    #[error("API returned {status} {reason}: {body}")]
    Api {
        status: u16,
        reason: String,
        body: String,
    },

    /// Upstream returned 2xx but the body was not valid JSON
    #[error("Invalid JSON in API response: {0}")]
    Decode(String),
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, FmpError>;

impl From<reqwest::Error> for FmpError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(sanitize_reqwest_error(&value))
    }
}

/// Render a URL without credentials, query, or fragment.
///
/// Every FMP request carries the API key as an `apikey` query parameter, so
/// the query string must never reach logs or error payloads.
#[must_use]
pub fn redact_url(url: &Url) -> String {
    let mut u = url.clone();
    let _ = u.set_username("");
    let _ = u.set_password(None);
    u.set_query(None);
    u.set_fragment(None);
    u.to_string()
}

/// Stringify a reqwest error with any embedded URL redacted.
#[must_use]
pub fn sanitize_reqwest_error(e: &reqwest::Error) -> String {
    let mut msg = e.to_string();
    if let Some(u) = e.url() {
        msg = msg.replace(u.as_str(), &redact_url(u));
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::redact_url;
    use url::Url;

    #[test]
    fn redact_url_drops_query_and_credentials() {
        let url = Url::parse("https://user:pw@api.example.com/v3/quote/AAPL?apikey=sekret#frag")
            .expect("url");
        let redacted = redact_url(&url);
        assert_eq!(redacted, "https://api.example.com/v3/quote/AAPL");
        assert!(!redacted.contains("sekret"));
        assert!(!redacted.contains("pw"));
    }
}
