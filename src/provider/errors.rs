//! Provider Error Types
//!
//! Structured errors for upstream profile and skin lookups.
//! Maps HTTP status codes to specific variants so the resolver can classify failures.

/// Provider lookup error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("No such premium account: {0}")]
    NoSuchAccount(String),

    #[error("Profile not found: {0}")]
    NotFound(String),

    #[error("Profile {0} has no skin data")]
    NoSkinData(String),

    #[error("Rate limited by profile provider")]
    RateLimited,

    #[error("Request timeout")]
    Timeout,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Server error ({0}): {1}")]
    Server(u16, String),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl ProviderError {
    /// Short stable name of the failure kind, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NoSuchAccount(_) => "no_such_account",
            ProviderError::NotFound(_) => "not_found",
            ProviderError::NoSkinData(_) => "no_skin_data",
            ProviderError::RateLimited => "rate_limited",
            ProviderError::Timeout => "timeout",
            ProviderError::Transport(_) => "transport",
            ProviderError::Server(_, _) => "server",
            ProviderError::Malformed(_) => "malformed",
        }
    }

    /// Create a ProviderError from a non-success HTTP status code and response body
    ///
    /// 404 maps to `NotFound`; `MojangClient::get_profile` reports it as `NoSuchAccount`.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            404 => ProviderError::NotFound(body.to_string()),
            408 => ProviderError::Timeout,
            429 => ProviderError::RateLimited,
            500..=599 => ProviderError::Server(status, body.to_string()),
            _ => ProviderError::Transport(format!("HTTP {}: {}", status, body)),
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else if err.is_decode() {
            ProviderError::Malformed(err.to_string())
        } else {
            ProviderError::Transport(err.to_string())
        }
    }
}
