//! Skin fetch failure taxonomy
//!
//! Every resolution failure maps to exactly one `Reason`. Caller-facing text
//! for each reason lives in `locale::Messages`.

use crate::provider::ProviderError;

/// Failure reason, used as the message lookup key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reason {
    NoPremiumAccount,
    NoSkinData,
    RecodeFailed,
    RateLimited,
    GenericError,
}

/// Skin resolution error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkinFetchError {
    #[error("No premium account for this name")]
    NoPremiumAccount,

    #[error("Account has no skin data")]
    NoSkinData,

    #[error("Failed to decode skin data: {0}")]
    RecodeFailed(String),

    #[error("Rate limited by skin provider")]
    RateLimited,

    #[error("Skin fetch failed: {kind}: {message}")]
    Generic { kind: String, message: String },
}

impl SkinFetchError {
    pub fn reason(&self) -> Reason {
        match self {
            SkinFetchError::NoPremiumAccount => Reason::NoPremiumAccount,
            SkinFetchError::NoSkinData => Reason::NoSkinData,
            SkinFetchError::RecodeFailed(_) => Reason::RecodeFailed,
            SkinFetchError::RateLimited => Reason::RateLimited,
            SkinFetchError::Generic { .. } => Reason::GenericError,
        }
    }
}

impl From<ProviderError> for SkinFetchError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NoSuchAccount(_) | ProviderError::NotFound(_) => {
                SkinFetchError::NoPremiumAccount
            }
            ProviderError::NoSkinData(_) => SkinFetchError::NoSkinData,
            ProviderError::Malformed(detail) => SkinFetchError::RecodeFailed(detail),
            ProviderError::RateLimited => SkinFetchError::RateLimited,
            other @ (ProviderError::Timeout
            | ProviderError::Transport(_)
            | ProviderError::Server(_, _)) => SkinFetchError::Generic {
                kind: other.kind().to_string(),
                message: other.to_string(),
            },
        }
    }
}
