//! Skin provider interface
//!
//! The two lookups the resolver needs from an upstream identity/skin API.

pub mod errors;

pub use errors::ProviderError;

use async_trait::async_trait;

use crate::profile::{Profile, SkinProfile};

/// Upstream identity and skin lookup
#[async_trait]
pub trait SkinProvider: Send + Sync {
    /// Resolve the current identifier for a player name
    async fn get_profile(&self, name: &str) -> Result<Profile, ProviderError>;

    /// Fetch the skin record for an identifier
    async fn get_skin_profile(&self, id: &str) -> Result<SkinProfile, ProviderError>;
}

#[cfg(test)]
pub mod memory;
