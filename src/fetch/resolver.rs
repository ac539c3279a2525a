//! Profile Resolver
//!
//! Resolves a player's skin record with at most three provider calls:
//! a direct lookup by a previously known identifier, then the
//! authoritative name → identifier → skin path when that misses.

use tracing::{debug, warn};

use super::errors::SkinFetchError;
use crate::profile::SkinProfile;
use crate::provider::SkinProvider;

/// Stateless resolution pipeline over a `SkinProvider`
///
/// Performs no retries and never touches the cache.
pub struct ProfileResolver<P> {
    provider: P,
}

impl<P: SkinProvider> ProfileResolver<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Resolve the skin record for `name`
    ///
    /// # Arguments
    /// * `name` - Player name as requested (any case)
    /// * `uuid` - Identifier the caller last saw for this player, if any
    ///
    /// # Returns
    /// The provider's skin record, or exactly one typed failure
    pub async fn resolve(
        &self,
        name: &str,
        uuid: Option<&str>,
    ) -> Result<SkinProfile, SkinFetchError> {
        if let Some(uuid) = uuid {
            if let Some(profile) = self.try_known_id(name, uuid).await {
                return Ok(profile);
            }
        }

        let profile = self.provider.get_profile(name).await?;
        let Some(id) = profile.id.as_deref() else {
            warn!(name = name, "Provider returned a profile without an id");
            return Err(SkinFetchError::RecodeFailed(format!(
                "profile for {} carries no id",
                name
            )));
        };

        debug!(name = name, id = id, "Resolved identifier by name");
        Ok(self.provider.get_skin_profile(id).await?)
    }

    /// Look up by a known identifier, keeping the result only if it still belongs to `name`
    async fn try_known_id(&self, name: &str, uuid: &str) -> Option<SkinProfile> {
        match self.provider.get_skin_profile(uuid).await {
            Ok(profile) if profile.name().to_lowercase() == name.to_lowercase() => {
                debug!(name = name, id = uuid, "Known identifier still valid");
                Some(profile)
            }
            Ok(profile) => {
                debug!(
                    name = name,
                    id = uuid,
                    current_name = profile.name(),
                    "Known identifier belongs to another name"
                );
                None
            }
            Err(e) => {
                debug!(name = name, id = uuid, error = %e, "Lookup by known identifier failed");
                None
            }
        }
    }
}
