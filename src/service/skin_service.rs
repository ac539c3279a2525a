//! Skin Service
//!
//! Cache-first skin lookup with refresh through the resolver. Forced records
//! are never replaced here.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::fetch::{ProfileResolver, SkinFetchError};
use crate::profile::{now_millis, SkinProfile};
use crate::provider::SkinProvider;
use crate::storage::SkinStorage;

pub struct SkinService<P> {
    storage: Arc<SkinStorage>,
    resolver: ProfileResolver<P>,
    /// Resolved records older than this are fetched again
    refresh_after: Duration,
}

impl<P: SkinProvider> SkinService<P> {
    pub fn new(
        storage: Arc<SkinStorage>,
        resolver: ProfileResolver<P>,
        refresh_after: Duration,
    ) -> Self {
        Self {
            storage,
            resolver,
            refresh_after,
        }
    }

    pub fn storage(&self) -> &Arc<SkinStorage> {
        &self.storage
    }

    pub fn resolver(&self) -> &ProfileResolver<P> {
        &self.resolver
    }

    /// Skin record for `name`, refreshing it from the provider when needed
    ///
    /// # Arguments
    /// * `name` - Player name
    /// * `uuid` - Identifier reported for the player, preferred over the cached one
    ///
    /// # Returns
    /// The forced or fresh cached record, a newly resolved one, or the stale
    /// cached record if resolution fails and it still carries a skin
    pub async fn skin_for(
        &self,
        name: &str,
        uuid: Option<&str>,
    ) -> Result<Arc<SkinProfile>, SkinFetchError> {
        let current = self.storage.get_or_create_skin_data(name);

        if current.is_forced() {
            trace!(name = name, "Using forced skin data");
            return Ok(current);
        }
        if current.should_serialize() && !current.is_older_than(self.refresh_after, now_millis()) {
            trace!(name = name, "Using cached skin data");
            return Ok(current);
        }

        let known_id = uuid.or_else(|| current.id());
        match self.resolver.resolve(name, known_id).await {
            Ok(fresh) => {
                let held = self.storage.store_unless_forced(name, fresh);
                if held.is_forced() {
                    debug!(name = name, "Skin data was forced during refresh, keeping it");
                }
                Ok(held)
            }
            Err(e) if current.skin().is_some() => {
                warn!(name = name, error = %e, "Skin refresh failed, using cached skin data");
                Ok(current)
            }
            Err(e) => Err(e),
        }
    }

    /// Pin the skin of `skin_owner` to `name`
    pub async fn set_skin(
        &self,
        name: &str,
        skin_owner: &str,
    ) -> Result<Arc<SkinProfile>, SkinFetchError> {
        let profile = self.resolver.resolve(skin_owner, None).await?;
        self.storage.set_skin_data(name, &profile);
        Ok(self.storage.get_or_create_skin_data(name))
    }

    /// Drop any cached or forced skin for `name`
    pub fn clear_skin(&self, name: &str) {
        self.storage.remove_skin_data(name);
        info!(name = name, "Cleared skin data");
    }
}
