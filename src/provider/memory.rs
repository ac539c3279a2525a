//! In-memory provider for tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ProviderError, SkinProvider};
use crate::profile::{Profile, SkinProfile, SkinProperty};

/// Provider answering from fixed tables and counting calls
#[derive(Default)]
pub struct MemoryProvider {
    /// Results by lowercase name
    profiles: Mutex<HashMap<String, Result<Profile, ProviderError>>>,
    /// Results by id
    skins: Mutex<HashMap<String, Result<SkinProfile, ProviderError>>>,
    profile_calls: AtomicUsize,
    skin_calls: AtomicUsize,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account whose skin value is `textures-of-<name>`
    pub fn with_account(self, name: &str, id: &str) -> Self {
        self.profiles.lock().unwrap().insert(
            name.to_lowercase(),
            Ok(Profile::new(name, Some(id.to_string()))),
        );
        self.skins
            .lock()
            .unwrap()
            .insert(id.to_string(), Ok(skin_for(name, id)));
        self
    }

    pub fn with_profile_error(self, name: &str, err: ProviderError) -> Self {
        self.profiles
            .lock()
            .unwrap()
            .insert(name.to_lowercase(), Err(err));
        self
    }

    pub fn with_skin_error(self, id: &str, err: ProviderError) -> Self {
        self.skins.lock().unwrap().insert(id.to_string(), Err(err));
        self
    }

    pub fn profile_calls(&self) -> usize {
        self.profile_calls.load(Ordering::SeqCst)
    }

    pub fn skin_calls(&self) -> usize {
        self.skin_calls.load(Ordering::SeqCst)
    }
}

pub fn skin_for(name: &str, id: &str) -> SkinProfile {
    SkinProfile::new(
        Profile::new(name, Some(id.to_string())),
        Some(SkinProperty {
            value: format!("textures-of-{}", name),
            signature: Some(format!("sig-{}", id)),
        }),
        crate::profile::now_millis(),
        false,
    )
}

#[async_trait]
impl SkinProvider for MemoryProvider {
    async fn get_profile(&self, name: &str) -> Result<Profile, ProviderError> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        self.profiles
            .lock()
            .unwrap()
            .get(&name.to_lowercase())
            .cloned()
            .unwrap_or_else(|| Err(ProviderError::NoSuchAccount(name.to_string())))
    }

    async fn get_skin_profile(&self, id: &str) -> Result<SkinProfile, ProviderError> {
        self.skin_calls.fetch_add(1, Ordering::SeqCst);
        self.skins
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .unwrap_or_else(|| Err(ProviderError::NotFound(id.to_string())))
    }
}
