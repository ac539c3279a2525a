//! Profile and skin record types
//!
//! Records are immutable once built. The cache hands them out behind `Arc`,
//! so any change is a whole-record replacement.

use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Minimal player identity as known to the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Canonical display name (case preserved)
    pub name: String,
    /// Opaque unique identifier, absent until resolved
    #[serde(default)]
    pub id: Option<String>,
}

impl Profile {
    pub fn new(name: impl Into<String>, id: Option<String>) -> Self {
        Self {
            name: name.into(),
            id,
        }
    }
}

/// Opaque texture payload as returned by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkinProperty {
    /// Encoded texture data, never decoded here
    pub value: String,
    /// Provider signature over `value`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

/// A cached skin record for one player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkinProfile {
    profile: Profile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    skin: Option<SkinProperty>,
    /// Freshness marker, milliseconds since the Unix epoch for records built by `MojangClient`
    #[serde(default)]
    timestamp: i64,
    /// Pinned by an administrator, exempt from automatic refresh
    #[serde(default)]
    forced: bool,
}

impl SkinProfile {
    pub fn new(profile: Profile, skin: Option<SkinProperty>, timestamp: i64, forced: bool) -> Self {
        Self {
            profile,
            skin,
            timestamp,
            forced,
        }
    }

    /// Unresolved record created on first cache access for `key`
    ///
    /// The lookup key doubles as the display name until the record is resolved.
    pub fn placeholder(key: impl Into<String>) -> Self {
        Self::new(Profile::new(key, None), None, 0, false)
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }

    pub fn id(&self) -> Option<&str> {
        self.profile.id.as_deref()
    }

    pub fn skin(&self) -> Option<&SkinProperty> {
        self.skin.as_ref()
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn is_forced(&self) -> bool {
        self.forced
    }

    /// Copy of this record with the forced flag set
    pub fn clone_as_forced(&self) -> Self {
        Self {
            forced: true,
            ..self.clone()
        }
    }

    /// Whether this record is worth persisting
    ///
    /// Placeholders (no id, no skin, not forced) are never written to disk.
    pub fn should_serialize(&self) -> bool {
        self.forced || self.profile.id.is_some() || self.skin.is_some()
    }

    /// Whether the record was fetched more than `max_age` before `now_ms`
    ///
    /// A zero timestamp counts as infinitely old.
    pub fn is_older_than(&self, max_age: Duration, now_ms: i64) -> bool {
        if self.timestamp <= 0 {
            return true;
        }
        let max_age_ms = i64::try_from(max_age.as_millis()).unwrap_or(i64::MAX);
        now_ms.saturating_sub(self.timestamp) > max_age_ms
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}
