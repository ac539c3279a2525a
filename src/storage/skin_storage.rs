//! Skin Storage Implementation
//!
//! Name-keyed cache of skin records using Moka, with load/save to `cache.json`.
//! Keys are lowercase player names; values are shared immutable records.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use moka::ops::compute::{CompResult, Op};
use moka::sync::Cache;
use tracing::{debug, error, info, trace, warn};

use crate::profile::SkinProfile;

/// Name of the backing file inside the data directory
pub const CACHE_FILE: &str = "cache.json";

/// Concurrent skin record cache
///
/// Constructed once by the application and shared by `Arc`. All per-key
/// operations are atomic; no caller-side locking is needed.
pub struct SkinStorage {
    /// Records by lowercase player name
    skins: Cache<String, Arc<SkinProfile>>,
    /// Directory holding the backing file
    data_dir: PathBuf,
}

impl SkinStorage {
    /// Create an empty storage backed by `<data_dir>/cache.json`
    ///
    /// Nothing is read until `load_data` is called.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let skins = Cache::builder().name("skin_storage").build();

        Self {
            skins,
            data_dir: data_dir.into(),
        }
    }

    fn key(name: &str) -> String {
        name.to_lowercase()
    }

    /// Whether an administrator pinned the record for `name`
    pub fn is_skin_data_forced(&self, name: &str) -> bool {
        self.skins
            .get(&Self::key(name))
            .is_some_and(|profile| profile.is_forced())
    }

    /// Drop the record for `name`, if any
    pub fn remove_skin_data(&self, name: &str) {
        self.skins.invalidate(&Self::key(name));
        debug!(name = name, "Removed skin data");
    }

    /// Pin `profile` to `name`
    ///
    /// The stored copy is always forced, whatever the input's own flag.
    /// Runs under the same per-key lock as `store_unless_forced`.
    pub fn set_skin_data(&self, name: &str, profile: &SkinProfile) {
        let forced = Arc::new(profile.clone_as_forced());
        self.skins
            .entry(Self::key(name))
            .and_compute_with(|_| Op::Put(forced));
        info!(name = name, skin_owner = profile.name(), "Forced skin data");
    }

    /// Store a resolved record unless the current one is forced
    ///
    /// The check and the write are one atomic step per key. Returns whichever
    /// record holds afterwards.
    pub fn store_unless_forced(&self, name: &str, profile: SkinProfile) -> Arc<SkinProfile> {
        let fresh = Arc::new(profile);
        let result = self
            .skins
            .entry(Self::key(name))
            .and_compute_with(|existing| match existing {
                Some(entry) if entry.value().is_forced() => Op::Nop,
                _ => Op::Put(Arc::clone(&fresh)),
            });

        match result {
            CompResult::Unchanged(entry) => {
                debug!(name = name, "Kept forced skin data");
                entry.into_value()
            }
            CompResult::Inserted(entry) | CompResult::ReplacedWith(entry) => {
                debug!(name = name, id = ?fresh.id(), "Stored skin data");
                entry.into_value()
            }
            CompResult::Removed(_) | CompResult::StillNone(_) => fresh,
        }
    }

    /// Store a resolved record as-is
    ///
    /// Replaces forced records too. Refresh paths use `store_unless_forced`.
    pub fn store_skin_data(&self, name: &str, profile: SkinProfile) -> Arc<SkinProfile> {
        let profile = Arc::new(profile);
        self.skins.insert(Self::key(name), Arc::clone(&profile));
        debug!(name = name, id = ?profile.id(), "Stored skin data");
        profile
    }

    /// Peek at the record for `name` without creating one
    pub fn get_skin_data(&self, name: &str) -> Option<Arc<SkinProfile>> {
        self.skins.get(&Self::key(name))
    }

    /// Current record for `name`, inserting a placeholder if absent
    ///
    /// Concurrent first lookups of the same name are coalesced into one
    /// insertion, so every caller gets the same instance.
    pub fn get_or_create_skin_data(&self, name: &str) -> Arc<SkinProfile> {
        let key = Self::key(name);
        let placeholder_key = key.clone();
        self.skins.get_with(key, move || {
            trace!(name = %placeholder_key, "Creating placeholder skin data");
            Arc::new(SkinProfile::placeholder(placeholder_key))
        })
    }

    /// Point-in-time copy of every record
    pub fn snapshot(&self) -> BTreeMap<String, SkinProfile> {
        self.skins
            .iter()
            .map(|(key, profile)| (String::clone(&key), SkinProfile::clone(&profile)))
            .collect()
    }

    /// Number of records currently held
    pub fn len(&self) -> usize {
        self.skins.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Path of the backing file
    pub fn cache_file(&self) -> PathBuf {
        self.data_dir.join(CACHE_FILE)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Merge the backing file into the cache
    ///
    /// A missing, unreadable or corrupt file leaves the cache as it was.
    pub fn load_data(&self) {
        let Some(records) = self.read_cache_file() else {
            return;
        };

        let count = records.len();
        for (name, profile) in records {
            self.skins.insert(Self::key(&name), Arc::new(profile));
        }

        info!(
            file = %self.cache_file().display(),
            records = count,
            "Loaded skin cache"
        );
    }

    fn read_cache_file(&self) -> Option<HashMap<String, SkinProfile>> {
        let path = self.cache_file();

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!(file = %path.display(), error = %e, "No skin cache to load");
                return None;
            }
        };

        match serde_json::from_str::<Option<HashMap<String, SkinProfile>>>(&contents) {
            Ok(records) => records,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "Ignoring unreadable skin cache");
                None
            }
        }
    }

    /// Write every persistable record to the backing file
    ///
    /// Returns the number of records written, or `None` if the write failed.
    /// Failures are logged, never propagated.
    pub fn save_data(&self) -> Option<usize> {
        match self.write_cache_file() {
            Ok(count) => {
                info!(
                    file = %self.cache_file().display(),
                    records = count,
                    "Saved skin cache"
                );
                Some(count)
            }
            Err(e) => {
                error!(
                    file = %self.cache_file().display(),
                    error = %e,
                    "Failed to save skin cache"
                );
                None
            }
        }
    }

    fn write_cache_file(&self) -> Result<usize> {
        fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;

        let records: BTreeMap<String, SkinProfile> = self
            .snapshot()
            .into_iter()
            .filter(|(_, profile)| profile.should_serialize())
            .collect();

        let json =
            serde_json::to_vec_pretty(&records).context("Failed to encode skin cache")?;

        // Write atomically using tempfile
        let mut tmp = tempfile::NamedTempFile::new_in(&self.data_dir)
            .context("Failed to create temp file for skin cache")?;
        tmp.write_all(&json)
            .context("Failed to write skin cache")?;
        tmp.persist(self.cache_file())
            .with_context(|| format!("Failed to persist skin cache: {:?}", self.cache_file()))?;

        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Profile, SkinProperty};
    use std::thread;

    fn resolved(name: &str, id: &str) -> SkinProfile {
        SkinProfile::new(
            Profile::new(name, Some(id.to_string())),
            Some(SkinProperty {
                value: format!("textures-of-{}", name),
                signature: Some("sig".to_string()),
            }),
            1_700_000_000_000,
            false,
        )
    }

    #[test]
    fn test_get_or_create_returns_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SkinStorage::new(dir.path());

        let profile = storage.get_or_create_skin_data("Notch");
        assert_eq!(profile.id(), None);
        assert!(profile.skin().is_none());
        assert_eq!(profile.timestamp(), 0);
        assert!(!profile.is_forced());
        // The placeholder carries the lowercase key, not the display case
        assert_eq!(profile.name(), "notch");
    }

    #[test]
    fn test_get_or_create_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SkinStorage::new(dir.path());

        let first = storage.get_or_create_skin_data("Notch");
        let second = storage.get_or_create_skin_data("NOTCH");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_get_or_create_concurrent_single_instance() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SkinStorage::new(dir.path());

        let results: Vec<Arc<SkinProfile>> = thread::scope(|scope| {
            let handles: Vec<_> = (0..16)
                .map(|_| scope.spawn(|| storage.get_or_create_skin_data("Jeb_")))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for profile in &results[1..] {
            assert!(Arc::ptr_eq(&results[0], profile));
        }
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_set_skin_data_always_forces() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SkinStorage::new(dir.path());
        let profile = resolved("Notch", "069a79f4");
        assert!(!profile.is_forced());

        storage.set_skin_data("Dinnerbone", &profile);

        assert!(storage.is_skin_data_forced("dinnerbone"));
        assert!(storage.is_skin_data_forced("DINNERBONE"));
        let stored = storage.get_or_create_skin_data("Dinnerbone");
        assert_eq!(stored.name(), "Notch");
        // Input value untouched
        assert!(!profile.is_forced());
    }

    #[test]
    fn test_stored_skin_data_is_not_forced() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SkinStorage::new(dir.path());

        storage.store_skin_data("Notch", resolved("Notch", "069a79f4"));
        assert!(!storage.is_skin_data_forced("Notch"));
        assert!(storage.get_skin_data("notch").is_some());
    }

    #[test]
    fn test_store_unless_forced_keeps_pin() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SkinStorage::new(dir.path());
        storage.set_skin_data("Notch", &resolved("jeb_", "853c80ef"));

        let held = storage.store_unless_forced("notch", resolved("Notch", "069a79f4"));

        assert!(held.is_forced());
        assert_eq!(held.name(), "jeb_");
        assert!(storage.is_skin_data_forced("Notch"));
    }

    #[test]
    fn test_store_unless_forced_replaces_unforced() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SkinStorage::new(dir.path());
        let placeholder = storage.get_or_create_skin_data("Notch");

        let held = storage.store_unless_forced("Notch", resolved("Notch", "069a79f4"));

        assert!(!Arc::ptr_eq(&placeholder, &held));
        assert_eq!(held.id(), Some("069a79f4"));
        let current = storage.get_skin_data("notch").unwrap();
        assert!(Arc::ptr_eq(&current, &held));

        // Absent key is inserted
        let inserted =
            storage.store_unless_forced("Dinnerbone", resolved("Dinnerbone", "61699b2e"));
        let current = storage.get_skin_data("dinnerbone").unwrap();
        assert!(Arc::ptr_eq(&current, &inserted));
    }

    #[test]
    fn test_concurrent_pin_survives_refresh_store() {
        for _ in 0..200 {
            let dir = tempfile::tempdir().unwrap();
            let storage = SkinStorage::new(dir.path());
            storage.get_or_create_skin_data("Notch");
            let pinned = resolved("jeb_", "853c80ef");

            thread::scope(|scope| {
                scope.spawn(|| storage.set_skin_data("Notch", &pinned));
                scope.spawn(|| {
                    storage.store_unless_forced("Notch", resolved("Notch", "069a79f4"))
                });
            });

            assert!(storage.is_skin_data_forced("Notch"));
            assert_eq!(storage.get_skin_data("notch").unwrap().name(), "jeb_");
        }
    }

    #[test]
    fn test_absent_is_not_forced() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SkinStorage::new(dir.path());

        assert!(!storage.is_skin_data_forced("nobody"));
        assert!(storage.get_skin_data("nobody").is_none());
    }

    #[test]
    fn test_remove_resets_to_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SkinStorage::new(dir.path());

        storage.set_skin_data("Notch", &resolved("Notch", "069a79f4"));
        storage.remove_skin_data("NOTCH");

        assert!(!storage.is_skin_data_forced("Notch"));
        let fresh = storage.get_or_create_skin_data("Notch");
        assert_eq!(fresh.id(), None);
        assert!(!fresh.should_serialize());

        // Removing an absent entry is fine
        storage.remove_skin_data("nobody");
    }

    #[test]
    fn test_save_load_round_trip_filters_placeholders() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SkinStorage::new(dir.path().join("nested"));

        storage.store_skin_data("Notch", resolved("Notch", "069a79f4"));
        storage.set_skin_data("Dinnerbone", &resolved("jeb_", "853c80ef"));
        storage.get_or_create_skin_data("Ghost");

        assert_eq!(storage.save_data(), Some(2));
        assert!(storage.cache_file().exists());
        // Live map is not evicted by saving
        assert_eq!(storage.len(), 3);

        let reloaded = SkinStorage::new(dir.path().join("nested"));
        reloaded.load_data();

        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.get_skin_data("ghost").is_none());
        assert_eq!(
            reloaded.get_skin_data("notch").as_deref(),
            Some(&resolved("Notch", "069a79f4"))
        );
        assert!(reloaded.is_skin_data_forced("dinnerbone"));
    }

    #[test]
    fn test_saved_file_is_keyed_by_lowercase_name() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SkinStorage::new(dir.path());
        storage.store_skin_data("Notch", resolved("Notch", "069a79f4"));
        storage.save_data();

        let contents = fs::read_to_string(storage.cache_file()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(value["notch"]["profile"]["name"], "Notch");
        assert_eq!(value["notch"]["profile"]["id"], "069a79f4");
        assert_eq!(value["notch"]["forced"], false);
        // Pretty printed
        assert!(contents.contains('\n'));
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SkinStorage::new(dir.path().join("does-not-exist"));

        storage.load_data();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CACHE_FILE), "{ not json").unwrap();
        let storage = SkinStorage::new(dir.path());

        storage.load_data();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_load_null_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CACHE_FILE), "null").unwrap();
        let storage = SkinStorage::new(dir.path());

        storage.load_data();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_load_overwrites_existing_and_lowercases() {
        let dir = tempfile::tempdir().unwrap();
        let json = serde_json::json!({
            "Notch": {
                "profile": {"name": "Notch", "id": "069a79f4"},
                "timestamp": 5,
                "forced": true
            }
        });
        fs::write(dir.path().join(CACHE_FILE), json.to_string()).unwrap();

        let storage = SkinStorage::new(dir.path());
        storage.get_or_create_skin_data("notch");
        storage.load_data();

        assert_eq!(storage.len(), 1);
        assert!(storage.is_skin_data_forced("notch"));
        assert_eq!(storage.get_or_create_skin_data("notch").timestamp(), 5);
    }

    #[test]
    fn test_save_failure_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the data directory should be
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let storage = SkinStorage::new(&blocker);
        storage.store_skin_data("Notch", resolved("Notch", "069a79f4"));

        assert_eq!(storage.save_data(), None);
        assert_eq!(storage.len(), 1);
    }
}
