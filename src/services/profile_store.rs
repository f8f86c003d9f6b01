//! Profile snapshots and media item assignments.
//!
//! Profiles are validated on the way in and stored as `Arc<Profile>`. Replacing
//! a profile swaps the `Arc`, so a decision that already holds the previous
//! snapshot finishes against it untouched.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use parking_lot::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::decision_engine::ProfileProvider;
use crate::profiles::Profile;

#[derive(Debug, Default)]
pub struct ProfileStore {
    profiles: RwLock<HashMap<i32, Arc<Profile>>>,
    assignments: RwLock<HashMap<Uuid, i32>>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_profiles(profiles: impl IntoIterator<Item = Profile>) -> Result<Self> {
        let store = Self::new();
        for profile in profiles {
            store.upsert(profile)?;
        }
        Ok(store)
    }

    /// Load a JSON array of profiles.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read profiles from {}", path.display()))?;
        let profiles: Vec<Profile> = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid profiles in {}", path.display()))?;

        let count = profiles.len();
        let store = Self::from_profiles(profiles)?;
        info!(count, path = %path.display(), "Loaded quality profiles");
        Ok(store)
    }

    /// Validate and publish a profile, replacing any previous snapshot.
    pub fn upsert(&self, profile: Profile) -> Result<Arc<Profile>> {
        profile.validate()?;
        let profile = Arc::new(profile);
        self.profiles.write().insert(profile.id, Arc::clone(&profile));
        Ok(profile)
    }

    pub fn remove(&self, id: i32) -> Option<Arc<Profile>> {
        let removed = self.profiles.write().remove(&id);
        if removed.is_some() {
            self.assignments.write().retain(|_, assigned| *assigned != id);
        }
        removed
    }

    pub fn get(&self, id: i32) -> Option<Arc<Profile>> {
        self.profiles.read().get(&id).cloned()
    }

    pub fn assign(&self, media_id: Uuid, profile_id: i32) -> Result<()> {
        if !self.profiles.read().contains_key(&profile_id) {
            return Err(anyhow!("profile {} does not exist", profile_id));
        }
        self.assignments.write().insert(media_id, profile_id);
        Ok(())
    }
}

impl ProfileProvider for ProfileStore {
    fn profile_for(&self, media_id: Uuid) -> Result<Arc<Profile>> {
        let profile_id = self
            .assignments
            .read()
            .get(&media_id)
            .copied()
            .ok_or_else(|| anyhow!("no profile assigned to media item {}", media_id))?;

        self.get(profile_id)
            .ok_or_else(|| anyhow!("profile {} does not exist", profile_id))
    }
}
