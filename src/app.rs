//! Wiring for a one-shot decision run.
//!
//! Used by the binary to turn a request file plus the configured profile and
//! custom format files into a [DecisionBatch].

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::decision_engine::{DecisionBatch, DecisionChain, DecisionMaker, HeldFile, ReleaseInfo};
use crate::qualities::QualityModel;
use crate::services::{
    CustomFormatService, HeldFileStore, InMemoryCustomFormatRepository, ProfileStore,
};

/// What a media item currently has on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldEntry {
    pub quality: QualityModel,
    #[serde(default)]
    pub custom_format_ids: Vec<i32>,
}

/// Input for a decision run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRequest {
    /// Media item to profile id
    #[serde(default)]
    pub assignments: HashMap<Uuid, i32>,
    #[serde(default)]
    pub held: HashMap<Uuid, HeldEntry>,
    pub releases: Vec<ReleaseInfo>,
}

impl DecisionRequest {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read request from {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("Invalid request in {}", path.display()))
    }
}

/// Loaded stores, ready to build a [DecisionMaker] per request.
pub struct App {
    pub config: Config,
    pub profiles: Arc<ProfileStore>,
    pub formats: Arc<CustomFormatService>,
}

impl App {
    pub fn load(config: Config) -> Result<Self> {
        let profiles = Arc::new(ProfileStore::load_from_file(&config.profiles_path)?);

        let formats = if config.custom_formats_path.exists() {
            CustomFormatService::load_from_file(&config.custom_formats_path)?
        } else {
            warn!(
                path = %config.custom_formats_path.display(),
                "Custom formats file not found, continuing without custom formats"
            );
            CustomFormatService::new(Arc::new(InMemoryCustomFormatRepository::new()))
        };

        Ok(Self {
            config,
            profiles,
            formats: Arc::new(formats),
        })
    }

    /// Apply the request's assignments and held files, then build the maker.
    pub fn decision_maker(&self, request: &DecisionRequest) -> Result<DecisionMaker> {
        for (media_id, profile_id) in &request.assignments {
            self.profiles.assign(*media_id, *profile_id)?;
        }

        let held = HeldFileStore::new();
        for (media_id, entry) in &request.held {
            let custom_formats = entry
                .custom_format_ids
                .iter()
                .map(|id| self.formats.get_by_id(*id))
                .collect::<Result<Vec<_>>>()
                .with_context(|| format!("Held file for media item {}", media_id))?;
            held.insert(*media_id, HeldFile::new(entry.quality, custom_formats));
        }

        Ok(DecisionMaker::new(
            DecisionChain::with_default_specifications(),
            self.profiles.clone(),
            self.formats.clone(),
            Arc::new(held),
        ))
    }

    pub async fn run(&self, request: DecisionRequest) -> Result<DecisionBatch> {
        let maker = Arc::new(self.decision_maker(&request)?);
        info!(
            releases = request.releases.len(),
            rules = ?maker.chain().names(),
            "Deciding releases"
        );
        Ok(maker
            .decide_concurrently(request.releases, self.config.max_concurrent_decisions)
            .await)
    }
}
