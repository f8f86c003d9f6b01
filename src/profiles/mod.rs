//! Quality profiles: the per-media policy that ranks tiers, scores custom
//! formats and sets the cutoffs.
//!
//! A profile is long-lived configuration. The decision core only ever reads
//! it; replacing one is the job of [ProfileStore](crate::services::ProfileStore).

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{DecisionError, Result};
use crate::qualities::Quality;

/// One tier entry in a profile. Position in [Profile::items] is its rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileQualityItem {
    pub quality: Quality,
    pub allowed: bool,
}

impl ProfileQualityItem {
    pub fn new(quality: Quality, allowed: bool) -> Self {
        Self { quality, allowed }
    }
}

fn default_auto_download_propers() -> bool {
    true
}

/// Quality profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i32,
    pub name: String,
    /// Every known tier exactly once, lowest rank first
    pub items: Vec<ProfileQualityItem>,
    pub cutoff: Quality,
    /// Per-profile score overrides keyed by custom format id
    #[serde(default)]
    pub format_scores: BTreeMap<i32, i32>,
    #[serde(default)]
    pub min_format_score: i32,
    #[serde(default)]
    pub cutoff_format_score: i32,
    #[serde(default = "default_auto_download_propers")]
    pub auto_download_propers: bool,
}

impl Profile {
    /// The default tier list: everything allowed except Unknown.
    pub fn default_items() -> Vec<ProfileQualityItem> {
        Quality::all()
            .iter()
            .map(|&q| ProfileQualityItem::new(q, q != Quality::Unknown))
            .collect()
    }

    /// Build a profile from an explicit tier order (lowest first). Tiers missing
    /// from `order` are placed below it and disallowed.
    pub fn with_order(id: i32, name: impl Into<String>, order: &[Quality]) -> Self {
        let mut items: Vec<ProfileQualityItem> = Quality::all()
            .iter()
            .filter(|q| !order.contains(q))
            .map(|&q| ProfileQualityItem::new(q, false))
            .collect();
        items.extend(order.iter().map(|&q| ProfileQualityItem::new(q, true)));

        let cutoff = order.last().copied().unwrap_or(Quality::Unknown);
        Self {
            cutoff,
            items,
            ..Self::with_default_items(id, name)
        }
    }

    pub fn with_default_items(id: i32, name: impl Into<String>) -> Self {
        let items = Self::default_items();
        let cutoff = items
            .iter()
            .rev()
            .find(|i| i.allowed)
            .map(|i| i.quality)
            .unwrap_or(Quality::Unknown);

        Self {
            id,
            name: name.into(),
            items,
            cutoff,
            format_scores: BTreeMap::new(),
            min_format_score: 0,
            cutoff_format_score: 0,
            auto_download_propers: true,
        }
    }

    /// Rank of `quality` within this profile (0 = lowest).
    pub fn rank(&self, quality: Quality) -> Result<usize> {
        self.items
            .iter()
            .position(|i| i.quality == quality)
            .ok_or_else(|| {
                DecisionError::configuration(
                    &self.name,
                    format!("quality {} is not part of the profile", quality),
                )
            })
    }

    pub fn is_allowed(&self, quality: Quality) -> Result<bool> {
        let rank = self.rank(quality)?;
        Ok(self.items[rank].allowed)
    }

    pub fn allowed_qualities(&self) -> impl Iterator<Item = Quality> + '_ {
        self.items.iter().filter(|i| i.allowed).map(|i| i.quality)
    }

    /// Check the invariants that storage can't guarantee.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for item in &self.items {
            if !seen.insert(item.quality) {
                return Err(DecisionError::configuration(
                    &self.name,
                    format!("quality {} is listed more than once", item.quality),
                ));
            }
        }

        if let Some(missing) = Quality::all().iter().find(|q| !seen.contains(q)) {
            return Err(DecisionError::configuration(
                &self.name,
                format!("quality {} is missing from the profile", missing),
            ));
        }

        if !self.is_allowed(self.cutoff)? {
            return Err(DecisionError::configuration(
                &self.name,
                format!("cutoff {} is not an allowed quality", self.cutoff),
            ));
        }

        if self.min_format_score > self.cutoff_format_score {
            warn!(
                profile = %self.name,
                min_format_score = self.min_format_score,
                cutoff_format_score = self.cutoff_format_score,
                "Minimum custom format score is above the upgrade cutoff"
            );
        }

        Ok(())
    }
}
