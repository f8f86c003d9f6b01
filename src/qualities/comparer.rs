//! Profile-scoped ordering of quality models.
//!
//! Tier rank comes from the profile's item order and dominates; revisions only
//! break ties between models of the same tier.

use std::cmp::Ordering;

use crate::error::Result;
use crate::profiles::Profile;
use crate::qualities::revision::compare_revision;
use crate::qualities::{Quality, QualityModel};

/// Compares quality models under one profile.
#[derive(Debug, Clone, Copy)]
pub struct QualityModelComparer<'a> {
    profile: &'a Profile,
}

impl<'a> QualityModelComparer<'a> {
    pub fn new(profile: &'a Profile) -> Self {
        Self { profile }
    }

    pub fn compare_quality(&self, a: Quality, b: Quality) -> Result<Ordering> {
        let rank_a = self.profile.rank(a)?;
        let rank_b = self.profile.rank(b)?;
        Ok(rank_a.cmp(&rank_b))
    }

    pub fn compare(&self, a: &QualityModel, b: &QualityModel) -> Result<Ordering> {
        a.validate()?;
        b.validate()?;

        match self.compare_quality(a.quality, b.quality)? {
            Ordering::Equal => Ok(compare_revision(&a.revision, &b.revision)),
            other => Ok(other),
        }
    }

    /// Whether `model` is at or above the profile's cutoff tier.
    pub fn is_at_or_above_cutoff(&self, model: &QualityModel) -> Result<bool> {
        let rank = self.profile.rank(model.quality)?;
        let cutoff = self.profile.rank(self.profile.cutoff)?;
        Ok(rank >= cutoff)
    }
}

/// Convenience wrapper for a one-off comparison.
pub fn compare(profile: &Profile, a: &QualityModel, b: &QualityModel) -> Result<Ordering> {
    QualityModelComparer::new(profile).compare(a, b)
}
