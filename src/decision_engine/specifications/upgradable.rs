//! Upgrade rule: is a candidate a permissible upgrade over the held file?
//!
//! Evaluated in a fixed order, first match decides:
//!
//! 1. A proper/repack or real reissue of the held tier and version is vetoed
//!    when the profile does not auto-download propers.
//! 2. Quality (tier, then revision) decides whenever it differs.
//! 3. On an exact quality tie, a higher custom format score wins, but only while
//!    the held score is still below the profile's format cutoff.

use std::cmp::Ordering;

use tracing::debug;

use crate::custom_formats::{CustomFormat, CustomFormatScorer};
use crate::decision_engine::context::EvaluationContext;
use crate::decision_engine::specification::{DecisionSpecification, SpecificationOutcome};
use crate::error::Result;
use crate::profiles::Profile;
use crate::qualities::{QualityModel, QualityModelComparer};

#[derive(Debug, Clone, Copy, Default)]
pub struct UpgradableSpecification;

/// Why a candidate is not an upgrade over the held file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeRejection {
    /// Proper/real reissue of the held release, vetoed by the profile
    PropersNotWanted,
    NotBetter,
}

impl UpgradableSpecification {
    pub fn is_upgradable(
        &self,
        profile: &Profile,
        held: &QualityModel,
        held_formats: &[CustomFormat],
        candidate: &QualityModel,
        candidate_formats: &[CustomFormat],
    ) -> Result<bool> {
        Ok(self
            .rejection(profile, held, held_formats, candidate, candidate_formats)?
            .is_none())
    }

    /// `None` when the candidate is an upgrade.
    pub fn rejection(
        &self,
        profile: &Profile,
        held: &QualityModel,
        held_formats: &[CustomFormat],
        candidate: &QualityModel,
        candidate_formats: &[CustomFormat],
    ) -> Result<Option<UpgradeRejection>> {
        // Also validates both models and checks both tiers exist in the profile
        let compare = QualityModelComparer::new(profile).compare(candidate, held)?;

        if is_reissue_of(held, candidate) && !profile.auto_download_propers {
            debug!(
                held = %held,
                candidate = %candidate,
                "Proper/real reissue and profile does not auto-download propers"
            );
            return Ok(Some(UpgradeRejection::PropersNotWanted));
        }

        match compare {
            Ordering::Less => {
                debug!(held = %held, candidate = %candidate, "Candidate quality is lower");
                return Ok(Some(UpgradeRejection::NotBetter));
            }
            Ordering::Greater => {
                debug!(held = %held, candidate = %candidate, "Candidate quality is higher");
                return Ok(None);
            }
            Ordering::Equal => {}
        }

        let scorer = CustomFormatScorer::new(profile);
        let held_score = scorer.score(held_formats);
        let candidate_score = scorer.score(candidate_formats);

        if scorer.at_cutoff(held_score) {
            debug!(
                held_score,
                cutoff = profile.cutoff_format_score,
                "Held file already meets the custom format cutoff"
            );
            return Ok(Some(UpgradeRejection::NotBetter));
        }

        if candidate_score > held_score {
            debug!(held_score, candidate_score, "Candidate has a better custom format score");
            return Ok(None);
        }

        debug!(
            held_score,
            candidate_score,
            "Same quality and no custom format improvement"
        );
        Ok(Some(UpgradeRejection::NotBetter))
    }
}

/// Same tier and version, candidate carries a repack/real flag the held file lacks.
fn is_reissue_of(held: &QualityModel, candidate: &QualityModel) -> bool {
    candidate.quality == held.quality
        && candidate.revision.version == held.revision.version
        && candidate.revision.is_reissue()
        && candidate.revision != held.revision
}

impl DecisionSpecification for UpgradableSpecification {
    fn name(&self) -> &'static str {
        "upgradable"
    }

    fn check(&self, context: &EvaluationContext<'_>) -> Result<SpecificationOutcome> {
        let Some(held) = &context.held else {
            return Ok(SpecificationOutcome::Pass);
        };

        let candidate = &context.candidate;
        let rejection = self.rejection(
            context.profile,
            &held.quality,
            &held.custom_formats,
            &candidate.quality,
            &candidate.custom_formats,
        )?;

        Ok(match rejection {
            None => SpecificationOutcome::Pass,
            Some(UpgradeRejection::PropersNotWanted) => SpecificationOutcome::fail(
                "Proper/real release and profile does not auto-download propers",
            ),
            Some(UpgradeRejection::NotBetter) => SpecificationOutcome::fail(format!(
                "Existing file on disk is of equal or higher preference: {}",
                held.quality
            )),
        })
    }
}
