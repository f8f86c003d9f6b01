use tracing::debug;

use crate::custom_formats::CustomFormatScorer;
use crate::decision_engine::context::EvaluationContext;
use crate::decision_engine::specification::{DecisionSpecification, SpecificationOutcome};
use crate::error::Result;
use crate::qualities::QualityModelComparer;

/// Stops searching once the held file meets both the tier and format cutoffs.
///
/// Reissues of the held tier (higher revision) are still let through so the
/// upgrade rule can decide on propers.
#[derive(Debug, Clone, Copy, Default)]
pub struct CutoffSpecification;

impl DecisionSpecification for CutoffSpecification {
    fn name(&self) -> &'static str {
        "cutoff"
    }

    fn check(&self, context: &EvaluationContext<'_>) -> Result<SpecificationOutcome> {
        let Some(held) = &context.held else {
            return Ok(SpecificationOutcome::Pass);
        };

        let profile = context.profile;
        let comparer = QualityModelComparer::new(profile);

        if !comparer.is_at_or_above_cutoff(&held.quality)? {
            return Ok(SpecificationOutcome::Pass);
        }

        let candidate = &context.candidate.quality;
        if candidate.quality == held.quality.quality && candidate.revision > held.quality.revision {
            debug!(held = %held.quality, candidate = %candidate, "Revision upgrade past cutoff");
            return Ok(SpecificationOutcome::Pass);
        }

        let held_score = context.held_format_score().unwrap_or_default();
        if !CustomFormatScorer::new(profile).at_cutoff(held_score) {
            return Ok(SpecificationOutcome::Pass);
        }

        debug!(
            held = %held.quality,
            cutoff = %profile.cutoff,
            held_score,
            "Existing file meets cutoff"
        );
        Ok(SpecificationOutcome::fail(format!(
            "Existing file meets cutoff: {}",
            profile.cutoff
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::custom_formats::CustomFormat;
    use crate::decision_engine::context::{CandidateRelease, HeldFile};
    use crate::profiles::Profile;
    use crate::qualities::{Quality, QualityModel, Revision};

    fn hd_profile() -> Profile {
        let mut profile = Profile::with_default_items(1, "HD");
        profile.cutoff = Quality::Bluray720p;
        profile
    }

    fn check(profile: &Profile, held: Option<HeldFile>, candidate: QualityModel) -> SpecificationOutcome {
        let context = EvaluationContext::new(
            profile,
            held,
            CandidateRelease::new("release", candidate, vec![]),
        );
        CutoffSpecification.check(&context).unwrap()
    }

    #[test]
    fn test_nothing_held_passes() {
        let profile = hd_profile();
        assert!(check(&profile, None, Quality::Sdtv.into()).is_pass());
    }

    #[test]
    fn test_below_cutoff_passes() {
        let profile = hd_profile();
        let held = HeldFile::new(Quality::Hdtv720p.into(), vec![]);
        assert!(check(&profile, Some(held), Quality::Bluray720p.into()).is_pass());
    }

    #[test]
    fn test_at_cutoff_rejects_higher_tier() {
        let profile = hd_profile();
        let held = HeldFile::new(Quality::Bluray720p.into(), vec![]);
        assert_eq!(
            check(&profile, Some(held), Quality::WebDl1080p.into()),
            SpecificationOutcome::fail("Existing file meets cutoff: Bluray-720p")
        );
    }

    #[test]
    fn test_at_cutoff_allows_proper_of_same_tier() {
        let profile = hd_profile();
        let held = HeldFile::new(Quality::Bluray720p.into(), vec![]);
        let proper = QualityModel::new(Quality::Bluray720p, Revision::repack(1));
        assert!(check(&profile, Some(held), proper).is_pass());
    }

    #[test]
    fn test_at_cutoff_rejects_plain_release_over_held_proper() {
        let profile = hd_profile();
        let held = HeldFile::new(
            QualityModel::new(Quality::Bluray720p, Revision::repack(1)),
            vec![],
        );
        assert!(!check(&profile, Some(held), Quality::Bluray720p.into()).is_pass());
    }

    #[test]
    fn test_format_cutoff_not_met_passes() {
        let mut profile = hd_profile();
        profile.cutoff_format_score = 100;
        let held = HeldFile::new(
            Quality::Bluray720p.into(),
            vec![CustomFormat::new("x264", &[]).with_score(10)],
        );
        assert!(check(&profile, Some(held), Quality::Bluray720p.into()).is_pass());
    }
}
