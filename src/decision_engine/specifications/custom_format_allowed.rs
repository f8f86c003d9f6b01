use tracing::debug;

use crate::custom_formats::CustomFormatScorer;
use crate::decision_engine::context::EvaluationContext;
use crate::decision_engine::specification::{DecisionSpecification, SpecificationOutcome};
use crate::error::Result;

/// Rejects candidates scoring below the profile's minimum custom format score.
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomFormatAllowedByProfileSpecification;

impl DecisionSpecification for CustomFormatAllowedByProfileSpecification {
    fn name(&self) -> &'static str {
        "custom_format_allowed_by_profile"
    }

    fn check(&self, context: &EvaluationContext<'_>) -> Result<SpecificationOutcome> {
        let score = context.candidate_format_score();

        if CustomFormatScorer::new(context.profile).meets_minimum(score) {
            return Ok(SpecificationOutcome::Pass);
        }

        let names: Vec<&str> = context
            .candidate
            .custom_formats
            .iter()
            .map(|f| f.name.as_str())
            .collect();

        debug!(
            score,
            minimum = context.profile.min_format_score,
            formats = ?names,
            "Custom format score below profile minimum"
        );
        Ok(SpecificationOutcome::fail(format!(
            "Custom formats [{}] have score {} below profile minimum {}",
            names.join(", "),
            score,
            context.profile.min_format_score
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::custom_formats::CustomFormat;
    use crate::decision_engine::context::CandidateRelease;
    use crate::profiles::Profile;
    use crate::qualities::{Quality, QualityModel};

    fn context_with<'a>(profile: &'a Profile, formats: Vec<CustomFormat>) -> EvaluationContext<'a> {
        EvaluationContext::new(
            profile,
            None,
            CandidateRelease::new("release", QualityModel::from(Quality::WebDl1080p), formats),
        )
    }

    #[test]
    fn test_default_minimum_accepts_unscored_release() {
        let profile = Profile::with_default_items(1, "Any");
        let outcome = CustomFormatAllowedByProfileSpecification
            .check(&context_with(&profile, vec![]))
            .unwrap();
        assert!(outcome.is_pass());
    }

    #[test]
    fn test_negative_score_below_minimum_fails() {
        let profile = Profile::with_default_items(1, "Any");
        let formats = vec![CustomFormat::new("Hardcoded Subs", &[]).with_score(-100)];
        let outcome = CustomFormatAllowedByProfileSpecification
            .check(&context_with(&profile, formats))
            .unwrap();
        assert_eq!(
            outcome,
            SpecificationOutcome::fail(
                "Custom formats [Hardcoded Subs] have score -100 below profile minimum 0"
            )
        );
    }

    #[test]
    fn test_profile_override_can_lift_score() {
        let mut profile = Profile::with_default_items(1, "Any");
        profile.min_format_score = 10;
        profile.format_scores.insert(0, 15);

        let formats = vec![CustomFormat::new("x265", &[]).with_score(-5)];
        let outcome = CustomFormatAllowedByProfileSpecification
            .check(&context_with(&profile, formats))
            .unwrap();
        assert!(outcome.is_pass());
    }
}
