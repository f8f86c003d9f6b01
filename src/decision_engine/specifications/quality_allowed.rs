use tracing::debug;

use crate::decision_engine::context::EvaluationContext;
use crate::decision_engine::specification::{DecisionSpecification, SpecificationOutcome};
use crate::error::Result;

/// Rejects candidates whose tier is disabled in the profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityAllowedByProfileSpecification;

impl DecisionSpecification for QualityAllowedByProfileSpecification {
    fn name(&self) -> &'static str {
        "quality_allowed_by_profile"
    }

    fn check(&self, context: &EvaluationContext<'_>) -> Result<SpecificationOutcome> {
        let quality = context.candidate.quality.quality;
        if context.profile.is_allowed(quality)? {
            return Ok(SpecificationOutcome::Pass);
        }

        debug!(
            quality = %quality,
            profile = %context.profile.name,
            "Quality rejected by profile"
        );
        Ok(SpecificationOutcome::fail(format!(
            "{} is not wanted in profile",
            quality
        )))
    }
}
