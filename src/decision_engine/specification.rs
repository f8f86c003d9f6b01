//! The specification contract and the ordered chain that runs them.
//!
//! Rules are independent: each one looks at the shared [EvaluationContext] and
//! either passes or fails with a message. The chain runs them in registration
//! order and stops at the first failure, so the order of [DecisionChain] is part
//! of its behaviour and is exposed through [DecisionChain::names].

use tracing::debug;

use crate::decision_engine::context::{EvaluationContext, Verdict};
use crate::decision_engine::specifications::{
    CustomFormatAllowedByProfileSpecification, CutoffSpecification,
    QualityAllowedByProfileSpecification, UpgradableSpecification,
};
use crate::error::Result;

/// Result of a single rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecificationOutcome {
    Pass,
    Fail(String),
}

impl SpecificationOutcome {
    pub fn fail(message: impl Into<String>) -> Self {
        Self::Fail(message.into())
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// An independent accept/reject rule.
///
/// Implementations must be pure functions of the context: no interior
/// mutability, no I/O.
pub trait DecisionSpecification: Send + Sync {
    /// Stable identifier, reported as the verdict's `rejected_by`.
    fn name(&self) -> &'static str;

    fn check(&self, context: &EvaluationContext<'_>) -> Result<SpecificationOutcome>;
}

/// Ordered list of rules producing a single verdict.
#[derive(Default)]
pub struct DecisionChain {
    specifications: Vec<Box<dyn DecisionSpecification>>,
}

impl DecisionChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quality allowed, format minimum, cutoff, then upgrade.
    pub fn with_default_specifications() -> Self {
        Self::new()
            .with(QualityAllowedByProfileSpecification)
            .with(CustomFormatAllowedByProfileSpecification)
            .with(CutoffSpecification)
            .with(UpgradableSpecification)
    }

    pub fn with(mut self, specification: impl DecisionSpecification + 'static) -> Self {
        self.push(specification);
        self
    }

    pub fn push(&mut self, specification: impl DecisionSpecification + 'static) {
        self.specifications.push(Box::new(specification));
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.specifications.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.specifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specifications.is_empty()
    }

    /// Run the chain. Malformed input or a broken profile is an error, never a
    /// rejection.
    pub fn evaluate(&self, context: &EvaluationContext<'_>) -> Result<Verdict> {
        context.validate()?;

        for specification in &self.specifications {
            if let SpecificationOutcome::Fail(reason) = specification.check(context)? {
                debug!(
                    release = %context.candidate.title,
                    rule = specification.name(),
                    reason = %reason,
                    "Release rejected"
                );
                return Ok(Verdict::rejected(specification.name(), reason));
            }
        }

        debug!(release = %context.candidate.title, "Release accepted");
        Ok(Verdict::accepted())
    }
}

impl std::fmt::Debug for DecisionChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionChain")
            .field("specifications", &self.names())
            .finish()
    }
}
