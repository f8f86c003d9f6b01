//! Grab/no-grab decisions for discovered releases
//!
//! - [specification] holds the rule contract and the ordered [DecisionChain]
//! - [specifications] holds the built-in rules, including the upgrade rule
//! - [maker] gathers context from collaborators and decides whole batches
//! - [prioritizer] orders decisions so the best grab comes first

pub mod context;
pub mod maker;
pub mod prioritizer;
pub mod specification;
pub mod specifications;

pub use context::{CandidateRelease, EvaluationContext, HeldFile, Verdict};
pub use maker::{
    DecisionBatch, DecisionMaker, DecisionOutcome, DecisionSummary, DownloadDecision,
    FormatMatcher, HeldStateLookup, ProfileProvider, ReleaseInfo,
};
pub use specification::{DecisionChain, DecisionSpecification, SpecificationOutcome};
pub use specifications::{
    CustomFormatAllowedByProfileSpecification, CutoffSpecification,
    QualityAllowedByProfileSpecification, UpgradableSpecification, UpgradeRejection,
};
