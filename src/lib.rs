//! Librarian release decisions
//!
//! Ranks releases against quality profiles and decides which ones are worth
//! grabbing, including whether a candidate upgrades the file already held.

pub mod app;
pub mod cli;
pub mod config;
pub mod custom_formats;
pub mod decision_engine;
pub mod error;
pub mod profiles;
pub mod qualities;
pub mod services;

pub use custom_formats::{CustomFormat, CustomFormatScorer};
pub use decision_engine::{
    DecisionBatch, DecisionChain, DecisionMaker, DecisionOutcome, DecisionSpecification,
    DownloadDecision, EvaluationContext, HeldFile, ReleaseInfo, UpgradableSpecification,
};
pub use error::{DecisionError, Result};
pub use profiles::{Profile, ProfileQualityItem};
pub use qualities::{Quality, QualityModel, QualityModelComparer, Revision};
