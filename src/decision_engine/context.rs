//! Per-decision evaluation context and the verdict it produces.

use serde::{Deserialize, Serialize};

use crate::custom_formats::{CustomFormat, CustomFormatScorer};
use crate::error::Result;
use crate::profiles::Profile;
use crate::qualities::QualityModel;

/// Whatever file a media item currently holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldFile {
    pub quality: QualityModel,
    #[serde(default)]
    pub custom_formats: Vec<CustomFormat>,
}

impl HeldFile {
    pub fn new(quality: QualityModel, custom_formats: Vec<CustomFormat>) -> Self {
        Self {
            quality,
            custom_formats,
        }
    }
}

/// A release being considered for download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRelease {
    pub title: String,
    pub quality: QualityModel,
    #[serde(default)]
    pub custom_formats: Vec<CustomFormat>,
}

impl CandidateRelease {
    pub fn new(
        title: impl Into<String>,
        quality: QualityModel,
        custom_formats: Vec<CustomFormat>,
    ) -> Self {
        Self {
            title: title.into(),
            quality,
            custom_formats,
        }
    }
}

/// Everything one decision needs. Built per decision and dropped afterwards;
/// rules only ever get a shared reference.
#[derive(Debug, Clone)]
pub struct EvaluationContext<'a> {
    pub profile: &'a Profile,
    pub held: Option<HeldFile>,
    pub candidate: CandidateRelease,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(profile: &'a Profile, held: Option<HeldFile>, candidate: CandidateRelease) -> Self {
        Self {
            profile,
            held,
            candidate,
        }
    }

    /// Boundary check run before any rule sees the context.
    pub fn validate(&self) -> Result<()> {
        self.candidate.quality.validate()?;
        if let Some(held) = &self.held {
            held.quality.validate()?;
        }
        Ok(())
    }

    pub fn candidate_format_score(&self) -> i32 {
        CustomFormatScorer::new(self.profile).score(&self.candidate.custom_formats)
    }

    pub fn held_format_score(&self) -> Option<i32> {
        self.held
            .as_ref()
            .map(|h| CustomFormatScorer::new(self.profile).score(&h.custom_formats))
    }
}

/// Terminal output of the decision chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub accepted: bool,
    /// Name of the first rule that failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Verdict {
    pub fn accepted() -> Self {
        Self {
            accepted: true,
            rejected_by: None,
            reason: None,
        }
    }

    pub fn rejected(rule: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            accepted: false,
            rejected_by: Some(rule.into()),
            reason: Some(reason.into()),
        }
    }
}
