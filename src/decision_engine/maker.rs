//! Decision maker: turns a batch of discovered releases into grab decisions.
//!
//! Gathers everything a decision needs from the collaborators (profile,
//! held file, matched formats), runs the [DecisionChain] per release, and
//! isolates failures so one broken media item never stops the rest of the
//! batch.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::custom_formats::CustomFormat;
use crate::decision_engine::context::{CandidateRelease, EvaluationContext, HeldFile, Verdict};
use crate::decision_engine::prioritizer;
use crate::decision_engine::specification::DecisionChain;
use crate::profiles::Profile;
use crate::qualities::QualityModel;
use crate::services::quality_parser;

/// Returns the active profile snapshot for a media item.
pub trait ProfileProvider: Send + Sync {
    fn profile_for(&self, media_id: Uuid) -> Result<Arc<Profile>>;
}

/// Resolves which custom formats a release satisfies.
pub trait FormatMatcher: Send + Sync {
    fn matched_formats(&self, release: &ReleaseInfo) -> Result<Vec<CustomFormat>>;
}

/// Looks up the file a media item currently holds, if any.
pub trait HeldStateLookup: Send + Sync {
    fn held_file(&self, media_id: Uuid) -> Result<Option<HeldFile>>;
}

/// A release reported by an indexer for one media item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseInfo {
    pub media_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub size_bytes: u64,
    #[serde(default)]
    pub seeders: Option<u32>,
    /// Parsed from the title when absent
    #[serde(default)]
    pub quality: Option<QualityModel>,
    /// Format ids already matched upstream
    #[serde(default)]
    pub matched_format_ids: Vec<i32>,
}

impl ReleaseInfo {
    pub fn new(media_id: Uuid, title: impl Into<String>) -> Self {
        Self {
            media_id,
            title: title.into(),
            size_bytes: 0,
            seeders: None,
            quality: None,
            matched_format_ids: Vec::new(),
        }
    }

    pub fn quality(&self) -> QualityModel {
        self.quality
            .unwrap_or_else(|| quality_parser::parse_quality(&self.title))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DecisionOutcome {
    Accepted,
    Rejected { rule: String, reason: String },
    /// The release could not be judged (broken profile, lookup failure, ...)
    CannotEvaluate { error: String },
}

impl From<Verdict> for DecisionOutcome {
    fn from(verdict: Verdict) -> Self {
        if verdict.accepted {
            return DecisionOutcome::Accepted;
        }
        DecisionOutcome::Rejected {
            rule: verdict.rejected_by.unwrap_or_default(),
            reason: verdict.reason.unwrap_or_default(),
        }
    }
}

/// Decision for one release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadDecision {
    pub media_id: Uuid,
    pub title: String,
    pub quality: QualityModel,
    pub custom_format_score: i32,
    pub size_bytes: u64,
    pub seeders: Option<u32>,
    pub outcome: DecisionOutcome,
}

impl DownloadDecision {
    fn from_release(release: &ReleaseInfo, outcome: DecisionOutcome) -> Self {
        Self {
            media_id: release.media_id,
            title: release.title.clone(),
            quality: release.quality(),
            custom_format_score: 0,
            size_bytes: release.size_bytes,
            seeders: release.seeders,
            outcome,
        }
    }

    fn cannot_evaluate(release: &ReleaseInfo, error: impl std::fmt::Display) -> Self {
        Self::from_release(
            release,
            DecisionOutcome::CannotEvaluate {
                error: error.to_string(),
            },
        )
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self.outcome, DecisionOutcome::Accepted)
    }
}

/// Counts for a decided batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionSummary {
    pub evaluated: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub failed: usize,
}

impl DecisionSummary {
    fn from_decisions(decisions: &[DownloadDecision]) -> Self {
        let mut summary = DecisionSummary {
            evaluated: decisions.len(),
            ..Default::default()
        };
        for decision in decisions {
            match decision.outcome {
                DecisionOutcome::Accepted => summary.accepted += 1,
                DecisionOutcome::Rejected { .. } => summary.rejected += 1,
                DecisionOutcome::CannotEvaluate { .. } => summary.failed += 1,
            }
        }
        summary
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionBatch {
    pub decisions: Vec<DownloadDecision>,
    pub summary: DecisionSummary,
}

impl DecisionBatch {
    fn new(decisions: Vec<DownloadDecision>) -> Self {
        let summary = DecisionSummary::from_decisions(&decisions);
        Self { decisions, summary }
    }

    /// Best accepted decision for a media item
    pub fn best_for(&self, media_id: Uuid) -> Option<&DownloadDecision> {
        self.decisions
            .iter()
            .find(|d| d.media_id == media_id && d.is_accepted())
    }
}

pub struct DecisionMaker {
    chain: DecisionChain,
    profiles: Arc<dyn ProfileProvider>,
    formats: Arc<dyn FormatMatcher>,
    held: Arc<dyn HeldStateLookup>,
}

impl DecisionMaker {
    pub fn new(
        chain: DecisionChain,
        profiles: Arc<dyn ProfileProvider>,
        formats: Arc<dyn FormatMatcher>,
        held: Arc<dyn HeldStateLookup>,
    ) -> Self {
        Self {
            chain,
            profiles,
            formats,
            held,
        }
    }

    pub fn chain(&self) -> &DecisionChain {
        &self.chain
    }

    /// Decide a batch. Output is grouped per media item (in order of first
    /// appearance) and prioritized within each group.
    pub fn decide(&self, releases: &[ReleaseInfo]) -> DecisionBatch {
        let mut decisions = Vec::with_capacity(releases.len());
        for (media_id, group) in group_by_media(releases) {
            decisions.extend(self.decide_for_media(media_id, &group));
        }

        let batch = DecisionBatch::new(decisions);
        log_summary(&batch.summary);
        batch
    }

    /// Same result as [decide](Self::decide), with media items spread over
    /// blocking tasks.
    pub async fn decide_concurrently(
        self: Arc<Self>,
        releases: Vec<ReleaseInfo>,
        max_concurrent: usize,
    ) -> DecisionBatch {
        let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));
        let groups: Vec<(Uuid, Vec<ReleaseInfo>)> = group_by_media(&releases)
            .into_iter()
            .map(|(id, group)| (id, group.into_iter().cloned().collect()))
            .collect();

        let mut handles = Vec::with_capacity(groups.len());
        for (media_id, group) in groups {
            let maker = Arc::clone(&self);
            let semaphore = Arc::clone(&semaphore);
            let fallback = group.clone();

            let handle = tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                tokio::task::spawn_blocking(move || {
                    let refs: Vec<&ReleaseInfo> = group.iter().collect();
                    maker.decide_for_media(media_id, &refs)
                })
                .await
            });
            handles.push((handle, fallback));
        }

        let mut decisions = Vec::with_capacity(releases.len());
        for (handle, fallback) in handles {
            match handle.await {
                Ok(Ok(group_decisions)) => decisions.extend(group_decisions),
                Ok(Err(e)) | Err(e) => {
                    warn!(error = %e, "Decision task failed");
                    decisions.extend(
                        fallback
                            .iter()
                            .map(|r| DownloadDecision::cannot_evaluate(r, &e)),
                    );
                }
            }
        }

        let batch = DecisionBatch::new(decisions);
        log_summary(&batch.summary);
        batch
    }

    /// Profiles can come from storage malformed, so each snapshot is checked once
    /// per media item before any release is judged against it.
    fn load_profile(&self, media_id: Uuid) -> Result<Arc<Profile>> {
        let profile = self.profiles.profile_for(media_id)?;
        profile.validate()?;
        Ok(profile)
    }

    fn decide_for_media(&self, media_id: Uuid, releases: &[&ReleaseInfo]) -> Vec<DownloadDecision> {
        let profile = match self.load_profile(media_id) {
            Ok(profile) => profile,
            Err(e) => {
                warn!(media_id = %media_id, error = %e, "Cannot evaluate releases: profile unavailable");
                return releases
                    .iter()
                    .map(|r| DownloadDecision::cannot_evaluate(r, format!("{:#}", e)))
                    .collect();
            }
        };

        let held = match self.held.held_file(media_id) {
            Ok(held) => held,
            Err(e) => {
                warn!(media_id = %media_id, error = %e, "Cannot evaluate releases: held file lookup failed");
                return releases
                    .iter()
                    .map(|r| DownloadDecision::cannot_evaluate(r, format!("{:#}", e)))
                    .collect();
            }
        };

        let mut decisions: Vec<DownloadDecision> = releases
            .iter()
            .map(|r| self.decide_release(&profile, held.as_ref(), r))
            .collect();

        prioritizer::sort_decisions(&profile, &mut decisions);
        decisions
    }

    fn decide_release(
        &self,
        profile: &Profile,
        held: Option<&HeldFile>,
        release: &ReleaseInfo,
    ) -> DownloadDecision {
        let custom_formats = match self.formats.matched_formats(release) {
            Ok(formats) => formats,
            Err(e) => {
                warn!(release = %release.title, error = %e, "Custom format matching failed");
                return DownloadDecision::cannot_evaluate(release, format!("{:#}", e));
            }
        };

        let quality = release.quality();
        let context = EvaluationContext::new(
            profile,
            held.cloned(),
            CandidateRelease::new(release.title.clone(), quality, custom_formats),
        );
        let custom_format_score = context.candidate_format_score();

        let outcome = match self.chain.evaluate(&context) {
            Ok(verdict) => DecisionOutcome::from(verdict),
            Err(e) => {
                warn!(release = %release.title, code = e.code(), error = %e, "Cannot evaluate release");
                DecisionOutcome::CannotEvaluate {
                    error: e.to_string(),
                }
            }
        };

        debug!(release = %release.title, quality = %quality, custom_format_score, ?outcome, "Release decided");

        DownloadDecision {
            media_id: release.media_id,
            title: release.title.clone(),
            quality,
            custom_format_score,
            size_bytes: release.size_bytes,
            seeders: release.seeders,
            outcome,
        }
    }
}

fn group_by_media(releases: &[ReleaseInfo]) -> Vec<(Uuid, Vec<&ReleaseInfo>)> {
    let mut index: HashMap<Uuid, usize> = HashMap::new();
    let mut groups: Vec<(Uuid, Vec<&ReleaseInfo>)> = Vec::new();

    for release in releases {
        let slot = *index.entry(release.media_id).or_insert_with(|| {
            groups.push((release.media_id, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(release);
    }

    groups
}

fn log_summary(summary: &DecisionSummary) {
    info!(
        evaluated = summary.evaluated,
        accepted = summary.accepted,
        rejected = summary.rejected,
        failed = summary.failed,
        "Decision batch complete"
    );
}
