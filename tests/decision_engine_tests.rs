//! Integration tests for release decisions
//!
//! These tests drive the public API end to end:
//! - Upgrade scenarios against profile-defined tier order
//! - Ordering properties of the quality comparer
//! - Proper/real gating and custom format cutoff
//! - Chain evaluation and batch decisions through the stores

use std::cmp::Ordering;
use std::sync::Arc;

use assert_matches::assert_matches;
use uuid::Uuid;

use librarian_decisions::decision_engine::{
    CandidateRelease, DecisionChain, DecisionMaker, DecisionOutcome, EvaluationContext, HeldFile,
    ReleaseInfo, UpgradableSpecification,
};
use librarian_decisions::services::{
    CustomFormatService, HeldFileStore, InMemoryCustomFormatRepository, ProfileStore,
};
use librarian_decisions::{
    CustomFormat, DecisionError, Profile, Quality, QualityModel, QualityModelComparer, Revision,
};

// ============================================================================
// Helpers
// ============================================================================

fn model(quality: Quality, version: u32) -> QualityModel {
    QualityModel::new(quality, Revision::new(version))
}

/// SDTV < WEBDL-720p < HDTV-720p < Bluray-720p < WEBDL-1080p
fn scenario_profile() -> Profile {
    Profile::with_order(
        1,
        "Scenario",
        &[
            Quality::Sdtv,
            Quality::WebDl720p,
            Quality::Hdtv720p,
            Quality::Bluray720p,
            Quality::WebDl1080p,
        ],
    )
}

fn upgradable(profile: &Profile, held: QualityModel, candidate: QualityModel) -> bool {
    UpgradableSpecification
        .is_upgradable(profile, &held, &[], &candidate, &[])
        .unwrap()
}

fn format(id: i32, name: &str, score: i32) -> CustomFormat {
    let mut format = CustomFormat::new(name, &[]).with_score(score);
    format.id = id;
    format
}

// ============================================================================
// Upgrade Scenarios
// ============================================================================

mod upgrade_scenarios {
    use super::*;

    #[test]
    fn test_version_bump_on_same_tier_upgrades() {
        let profile = scenario_profile();
        assert!(upgradable(&profile, model(Quality::Sdtv, 1), model(Quality::Sdtv, 2)));
        assert!(upgradable(
            &profile,
            model(Quality::WebDl720p, 1),
            model(Quality::WebDl720p, 2)
        ));
    }

    #[test]
    fn test_identical_release_is_not_an_upgrade() {
        let profile = scenario_profile();
        assert!(!upgradable(&profile, model(Quality::Sdtv, 1), model(Quality::Sdtv, 1)));
    }

    #[test]
    fn test_lower_tier_loses_despite_higher_version_held() {
        let mut profile = scenario_profile();
        profile.cutoff = Quality::Bluray720p;
        assert!(!upgradable(
            &profile,
            model(Quality::Hdtv720p, 2),
            model(Quality::WebDl720p, 1)
        ));
    }

    #[test]
    fn test_profile_order_dominates_resolution() {
        let profile = Profile::with_order(
            2,
            "Web first",
            &[Quality::Sdtv, Quality::Hdtv720p, Quality::WebDl720p],
        );
        assert!(upgradable(
            &profile,
            model(Quality::Hdtv720p, 2),
            model(Quality::WebDl720p, 1)
        ));
    }

    #[test]
    fn test_identical_formats_are_not_an_upgrade() {
        let mut profile = scenario_profile();
        profile.cutoff_format_score = 100;
        let formats = vec![format(1, "x265", 10)];

        let result = UpgradableSpecification
            .is_upgradable(
                &profile,
                &model(Quality::WebDl1080p, 1),
                &formats,
                &model(Quality::WebDl1080p, 1),
                &formats,
            )
            .unwrap();
        assert!(!result);
    }
}

// ============================================================================
// Comparer Properties
// ============================================================================

mod comparer_properties {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_models() -> Vec<QualityModel> {
        let mut models = Vec::new();
        for quality in [Quality::Sdtv, Quality::WebDl720p, Quality::Hdtv720p, Quality::WebDl1080p] {
            for revision in [
                Revision::new(1),
                Revision::repack(1),
                Revision::real(1),
                Revision::new(2),
                Revision::real(2),
            ] {
                models.push(QualityModel::new(quality, revision));
            }
        }
        models
    }

    #[test]
    fn test_reflexive_and_antisymmetric() {
        let profile = scenario_profile();
        let comparer = QualityModelComparer::new(&profile);
        let models = sample_models();

        for a in &models {
            assert_eq!(comparer.compare(a, a).unwrap(), Ordering::Equal);
            for b in &models {
                let ab = comparer.compare(a, b).unwrap();
                let ba = comparer.compare(b, a).unwrap();
                assert_eq!(ab, ba.reverse(), "{} vs {}", a, b);
            }
        }
    }

    #[test]
    fn test_transitive() {
        let profile = scenario_profile();
        let comparer = QualityModelComparer::new(&profile);
        let models = sample_models();

        for a in &models {
            for b in &models {
                for c in &models {
                    let ab = comparer.compare(a, b).unwrap();
                    let bc = comparer.compare(b, c).unwrap();
                    if ab != Ordering::Less && bc != Ordering::Less {
                        assert_ne!(comparer.compare(a, c).unwrap(), Ordering::Less);
                    }
                }
            }
        }
    }

    #[test]
    fn test_higher_version_same_tier_always_greater() {
        let profile = Profile::with_default_items(1, "Any");
        let comparer = QualityModelComparer::new(&profile);
        for quality in profile.allowed_qualities().collect::<Vec<_>>() {
            for version in 1..5 {
                assert_eq!(
                    comparer
                        .compare(&model(quality, version + 1), &model(quality, version))
                        .unwrap(),
                    Ordering::Greater
                );
            }
        }
    }

    #[test]
    fn test_tier_missing_from_profile_is_configuration_error() {
        let mut profile = scenario_profile();
        profile.items.retain(|i| i.quality != Quality::Hdtv720p);

        let result = QualityModelComparer::new(&profile)
            .compare(&model(Quality::Hdtv720p, 1), &model(Quality::Sdtv, 1));
        assert_matches!(result, Err(DecisionError::Configuration { .. }));
    }

    #[test]
    fn test_zero_version_is_invalid_input() {
        let profile = scenario_profile();
        let result = QualityModelComparer::new(&profile)
            .compare(&model(Quality::Sdtv, 0), &model(Quality::Sdtv, 1));
        assert_matches!(result, Err(DecisionError::InvalidInput { .. }));
    }
}

// ============================================================================
// Propers and Custom Format Cutoff
// ============================================================================

mod gates {
    use super::*;

    #[test]
    fn test_proper_follows_auto_download_setting() {
        let mut profile = scenario_profile();
        let held = model(Quality::Hdtv720p, 1);
        let proper = QualityModel::new(Quality::Hdtv720p, Revision::repack(1));
        let real = QualityModel::new(Quality::Hdtv720p, Revision::real(1));

        assert!(upgradable(&profile, held, proper));
        assert!(upgradable(&profile, held, real));

        profile.auto_download_propers = false;
        assert!(!upgradable(&profile, held, proper));
        assert!(!upgradable(&profile, held, real));

        // A plain version bump is not a reissue
        assert!(upgradable(&profile, held, model(Quality::Hdtv720p, 2)));
    }

    #[test]
    fn test_higher_version_upgrades_regardless_of_flags() {
        let flagged = |version: u32| {
            [
                Revision::new(version),
                Revision::repack(version),
                Revision::real(version),
            ]
        };

        for auto_download_propers in [true, false] {
            let mut profile = scenario_profile();
            profile.auto_download_propers = auto_download_propers;

            for quality in [Quality::Sdtv, Quality::Hdtv720p, Quality::WebDl1080p] {
                for version in 1..4 {
                    for held in flagged(version) {
                        for candidate in flagged(version + 1) {
                            assert!(
                                upgradable(
                                    &profile,
                                    QualityModel::new(quality, held),
                                    QualityModel::new(quality, candidate)
                                ),
                                "{} {} -> {} (auto propers {})",
                                quality,
                                held,
                                candidate,
                                auto_download_propers
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_real_upgrades_held_repack() {
        let profile = scenario_profile();
        let repack = QualityModel::new(Quality::Hdtv720p, Revision::repack(1));
        let real = QualityModel::new(Quality::Hdtv720p, Revision::real(1));

        assert!(upgradable(&profile, repack, real));
        assert!(!upgradable(&profile, real, repack));
    }

    #[test]
    fn test_format_score_breaks_quality_ties_until_cutoff() {
        let mut profile = scenario_profile();
        profile.cutoff_format_score = 20;
        let held_quality = model(Quality::WebDl1080p, 1);

        let low = vec![format(1, "x264", 5)];
        let high = vec![format(2, "x265", 15)];
        let at_cutoff = vec![format(3, "HDR", 20)];
        let above = vec![format(4, "DV", 40)];

        let spec = UpgradableSpecification;
        assert!(spec
            .is_upgradable(&profile, &held_quality, &low, &held_quality, &high)
            .unwrap());
        assert!(!spec
            .is_upgradable(&profile, &held_quality, &high, &held_quality, &low)
            .unwrap());
        assert!(!spec
            .is_upgradable(&profile, &held_quality, &at_cutoff, &held_quality, &above)
            .unwrap());
    }

    #[test]
    fn test_tier_dominates_format_score() {
        let mut profile = scenario_profile();
        profile.cutoff_format_score = 1000;
        let rich = vec![format(1, "Everything", 500)];

        let result = UpgradableSpecification
            .is_upgradable(
                &profile,
                &model(Quality::WebDl1080p, 1),
                &[],
                &model(Quality::Bluray720p, 1),
                &rich,
            )
            .unwrap();
        assert!(!result);
    }
}

// ============================================================================
// Chain Evaluation
// ============================================================================

mod chain {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_chain_rejects_with_first_failing_rule() {
        let profile = scenario_profile();
        let chain = DecisionChain::with_default_specifications();

        let context = EvaluationContext::new(
            &profile,
            Some(HeldFile::new(model(Quality::Hdtv720p, 1), vec![])),
            CandidateRelease::new("Show.S01E01.DVDRip", model(Quality::Dvd, 1), vec![]),
        );
        let verdict = chain.evaluate(&context).unwrap();
        assert!(!verdict.accepted);
        assert_eq!(verdict.rejected_by.as_deref(), Some("quality_allowed_by_profile"));
    }

    #[test]
    fn test_default_chain_accepts_upgrade() {
        let profile = scenario_profile();
        let chain = DecisionChain::with_default_specifications();

        let context = EvaluationContext::new(
            &profile,
            Some(HeldFile::new(model(Quality::Hdtv720p, 1), vec![])),
            CandidateRelease::new("Show.S01E01.720p.BluRay", model(Quality::Bluray720p, 1), vec![]),
        );
        assert!(chain.evaluate(&context).unwrap().accepted);
    }

    #[test]
    fn test_proper_veto_names_the_reason() {
        let mut profile = scenario_profile();
        profile.auto_download_propers = false;
        let chain = DecisionChain::with_default_specifications();

        let context = EvaluationContext::new(
            &profile,
            Some(HeldFile::new(model(Quality::Hdtv720p, 1), vec![])),
            CandidateRelease::new(
                "Show.S01E01.720p.HDTV.x264.REPACK-GRP",
                QualityModel::new(Quality::Hdtv720p, Revision::repack(1)),
                vec![],
            ),
        );
        let verdict = chain.evaluate(&context).unwrap();
        assert_eq!(verdict.rejected_by.as_deref(), Some("upgradable"));
        assert_eq!(
            verdict.reason.as_deref(),
            Some("Proper/real release and profile does not auto-download propers")
        );
    }

    #[test]
    fn test_held_at_cutoff_rejected_by_cutoff_rule() {
        let profile = scenario_profile();
        let chain = DecisionChain::with_default_specifications();

        let context = EvaluationContext::new(
            &profile,
            Some(HeldFile::new(model(Quality::WebDl1080p, 1), vec![])),
            CandidateRelease::new("Show.S01E01.720p.BluRay", model(Quality::Bluray720p, 1), vec![]),
        );
        let verdict = chain.evaluate(&context).unwrap();
        assert_eq!(verdict.rejected_by.as_deref(), Some("cutoff"));
    }
}

// ============================================================================
// Batch Decisions Through the Stores
// ============================================================================

mod batch {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_batch_decisions_with_stores() {
        let profiles = Arc::new(ProfileStore::from_profiles([scenario_profile()]).unwrap());
        let formats = Arc::new(CustomFormatService::new(Arc::new(
            InMemoryCustomFormatRepository::new(),
        )));
        let held = Arc::new(HeldFileStore::new());

        let show = Uuid::new_v4();
        let movie = Uuid::new_v4();
        let orphan = Uuid::new_v4();
        profiles.assign(show, 1).unwrap();
        profiles.assign(movie, 1).unwrap();
        held.insert(show, HeldFile::new(model(Quality::Sdtv, 1), vec![]));

        let maker = DecisionMaker::new(
            DecisionChain::with_default_specifications(),
            profiles,
            formats,
            held,
        );

        let batch = maker.decide(&[
            ReleaseInfo::new(show, "Show.S01E01.720p.HDTV.x264-KILLERS"),
            ReleaseInfo::new(movie, "Movie.2020.720p.BluRay.x264-SPARKS"),
            ReleaseInfo::new(show, "Show.S01E01.HDTV.x264-LOL"),
            ReleaseInfo::new(orphan, "Other.S01E01.720p.HDTV.x264-GRP"),
        ]);

        assert_eq!(batch.summary.evaluated, 4);
        assert_eq!(batch.summary.accepted, 2);
        assert_eq!(batch.summary.rejected, 1);
        assert_eq!(batch.summary.failed, 1);

        assert_eq!(
            batch.best_for(show).map(|d| d.quality.quality),
            Some(Quality::Hdtv720p)
        );
        assert_eq!(
            batch.best_for(movie).map(|d| d.quality.quality),
            Some(Quality::Bluray720p)
        );
        assert!(batch.best_for(orphan).is_none());

        let orphan_decision = batch
            .decisions
            .iter()
            .find(|d| d.media_id == orphan)
            .unwrap();
        assert_matches!(orphan_decision.outcome, DecisionOutcome::CannotEvaluate { .. });
    }
}
