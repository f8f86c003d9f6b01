//! Ordering of decisions for one media item, best grab first.

use std::cmp::Ordering;

use crate::decision_engine::maker::DownloadDecision;
use crate::profiles::Profile;
use crate::qualities::QualityModelComparer;

/// Accepted decisions first, best first: quality, then custom format score,
/// then seeders, then size. Rejected and failed decisions keep their relative
/// order after them.
pub fn sort_decisions(profile: &Profile, decisions: &mut [DownloadDecision]) {
    let comparer = QualityModelComparer::new(profile);

    decisions.sort_by(|a, b| match (a.is_accepted(), b.is_accepted()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => Ordering::Equal,
        (true, true) => compare_accepted(&comparer, b, a),
    });
}

/// Greater means `a` is the better grab.
fn compare_accepted(
    comparer: &QualityModelComparer<'_>,
    a: &DownloadDecision,
    b: &DownloadDecision,
) -> Ordering {
    // Accepted decisions already passed the quality-allowed rule, so the
    // tiers are known to the profile.
    comparer
        .compare(&a.quality, &b.quality)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.custom_format_score.cmp(&b.custom_format_score))
        .then_with(|| a.seeders.unwrap_or(0).cmp(&b.seeders.unwrap_or(0)))
        .then_with(|| a.size_bytes.cmp(&b.size_bytes))
}
