//! Custom format scoring under a profile

use std::collections::HashSet;

use crate::custom_formats::CustomFormat;
use crate::profiles::Profile;

/// Sums and thresholds custom format scores for one profile.
#[derive(Debug, Clone, Copy)]
pub struct CustomFormatScorer<'a> {
    profile: &'a Profile,
}

impl<'a> CustomFormatScorer<'a> {
    pub fn new(profile: &'a Profile) -> Self {
        Self { profile }
    }

    /// Score of a single format: the profile override if present, else its own score.
    pub fn format_score(&self, format: &CustomFormat) -> i32 {
        self.profile
            .format_scores
            .get(&format.id)
            .copied()
            .unwrap_or(format.score)
    }

    /// Total score of a matched set. A format matched twice counts once.
    pub fn score<'f, I>(&self, formats: I) -> i32
    where
        I: IntoIterator<Item = &'f CustomFormat>,
    {
        let mut seen = HashSet::new();
        formats
            .into_iter()
            .filter(|f| seen.insert(f.id))
            .map(|f| self.format_score(f))
            .fold(0i32, |acc, s| acc.saturating_add(s))
    }

    pub fn meets_minimum(&self, score: i32) -> bool {
        score >= self.profile.min_format_score
    }

    pub fn at_cutoff(&self, score: i32) -> bool {
        score >= self.profile.cutoff_format_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(id: i32, score: i32) -> CustomFormat {
        CustomFormat {
            id,
            name: format!("Format {}", id),
            score,
            specifications: Vec::new(),
        }
    }

    #[test]
    fn test_score_uses_format_default() {
        let profile = Profile::with_default_items(1, "Any");
        let scorer = CustomFormatScorer::new(&profile);
        assert_eq!(scorer.score(&[format(1, 10), format(2, -5)]), 5);
    }

    #[test]
    fn test_profile_override_wins() {
        let mut profile = Profile::with_default_items(1, "Any");
        profile.format_scores.insert(1, 100);
        let scorer = CustomFormatScorer::new(&profile);

        assert_eq!(scorer.score(&[format(1, 10), format(2, 3)]), 103);
    }

    #[test]
    fn test_duplicate_ids_count_once() {
        let profile = Profile::with_default_items(1, "Any");
        let scorer = CustomFormatScorer::new(&profile);
        assert_eq!(scorer.score(&[format(7, 25), format(7, 25)]), 25);
    }

    #[test]
    fn test_empty_set_scores_zero() {
        let profile = Profile::with_default_items(1, "Any");
        let scorer = CustomFormatScorer::new(&profile);
        assert_eq!(scorer.score(&[]), 0);
    }

    #[test]
    fn test_thresholds() {
        let mut profile = Profile::with_default_items(1, "Any");
        profile.min_format_score = 10;
        profile.cutoff_format_score = 50;
        let scorer = CustomFormatScorer::new(&profile);

        assert!(!scorer.meets_minimum(9));
        assert!(scorer.meets_minimum(10));
        assert!(!scorer.at_cutoff(49));
        assert!(scorer.at_cutoff(50));
        assert!(scorer.at_cutoff(51));
    }
}
