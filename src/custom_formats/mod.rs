//! Custom formats: named, scored classifiers matched against release metadata.
//!
//! Matching itself happens elsewhere (see
//! [FormatMatcher](crate::decision_engine::FormatMatcher)); this module only
//! holds the definitions and the scoring rules.

pub mod scorer;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use scorer::CustomFormatScorer;

/// A custom format definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFormat {
    pub id: i32,
    pub name: String,
    /// Score used when the profile has no override for this format
    #[serde(default)]
    pub score: i32,
    /// Matcher conditions, opaque to the decision engine
    #[serde(default)]
    pub specifications: Vec<String>,
}

impl CustomFormat {
    pub fn new(name: impl Into<String>, specifications: &[&str]) -> Self {
        Self {
            id: 0,
            name: name.into(),
            score: 0,
            specifications: specifications.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_score(mut self, score: i32) -> Self {
        self.score = score;
        self
    }
}

/// Built-in starter sets offered when a user creates formats.
pub fn templates() -> BTreeMap<&'static str, Vec<CustomFormat>> {
    let mut templates = BTreeMap::new();

    templates.insert(
        "Easy",
        vec![
            CustomFormat::new("x264", &[r"C_RX_(x|h)\.?264"]),
            CustomFormat::new("x265", &[r"C_RX_(((x|h)\.?265)|(HEVC))"]),
            CustomFormat::new("Simple Hardcoded Subs", &["C_RX_subs?"]),
            CustomFormat::new("Multi Language", &["L_English", "L_French"]),
        ],
    );

    templates.insert(
        "Intermediate",
        vec![
            CustomFormat::new(
                "Hardcoded Subs",
                &[r"C_RX_\b(?<hcsub>(\w+SUBS?)\b)|(?<hc>(HC|SUBBED))\b"],
            ),
            CustomFormat::new("Surround", &[r"C_RX_\b((7|5).1)\b"]),
            CustomFormat::new("Preferred Words", &[r"C_RX_\b(SPARKS|Framestor)\b"]),
            CustomFormat::new("Scene", &["I_G_Scene"]),
            CustomFormat::new("Internal Releases", &["I_HDB_Internal", "I_AHD_Internal"]),
        ],
    );

    templates.insert("Advanced", vec![CustomFormat::new("Custom", &[])]);

    templates
}
