//! Quality tiers, revisions and the quality model attached to releases and files.
//!
//! Tiers are a fixed, profile-independent set. How they rank against each other
//! is decided by a [Profile](crate::profiles::Profile), never by the tier itself;
//! see [comparer].

pub mod comparer;
pub mod revision;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DecisionError, Result};

pub use comparer::QualityModelComparer;
pub use revision::Revision;

/// Where a release was sourced from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Unknown,
    Television,
    Dvd,
    Web,
    Bluray,
    BlurayRaw,
}

/// A coarse source/resolution class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quality {
    #[serde(rename = "Unknown")]
    Unknown,
    #[serde(rename = "SDTV")]
    Sdtv,
    #[serde(rename = "DVD")]
    Dvd,
    #[serde(rename = "WEBDL-480p")]
    WebDl480p,
    #[serde(rename = "Bluray-480p")]
    Bluray480p,
    #[serde(rename = "WEBDL-720p")]
    WebDl720p,
    #[serde(rename = "HDTV-720p")]
    Hdtv720p,
    #[serde(rename = "Bluray-720p")]
    Bluray720p,
    #[serde(rename = "HDTV-1080p")]
    Hdtv1080p,
    #[serde(rename = "WEBDL-1080p")]
    WebDl1080p,
    #[serde(rename = "Bluray-1080p")]
    Bluray1080p,
    #[serde(rename = "Remux-1080p")]
    Remux1080p,
    #[serde(rename = "HDTV-2160p")]
    Hdtv2160p,
    #[serde(rename = "WEBDL-2160p")]
    WebDl2160p,
    #[serde(rename = "Bluray-2160p")]
    Bluray2160p,
    #[serde(rename = "Remux-2160p")]
    Remux2160p,
}

impl Quality {
    /// Every known tier, in the default rank order (lowest first).
    pub const fn all() -> &'static [Quality] {
        &[
            Quality::Unknown,
            Quality::Sdtv,
            Quality::Dvd,
            Quality::WebDl480p,
            Quality::Bluray480p,
            Quality::WebDl720p,
            Quality::Hdtv720p,
            Quality::Bluray720p,
            Quality::Hdtv1080p,
            Quality::WebDl1080p,
            Quality::Bluray1080p,
            Quality::Remux1080p,
            Quality::Hdtv2160p,
            Quality::WebDl2160p,
            Quality::Bluray2160p,
            Quality::Remux2160p,
        ]
    }

    /// Numeric tier id from the upstream quality catalogue. Profiles and
    /// requests refer to tiers by [name](Self::name), never by id.
    pub const fn id(self) -> u32 {
        match self {
            Quality::Unknown => 0,
            Quality::Sdtv => 1,
            Quality::Dvd => 2,
            Quality::WebDl480p => 8,
            Quality::Bluray480p => 13,
            Quality::WebDl720p => 5,
            Quality::Hdtv720p => 4,
            Quality::Bluray720p => 6,
            Quality::Hdtv1080p => 9,
            Quality::WebDl1080p => 3,
            Quality::Bluray1080p => 7,
            Quality::Remux1080p => 20,
            Quality::Hdtv2160p => 16,
            Quality::WebDl2160p => 18,
            Quality::Bluray2160p => 19,
            Quality::Remux2160p => 21,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Quality::Unknown => "Unknown",
            Quality::Sdtv => "SDTV",
            Quality::Dvd => "DVD",
            Quality::WebDl480p => "WEBDL-480p",
            Quality::Bluray480p => "Bluray-480p",
            Quality::WebDl720p => "WEBDL-720p",
            Quality::Hdtv720p => "HDTV-720p",
            Quality::Bluray720p => "Bluray-720p",
            Quality::Hdtv1080p => "HDTV-1080p",
            Quality::WebDl1080p => "WEBDL-1080p",
            Quality::Bluray1080p => "Bluray-1080p",
            Quality::Remux1080p => "Remux-1080p",
            Quality::Hdtv2160p => "HDTV-2160p",
            Quality::WebDl2160p => "WEBDL-2160p",
            Quality::Bluray2160p => "Bluray-2160p",
            Quality::Remux2160p => "Remux-2160p",
        }
    }

    pub const fn source(self) -> Source {
        match self {
            Quality::Unknown => Source::Unknown,
            Quality::Sdtv | Quality::Hdtv720p | Quality::Hdtv1080p | Quality::Hdtv2160p => {
                Source::Television
            }
            Quality::Dvd => Source::Dvd,
            Quality::WebDl480p | Quality::WebDl720p | Quality::WebDl1080p | Quality::WebDl2160p => {
                Source::Web
            }
            Quality::Bluray480p
            | Quality::Bluray720p
            | Quality::Bluray1080p
            | Quality::Bluray2160p => Source::Bluray,
            Quality::Remux1080p | Quality::Remux2160p => Source::BlurayRaw,
        }
    }

    /// Vertical resolution in lines, 0 when unknown
    pub const fn resolution(self) -> u32 {
        match self {
            Quality::Unknown => 0,
            Quality::Sdtv | Quality::Dvd | Quality::WebDl480p | Quality::Bluray480p => 480,
            Quality::WebDl720p | Quality::Hdtv720p | Quality::Bluray720p => 720,
            Quality::Hdtv1080p | Quality::WebDl1080p | Quality::Bluray1080p | Quality::Remux1080p => {
                1080
            }
            Quality::Hdtv2160p | Quality::WebDl2160p | Quality::Bluray2160p | Quality::Remux2160p => {
                2160
            }
        }
    }

    /// Look a tier up by source and resolution.
    pub fn from_source_and_resolution(source: Source, resolution: u32) -> Option<Quality> {
        Quality::all()
            .iter()
            .copied()
            .find(|q| q.source() == source && q.resolution() == resolution)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Quality {
    type Err = DecisionError;

    fn from_str(s: &str) -> Result<Self> {
        Quality::all()
            .iter()
            .copied()
            .find(|q| q.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| DecisionError::invalid_input(format!("unknown quality '{}'", s)))
    }
}

/// Quality of one concrete release or held file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualityModel {
    pub quality: Quality,
    #[serde(default)]
    pub revision: Revision,
}

impl QualityModel {
    pub fn new(quality: Quality, revision: Revision) -> Self {
        Self { quality, revision }
    }

    /// Reject models that must never reach a comparison.
    pub fn validate(&self) -> Result<()> {
        self.revision.validate()
    }
}

impl From<Quality> for QualityModel {
    fn from(quality: Quality) -> Self {
        Self::new(quality, Revision::default())
    }
}

impl fmt::Display for QualityModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.quality, self.revision)
    }
}
