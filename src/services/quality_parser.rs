//! Quality parser for scene-style release names
//!
//! Derives a [QualityModel] from titles like:
//! - "Chicago Fire S14E08 1080p WEB h264-ETHEL"
//! - "The.Daily.Show.2026.01.07.720p.HDTV.x264.PROPER-EDITH"
//! - "Corner Gas S06E12 1080p BluRay REMUX AVC DTS-HD MA 5.1-QOQ"

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::qualities::{Quality, QualityModel, Revision, Source};

static RESOLUTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:(?P<r2160>2160p|4k|uhd)|(?P<r1080>1080[pi])|(?P<r720>720p)|(?P<r480>480p|576p))\b")
        .expect("valid resolution regex")
});

static SOURCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:(?P<remux>remux)|(?P<bluray>blu-?ray|bdrip|brrip|bd)|(?P<web>web-?dl|webdl|webrip|web|amzn|nf|dsnp|hulu)|(?P<hdtv>hdtv)|(?P<dvd>dvdrip|dvd)|(?P<sdtv>pdtv|sdtv|dsr|tvrip))\b",
    )
    .expect("valid source regex")
});

static PROPER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:proper|repack|rerip)\b").expect("valid proper regex"));

// REAL is only meaningful in upper case; "real" shows up in plenty of titles.
static REAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bREAL\b").expect("valid real regex"));

static VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:^|[^a-z])v(?P<version>[2-9])\b").expect("valid version regex"));

/// Parse the quality of a release from its title.
pub fn parse_quality(title: &str) -> QualityModel {
    let cleaned = title.replace('_', " ");
    let resolution = parse_resolution(&cleaned);
    let source = parse_source(&cleaned);

    let quality = match (source, resolution) {
        (Source::Unknown, None) => Quality::Unknown,
        // Bare resolution with no source is treated as a TV capture
        (Source::Unknown, Some(r)) => television(r),
        (Source::Television, r) => television(r.unwrap_or(480)),
        (Source::Dvd, _) => Quality::Dvd,
        (Source::BlurayRaw, Some(2160)) => Quality::Remux2160p,
        (Source::BlurayRaw, _) => Quality::Remux1080p,
        (source, r) => Quality::from_source_and_resolution(source, r.unwrap_or(480))
            .unwrap_or(Quality::Unknown),
    };

    let revision = parse_revision(&cleaned);
    debug!(title, quality = %quality, revision = %revision, "Parsed release quality");

    QualityModel::new(quality, revision)
}

/// Parse only the revision markers (version, proper/repack, real).
pub fn parse_revision(title: &str) -> Revision {
    let version = VERSION_RE
        .captures(title)
        .and_then(|caps| caps.name("version"))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(1);

    Revision {
        version,
        is_repack: PROPER_RE.is_match(title),
        is_real: REAL_RE.is_match(title),
    }
}

fn parse_resolution(title: &str) -> Option<u32> {
    let caps = RESOLUTION_RE.captures(title)?;
    if caps.name("r2160").is_some() {
        Some(2160)
    } else if caps.name("r1080").is_some() {
        Some(1080)
    } else if caps.name("r720").is_some() {
        Some(720)
    } else {
        Some(480)
    }
}

fn parse_source(title: &str) -> Source {
    // Remux outranks a plain bluray marker anywhere in the title
    let mut found = Source::Unknown;
    for caps in SOURCE_RE.captures_iter(title) {
        let source = if caps.name("remux").is_some() {
            Source::BlurayRaw
        } else if caps.name("bluray").is_some() {
            Source::Bluray
        } else if caps.name("web").is_some() {
            Source::Web
        } else if caps.name("dvd").is_some() {
            Source::Dvd
        } else {
            Source::Television
        };

        if source == Source::BlurayRaw {
            return source;
        }
        if found == Source::Unknown {
            found = source;
        }
    }
    found
}

fn television(resolution: u32) -> Quality {
    match resolution {
        2160 => Quality::Hdtv2160p,
        1080 => Quality::Hdtv1080p,
        720 => Quality::Hdtv720p,
        _ => Quality::Sdtv,
    }
}
