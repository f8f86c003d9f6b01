//! Release revisions: version bumps plus proper/repack and real reissues.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DecisionError, Result};

/// How many times a release of one tier was reissued, and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Revision {
    pub version: u32,
    #[serde(default)]
    pub is_repack: bool,
    #[serde(default)]
    pub is_real: bool,
}

impl Default for Revision {
    fn default() -> Self {
        Self {
            version: 1,
            is_repack: false,
            is_real: false,
        }
    }
}

impl Revision {
    pub fn new(version: u32) -> Self {
        Self {
            version,
            ..Default::default()
        }
    }

    pub fn repack(version: u32) -> Self {
        Self {
            version,
            is_repack: true,
            is_real: false,
        }
    }

    pub fn real(version: u32) -> Self {
        Self {
            version,
            is_repack: false,
            is_real: true,
        }
    }

    /// True for proper/repack or real reissues.
    pub fn is_reissue(&self) -> bool {
        self.is_repack || self.is_real
    }

    pub fn validate(&self) -> Result<()> {
        if self.version < 1 {
            return Err(DecisionError::invalid_input(format!(
                "revision version must be at least 1, got {}",
                self.version
            )));
        }
        Ok(())
    }

    /// Tie-break weight once versions are equal: real > repack > neither.
    fn flag_rank(&self) -> u8 {
        if self.is_real {
            2
        } else if self.is_repack {
            1
        } else {
            0
        }
    }
}

impl Ord for Revision {
    fn cmp(&self, other: &Self) -> Ordering {
        self.version
            .cmp(&other.version)
            .then_with(|| self.flag_rank().cmp(&other.flag_rank()))
    }
}

impl PartialOrd for Revision {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.version)?;
        if self.is_repack {
            f.write_str(" repack")?;
        }
        if self.is_real {
            f.write_str(" real")?;
        }
        Ok(())
    }
}

/// Compare two revisions independently of their quality tier.
pub fn compare_revision(a: &Revision, b: &Revision) -> Ordering {
    a.cmp(b)
}
