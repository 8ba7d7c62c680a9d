//! Merge parameters and their configuration-file form.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{DedupMode, Direction};

/// Default result cap when a config omits `count`.
fn default_count() -> usize {
    50
}

/// Global parameters of one merge.
///
/// ```toml
/// direction = "descending"
/// dedup = "unique"
/// count = 100
/// offset = 0
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergeOptions {
    /// Global order imposed on the merged elements.
    #[serde(default)]
    pub direction: Direction,

    /// Whether equal BKeys from different cache keys collapse to one.
    #[serde(default)]
    pub dedup: DedupMode,

    /// Maximum number of elements returned.
    #[serde(default = "default_count")]
    pub count: usize,

    /// Leading merged elements skipped before `count` starts.
    #[serde(default)]
    pub offset: usize,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            direction: Direction::default(),
            dedup: DedupMode::default(),
            count: default_count(),
            offset: 0,
        }
    }
}

impl MergeOptions {
    pub fn new(direction: Direction, dedup: DedupMode, count: usize) -> Self {
        Self {
            direction,
            dedup,
            count,
            offset: 0,
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_dedup(mut self, dedup: DedupMode) -> Self {
        self.dedup = dedup;
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let options = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), ?options, "loaded merge options");
        Ok(options)
    }
}
