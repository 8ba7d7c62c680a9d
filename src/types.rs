use std::fmt;

use serde::{Deserialize, Serialize};

/// A cache key as the client names it (one per per-key collection).
pub type CacheKey = String;

/// Direction in which a range read walks a collection.
///
/// The server picks the direction from the range bounds: `from <= to` reads
/// ascending, `from > to` reads descending. The merge imposes the same
/// direction globally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl Direction {
    pub fn is_ascending(self) -> bool {
        matches!(self, Direction::Ascending)
    }
}

/// How elements sharing a BKey across different cache keys are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DedupMode {
    /// Keep every element, equal BKeys included.
    #[default]
    None,
    /// Keep only the first element for each BKey.
    Unique,
}

/// Why a requested cache key produced no element set.
///
/// These are reported per key, never raised: a distributed read can be a
/// partial success.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MissStatus {
    /// The key does not exist on its shard.
    NotFound,
    /// The key holds a collection that is not a B-tree.
    TypeMismatch,
    /// The collection is marked unreadable.
    Unreadable,
    /// The requested range lies outside what the collection retains.
    OutOfRange,
    /// The collection's BKey type differs from the query's.
    BKeyMismatch,
    /// The shard did not answer before the query deadline.
    Timeout,
    /// The per-key read was cancelled by the caller.
    Cancelled,
    /// Any other server-reported status, kept verbatim.
    Other(String),
}

impl MissStatus {
    /// Upper-snake status name as the server reports it.
    pub fn code(&self) -> &str {
        match self {
            MissStatus::NotFound => "NOT_FOUND",
            MissStatus::TypeMismatch => "TYPE_MISMATCH",
            MissStatus::Unreadable => "UNREADABLE",
            MissStatus::OutOfRange => "OUT_OF_RANGE",
            MissStatus::BKeyMismatch => "BKEY_MISMATCH",
            MissStatus::Timeout => "TIMEOUT",
            MissStatus::Cancelled => "CANCELED",
            MissStatus::Other(code) => code,
        }
    }
}

impl fmt::Display for MissStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
