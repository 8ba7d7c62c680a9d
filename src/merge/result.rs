use crate::bkey::BKey;
use crate::element::Element;
use crate::types::{CacheKey, MissStatus};

/// One merged element together with the cache key it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedElement<V> {
    pub cache_key: CacheKey,
    pub element: Element<V>,
}

impl<V> MergedElement<V> {
    pub fn bkey(&self) -> &BKey {
        self.element.bkey()
    }

    pub fn value(&self) -> &V {
        self.element.value()
    }
}

/// A requested cache key that produced no elements, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissedKey {
    pub cache_key: CacheKey,
    pub status: MissStatus,
}

/// A cache key whose collection was trimmed inside the returned window.
///
/// `boundary` is the last BKey the shard returned in merge direction; `None`
/// when the trimmed collection had no elements in range at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrimmedKey {
    pub cache_key: CacheKey,
    pub boundary: Option<BKey>,
}

/// Outcome of one distributed smget.
///
/// Always produced, even when shards missed or trimmed: degradation shows up
/// in `missed_keys` and `trimmed_keys`, both sorted by cache key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedResult<V> {
    pub(crate) elements: Vec<MergedElement<V>>,
    pub(crate) missed_keys: Vec<MissedKey>,
    pub(crate) trimmed_keys: Vec<TrimmedKey>,
}

impl<V> MergedResult<V> {
    pub fn elements(&self) -> &[MergedElement<V>] {
        &self.elements
    }

    pub fn missed_keys(&self) -> &[MissedKey] {
        &self.missed_keys
    }

    pub fn trimmed_keys(&self) -> &[TrimmedKey] {
        &self.trimmed_keys
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// True when every key answered and none was trimmed inside the window.
    pub fn is_complete(&self) -> bool {
        self.missed_keys.is_empty() && self.trimmed_keys.is_empty()
    }

    pub fn into_elements(self) -> Vec<MergedElement<V>> {
        self.elements
    }
}
