//! Request-side description of one distributed smget.
//!
//! An [`SmgetQuery`] names the cache keys, the BKey range, and the paging
//! parameters. The fan-out layer issues one range read per key, decodes each
//! reply with [`SmgetQuery::collect_reply`], and hands the collected map to
//! [`SmgetQuery::merge`].

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use crate::bkey::BKey;
use crate::collection::{ElementSet, KeyReply};
use crate::config::MergeOptions;
use crate::element::{EFlagFilter, Element};
use crate::error::{Error, Result};
use crate::merge::{self, MergedResult};
use crate::types::{CacheKey, DedupMode, Direction};

/// Largest `offset + count` one smget may ask for.
pub const MAX_SMGET_COUNT: usize = 1000;

/// Most cache keys one smget may span.
pub const MAX_KEY_COUNT: usize = 10_000;

/// Longest cache key the store accepts, in bytes.
pub const MAX_CACHE_KEY_LEN: usize = 250;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmgetQuery {
    keys: Vec<CacheKey>,
    from: BKey,
    to: BKey,
    count: usize,
    offset: usize,
    dedup: DedupMode,
    filter: Option<EFlagFilter>,
}

impl SmgetQuery {
    /// Range `[from, to]` over `keys`; `from > to` reads descending.
    pub fn new(keys: Vec<CacheKey>, from: BKey, to: BKey, count: usize) -> Self {
        SmgetQuery {
            keys,
            from,
            to,
            count,
            offset: 0,
            dedup: DedupMode::None,
            filter: None,
        }
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_dedup(mut self, dedup: DedupMode) -> Self {
        self.dedup = dedup;
        self
    }

    pub fn with_filter(mut self, filter: EFlagFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn keys(&self) -> &[CacheKey] {
        &self.keys
    }

    pub fn from(&self) -> &BKey {
        &self.from
    }

    pub fn to(&self) -> &BKey {
        &self.to
    }

    pub fn validate(&self) -> Result<()> {
        if self.keys.is_empty() {
            return Err(Error::InvalidQuery("key list is empty".into()));
        }
        if self.keys.len() > MAX_KEY_COUNT {
            return Err(Error::InvalidQuery(format!(
                "{} keys requested, max is {MAX_KEY_COUNT}",
                self.keys.len()
            )));
        }

        let mut seen = HashSet::with_capacity(self.keys.len());
        for key in &self.keys {
            validate_cache_key(key)?;
            if !seen.insert(key.as_str()) {
                return Err(Error::InvalidQuery(format!("duplicate key {key:?}")));
            }
        }

        self.from.try_cmp(&self.to)?;

        if self.count == 0 || self.count > MAX_SMGET_COUNT {
            return Err(Error::InvalidQuery(format!(
                "count must be 1..={MAX_SMGET_COUNT}, got {}",
                self.count
            )));
        }
        let end = self.offset.checked_add(self.count);
        if end.is_none_or(|end| end > MAX_SMGET_COUNT) {
            return Err(Error::InvalidQuery(format!(
                "offset {} + count {} exceeds {MAX_SMGET_COUNT}",
                self.offset, self.count
            )));
        }
        Ok(())
    }

    /// Ascending when `from <= to`. Fails when the bounds differ in form.
    pub fn direction(&self) -> Result<Direction> {
        match self.from.try_cmp(&self.to)? {
            Ordering::Greater => Ok(Direction::Descending),
            _ => Ok(Direction::Ascending),
        }
    }

    /// Inclusive range test, whichever way the range runs.
    ///
    /// A key whose form differs from the bounds is never in range, and
    /// neither is anything when the bounds themselves differ in form.
    pub fn contains(&self, bkey: &BKey) -> bool {
        let Ok(direction) = self.direction() else {
            return false;
        };
        let (lo, hi) = match direction {
            Direction::Ascending => (&self.from, &self.to),
            Direction::Descending => (&self.to, &self.from),
        };
        matches!(bkey.try_cmp(lo), Ok(Ordering::Equal | Ordering::Greater))
            && matches!(bkey.try_cmp(hi), Ok(Ordering::Equal | Ordering::Less))
    }

    /// In range and, if a filter is set, passing it.
    pub fn accepts<V>(&self, element: &Element<V>) -> bool {
        self.contains(element.bkey())
            && self
                .filter
                .as_ref()
                .is_none_or(|filter| filter.matches(element))
    }

    /// Build a `Found` reply from one key's decoded elements.
    pub fn collect_reply<V, I>(&self, elements: I, trimmed: bool) -> Result<KeyReply<V>>
    where
        I: IntoIterator<Item = Element<V>>,
    {
        self.direction()?;
        let accepted = elements.into_iter().filter(|e| self.accepts(e));
        ElementSet::from_elements(accepted, trimmed).map(KeyReply::Found)
    }

    pub fn merge_options(&self) -> Result<MergeOptions> {
        let options = MergeOptions::new(self.direction()?, self.dedup, self.count);
        Ok(options.with_offset(self.offset))
    }

    /// Validate, check every reply answers a requested key, and merge.
    pub fn merge<V>(&self, replies: BTreeMap<CacheKey, KeyReply<V>>) -> Result<MergedResult<V>> {
        self.validate()?;
        let requested: HashSet<&str> = self.keys.iter().map(String::as_str).collect();
        if let Some(stray) = replies.keys().find(|k| !requested.contains(k.as_str())) {
            return Err(Error::InvalidQuery(format!(
                "reply for unrequested key {stray:?}"
            )));
        }
        merge::merge(replies, &self.merge_options()?)
    }
}

fn validate_cache_key(key: &str) -> Result<()> {
    if key.is_empty() || key.len() > MAX_CACHE_KEY_LEN {
        return Err(Error::InvalidQuery(format!(
            "key length must be 1..={MAX_CACHE_KEY_LEN}, got {}",
            key.len()
        )));
    }
    if key.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(Error::InvalidQuery(format!(
            "key {key:?} contains whitespace or control characters"
        )));
    }
    Ok(())
}
