mod heap;
pub mod result;

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use tracing::{debug, trace};

use crate::bkey::{BKey, BKeyKind};
use crate::collection::KeyReply;
use crate::config::MergeOptions;
use crate::error::{Error, Result};
use crate::types::{CacheKey, DedupMode, Direction};

use heap::{Backward, Forward, HeapEntry, Orientation, Source};

pub use result::{MergedElement, MergedResult, MissedKey, TrimmedKey};

/// Sort-merge the per-key replies of one distributed smget.
///
/// Each [`ElementSet`](crate::collection::ElementSet) is already sorted
/// ascending; the merge walks every set in `options.direction` and pops
/// elements from a heap of per-key cursors, so the output is globally
/// ordered without re-sorting anything. Equal BKeys from different cache
/// keys pop consecutively in cache-key order, which is what makes the
/// adjacent-only dedup of [`DedupMode::Unique`] exact.
///
/// Missed keys are copied into the result. Trimmed keys are kept only when
/// their boundary lies at or before the last returned BKey in merge
/// direction; a trim past that point says nothing about the window the
/// caller received.
///
/// Fails only when non-empty sets disagree on the BKey form.
pub fn merge<V>(
    replies: BTreeMap<CacheKey, KeyReply<V>>,
    options: &MergeOptions,
) -> Result<MergedResult<V>> {
    let direction = options.direction;

    let mut sources: Vec<Source<V>> = Vec::with_capacity(replies.len());
    let mut missed_keys = Vec::new();
    let mut trimmed = Vec::new();
    let mut kind: Option<(BKeyKind, CacheKey)> = None;

    // BTreeMap iteration is cache-key order, so sources, missed keys and
    // trimmed keys all come out sorted.
    for (cache_key, reply) in replies {
        let set = match reply {
            KeyReply::Missed(status) => {
                missed_keys.push(MissedKey { cache_key, status });
                continue;
            }
            KeyReply::Found(set) => set,
        };

        if let Some(set_kind) = set.kind() {
            match &kind {
                Some((expected, first_key)) if *expected != set_kind => {
                    debug!(
                        first = %first_key,
                        conflicting = %cache_key,
                        "smget replies mix bkey types"
                    );
                    return Err(Error::KeyTypeMismatch {
                        left: expected.name(),
                        right: set_kind.name(),
                    });
                }
                Some(_) => {}
                None => kind = Some((set_kind, cache_key.clone())),
            }
        }

        if set.is_trimmed() {
            trimmed.push(TrimmedKey {
                cache_key: cache_key.clone(),
                boundary: set.boundary(direction).cloned(),
            });
        }
        if !set.is_empty() {
            sources.push(Source::new(cache_key, set.into_elements()));
        }
    }

    debug!(
        sources = sources.len(),
        missed = missed_keys.len(),
        trimmed = trimmed.len(),
        count = options.count,
        offset = options.offset,
        "smget merge seeded"
    );

    let elements = match direction {
        Direction::Ascending => drain::<V, Forward>(&mut sources, options),
        Direction::Descending => drain::<V, Backward>(&mut sources, options),
    };

    let trimmed_keys = match elements.last() {
        Some(last) => prune_trimmed(trimmed, last.bkey(), direction),
        None => trimmed,
    };

    debug!(
        elements = elements.len(),
        missed = missed_keys.len(),
        trimmed = trimmed_keys.len(),
        "smget merge finished"
    );

    Ok(MergedResult {
        elements,
        missed_keys,
        trimmed_keys,
    })
}

/// Pop the heap of per-source cursors until `options.count` elements are out.
fn drain<V, O: Orientation>(
    sources: &mut [Source<V>],
    options: &MergeOptions,
) -> Vec<MergedElement<V>> {
    let direction = O::DIRECTION;

    let mut heap: BinaryHeap<HeapEntry<V, O>> = BinaryHeap::with_capacity(sources.len());
    for (index, source) in sources.iter_mut().enumerate() {
        if let Some(element) = source.take(0, direction) {
            heap.push(HeapEntry::new(element, index, 0));
        }
    }

    let mut elements: Vec<MergedElement<V>> = Vec::with_capacity(options.count.min(1024));
    let mut last_accepted: Option<BKey> = None;
    let mut to_skip = options.offset;

    while elements.len() < options.count {
        let Some(entry) = heap.pop() else {
            break;
        };
        let HeapEntry {
            element,
            source,
            pos,
            ..
        } = entry;

        if let Some(next) = sources[source].take(pos + 1, direction) {
            heap.push(HeapEntry::new(next, source, pos + 1));
        }

        if options.dedup == DedupMode::Unique {
            if last_accepted.as_ref() == Some(element.bkey()) {
                trace!(cache_key = %sources[source].cache_key, bkey = %element.bkey(), "duplicate bkey skipped");
                continue;
            }
            last_accepted = Some(element.bkey().clone());
        }

        if to_skip > 0 {
            to_skip -= 1;
            continue;
        }

        elements.push(MergedElement {
            cache_key: sources[source].cache_key.clone(),
            element,
        });
    }
    elements
}

/// Drop trimmed keys whose boundary lies strictly past `last` in `direction`.
fn prune_trimmed(trimmed: Vec<TrimmedKey>, last: &BKey, direction: Direction) -> Vec<TrimmedKey> {
    trimmed
        .into_iter()
        .filter(|t| {
            let Some(boundary) = &t.boundary else {
                return true;
            };
            let beyond = match direction {
                Direction::Ascending => Ordering::Greater,
                Direction::Descending => Ordering::Less,
            };
            let keep = boundary.cmp_same_kind(last) != beyond;
            if !keep {
                trace!(cache_key = %t.cache_key, %boundary, %last, "trimmed key outside window");
            }
            keep
        })
        .collect()
}
