use std::cmp::Ordering;
use std::marker::PhantomData;

use crate::element::Element;
use crate::types::{CacheKey, Direction};

/// One cache key's elements, consumed by index as the merge advances.
///
/// Slots are emptied as their element moves into the heap, so every
/// element is owned by exactly one place at a time.
pub(crate) struct Source<V> {
    pub cache_key: CacheKey,
    slots: Vec<Option<Element<V>>>,
}

impl<V> Source<V> {
    pub fn new(cache_key: CacheKey, elements: Vec<Element<V>>) -> Self {
        Source {
            cache_key,
            slots: elements.into_iter().map(Some).collect(),
        }
    }

    /// Take the element `pos` steps from the start in `direction`.
    pub fn take(&mut self, pos: usize, direction: Direction) -> Option<Element<V>> {
        let len = self.slots.len();
        if pos >= len {
            return None;
        }
        let index = match direction {
            Direction::Ascending => pos,
            Direction::Descending => len - 1 - pos,
        };
        self.slots[index].take()
    }
}

/// Compile-time merge direction for heap entries.
pub(crate) trait Orientation {
    const DIRECTION: Direction;

    /// Turn an ascending bkey comparison into one for this direction.
    fn orient(ord: Ordering) -> Ordering;
}

pub(crate) struct Forward;

pub(crate) struct Backward;

impl Orientation for Forward {
    const DIRECTION: Direction = Direction::Ascending;

    fn orient(ord: Ordering) -> Ordering {
        ord
    }
}

impl Orientation for Backward {
    const DIRECTION: Direction = Direction::Descending;

    fn orient(ord: Ordering) -> Ordering {
        ord.reverse()
    }
}

/// Heap cursor: the next unmerged element of one source.
///
/// Ordering: (bkey in merge direction, source index ASC). Sources are
/// indexed in cache-key order, so ties on bkey resolve by cache key. The
/// direction lives in `O`, so entries carry no per-entry copy of it.
pub(crate) struct HeapEntry<V, O> {
    pub element: Element<V>,
    pub source: usize,
    pub pos: usize,
    orientation: PhantomData<O>,
}

impl<V, O: Orientation> HeapEntry<V, O> {
    pub fn new(element: Element<V>, source: usize, pos: usize) -> Self {
        HeapEntry {
            element,
            source,
            pos,
            orientation: PhantomData,
        }
    }

    fn rank(&self, other: &Self) -> Ordering {
        O::orient(self.element.bkey().cmp_same_kind(other.element.bkey()))
            .then_with(|| self.source.cmp(&other.source))
    }
}

impl<V, O: Orientation> PartialEq for HeapEntry<V, O> {
    fn eq(&self, other: &Self) -> bool {
        self.rank(other) == Ordering::Equal
    }
}

impl<V, O: Orientation> Eq for HeapEntry<V, O> {}

impl<V, O: Orientation> PartialOrd for HeapEntry<V, O> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<V, O: Orientation> Ord for HeapEntry<V, O> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; the lowest rank must surface first.
        other.rank(self)
    }
}
