pub mod builder;

use crate::bkey::{BKey, BKeyKind};
use crate::element::Element;
use crate::types::{Direction, MissStatus};

pub use builder::ElementSetBuilder;

/// Elements one shard returned for one cache key.
///
/// Sorted ascending by BKey, unique BKeys, a single BKey form. The trimmed
/// flag records that the shard's overflow eviction cut the collection
/// before the requested range was fully enumerated.
///
/// Built through [`ElementSetBuilder`]; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSet<V> {
    elements: Vec<Element<V>>,
    trimmed: bool,
}

impl<V> ElementSet<V> {
    pub fn builder() -> ElementSetBuilder<V> {
        ElementSetBuilder::new()
    }

    /// Ascending, read-only view of the elements.
    pub fn elements(&self) -> &[Element<V>] {
        &self.elements
    }

    /// Walk the elements in the given direction.
    pub fn iter_directed(
        &self,
        direction: Direction,
    ) -> Box<dyn Iterator<Item = &Element<V>> + '_> {
        match direction {
            Direction::Ascending => Box::new(self.elements.iter()),
            Direction::Descending => Box::new(self.elements.iter().rev()),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn is_trimmed(&self) -> bool {
        self.trimmed
    }

    /// BKey form shared by every element, `None` when empty.
    pub fn kind(&self) -> Option<BKeyKind> {
        self.elements.first().map(|e| e.bkey().kind())
    }

    /// BKey of the last element in the given direction.
    ///
    /// For a trimmed set this is the point past which the shard could not
    /// vouch for completeness.
    pub fn boundary(&self, direction: Direction) -> Option<&BKey> {
        let last = match direction {
            Direction::Ascending => self.elements.last(),
            Direction::Descending => self.elements.first(),
        };
        last.map(Element::bkey)
    }

    pub(crate) fn into_elements(self) -> Vec<Element<V>> {
        self.elements
    }
}

/// Decoded outcome of one per-key range read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyReply<V> {
    /// The collection exists; it may still hold no elements in range.
    Found(ElementSet<V>),
    /// The key could not be read.
    Missed(MissStatus),
}

impl<V> KeyReply<V> {
    pub fn missed(&self) -> Option<&MissStatus> {
        match self {
            KeyReply::Found(_) => None,
            KeyReply::Missed(status) => Some(status),
        }
    }
}

impl<V> From<ElementSet<V>> for KeyReply<V> {
    fn from(set: ElementSet<V>) -> Self {
        KeyReply::Found(set)
    }
}

impl<V> From<MissStatus> for KeyReply<V> {
    fn from(status: MissStatus) -> Self {
        KeyReply::Missed(status)
    }
}
