use crate::bkey::BKeyKind;
use crate::collection::ElementSet;
use crate::element::Element;
use crate::error::{Error, Result};

/// Accumulates decoded elements for one cache key.
///
/// The decode step streams elements in whatever order the reply carries
/// them; the builder keeps them sorted and unique, and fixes the trimmed
/// flag before the set becomes immutable.
#[derive(Debug, Clone)]
pub struct ElementSetBuilder<V> {
    elements: Vec<Element<V>>,
    trimmed: bool,
}

impl<V> Default for ElementSetBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> ElementSetBuilder<V> {
    pub fn new() -> Self {
        ElementSetBuilder {
            elements: Vec::new(),
            trimmed: false,
        }
    }

    /// Insert an element, replacing any element with the same BKey.
    ///
    /// Fails if the element's BKey form differs from the elements already
    /// added.
    pub fn add(&mut self, element: Element<V>) -> Result<()> {
        if let Some(kind) = self.kind() {
            let incoming = element.bkey().kind();
            if incoming != kind {
                return Err(Error::KeyTypeMismatch {
                    left: kind.name(),
                    right: incoming.name(),
                });
            }
        }

        let pos = self
            .elements
            .binary_search_by(|e| e.bkey().cmp_same_kind(element.bkey()));
        match pos {
            Ok(i) => self.elements[i] = element,
            Err(i) => self.elements.insert(i, element),
        }
        Ok(())
    }

    /// Chainable form of [`add`](Self::add).
    pub fn element(mut self, element: Element<V>) -> Result<Self> {
        self.add(element)?;
        Ok(self)
    }

    /// Record that the shard trimmed this collection.
    pub fn mark_trimmed(&mut self) -> &mut Self {
        self.trimmed = true;
        self
    }

    /// Chainable form of [`mark_trimmed`](Self::mark_trimmed).
    pub fn trimmed(mut self) -> Self {
        self.trimmed = true;
        self
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn kind(&self) -> Option<BKeyKind> {
        self.elements.first().map(|e| e.bkey().kind())
    }

    pub fn build(self) -> ElementSet<V> {
        ElementSet {
            elements: self.elements,
            trimmed: self.trimmed,
        }
    }
}

impl<V> ElementSet<V> {
    /// Build a set from decoded elements in any order.
    pub fn from_elements<I>(elements: I, trimmed: bool) -> Result<Self>
    where
        I: IntoIterator<Item = Element<V>>,
    {
        let mut builder = ElementSetBuilder::new();
        for element in elements {
            builder.add(element)?;
        }
        if trimmed {
            builder.mark_trimmed();
        }
        Ok(builder.build())
    }
}
