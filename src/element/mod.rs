pub mod filter;

use std::cmp::Ordering;
use std::fmt;

use crate::bkey::BKey;
use crate::error::{Error, Result};

pub use filter::{BitOp, CompOp, EFlagFilter};

/// Opaque element flag attached to an element for server-side filtering.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EFlag {
    bytes: Vec<u8>,
}

impl EFlag {
    /// Longest element flag a collection accepts.
    pub const MAX_LEN: usize = 31;

    pub fn new(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() || bytes.len() > Self::MAX_LEN {
            return Err(Error::InvalidEFlag(format!(
                "eflag must be 1..={} bytes, got {}",
                Self::MAX_LEN,
                bytes.len()
            )));
        }
        Ok(EFlag {
            bytes: bytes.to_vec(),
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Display for EFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode_upper(&self.bytes))
    }
}

/// One element of a B-tree collection: BKey, value, optional eflag.
///
/// Elements are ordered by BKey alone; equality also covers the value and
/// the eflag. A nullable value is spelled `Element<Option<T>>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element<V> {
    bkey: BKey,
    value: V,
    eflag: Option<EFlag>,
}

impl<V> Element<V> {
    pub fn new(bkey: BKey, value: V) -> Self {
        Element {
            bkey,
            value,
            eflag: None,
        }
    }

    pub fn with_eflag(bkey: BKey, value: V, eflag: EFlag) -> Self {
        Element {
            bkey,
            value,
            eflag: Some(eflag),
        }
    }

    pub fn bkey(&self) -> &BKey {
        &self.bkey
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn eflag(&self) -> Option<&EFlag> {
        self.eflag.as_ref()
    }

    /// Order two elements by BKey. Fails when the BKeys differ in form.
    pub fn try_cmp(&self, other: &Element<V>) -> Result<Ordering> {
        self.bkey.try_cmp(&other.bkey)
    }

    pub fn into_parts(self) -> (BKey, V, Option<EFlag>) {
        (self.bkey, self.value, self.eflag)
    }
}
