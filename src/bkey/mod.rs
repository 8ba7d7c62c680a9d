pub mod bytes;

use std::cmp::Ordering;
use std::fmt;

use crate::error::{Error, Result};

pub use bytes::ByteBKey;

/// Which of the two BKey forms a key (or a whole collection) uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BKeyKind {
    Integer,
    Bytes,
}

impl BKeyKind {
    pub fn name(self) -> &'static str {
        match self {
            BKeyKind::Integer => "integer",
            BKeyKind::Bytes => "bytes",
        }
    }
}

/// The sort key of one element inside a B-tree collection.
///
/// Either a non-negative 64-bit integer or a byte string of at most 31
/// bytes. Keys of the same form have a total order; keys of different forms
/// are not comparable, so `BKey` deliberately has no `Ord` impl and
/// [`BKey::try_cmp`] returns [`Error::KeyTypeMismatch`] instead.
///
/// ```text
/// Integer:  0 < 1 < 2 < ... < u64::MAX
/// Bytes:    0x < 0x00 < 0x0001 < 0x01 < ... < 0xFF..FF (31 bytes)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BKey {
    Integer(u64),
    Bytes(ByteBKey),
}

impl BKey {
    /// Build an integer BKey. Negative values are rejected.
    pub fn integer(value: i64) -> Result<Self> {
        u64::try_from(value)
            .map(BKey::Integer)
            .map_err(|_| Error::InvalidBKey(format!("integer bkey must be >= 0, got {value}")))
    }

    /// Build a byte BKey of at most [`ByteBKey::MAX_LEN`] bytes.
    pub fn bytes(bytes: &[u8]) -> Result<Self> {
        ByteBKey::new(bytes).map(BKey::Bytes)
    }

    /// Parse a BKey from text.
    ///
    /// Decimal integers become [`BKey::Integer`]; anything else must be a
    /// hex byte string (optionally `0x`-prefixed) and becomes
    /// [`BKey::Bytes`].
    pub fn parse(s: &str) -> Result<Self> {
        if let Ok(n) = s.parse::<u64>() {
            return Ok(BKey::Integer(n));
        }
        ByteBKey::from_hex(s).map(BKey::Bytes)
    }

    pub fn kind(&self) -> BKeyKind {
        match self {
            BKey::Integer(_) => BKeyKind::Integer,
            BKey::Bytes(_) => BKeyKind::Bytes,
        }
    }

    pub fn as_integer(&self) -> Option<u64> {
        match self {
            BKey::Integer(n) => Some(*n),
            BKey::Bytes(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            BKey::Integer(_) => None,
            BKey::Bytes(b) => Some(b.as_bytes()),
        }
    }

    /// Compare two keys of the same form.
    pub fn try_cmp(&self, other: &BKey) -> Result<Ordering> {
        match (self, other) {
            (BKey::Integer(a), BKey::Integer(b)) => Ok(a.cmp(b)),
            (BKey::Bytes(a), BKey::Bytes(b)) => Ok(a.cmp(b)),
            _ => Err(Error::KeyTypeMismatch {
                left: self.kind().name(),
                right: other.kind().name(),
            }),
        }
    }

    /// Ordering used once every participating key is known to share one form.
    ///
    /// Mixed forms sort integers first; callers validate before relying on it.
    pub(crate) fn cmp_same_kind(&self, other: &BKey) -> Ordering {
        match (self, other) {
            (BKey::Integer(a), BKey::Integer(b)) => a.cmp(b),
            (BKey::Bytes(a), BKey::Bytes(b)) => a.cmp(b),
            (BKey::Integer(_), BKey::Bytes(_)) => Ordering::Less,
            (BKey::Bytes(_), BKey::Integer(_)) => Ordering::Greater,
        }
    }

    /// Decimal for integers, bare uppercase hex for byte keys.
    pub fn to_hex(&self) -> String {
        match self {
            BKey::Integer(n) => n.to_string(),
            BKey::Bytes(b) => b.to_hex(),
        }
    }
}

impl From<u64> for BKey {
    fn from(value: u64) -> Self {
        BKey::Integer(value)
    }
}

impl From<ByteBKey> for BKey {
    fn from(value: ByteBKey) -> Self {
        BKey::Bytes(value)
    }
}

impl fmt::Display for BKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BKey::Integer(n) => write!(f, "{n}"),
            BKey::Bytes(b) => write!(f, "{b}"),
        }
    }
}
