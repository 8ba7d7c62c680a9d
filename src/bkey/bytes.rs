use std::fmt;

use crate::error::{Error, Result};

/// Byte-string BKey payload: 0 to 31 bytes, compared lexicographically.
///
/// The bytes are owned, so a key built from a caller's buffer never aliases
/// it and readers only ever get a shared slice or a fresh copy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ByteBKey {
    bytes: Vec<u8>,
}

impl ByteBKey {
    /// Longest byte BKey a collection accepts.
    pub const MAX_LEN: usize = 31;

    pub fn new(bytes: &[u8]) -> Result<Self> {
        if bytes.len() > Self::MAX_LEN {
            return Err(Error::InvalidBKey(format!(
                "byte bkey is {} bytes, max is {}",
                bytes.len(),
                Self::MAX_LEN
            )));
        }
        Ok(ByteBKey {
            bytes: bytes.to_vec(),
        })
    }

    /// Smallest byte BKey (the empty string).
    pub fn min() -> Self {
        ByteBKey { bytes: Vec::new() }
    }

    /// Largest byte BKey (31 bytes of `0xFF`).
    pub fn max() -> Self {
        ByteBKey {
            bytes: vec![0xFF; Self::MAX_LEN],
        }
    }

    /// Parse a hex string, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes = hex::decode(digits)
            .map_err(|e| Error::InvalidBKey(format!("{s:?} is not a hex byte string: {e}")))?;
        Self::new(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Uppercase hex without prefix.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(&self.bytes)
    }
}

impl fmt::Display for ByteBKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}
