use std::cmp::Ordering;

use crate::element::{EFlag, Element};
use crate::error::{Error, Result};

/// Comparison applied between an element's flag slice and the filter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompOp {
    fn holds(self, ord: Ordering) -> bool {
        match self {
            CompOp::Eq => ord == Ordering::Equal,
            CompOp::Ne => ord != Ordering::Equal,
            CompOp::Lt => ord == Ordering::Less,
            CompOp::Le => ord != Ordering::Greater,
            CompOp::Gt => ord == Ordering::Greater,
            CompOp::Ge => ord != Ordering::Less,
        }
    }
}

/// Bitwise step applied to the flag slice before comparing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOp {
    And,
    Or,
    Xor,
}

impl BitOp {
    fn apply(self, a: u8, b: u8) -> u8 {
        match self {
            BitOp::And => a & b,
            BitOp::Or => a | b,
            BitOp::Xor => a ^ b,
        }
    }
}

/// Element flag filter carried by a range read.
///
/// Takes `value.len()` bytes of the element's eflag starting at `offset`,
/// optionally combines them with `bit_operand` through `bit_op`, and compares
/// the result lexicographically with `value`:
///
/// ```text
/// eflag:   [ .. offset .. | slice (value.len()) | .. ]
/// slice' = bit_op(slice, bit_operand)       (optional)
/// match  = comp_op(slice', value)
/// ```
///
/// Elements with no eflag, or an eflag too short for the slice, never match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EFlagFilter {
    offset: usize,
    comp_op: CompOp,
    value: Vec<u8>,
    bitwise: Option<(BitOp, Vec<u8>)>,
}

impl EFlagFilter {
    pub fn new(comp_op: CompOp, value: &[u8]) -> Result<Self> {
        if value.is_empty() || value.len() > EFlag::MAX_LEN {
            return Err(Error::InvalidFilter(format!(
                "compare value must be 1..={} bytes, got {}",
                EFlag::MAX_LEN,
                value.len()
            )));
        }
        Ok(EFlagFilter {
            offset: 0,
            comp_op,
            value: value.to_vec(),
            bitwise: None,
        })
    }

    /// Start the compared slice `offset` bytes into the flag.
    pub fn with_offset(mut self, offset: usize) -> Result<Self> {
        let end = offset.checked_add(self.value.len());
        if end.is_none_or(|end| end > EFlag::MAX_LEN) {
            return Err(Error::InvalidFilter(format!(
                "offset {offset} + {} bytes exceeds eflag length {}",
                self.value.len(),
                EFlag::MAX_LEN
            )));
        }
        self.offset = offset;
        Ok(self)
    }

    /// Combine the slice with `operand` before comparing.
    pub fn with_bitwise(mut self, op: BitOp, operand: &[u8]) -> Result<Self> {
        if operand.len() != self.value.len() {
            return Err(Error::InvalidFilter(format!(
                "bitwise operand is {} bytes, compare value is {}",
                operand.len(),
                self.value.len()
            )));
        }
        self.bitwise = Some((op, operand.to_vec()));
        Ok(self)
    }

    pub fn matches_eflag(&self, eflag: Option<&EFlag>) -> bool {
        let Some(eflag) = eflag else {
            return false;
        };
        let Some(end) = self.offset.checked_add(self.value.len()) else {
            return false;
        };
        let Some(slice) = eflag.as_bytes().get(self.offset..end) else {
            return false;
        };
        let ord = match &self.bitwise {
            Some((op, operand)) => {
                let masked: Vec<u8> = slice
                    .iter()
                    .zip(operand)
                    .map(|(a, b)| op.apply(*a, *b))
                    .collect();
                masked.as_slice().cmp(self.value.as_slice())
            }
            None => slice.cmp(self.value.as_slice()),
        };
        self.comp_op.holds(ord)
    }

    pub fn matches<V>(&self, element: &Element<V>) -> bool {
        self.matches_eflag(element.eflag())
    }
}
