//! PFor (patched frame of reference) coding of a single block.
//!
//! Most elements of a block are bit-packed with a common `base_width`.
//! The few elements that don't fit (exceptions) are replaced by `0` in the packed
//! base layer and recorded separately as `(position, value)` pairs.
//! Decoding unpacks the base layer and patches the exceptions back in.
//!
//! The base width is the smallest width for which the number of exceptions stays
//! within an [`ExceptionBudget`]. Smaller widths give a denser base layer but
//! more exceptions; the budget keeps the exception list from dominating.
//!
//! # Example
//! ```rust
//! use pfor32::pfor::{encode, decode, ExceptionBudget};
//! let mut block = vec![3_u32; 128];
//! block[50] = 1_000_000;
//!
//! let encoded = encode(&block, ExceptionBudget::Count(1)).unwrap();
//! assert_eq!(encoded.base_width, 2);
//! assert_eq!(encoded.exceptions.len(), 1);
//!
//! let decoded = decode(&encoded, block.len()).unwrap();
//! assert_eq!(decoded, block);
//! ```

use itertools::Itertools;
use tracing::debug;
use crate::bitpack;
use crate::bitwidth::{bits_required, width_histogram, MAX_WIDTH};
use crate::error::CodecError;

/// value stored in the base layer in place of an exception
pub const EXCEPTION_SENTINEL: u32 = 0;

/// Upper bound on the number of exceptions a block may carry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExceptionBudget {
    /// at most this many exceptions
    Count(usize),
    /// at most `floor(fraction * block length)` exceptions
    Fraction(f64),
}

impl Default for ExceptionBudget {
    /// 1/8 of the block
    fn default() -> Self {
        ExceptionBudget::Fraction(0.125)
    }
}

impl ExceptionBudget {
    /// Maximum number of exceptions allowed in a block of `block_len` elements.
    ///
    /// Negative, NaN or infinite fractions are rejected with [`CodecError::BudgetUnreachable`].
    pub fn max_exceptions(&self, block_len: usize) -> Result<usize, CodecError> {
        match *self {
            ExceptionBudget::Count(n) => Ok(n),
            ExceptionBudget::Fraction(f) if f.is_finite() && f >= 0.0 => {
                Ok((f * block_len as f64).floor() as usize)
            }
            ExceptionBudget::Fraction(_) => Err(CodecError::BudgetUnreachable(*self)),
        }
    }
}

/// An element that didn't fit the base width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exception {
    /// index into the block
    pub position: u32,
    /// the original value
    pub value: u32,
}

/// A PFor-encoded block.
///
/// Unpacking `packed` at `base_width` and overwriting the positions in
/// `exceptions` reconstructs the original block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBlock {
    /// bits per element in `packed`
    pub base_width: u8,
    /// the bit-packed base layer
    pub packed: Vec<u8>,
    /// exceptions, sorted by position
    pub exceptions: Vec<Exception>,
}

/// Smallest base width such that at most `max_exceptions` elements need more bits.
///
/// Returns `None` only if no width in [0, 32] qualifies, which can't happen
/// since nothing needs more than 32 bits.
pub fn choose_base_width(block: &[u32], max_exceptions: usize) -> Option<u8> {
    let hist = width_histogram(block);

    // elements needing more than `w` bits, updated as `w` grows
    let mut excess = block.len();
    for w in 0..=MAX_WIDTH {
        excess -= hist[w as usize];
        if excess <= max_exceptions {
            return Some(w);
        }
    }
    None
}

/// PFor-encode a block.
///
/// # Parameters
/// * `block`: the values to encode, not modified
/// * `budget`: how many exceptions are acceptable
/// # Errors
/// * [`CodecError::BudgetUnreachable`] for an invalid budget
/// * [`CodecError::BlockTooLarge`] if positions don't fit into u32
pub fn encode(block: &[u32], budget: ExceptionBudget) -> Result<EncodedBlock, CodecError> {
    if u32::try_from(block.len()).is_err() {
        return Err(CodecError::BlockTooLarge { len: block.len() });
    }
    let max_exceptions = budget.max_exceptions(block.len())?;
    let base_width = choose_base_width(block, max_exceptions)
        .ok_or(CodecError::BudgetUnreachable(budget))?;

    // split off the values that dont fit into base_width
    let mut exceptions = Vec::new();
    let base = block
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            if bits_required(x) > base_width {
                exceptions.push(Exception { position: i as u32, value: x });
                EXCEPTION_SENTINEL
            } else {
                x
            }
        })
        .collect_vec();

    let packed = bitpack::pack(&base, base_width)?;
    debug!(
        n_elements = block.len(),
        base_width,
        n_exceptions = exceptions.len(),
        packed_bytes = packed.len(),
        "pfor encoded block"
    );
    Ok(EncodedBlock { base_width, packed, exceptions })
}

/// Decode a PFor block of `count` elements.
///
/// # Errors
/// * [`CodecError::TruncatedBuffer`] if the base layer is too short for `count` elements
/// * [`CodecError::PositionOutOfRange`] if an exception points at or past `count`
pub fn decode(encoded: &EncodedBlock, count: usize) -> Result<Vec<u32>, CodecError> {
    let mut decoded = bitpack::unpack(&encoded.packed, encoded.base_width, count)?;

    // patch the exceptions back in
    for ex in &encoded.exceptions {
        match decoded.get_mut(ex.position as usize) {
            Some(slot) => *slot = ex.value,
            None => return Err(CodecError::PositionOutOfRange { position: ex.position, count }),
        }
    }
    Ok(decoded)
}
