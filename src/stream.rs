//! PFor coding of arbitrarily long streams, block by block.
//!
//! The input is split into blocks of `blocksize` elements (the last one may be shorter),
//! each block is [PFor-encoded](crate::pfor::encode) with its own base width and
//! exceptions, and the [containers](crate::container) are concatenated.
//!
//! As the containers don't store their element count, decoding needs
//! the total number of elements and the blocksize used for encoding.
//!
//! # Example
//! ```rust
//! use pfor32::pfor::ExceptionBudget;
//! use pfor32::stream::{encode, decode};
//! let data: Vec<u32> = (0..1000).map(|x| x % 100).collect();
//! let blocksize = 128;
//!
//! let (encoded, n_elements) = encode(data.iter().cloned(), blocksize, ExceptionBudget::default()).unwrap();
//! assert_eq!(n_elements, data.len());
//!
//! let (decoded, bytes_processed) = decode(&encoded, n_elements, blocksize).unwrap();
//! assert_eq!(decoded, data);
//! assert_eq!(bytes_processed, encoded.len()); // the entire buffer was consumed
//! ```

use itertools::Itertools;
use tracing::debug;
use crate::bitpack;
use crate::error::CodecError;
use crate::pfor::{self, EncodedBlock, ExceptionBudget};

/// Encode a stream of integers, `blocksize` elements per PFor block.
///
/// # Returns
/// * the concatenated encoded blocks
/// * the number of elements that were encoded (size of the input iterator)
pub fn encode(
    input_stream: impl Iterator<Item = u32>,
    blocksize: usize,
    budget: ExceptionBudget,
) -> Result<(Vec<u8>, usize), CodecError> {
    if blocksize == 0 {
        return Err(CodecError::InvalidBlockSize(blocksize));
    }

    let mut n_elements = 0;
    let mut n_blocks = 0;
    let mut encoded = Vec::new();
    for chunk in &input_stream.chunks(blocksize) {
        let block = chunk.collect_vec();
        n_elements += block.len();
        n_blocks += 1;
        pfor::encode(&block, budget)?.write_to(&mut encoded);
    }
    debug!(n_elements, n_blocks, n_bytes = encoded.len(), "encoded stream");
    Ok((encoded, n_elements))
}

/// Decode `n_elements` integers that were encoded with [`encode`] using `blocksize`.
///
/// # Returns
/// * the decoded values (`len() == n_elements`)
/// * the number of bytes processed in the input buffer; any data after that is left alone
pub fn decode(buf: &[u8], n_elements: usize, blocksize: usize) -> Result<(Vec<u32>, usize), CodecError> {
    if blocksize == 0 {
        return Err(CodecError::InvalidBlockSize(blocksize));
    }

    let mut pos = 0;
    let mut elements = bitpack::reserve_block(n_elements)?;
    while elements.len() < n_elements {
        let count = blocksize.min(n_elements - elements.len());
        let (block, bytes_consumed) = EncodedBlock::from_bytes(&buf[pos..], count)?;
        elements.extend(pfor::decode(&block, count)?);
        pos += bytes_consumed;
    }
    Ok((elements, pos))
}
