//! Byte layout of an [`EncodedBlock`].
//!
//! # Memory layout
//! All integers little-endian:
//! ```text
//! | base_width: u8 | n_exceptions: u32 | n_exceptions * (position: u32, value: u32) | packed bytes |
//! ```
//! The number of packed bytes isn't stored; it follows from the element count
//! (`ceil(count * base_width / 8)`), hence parsing needs the count.
//!
//! # Example
//! ```rust
//! use pfor32::pfor::{encode, EncodedBlock, ExceptionBudget};
//! let block: Vec<u32> = (0..128).collect();
//! let bytes = encode(&block, ExceptionBudget::Count(0)).unwrap().to_bytes();
//! assert_eq!(bytes.len(), 5 + 112);
//!
//! let (parsed, bytes_consumed) = EncodedBlock::from_bytes(&bytes, 128).unwrap();
//! assert_eq!(parsed.base_width, 7);
//! assert_eq!(bytes_consumed, bytes.len());
//! ```

use crate::bitpack::packed_len;
use crate::bitwidth::MAX_WIDTH;
use crate::error::CodecError;
use crate::pfor::{EncodedBlock, Exception};

/// bytes taken by `base_width` and the exception count
pub const HEADER_LEN: usize = 5;
/// bytes per stored exception
pub const EXCEPTION_LEN: usize = 8;

fn read_u32_le(buf: &[u8], offset: usize) -> Result<u32, CodecError> {
    let bytes: [u8; 4] = buf
        .get(offset..offset + 4)
        .and_then(|b| b.try_into().ok())
        .ok_or(CodecError::TruncatedBuffer { required: offset + 4, available: buf.len() })?;
    Ok(u32::from_le_bytes(bytes))
}

impl EncodedBlock {
    /// Size of the block in bytes once written with [`EncodedBlock::write_to`]
    pub fn encoded_size(&self) -> usize {
        HEADER_LEN + EXCEPTION_LEN * self.exceptions.len() + self.packed.len()
    }

    /// Append the byte representation of the block to `out`
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.reserve(self.encoded_size());
        out.push(self.base_width);
        out.extend((self.exceptions.len() as u32).to_le_bytes());
        for ex in &self.exceptions {
            out.extend(ex.position.to_le_bytes());
            out.extend(ex.value.to_le_bytes());
        }
        out.extend_from_slice(&self.packed);
    }

    /// Byte representation of the block
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_size());
        self.write_to(&mut out);
        out
    }

    /// Parse a block holding `count` elements from the front of `buf`.
    ///
    /// Doesn't consume `buf`; returns the block together with the number of bytes read,
    /// so whatever follows can be processed via `&buf[bytes_consumed..]`.
    ///
    /// Exception positions are not checked against `count` here, [`crate::pfor::decode`] does that.
    pub fn from_bytes(buf: &[u8], count: usize) -> Result<(Self, usize), CodecError> {
        let base_width = *buf
            .first()
            .ok_or(CodecError::TruncatedBuffer { required: HEADER_LEN, available: 0 })?;
        if base_width > MAX_WIDTH {
            return Err(CodecError::InvalidWidth(base_width));
        }
        let n_exceptions = read_u32_le(buf, 1)? as usize;

        // check the whole length up front, both the exception count and `count` may be garbage
        let n_packed = packed_len(count, base_width);
        let required = n_exceptions
            .checked_mul(EXCEPTION_LEN)
            .zip(n_packed)
            .and_then(|(n_ex, n_packed)| n_ex.checked_add(n_packed))
            .and_then(|n| n.checked_add(HEADER_LEN))
            .unwrap_or(usize::MAX);
        if buf.len() < required {
            return Err(CodecError::TruncatedBuffer { required, available: buf.len() });
        }

        let mut pos = HEADER_LEN;
        let mut exceptions = Vec::with_capacity(n_exceptions);
        for _ in 0..n_exceptions {
            let position = read_u32_le(buf, pos)?;
            let value = read_u32_le(buf, pos + 4)?;
            exceptions.push(Exception { position, value });
            pos += EXCEPTION_LEN;
        }

        // checked above
        let n_packed = n_packed.unwrap_or_default();
        let packed = buf[pos..pos + n_packed].to_vec();
        pos += n_packed;

        Ok((EncodedBlock { base_width, packed, exceptions }, pos))
    }
}
