//! Fixed-width bit-packing of `u32` blocks.
//!
//! Each value is stored with exactly `width` bits, back to back, in a byte buffer
//! of `ceil(count * width / 8)` bytes.
//!
//! # Bit order
//! LSB-first: value `i` occupies stream bits `[i*width, (i+1)*width)`, its lowest bit first.
//! Stream bit `p` is bit `p % 8` (weight `2^(p%8)`) of byte `p / 8`.
//! Unused high bits of the last byte are zero.
//!
//! # Example
//! ```rust
//! use pfor32::bitpack::{pack, unpack};
//! let data = vec![1, 2, 3, 0];
//! let packed = pack(&data, 2).unwrap();
//! assert_eq!(packed, vec![0b00_11_10_01]);
//! assert_eq!(unpack(&packed, 2, 4).unwrap(), data);
//! ```

use bitvec::field::BitField;
use crate::bitwidth::{bits_required, MAX_WIDTH};
use crate::error::CodecError;
use crate::{MyBitSlice, MyBitVector};

/// number of bytes needed to pack `count` elements at `width` bits each,
/// `None` if the bit count overflows `usize`
/// ```rust
/// use pfor32::bitpack::packed_len;
/// assert_eq!(packed_len(128, 7), Some(112));
/// assert_eq!(packed_len(3, 3), Some(2));
/// assert_eq!(packed_len(100, 0), Some(0));
/// assert_eq!(packed_len(usize::MAX, 2), None);
/// ```
pub fn packed_len(count: usize, width: u8) -> Option<usize> {
    count.checked_mul(width as usize).map(|bits| bits.div_ceil(8))
}

/// empty vector with room for `count` elements; fails instead of aborting
/// when the allocation is impossible
pub(crate) fn reserve_block(count: usize) -> Result<Vec<u32>, CodecError> {
    let mut block = Vec::new();
    block
        .try_reserve_exact(count)
        .map_err(|_| CodecError::BlockTooLarge { len: count })?;
    Ok(block)
}

fn check_width(width: u8) -> Result<(), CodecError> {
    if width > MAX_WIDTH {
        return Err(CodecError::InvalidWidth(width));
    }
    Ok(())
}

/// Pack `block` using `width` bits per element.
///
/// Fails with [`CodecError::WidthOverflow`] if any element needs more than `width` bits,
/// and with [`CodecError::InvalidWidth`] for widths above 32.
/// With `width == 0` (all elements zero) the result is empty.
pub fn pack(block: &[u32], width: u8) -> Result<Vec<u8>, CodecError> {
    check_width(width)?;
    let mut buf = PrimaryBuffer::new(width, block.len())?;
    for &el in block {
        buf.add_element(el)?;
    }
    tracing::trace!(n_elements = block.len(), width, "packed block");
    Ok(buf.into_bytes())
}

/// Unpack `count` elements of `width` bits from `packed`.
///
/// Only the first [`packed_len`]`(count, width)` bytes are read; anything after is ignored.
/// Fails with [`CodecError::TruncatedBuffer`] if `packed` is shorter than that.
/// With `width == 0` the result is `count` zeros, whatever the buffer holds;
/// a `count` too large to allocate fails with [`CodecError::BlockTooLarge`].
pub fn unpack(packed: &[u8], width: u8, count: usize) -> Result<Vec<u32>, CodecError> {
    check_width(width)?;
    if width == 0 {
        let mut zeros = reserve_block(count)?;
        zeros.resize(count, 0);
        return Ok(zeros);
    }

    // a bit count beyond usize can't be backed by any buffer
    let required = packed_len(count, width).unwrap_or(usize::MAX);
    if packed.len() < required {
        return Err(CodecError::TruncatedBuffer { required, available: packed.len() });
    }

    let bits = MyBitSlice::from_slice(&packed[..required]);
    let decoded: Vec<u32> = bits
        .chunks_exact(width as usize)
        .take(count)
        .map(decode_element)
        .collect();
    Ok(decoded)
}

/// elements are stored using `width` bits, low bit first
#[inline]
fn decode_element(x: &MyBitSlice) -> u32 {
    x.load_le()
}

/// Dense buffer of fixed-width elements, filled one element at a time.
///
/// Unlike a truncating store, adding an element that doesn't fit is an error.
#[derive(Debug)]
struct PrimaryBuffer {
    buffer: MyBitVector,
    width: usize,       // bits per int
    capacity: usize,    // max number of elements that can be stored
    n_elements: usize,  // elements stored so far
}

impl PrimaryBuffer {
    /// create a zeroed buffer for `capacity` elements of `width` bits
    fn new(width: u8, capacity: usize) -> Result<Self, CodecError> {
        let n_bytes = packed_len(capacity, width).ok_or(CodecError::BlockTooLarge { len: capacity })?;
        let buffer = MyBitVector::from_vec(vec![0_u8; n_bytes]);
        Ok(PrimaryBuffer { buffer, width: width as usize, capacity, n_elements: 0 })
    }

    /// appends a single element; fails if it needs more than `width` bits
    fn add_element(&mut self, el: u32) -> Result<(), CodecError> {
        if bits_required(el) as usize > self.width {
            return Err(CodecError::WidthOverflow { value: el, width: self.width as u8 });
        }
        assert!(self.n_elements < self.capacity, "storing too many elements");

        // zero-width elements occupy no bits at all
        if self.width > 0 {
            let pos = self.n_elements * self.width;
            self.buffer[pos..pos + self.width].store_le::<u32>(el);
        }
        self.n_elements += 1;
        Ok(())
    }

    fn into_bytes(self) -> Vec<u8> {
        self.buffer.into_vec()
    }
}
