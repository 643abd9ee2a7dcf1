//! Crate implementing bit-packing and PFor (Patched Frame Of Reference) compression of `u32` blocks.
//!
//! # Overview
//! Three layers, each usable on its own:
//! * [`bitwidth`]: the minimal number of bits covering every value of a block
//! * [`bitpack`]: packing a block into a dense bitstream at one uniform bit width
//! * [`pfor`]: picks a narrow base width for the bulk of a block and stores
//!   the outliers that don't fit as separate `(position, value)` exceptions
//!
//! On top of that, [`container`] defines the byte layout of an encoded block
//! and [`stream`] encodes arbitrarily long inputs block by block.
//!
//! All operations are stateless: they only read their input and return freshly allocated output,
//! so they can be called concurrently from any number of threads.
//!
//! # Example
//! ```rust
//! use pfor32::bitwidth::select_width;
//! use pfor32::bitpack::{pack, unpack};
//! use pfor32::pfor::{encode, decode, ExceptionBudget};
//!
//! let block: Vec<u32> = (0..128).collect();
//!
//! // plain bitpacking
//! let width = select_width(&block);
//! assert_eq!(width, 7);
//! let packed = pack(&block, width).unwrap();
//! assert_eq!(packed.len(), 112);
//! assert_eq!(unpack(&packed, width, block.len()).unwrap(), block);
//!
//! // PFor, allowing up to 1/8 of the block as exceptions
//! let encoded = encode(&block, ExceptionBudget::default()).unwrap();
//! let decoded = decode(&encoded, block.len()).unwrap();
//! assert_eq!(decoded, block);
//! ```
//!
//! # Bit order
//! Packed values are stored LSB-first, see [`bitpack`]. The same bitvec types are
//! used for writing and reading, which keeps encoder and decoder consistent.
#![deny(missing_docs)]
pub mod bitwidth;
pub mod bitpack;
pub mod pfor;
pub mod container;
pub mod stream;
pub mod error;
pub mod logging;

use bitvec::prelude as bv;

pub use error::CodecError;
pub use pfor::{EncodedBlock, Exception, ExceptionBudget};

/// The type of bitslice used for the packed buffers.
/// Bits are counted from the least significant end of each byte.
pub(crate) type MyBitSlice = bv::BitSlice<u8, bv::Lsb0>;
/// owned version of [MyBitSlice]
pub(crate) type MyBitVector = bv::BitVec<u8, bv::Lsb0>;
