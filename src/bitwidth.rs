//! Bit-width selection for blocks of `u32`.
//!
//! # Example
//! ```rust
//! use pfor32::bitwidth::select_width;
//! assert_eq!(select_width(&[0, 1, 2, 3]), 2);
//! assert_eq!(select_width(&[0, 0, 0]), 0);
//! assert_eq!(select_width(&[u32::MAX]), 32);
//! ```

/// Widest supported bit width
pub const MAX_WIDTH: u8 = 32;

/// number of bits needed to store `x`, i.e. `ceil(log2(x+1))`. Zero needs no bits.
#[inline]
pub fn bits_required(x: u32) -> u8 {
    (u32::BITS - x.leading_zeros()) as u8
}

/// Smallest bit width that can hold every element of the block.
///
/// Scans the entire block: OR-ing all elements yields a value with the same
/// highest set bit as the maximum.
pub fn select_width(block: &[u32]) -> u8 {
    let acc = block.iter().fold(0_u32, |acc, &x| acc | x);
    bits_required(acc)
}

/// Histogram of required bit widths: `hist[w]` is the number of elements
/// needing exactly `w` bits.
pub fn width_histogram(block: &[u32]) -> [usize; MAX_WIDTH as usize + 1] {
    let mut hist = [0_usize; MAX_WIDTH as usize + 1];
    for &x in block {
        hist[bits_required(x) as usize] += 1;
    }
    hist
}
