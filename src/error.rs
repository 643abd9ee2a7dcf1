//! Error type shared by all codec operations.
//!
//! None of these are retried internally, they are handed back to the caller as-is.

use crate::pfor::ExceptionBudget;

/// Errors returned by packing, PFor coding and container parsing
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
    /// A value needs more bits than the declared width
    #[error("value {value} does not fit into {width} bits")]
    WidthOverflow {
        /// the offending value
        value: u32,
        /// declared bit width
        width: u8,
    },
    /// Not enough bytes to read the requested number of elements (or a container header)
    #[error("truncated buffer: {required} bytes required, {available} available")]
    TruncatedBuffer {
        /// bytes needed
        required: usize,
        /// bytes actually present
        available: usize,
    },
    /// No bit width in [0, 32] satisfies the exception budget
    #[error("no bit width satisfies exception budget {0:?}")]
    BudgetUnreachable(ExceptionBudget),
    /// An exception points past the end of the block
    #[error("exception position {position} out of range for block of {count} elements")]
    PositionOutOfRange {
        /// position stored in the exception list
        position: u32,
        /// number of elements being decoded
        count: usize,
    },
    /// A bit width outside [0, 32]
    #[error("invalid bit width {0} (must be 0..=32)")]
    InvalidWidth(u8),
    /// Stream blocksize of zero
    #[error("invalid blocksize {0}")]
    InvalidBlockSize(usize),
    /// Block too long for u32 exception positions, or too large to allocate
    #[error("block of {len} elements is too large")]
    BlockTooLarge {
        /// length of the rejected block
        len: usize,
    },
}

impl CodecError {
    /// Process exit code for this error kind, distinct per variant.
    ///
    /// Codes 0 to 2 are left for success, generic failures and command line usage errors
    /// (the code `clap` exits with).
    pub const fn exit_code(&self) -> u8 {
        match self {
            CodecError::WidthOverflow { .. } => 3,
            CodecError::TruncatedBuffer { .. } => 4,
            CodecError::BudgetUnreachable(_) => 5,
            CodecError::PositionOutOfRange { .. } => 6,
            CodecError::InvalidWidth(_) => 7,
            CodecError::InvalidBlockSize(_) => 8,
            CodecError::BlockTooLarge { .. } => 9,
        }
    }
}

#[cfg(test)]
mod test {
    use super::CodecError;
    use crate::pfor::ExceptionBudget;
    use itertools::Itertools;

    #[test]
    fn test_exit_codes_distinct() {
        let errors = [
            CodecError::WidthOverflow { value: 8, width: 3 },
            CodecError::TruncatedBuffer { required: 4, available: 3 },
            CodecError::BudgetUnreachable(ExceptionBudget::Fraction(-1.0)),
            CodecError::PositionOutOfRange { position: 9, count: 4 },
            CodecError::InvalidWidth(33),
            CodecError::InvalidBlockSize(0),
            CodecError::BlockTooLarge { len: 0 },
        ];
        let codes = errors.iter().map(|e| e.exit_code()).collect_vec();
        // 2 is what clap exits with on usage errors
        assert!(codes.iter().all(|&c| c > 2));
        assert_eq!(codes.iter().unique().count(), errors.len());
    }

    #[test]
    fn test_display() {
        let e = CodecError::WidthOverflow { value: 1000, width: 4 };
        assert_eq!(e.to_string(), "value 1000 does not fit into 4 bits");

        let e = CodecError::TruncatedBuffer { required: 112, available: 111 };
        assert!(e.to_string().contains("112"));
        assert!(e.to_string().contains("111"));
    }
}
