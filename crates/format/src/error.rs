use thiserror::Error;


/// How far a decoding failure reaches.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RecoveryScope {
    /// Only the current block is lost, the next frame is still aligned.
    Block,
    /// The rest of the file can not be trusted.
    File,
}


#[derive(Error, Debug)]
pub enum FormatError {
    #[error("truncated input at offset {offset}: needed {needed} bytes, got {available}")]
    TruncatedInput {
        offset: u64,
        needed: u64,
        available: u64,
    },

    #[error("malformed varint at offset {offset}: {reason}")]
    MalformedVarInt {
        offset: u64,
        reason: &'static str,
    },

    #[error("frame sync lost at offset {offset}: found {found:02x?} instead of a known magic")]
    FrameSyncLost {
        offset: u64,
        found: [u8; 4],
    },

    #[error("block at offset {offset} declares {size} bytes, limit is {max}")]
    OversizedBlock {
        offset: u64,
        size: u32,
        max: u32,
    },

    #[error("block at offset {offset} declares {declared} bytes, but only {consumed} were decoded")]
    SizeMismatch {
        offset: u64,
        declared: u64,
        consumed: u64,
    },

    #[error("unsupported transaction flag {flag:#04x} at offset {offset}")]
    UnsupportedTransactionFlag {
        offset: u64,
        flag: u8,
    },

    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
}


impl FormatError {
    pub fn scope(&self) -> RecoveryScope {
        match self {
            FormatError::TruncatedInput { .. }
            | FormatError::MalformedVarInt { .. }
            | FormatError::SizeMismatch { .. }
            | FormatError::UnsupportedTransactionFlag { .. } => RecoveryScope::Block,
            FormatError::FrameSyncLost { .. }
            | FormatError::OversizedBlock { .. }
            | FormatError::Io(_) => RecoveryScope::File,
        }
    }

    /// Absolute byte offset the error refers to, if it has one.
    pub fn offset(&self) -> Option<u64> {
        match self {
            FormatError::TruncatedInput { offset, .. }
            | FormatError::MalformedVarInt { offset, .. }
            | FormatError::FrameSyncLost { offset, .. }
            | FormatError::OversizedBlock { offset, .. }
            | FormatError::SizeMismatch { offset, .. }
            | FormatError::UnsupportedTransactionFlag { offset, .. } => Some(*offset),
            FormatError::Io(_) => None,
        }
    }
}


pub type Result<T> = std::result::Result<T, FormatError>;
