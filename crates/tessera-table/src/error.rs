//! Errors raised while loading or validating a parse table.

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("table artifact too small")]
    FileTooSmall,

    #[error("invalid magic bytes")]
    InvalidMagic,

    #[error("unsupported table version: {0}")]
    UnsupportedVersion(u32),

    #[error("artifact size mismatch: header says {header}, got {actual}")]
    SizeMismatch { header: u32, actual: usize },

    #[error("checksum mismatch: expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    #[error("table decode error: {0}")]
    Decode(#[from] postcard::Error),

    #[error("invalid DFA for token `{symbol}`: {message}")]
    Dfa { symbol: String, message: String },

    #[error("inconsistent table: {0}")]
    Inconsistent(String),
}
