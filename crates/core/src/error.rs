//! Error types for cache construction and trace replay.
//!
//! The simulator distinguishes three failure classes:
//! 1. **Configuration errors:** fatal, detected before any storage is
//!    allocated; no partial cache is ever returned.
//! 2. **Malformed trace records:** recoverable, reported per line by the
//!    replay loop and skipped.
//! 3. **Trace I/O errors:** fatal, surfaced from the underlying reader.

use std::io;

use thiserror::Error;

/// Fatal errors raised while validating a [`CacheConfig`](crate::config::CacheConfig).
///
/// Construction aborts on the first error; `access()` itself can never fail
/// once a cache has been built.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Associativity of zero: a set must hold at least one line.
    #[error("associativity must be at least 1 (E = 0)")]
    ZeroWays,

    /// The derived set count or block size would overflow the address width.
    #[error("geometry too large: {set_bits} set bits + {block_bits} block bits exceed the 64-bit address width")]
    GeometryTooLarge {
        /// Requested set-index bits (s).
        set_bits: u32,
        /// Requested block-offset bits (b).
        block_bits: u32,
    },
}

/// Recoverable errors raised while parsing a single trace record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseRecordError {
    /// The line was empty or all whitespace.
    #[error("empty trace record")]
    Empty,

    /// The operation kind character is not one of I, L, S, M.
    #[error("unknown operation kind '{0}'")]
    UnknownKind(char),

    /// The record has no `<hex-address>,<size>` payload after the kind.
    #[error("missing address field")]
    MissingAddress,

    /// The address field is not valid hexadecimal.
    #[error("invalid hex address '{0}'")]
    InvalidAddress(String),

    /// The size field is missing or not a decimal integer.
    #[error("invalid access size '{0}'")]
    InvalidSize(String),
}

/// Fatal errors raised by trace replay.
#[derive(Debug, Error)]
pub enum TraceError {
    /// Reading from the trace source failed.
    #[error("trace I/O error: {0}")]
    Io(#[from] io::Error),
}
