//! # Unit Components
//!
//! This module serves as the central hub for the simulator's unit tests.
//! It organizes coverage for the cache model, configuration handling,
//! trace parsing/replay, and statistics output.




/// Unit tests for trace parsing and replay semantics.
///
/// Covers the record grammar, malformed-line recovery, and the
/// one-access/two-access replay contract.
pub mod trace;
