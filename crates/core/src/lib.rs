//! Trace-driven set-associative cache simulator library.
//!
//! This crate replays memory-access traces against a configurable cache
//! model and reports hit/miss/eviction statistics. It provides:
//! 1. **Cache model:** `S` sets of `E` lines with exact LRU replacement,
//!    driven by a single `access(address)` operation.
//! 2. **Trace driver:** Valgrind-style record parsing and replay
//!    (loads/stores once, modifies twice, instruction fetches dropped).
//! 3. **Configuration:** the classic (s, E, b) geometry, from flags or JSON.
//! 4. **Reporting:** the canonical summary line and a persisted results file.

/// Set-associative cache model (lines, sets, counters, access outcomes).
pub mod cache;
/// Cache geometry configuration (set bits, associativity, block bits).
pub mod config;
/// Error types (configuration, record parsing, trace I/O).
pub mod error;
/// Statistics reporting (summary line, results file).
pub mod stats;
/// Trace record parsing and replay.
pub mod trace;

/// Cache model; construct with `Cache::new` and drive with `access`.
pub use crate::cache::{AccessOutcome, Cache, Counters};
/// Geometry configuration; use `CacheConfig::default()` or deserialize from JSON.
pub use crate::config::CacheConfig;
/// Fatal configuration error; returned by `CacheConfig::validate` and `Cache::new`.
pub use crate::error::ConfigError;
/// Trace replay entry points.
pub use crate::trace::{ReplaySummary, TraceRecord, replay, replay_file};
