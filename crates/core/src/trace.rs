//! Trace parsing and replay.
//!
//! This module is the driver boundary around the cache model. It performs:
//! 1. **Record parsing:** one Valgrind-style line per record,
//!    `<kind> <hex-address>,<size>` with kind ∈ {I, L, S, M}.
//! 2. **Replay:** loads and stores issue one access, modifies issue two
//!    back-to-back accesses to the same address, instruction fetches issue
//!    none.
//! 3. **Recovery:** malformed lines are logged and skipped; only I/O
//!    failures abort a replay.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::cache::Cache;
use crate::error::{ParseRecordError, TraceError};

/// Kind of memory operation a trace record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceOp {
    /// Instruction fetch; never reaches the cache model.
    Instruction,
    /// Data load; one access.
    Load,
    /// Data store; one access.
    Store,
    /// Read-modify-write; a load followed by a store to the same address.
    Modify,
}

impl TraceOp {
    /// Number of cache accesses this operation issues during replay.
    pub fn access_count(self) -> u64 {
        match self {
            Self::Instruction => 0,
            Self::Load | Self::Store => 1,
            Self::Modify => 2,
        }
    }
}

impl fmt::Display for TraceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Self::Instruction => 'I',
            Self::Load => 'L',
            Self::Store => 'S',
            Self::Modify => 'M',
        };
        write!(f, "{c}")
    }
}

/// One parsed trace record: operation kind, address, and access size.
///
/// The size is carried for fidelity with the trace format but plays no role
/// in the simulation; each access touches exactly one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceRecord {
    /// Operation kind.
    pub op: TraceOp,
    /// Accessed memory address.
    pub addr: u64,
    /// Access size in bytes, as recorded in the trace.
    pub size: u32,
}

impl FromStr for TraceRecord {
    type Err = ParseRecordError;

    /// Parses `<ws><kind><ws><hex-address>,<decimal-size>`.
    ///
    /// ```
    /// use csim_core::trace::{TraceOp, TraceRecord};
    ///
    /// let record: TraceRecord = " M 7ff0005c8,8".parse().unwrap();
    /// assert_eq!(record.op, TraceOp::Modify);
    /// assert_eq!(record.addr, 0x7ff0_005c8);
    /// assert_eq!(record.size, 8);
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim_start();
        let mut chars = s.chars();
        let op = match chars.next() {
            None => return Err(ParseRecordError::Empty),
            Some('I') => TraceOp::Instruction,
            Some('L') => TraceOp::Load,
            Some('S') => TraceOp::Store,
            Some('M') => TraceOp::Modify,
            Some(other) => return Err(ParseRecordError::UnknownKind(other)),
        };

        let rest = chars.as_str().trim();
        let (addr_str, size_str) = rest
            .split_once(',')
            .ok_or(ParseRecordError::MissingAddress)?;
        let addr = u64::from_str_radix(addr_str.trim(), 16)
            .map_err(|_| ParseRecordError::InvalidAddress(addr_str.trim().to_string()))?;
        let size = size_str
            .trim()
            .parse()
            .map_err(|_| ParseRecordError::InvalidSize(size_str.trim().to_string()))?;

        Ok(Self { op, addr, size })
    }
}

/// Totals accumulated by one replay pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Records parsed and replayed (instruction fetches included).
    pub records: u64,
    /// Cache accesses issued (M records count twice).
    pub accesses: u64,
    /// Lines skipped because they failed to parse.
    pub skipped: u64,
}

/// Replays every record from `reader` against `cache`.
///
/// Loads and stores issue exactly one [`Cache::access`]; modifies issue
/// exactly two, back-to-back on the same address, with no intervening
/// access — so the second half of an M record can never miss when the
/// first half installed or touched the block. Instruction fetches are
/// dropped before reaching the model. Unparseable lines are warned about
/// and skipped.
///
/// # Errors
///
/// Returns [`TraceError::Io`] when the reader fails; parse failures are
/// recoverable and only counted in [`ReplaySummary::skipped`].
pub fn replay<R: BufRead>(cache: &mut Cache, reader: R) -> Result<ReplaySummary, TraceError> {
    let mut summary = ReplaySummary::default();

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: TraceRecord = match line.parse() {
            Ok(record) => record,
            Err(err) => {
                warn!(line = %line.trim(), %err, "skipping malformed trace record");
                summary.skipped += 1;
                continue;
            }
        };

        summary.records += 1;
        summary.accesses += record.op.access_count();
        match record.op {
            TraceOp::Instruction => {}
            TraceOp::Load | TraceOp::Store => {
                let outcome = cache.access(record.addr);
                debug!(op = %record.op, addr = format_args!("{:x}", record.addr), ?outcome);
            }
            TraceOp::Modify => {
                let load = cache.access(record.addr);
                let store = cache.access(record.addr);
                debug!(
                    op = %record.op,
                    addr = format_args!("{:x}", record.addr),
                    ?load,
                    ?store
                );
            }
        }
    }

    Ok(summary)
}

/// Opens `path` and replays it via [`replay`].
///
/// # Errors
///
/// Returns [`TraceError::Io`] when the file cannot be opened or read.
pub fn replay_file<P: AsRef<Path>>(
    cache: &mut Cache,
    path: P,
) -> Result<ReplaySummary, TraceError> {
    let file = File::open(path)?;
    replay(cache, BufReader::new(file))
}
