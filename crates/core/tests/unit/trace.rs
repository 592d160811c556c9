//! Trace Driver Unit Tests.
//!
//! Verifies the record grammar, malformed-line recovery, and the replay
//! contract: loads/stores issue one access, modifies issue two
//! back-to-back accesses, instruction fetches issue none.

use std::io::Cursor;
use std::io::Write;

use csim_core::cache::Cache;
use csim_core::config::CacheConfig;
use csim_core::error::ParseRecordError;
use csim_core::trace::{TraceOp, TraceRecord, replay, replay_file};
use pretty_assertions::assert_eq;
use rstest::rstest;

// ──────────────────────────────────────────────────────────
// Helper: build a cache from raw geometry
// ──────────────────────────────────────────────────────────

fn cache(set_bits: u32, ways: usize, block_bits: u32) -> Cache {
    Cache::new(&CacheConfig {
        set_bits,
        ways,
        block_bits,
    })
    .unwrap()
}

// ══════════════════════════════════════════════════════════
// 1. Record grammar
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(" L 10,1", TraceOp::Load, 0x10, 1)]
#[case(" S 7ff0005c8,8", TraceOp::Store, 0x7_ff00_05c8, 8)]
#[case(" M 20,4", TraceOp::Modify, 0x20, 4)]
#[case("I 0400d7d4,8", TraceOp::Instruction, 0x0400_d7d4, 8)]
fn parses_well_formed_records(
    #[case] line: &str,
    #[case] op: TraceOp,
    #[case] addr: u64,
    #[case] size: u32,
) {
    let record: TraceRecord = line.parse().unwrap();
    assert_eq!(record, TraceRecord { op, addr, size });
}

#[rstest]
#[case("", ParseRecordError::Empty)]
#[case("   ", ParseRecordError::Empty)]
#[case(" X 10,1", ParseRecordError::UnknownKind('X'))]
#[case(" L 10", ParseRecordError::MissingAddress)]
#[case(" L zz,1", ParseRecordError::InvalidAddress("zz".to_string()))]
#[case(" L 10,notasize", ParseRecordError::InvalidSize("notasize".to_string()))]
#[case(" L 10,", ParseRecordError::InvalidSize(String::new()))]
fn rejects_malformed_records(#[case] line: &str, #[case] expected: ParseRecordError) {
    let err = line.parse::<TraceRecord>().unwrap_err();
    assert_eq!(err, expected);
}

// ══════════════════════════════════════════════════════════
// 2. Replay semantics
// ══════════════════════════════════════════════════════════

/// An M record on a cold address is exactly one miss followed by one hit:
/// the store half always observes the line the load half installed.
#[test]
fn modify_on_cold_address_is_miss_then_hit() {
    let mut cache = cache(4, 1, 4);

    let summary = replay(&mut cache, Cursor::new(" M 10,1\n")).unwrap();
    assert_eq!(summary.records, 1);
    assert_eq!(summary.accesses, 2);
    assert_eq!(summary.skipped, 0);

    let counters = cache.counters();
    assert_eq!(counters.hits, 1);
    assert_eq!(counters.misses, 1);
    assert_eq!(counters.evictions, 0);
}

/// Instruction fetches are parsed but never reach the cache.
#[test]
fn instruction_records_are_ignored() {
    let mut cache = cache(4, 1, 4);

    let summary = replay(&mut cache, Cursor::new("I 400d7d4,8\nI 400d7d8,8\n")).unwrap();
    assert_eq!(summary.records, 2);
    assert_eq!(summary.accesses, 0);
    assert_eq!(cache.counters().hits + cache.counters().misses, 0);
}

/// Loads and stores each issue exactly one access.
#[test]
fn load_then_store_same_block() {
    let mut cache = cache(4, 1, 4);

    let summary = replay(&mut cache, Cursor::new(" L 10,1\n S 18,1\n")).unwrap();
    assert_eq!(summary.accesses, 2);

    let counters = cache.counters();
    assert_eq!(counters.hits, 1, "0x18 shares 0x10's 16-byte block");
    assert_eq!(counters.misses, 1);
}

/// Malformed lines are skipped without aborting the replay, and blank
/// lines are not counted at all.
#[test]
fn malformed_lines_are_skipped() {
    let mut cache = cache(4, 1, 4);

    let input = "not a record\n\n L 10,1\n Q 20,1\n L 10,1\n";
    let summary = replay(&mut cache, Cursor::new(input)).unwrap();
    assert_eq!(summary.records, 2);
    assert_eq!(summary.skipped, 2);

    let counters = cache.counters();
    assert_eq!(counters.hits, 1);
    assert_eq!(counters.misses, 1);
}

// ══════════════════════════════════════════════════════════
// 3. File replay
// ══════════════════════════════════════════════════════════

/// The classic small trace, hand-checked against (s=4, E=1, b=4):
/// set = (addr/16) % 16, tag = addr/256. Addresses 0x10, 0x18, 0x110,
/// 0x210, and 0x12 all land in set 1 with three distinct tags, so the
/// direct-mapped set thrashes.
#[test]
fn replays_trace_file_end_to_end() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "L 10,1\nM 20,1\nL 22,1\nS 18,1\nL 110,1\nL 210,1\nM 12,1\n"
    )
    .unwrap();

    let mut cache = cache(4, 1, 4);
    let summary = replay_file(&mut cache, file.path()).unwrap();
    assert_eq!(summary.records, 7);
    assert_eq!(summary.accesses, 9);

    let counters = cache.counters();
    assert_eq!(counters.hits, 4);
    assert_eq!(counters.misses, 5);
    assert_eq!(counters.evictions, 3);
}

/// A missing trace file is a fatal I/O error, not a skipped record.
#[test]
fn missing_trace_file_is_fatal() {
    let mut cache = cache(4, 1, 4);
    assert!(replay_file(&mut cache, "/nonexistent/trace.vgt").is_err());
}
