//! Simulation statistics reporting.
//!
//! The cache owns its counters; this module is the boundary toward the
//! consumer of a run. It renders the canonical one-line summary and
//! persists the raw counter triple so external tooling can pick it up.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::cache::Counters;

/// Default path of the persisted results record.
pub const RESULTS_FILE: &str = ".csim_results";

impl fmt::Display for Counters {
    /// Renders the canonical summary line, `hits:<H> misses:<M> evictions:<E>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits:{} misses:{} evictions:{}",
            self.hits, self.misses, self.evictions
        )
    }
}

/// Prints the summary line to stdout.
pub fn print_summary(counters: &Counters) {
    println!("{counters}");
}

/// Persists the counter triple to `path` as `"<hits> <misses> <evictions>\n"`.
///
/// # Errors
///
/// Returns any I/O error from writing the file.
pub fn write_results<P: AsRef<Path>>(counters: &Counters, path: P) -> io::Result<()> {
    fs::write(
        path,
        format!(
            "{} {} {}\n",
            counters.hits, counters.misses, counters.evictions
        ),
    )
}
