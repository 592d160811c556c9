//! Cache simulator CLI.
//!
//! This binary replays a memory trace against a set-associative LRU cache
//! and reports hit/miss/eviction counts. It performs:
//! 1. **Geometry selection:** `-s/-E/-b` flags or a JSON config file.
//! 2. **Replay:** parses the trace and drives the cache model.
//! 3. **Reporting:** prints the summary line and persists the results file.

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use csim_core::config::CacheConfig;
use csim_core::{Cache, stats, trace};

#[derive(Parser, Debug)]
#[command(
    name = "csim",
    author,
    version,
    about = "Trace-driven set-associative cache simulator",
    long_about = "Replay a Valgrind-style memory trace against an S x E LRU cache.\n\nEach trace line is `<kind> <hex-address>,<size>` with kind I (ignored), L, S, or M (counted as a load then a store).\n\nExamples:\n  csim -s 4 -E 1 -b 4 -t traces/yi.trace\n  csim -v -s 8 -E 2 -b 4 -t traces/yi.trace\n  csim --config cache.json -t traces/long.trace"
)]
struct Cli {
    /// Number of set index bits (S = 2^s sets).
    #[arg(short = 's')]
    set_bits: Option<u32>,

    /// Number of lines per set (associativity).
    #[arg(short = 'E')]
    ways: Option<usize>,

    /// Number of block offset bits (B = 2^b bytes).
    #[arg(short = 'b')]
    block_bits: Option<u32>,

    /// Trace file to replay.
    #[arg(short = 't', long = "trace")]
    trace: Option<PathBuf>,

    /// JSON geometry config (alternative to -s/-E/-b).
    #[arg(long, conflicts_with_all = ["set_bits", "ways", "block_bits"])]
    config: Option<PathBuf>,

    /// Log every access to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = build_config(&cli);

    let Some(trace_path) = cli.trace else {
        eprintln!("csim: missing required trace file");
        eprintln!("  csim -s 4 -E 1 -b 4 -t traces/yi.trace");
        process::exit(1);
    };

    let mut cache = match Cache::new(&config) {
        Ok(cache) => cache,
        Err(e) => {
            eprintln!("[!] FATAL: could not build cache: {e}");
            process::exit(1);
        }
    };

    let summary = match trace::replay_file(&mut cache, &trace_path) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("[!] FATAL: {}: {e}", trace_path.display());
            process::exit(1);
        }
    };
    if summary.skipped > 0 {
        eprintln!("[*] Skipped {} malformed trace line(s)", summary.skipped);
    }

    let counters = cache.counters();
    stats::print_summary(&counters);
    if let Err(e) = stats::write_results(&counters, stats::RESULTS_FILE) {
        eprintln!("[!] FATAL: could not write {}: {e}", stats::RESULTS_FILE);
        process::exit(1);
    }
}

/// Builds the cache geometry from `--config` or the `-s/-E/-b` flags.
///
/// Mirrors the classic csim argument check: when flags are used, all three
/// must be present and non-zero. Exits with usage on violation.
fn build_config(cli: &Cli) -> CacheConfig {
    if let Some(path) = &cli.config {
        let text = fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("[!] FATAL: could not read config '{}': {e}", path.display());
            process::exit(1);
        });
        return serde_json::from_str(&text).unwrap_or_else(|e| {
            eprintln!("[!] FATAL: invalid config '{}': {e}", path.display());
            process::exit(1);
        });
    }

    match (cli.set_bits, cli.ways, cli.block_bits) {
        (Some(s), Some(ways), Some(b)) if s > 0 && ways > 0 && b > 0 => CacheConfig {
            set_bits: s,
            ways,
            block_bits: b,
        },
        _ => {
            eprintln!("csim: missing or zero -s/-E/-b argument");
            eprintln!("  csim -s 4 -E 1 -b 4 -t traces/yi.trace");
            eprintln!("  csim --help for full options");
            process::exit(1);
        }
    }
}

/// Installs the fmt subscriber; `-v` raises the default level to DEBUG.
///
/// `RUST_LOG` still overrides either default.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
