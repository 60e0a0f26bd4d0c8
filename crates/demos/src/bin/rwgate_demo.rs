//! Racing Demo: readers and a writer sharing one value behind a gate
//!
//! A handful of reader threads repeatedly read a shared value while a single
//! writer bumps it from 1 up to `--writer-rounds`. All of them go through the
//! same gate: readers overlap freely, the writer waits for them to drain and
//! keeps them out while it writes.
//!
//! # Usage
//! ```bash
//! # Two readers, ten rounds each, one second per critical section
//! cargo run --bin rwgate-demo
//!
//! # Faster, with readers giving up after 200ms instead of blocking
//! cargo run --bin rwgate-demo -- --hold-ms 50 --read-timeout-ms 200
//! ```

use std::time::Duration;

use anyhow::ensure;
use clap::Parser;
use demos::{DemoConfig, logging::init_tracing, racing};
use rwgate_core::DEFAULT_MAX_READERS;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "rwgate-demo",
    about = "Readers and a writer racing on a value behind a fair read/write gate"
)]
struct Args {
    /// Number of reader threads
    #[arg(long, default_value_t = 2)]
    readers: u32,

    /// Read sessions per reader
    #[arg(long, default_value_t = 10)]
    rounds: u32,

    /// Values written by the writer (1..=N)
    #[arg(long, default_value_t = 9)]
    writer_rounds: u64,

    /// Gate capacity, should be at least the number of readers
    #[arg(long, default_value_t = DEFAULT_MAX_READERS)]
    max_readers: u32,

    /// Time spent inside each critical section, in milliseconds
    #[arg(long, default_value_t = 1000)]
    hold_ms: u64,

    /// Bound reader waits to this many milliseconds
    #[arg(long)]
    read_timeout_ms: Option<u64>,

    /// Stack size of each worker thread, in KiB
    #[arg(long)]
    stack_kib: Option<usize>,
}

impl From<Args> for DemoConfig {
    fn from(args: Args) -> Self {
        Self {
            readers: args.readers,
            rounds: args.rounds,
            writer_rounds: args.writer_rounds,
            max_readers: args.max_readers,
            hold: Duration::from_millis(args.hold_ms),
            read_timeout: args.read_timeout_ms.map(Duration::from_millis),
            stack_size: args.stack_kib.map(|kib| kib.saturating_mul(1024)),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing("rwgate-demo");

    let config = DemoConfig::from(args);
    if config.max_readers < config.readers {
        tracing::warn!(
            max_readers = config.max_readers,
            readers = config.readers,
            "capacity is below the reader count, some readers will wait on each other"
        );
    }

    info!("=== rwgate racing demo ===");
    let report = racing::run(&config)?;

    info!(
        final_value = report.final_value,
        reads = report.reads,
        read_timeouts = report.read_timeouts,
        writes = report.writes,
        "=== Demo finished ==="
    );
    ensure!(
        report.available_after == config.max_readers,
        "gate left with {} of {} permits",
        report.available_after,
        config.max_readers
    );
    Ok(())
}
