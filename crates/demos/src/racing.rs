//! Readers and a writer racing on one value behind a shared gate.
use std::{
    sync::atomic::{AtomicU64, Ordering},
    thread,
    time::Duration,
};

use anyhow::Context;
use rwgate_core::{CountingGate, DEFAULT_MAX_READERS, GateConfig};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub readers: u32,
    pub rounds: u32,
    pub writer_rounds: u64,
    pub max_readers: u32,
    pub hold: Duration,
    /// Use the timed read path with this bound instead of blocking.
    pub read_timeout: Option<Duration>,
    /// Stack size for the reader and writer threads, platform default if unset.
    pub stack_size: Option<usize>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            readers: 2,
            rounds: 10,
            writer_rounds: 9,
            max_readers: DEFAULT_MAX_READERS,
            hold: Duration::from_secs(1),
            read_timeout: None,
            stack_size: None,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DemoReport {
    pub final_value: u64,
    pub reads: u64,
    pub read_timeouts: u64,
    pub writes: u64,
    /// Reads that saw a value older than one the same reader saw before.
    pub stale_reads: u64,
    pub available_after: u32,
}

#[derive(Default)]
struct Tally {
    reads: AtomicU64,
    read_timeouts: AtomicU64,
    writes: AtomicU64,
    stale_reads: AtomicU64,
}

/// Run the readers and the writer to completion and report what they saw.
///
/// Fails if the gate cannot be built or a worker thread cannot be spawned.
/// Workers already started when a spawn fails still run to the end first.
pub fn run(config: &DemoConfig) -> anyhow::Result<DemoReport> {
    let gate =
        CountingGate::with_config(GateConfig::new(config.max_readers).with_label("racing"))?;
    let racing_data = AtomicU64::new(0);
    let tally = Tally::default();

    thread::scope(|s| -> anyhow::Result<()> {
        for id in 0..config.readers {
            let (gate, racing_data, tally) = (&gate, &racing_data, &tally);
            worker(format!("reader-{id}"), config)
                .spawn_scoped(s, move || read_data(gate, racing_data, tally, id, config))
                .with_context(|| format!("failed to spawn reader-{id}"))?;
        }
        let (gate, racing_data, tally) = (&gate, &racing_data, &tally);
        worker("writer".to_string(), config)
            .spawn_scoped(s, move || write_data(gate, racing_data, tally, config))
            .context("failed to spawn writer")?;
        Ok(())
    })?;

    Ok(DemoReport {
        final_value: racing_data.load(Ordering::Acquire),
        reads: tally.reads.load(Ordering::Acquire),
        read_timeouts: tally.read_timeouts.load(Ordering::Acquire),
        writes: tally.writes.load(Ordering::Acquire),
        stale_reads: tally.stale_reads.load(Ordering::Acquire),
        available_after: gate.available(),
    })
}

fn worker(name: String, config: &DemoConfig) -> thread::Builder {
    let builder = thread::Builder::new().name(name);
    match config.stack_size {
        Some(size) => builder.stack_size(size),
        None => builder,
    }
}

fn read_data(
    gate: &CountingGate,
    racing_data: &AtomicU64,
    tally: &Tally,
    id: u32,
    config: &DemoConfig,
) {
    let reader = gate.reader();
    let mut last_seen = 0;

    for round in 0..config.rounds {
        info!(reader = id, round, "try to read the data");
        if let Some(timeout) = config.read_timeout {
            if let Err(e) = reader.read_occupy_timeout(timeout) {
                warn!(reader = id, round, "{e}");
                tally.read_timeouts.fetch_add(1, Ordering::AcqRel);
                continue;
            }
        } else {
            reader.read_occupy();
        }

        let data = racing_data.load(Ordering::Acquire);
        thread::sleep(config.hold);
        info!(reader = id, round, data, "has read the data");
        tally.reads.fetch_add(1, Ordering::AcqRel);
        if data < last_seen {
            tally.stale_reads.fetch_add(1, Ordering::AcqRel);
        }
        last_seen = data;

        // In a single-shot session this is left to the handle's drop
        reader.read_release();
    }
}

fn write_data(gate: &CountingGate, racing_data: &AtomicU64, tally: &Tally, config: &DemoConfig) {
    let writer = gate.writer();

    for value in 1..=config.writer_rounds {
        info!(round = value, "writer try to write the data");
        writer.write_occupy();
        thread::sleep(config.hold);
        racing_data.store(value, Ordering::Release);
        info!(data = value, "writer has written the data");
        tally.writes.fetch_add(1, Ordering::AcqRel);
        writer.write_release();
    }
}
