//! # Counting Gate
//!
//! A bounded counting semaphore that arbitrates admission for both readers and
//! writers of a shared resource.
//!
//! ## Overview
//!
//! The gate holds `available` permits out of a fixed `capacity`. Readers take a
//! single permit each, writers take every permit at once. Because both classes
//! of requester draw from the same pool, a writer can only get in once every
//! reader has left, and a reader can only get in once the writer has handed its
//! permits back.
//!
//! ## Permit Rules
//!
//! - `0 <= available <= capacity` at all times
//! - `available` is only read or written while holding the internal mutex
//! - Releasing past `capacity` is clamped, never an error
//! - Every waiter re-checks its predicate after each wake-up
//!
//! ## Fairness
//!
//! Releases wake every waiter (`notify_all`). Which of the woken readers or
//! writers wins the next race is left to the scheduler: progress is eventual,
//! not ordered. A continuous stream of overlapping readers can delay a writer
//! for as long as it never lets `available` climb back to `capacity`.
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
#[cfg(feature = "rwgate_tracing")]
use tracing::{debug, warn};

use crate::sync::{error::GateError, read::ReadHandle, write::WriteHandle};

/// Reader bound for callers that cannot size their gate more precisely.
///
/// Too small a value serializes readers needlessly. Too large a value has no
/// correctness cost.
pub const DEFAULT_MAX_READERS: u32 = 1000;

const DEFAULT_LABEL: &str = "default";

/// Construction parameters for a [`CountingGate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    max_concurrent_readers: u32,
    label: String,
}

impl GateConfig {
    pub fn new(max_concurrent_readers: u32) -> Self {
        Self { max_concurrent_readers, label: DEFAULT_LABEL.to_string() }
    }

    /// Name used to tell gates apart in log output, `"default"` unless set.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn max_concurrent_readers(&self) -> u32 {
        self.max_concurrent_readers
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_READERS)
    }
}

#[derive(Debug)]
pub struct CountingGate {
    capacity: u32,
    label: String,
    available: Mutex<u32>,
    released: Condvar,
}

impl CountingGate {
    /// Create a gate admitting up to `max_concurrent_readers` simultaneous readers.
    pub fn new(max_concurrent_readers: u32) -> Result<Self, GateError> {
        Self::with_config(GateConfig::new(max_concurrent_readers))
    }

    pub fn with_config(config: GateConfig) -> Result<Self, GateError> {
        if config.max_concurrent_readers == 0 {
            return Err(GateError::ZeroCapacity);
        }
        Ok(Self {
            capacity: config.max_concurrent_readers,
            label: config.label,
            available: Mutex::new(config.max_concurrent_readers),
            released: Condvar::new(),
        })
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Snapshot of the free permits. Stale as soon as the lock is dropped.
    pub fn available(&self) -> u32 {
        *self.available.lock()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Open a reader session on this gate.
    pub fn reader(&self) -> ReadHandle<'_> {
        ReadHandle::new(self)
    }

    /// Open a writer session on this gate.
    pub fn writer(&self) -> WriteHandle<'_> {
        WriteHandle::new(self)
    }

    /// Block until `permits` are free, then take them.
    pub fn acquire(&self, permits: u32) {
        let permits = self.clamp_request(permits);
        let mut available = self.available.lock();
        while *available < permits {
            self.released.wait(&mut available);
        }
        *available -= permits;
        #[cfg(feature = "rwgate_tracing")]
        debug!("[gate-{}] Acquire: permits: {}, available: {}", self.label, permits, *available);
    }

    /// Take `permits` only if they are free right now.
    pub fn try_acquire(&self, permits: u32) -> bool {
        self.try_take(self.clamp_request(permits))
    }

    fn try_take(&self, permits: u32) -> bool {
        let mut available = self.available.lock();
        if *available >= permits {
            *available -= permits;
            #[cfg(feature = "rwgate_tracing")]
            debug!("[gate-{}] TryAcquire: permits: {}, available: {}", self.label, permits, *available);
            true
        } else {
            false
        }
    }

    /// Like [`acquire`](Self::acquire) but gives up after `timeout`.
    ///
    /// The predicate is evaluated one last time once the deadline passes, so a
    /// release racing with the expiry still counts. On failure nothing is taken.
    pub fn acquire_timed(&self, permits: u32, timeout: Duration) -> Result<(), GateError> {
        let requested = permits;
        let permits = self.clamp_request(permits);
        let start = Instant::now();
        if timeout.is_zero() {
            return if self.try_take(permits) {
                Ok(())
            } else {
                Err(GateError::Timeout { requested, waited: Duration::ZERO })
            };
        }
        let Some(deadline) = start.checked_add(timeout) else {
            self.acquire(permits);
            return Ok(());
        };

        let mut available = self.available.lock();
        while *available < permits {
            if self.released.wait_until(&mut available, deadline).timed_out() {
                break;
            }
        }
        if *available >= permits {
            *available -= permits;
            #[cfg(feature = "rwgate_tracing")]
            debug!(
                "[gate-{}] AcquireTimed: permits: {}, available: {}",
                self.label, permits, *available
            );
            Ok(())
        } else {
            #[cfg(feature = "rwgate_tracing")]
            debug!("[gate-{}] AcquireTimed: timed out, permits: {}", self.label, requested);
            Err(GateError::Timeout { requested, waited: start.elapsed() })
        }
    }

    /// Give back `permits`, clamped at capacity, and wake every waiter.
    pub fn release(&self, permits: u32) {
        let mut available = self.available.lock();
        if *available == self.capacity {
            return;
        }
        let restored = available.saturating_add(permits);
        if restored > self.capacity {
            #[cfg(feature = "rwgate_tracing")]
            warn!(
                "[gate-{}] Release: {} permit(s) over capacity, clamped to {}",
                self.label,
                restored - self.capacity,
                self.capacity
            );
        }
        *available = restored.min(self.capacity);
        #[cfg(feature = "rwgate_tracing")]
        debug!("[gate-{}] Release: permits: {}, available: {}", self.label, permits, *available);
        self.released.notify_all();
    }

    /// Block until no permit is outstanding, then take all of them.
    pub fn acquire_all(&self) {
        let mut available = self.available.lock();
        while *available < self.capacity {
            self.released.wait(&mut available);
        }
        *available = 0;
        #[cfg(feature = "rwgate_tracing")]
        debug!("[gate-{}] AcquireAll", self.label);
    }

    /// Restore every permit and wake every waiter.
    pub fn release_all(&self) {
        let mut available = self.available.lock();
        *available = self.capacity;
        #[cfg(feature = "rwgate_tracing")]
        debug!("[gate-{}] ReleaseAll", self.label);
        self.released.notify_all();
    }

    // More than `capacity` permits can never be free at once.
    fn clamp_request(&self, permits: u32) -> u32 {
        if permits > self.capacity {
            #[cfg(feature = "rwgate_tracing")]
            warn!(
                "[gate-{}] Request for {} permit(s) exceeds capacity, clamped to {}",
                self.label, permits, self.capacity
            );
            self.capacity
        } else {
            permits
        }
    }
}
