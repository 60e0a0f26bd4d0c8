//! Reader side of the gate.
use std::{
    sync::atomic::{AtomicU32, Ordering},
    time::Duration,
};

#[cfg(feature = "rwgate_tracing")]
use tracing::debug;

use crate::sync::{error::GateError, gate::CountingGate};

/// A reader session over a shared [`CountingGate`].
///
/// Each successful occupy takes one permit and is recorded on the handle, so a
/// single call site can loop occupy/release on it. Whatever is still held when
/// the handle is dropped goes back to the gate.
///
/// One handle per thread: the counter tolerates releases from another thread,
/// not concurrent occupies racing on the same instance.
#[derive(Debug)]
pub struct ReadHandle<'a> {
    gate: &'a CountingGate,
    held: AtomicU32,
}

impl<'a> ReadHandle<'a> {
    pub fn new(gate: &'a CountingGate) -> Self {
        Self { gate, held: AtomicU32::new(0) }
    }

    /// Take one permit, blocking while a writer holds the gate.
    pub fn read_occupy(&self) {
        self.gate.acquire(1);
        self.held.fetch_add(1, Ordering::AcqRel);
    }

    /// Take one permit, giving up after `timeout`.
    pub fn read_occupy_timeout(&self, timeout: Duration) -> Result<(), GateError> {
        self.gate.acquire_timed(1, timeout)?;
        self.held.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    /// Give back one held permit. No-op when nothing is held.
    pub fn read_release(&self) {
        if self
            .held
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |held| held.checked_sub(1))
            .is_ok()
        {
            self.gate.release(1);
        }
    }

    /// Permits currently held through this handle.
    pub fn held(&self) -> u32 {
        self.held.load(Ordering::Acquire)
    }
}

impl Drop for ReadHandle<'_> {
    fn drop(&mut self) {
        let held = std::mem::take(self.held.get_mut());
        if held > 0 {
            #[cfg(feature = "rwgate_tracing")]
            debug!("[reader-{}] Drop: releasing {} permit(s)", self.gate.label(), held);
            self.gate.release(held);
        }
    }
}
