//! Writer side of the gate.
use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(feature = "rwgate_tracing")]
use tracing::debug;

use crate::sync::gate::CountingGate;

/// A writer session over a shared [`CountingGate`].
///
/// Occupying takes every permit of the gate, so it waits for all readers and
/// any other writer to leave. The hold is released on drop.
///
/// Not reentrant: occupying twice through the same handle without releasing
/// in between deadlocks the calling thread.
#[derive(Debug)]
pub struct WriteHandle<'a> {
    gate: &'a CountingGate,
    holding: AtomicBool,
}

impl<'a> WriteHandle<'a> {
    pub fn new(gate: &'a CountingGate) -> Self {
        Self { gate, holding: AtomicBool::new(false) }
    }

    /// Take exclusive hold of the gate.
    pub fn write_occupy(&self) {
        self.gate.acquire_all();
        self.holding.store(true, Ordering::Release);
    }

    /// Hand the exclusive hold back. Idempotent.
    pub fn write_release(&self) {
        if self.holding.swap(false, Ordering::AcqRel) {
            self.gate.release_all();
        }
    }

    pub fn is_holding(&self) -> bool {
        self.holding.load(Ordering::Acquire)
    }
}

impl Drop for WriteHandle<'_> {
    fn drop(&mut self) {
        if self.is_holding() {
            #[cfg(feature = "rwgate_tracing")]
            debug!("[writer-{}] Drop: releasing exclusive hold", self.gate.label());
        }
        self.write_release();
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::mpsc, thread};

    use super::*;
    use crate::tests::fixtures::{BLOCKED_GRACE, PROGRESS_DEADLINE};

    fn init_tracing() {
        #[cfg(feature = "rwgate_tracing")]
        crate::rwgate_tracing::init();
    }

    #[test]
    fn unit_writer_occupy_release() {
        init_tracing();
        let gate = CountingGate::new(4).unwrap();
        let writer = WriteHandle::new(&gate);
        assert!(!writer.is_holding());
        writer.write_occupy();
        assert!(writer.is_holding());
        assert_eq!(gate.available(), 0);
        writer.write_release();
        assert!(!writer.is_holding());
        assert_eq!(gate.available(), 4);
    }

    #[test]
    fn unit_writer_release_is_idempotent() {
        init_tracing();
        let gate = CountingGate::new(4).unwrap();
        let writer = gate.writer();
        writer.write_occupy();
        writer.write_release();

        // A second release must not reset permits now held by a reader
        let reader = gate.reader();
        reader.read_occupy();
        writer.write_release();
        assert_eq!(gate.available(), 3);
    }

    #[test]
    fn unit_writer_release_without_occupy_is_noop() {
        init_tracing();
        let gate = CountingGate::new(4).unwrap();
        let reader = gate.reader();
        reader.read_occupy();
        gate.writer().write_release();
        assert_eq!(gate.available(), 3);
    }

    #[test]
    fn unit_writer_drop_releases_hold() {
        init_tracing();
        let gate = CountingGate::new(4).unwrap();
        {
            let writer = gate.writer();
            writer.write_occupy();
            assert_eq!(gate.available(), 0);
        }
        assert_eq!(gate.available(), 4);
    }

    #[test]
    fn unit_writer_drop_after_release() {
        init_tracing();
        let gate = CountingGate::new(4).unwrap();
        let reader = gate.reader();
        {
            let writer = gate.writer();
            writer.write_occupy();
            writer.write_release();
            reader.read_occupy();
        }
        assert_eq!(gate.available(), 3);
    }

    #[test]
    fn unit_writer_waits_for_readers() {
        init_tracing();
        let gate = CountingGate::new(4).unwrap();
        let first = gate.reader();
        let second = gate.reader();
        first.read_occupy();
        second.read_occupy();
        let (tx, rx) = mpsc::channel();
        thread::scope(|s| {
            s.spawn(|| {
                let writer = gate.writer();
                writer.write_occupy();
                tx.send(gate.available()).unwrap();
            });
            assert!(rx.recv_timeout(BLOCKED_GRACE).is_err());
            first.read_release();
            assert!(rx.recv_timeout(BLOCKED_GRACE).is_err());
            second.read_release();
            assert_eq!(rx.recv_timeout(PROGRESS_DEADLINE), Ok(0));
        });
        assert_eq!(gate.available(), 4);
    }

    #[test]
    fn unit_writer_excludes_other_writer() {
        init_tracing();
        let gate = CountingGate::new(2).unwrap();
        let writer = gate.writer();
        writer.write_occupy();
        let (tx, rx) = mpsc::channel();
        thread::scope(|s| {
            s.spawn(|| {
                let other = gate.writer();
                other.write_occupy();
                tx.send(()).unwrap();
            });
            assert!(rx.recv_timeout(BLOCKED_GRACE).is_err());
            writer.write_release();
            assert!(rx.recv_timeout(PROGRESS_DEADLINE).is_ok());
        });
        assert_eq!(gate.available(), 2);
    }
}
