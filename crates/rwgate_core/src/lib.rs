//! A fair read/write lock built on a counting semaphore.
//!
//! Readers each hold one permit of a shared [`CountingGate`], writers hold all
//! of them. Any number of readers can be inside together, a writer gets in
//! once every reader has left, and neither side is structurally preferred.
//!
//! ```
//! use rwgate_core::CountingGate;
//!
//! let gate = CountingGate::new(8).unwrap();
//! std::thread::scope(|s| {
//!     s.spawn(|| {
//!         let reader = gate.reader();
//!         reader.read_occupy();
//!         // read the protected state
//!         reader.read_release();
//!     });
//!     s.spawn(|| {
//!         let writer = gate.writer();
//!         writer.write_occupy();
//!         // mutate the protected state
//!     });
//! });
//! assert_eq!(gate.available(), 8);
//! ```
//!
//! The gate only arbitrates admission. The data it guards stays with the caller.

#[cfg(test)]
mod tests;

pub mod sync;

pub use sync::{CountingGate, DEFAULT_MAX_READERS, GateConfig, GateError, ReadHandle, WriteHandle};

#[cfg(feature = "rwgate_tracing")]
pub mod rwgate_tracing {
    use std::sync::Once;
    use tracing_subscriber::{EnvFilter, fmt};

    static INIT: Once = Once::new();

    /// Install a test-writer subscriber filtered by `RUST_LOG` (silent when unset).
    /// Safe to call from every test.
    pub fn init() {
        INIT.call_once(|| {
            let filter =
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));

            fmt()
                .with_target(false)
                .with_test_writer()
                .with_env_filter(filter)
                .init();
        });
    }
}
