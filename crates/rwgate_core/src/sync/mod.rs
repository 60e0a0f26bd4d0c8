//! Synchronization module.
//!
//! A fair read/write lock built from a single counting semaphore.
//!
//! ## Components
//!
//! - **Gate**: [`CountingGate`], the permit pool and the only place where
//!   threads block
//! - **Reader**: [`ReadHandle`], takes one permit per occupy
//! - **Writer**: [`WriteHandle`], takes every permit at once
//! - **Errors**: [`GateError`], returned by construction and timed acquisition
//!
//! Every reader and writer that must be fair to one another has to share the
//! same gate instance. Handles borrow the gate, so it outlives all of them.
pub mod error;
pub mod gate;
pub mod read;
pub mod write;

pub use error::GateError;
pub use gate::{CountingGate, DEFAULT_MAX_READERS, GateConfig};
pub use read::ReadHandle;
pub use write::WriteHandle;
