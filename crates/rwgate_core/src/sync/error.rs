use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum GateError {
    #[error("Gate error, capacity must be at least one permit")]
    ZeroCapacity,

    #[error("Gate error, timed out acquiring {requested} permit(s) after {waited:?}")]
    Timeout { requested: u32, waited: Duration },
}
