//! Error types for energy measurement.

use std::io;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by sessions, the meter, and the sensor backends.
///
/// There are no retries anywhere in this crate: every failure is returned
/// to the caller immediately, and a failure in the middle of a repeated-run
/// aggregation aborts the whole aggregation.
#[derive(Debug)]
pub enum Error {
    /// A result was requested before any measurement completed, or a
    /// session was ended before it was begun.
    Unmeasured,
    /// Aggregation policy name not recognized.
    UnknownPolicy(String),
    /// The selected policy needs a capability this build does not carry
    /// (the confidence policy requires the `stats` feature).
    MissingCapability(&'static str),
    /// Sensor discovery failed. Only constructors produce this; once a
    /// sensor is built, unreadable counters degrade to the `-1` sentinel
    /// instead of erroring.
    Sensor(io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Unmeasured => write!(f, "no result measured yet"),
            Error::UnknownPolicy(name) => {
                write!(f, "unknown measurement policy: {:?} (expected \"global\" or \"confidence\")", name)
            }
            Error::MissingCapability(what) => {
                write!(f, "missing capability: {}", what)
            }
            Error::Sensor(source) => write!(f, "sensor discovery failed: {}", source),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Sensor(source) => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(source: io::Error) -> Self {
        Error::Sensor(source)
    }
}
