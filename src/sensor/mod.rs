//! Energy sensor interface and test doubles.
//!
//! A sensor exposes the cumulative energy counters of every monitored
//! socket as one interleaved snapshot. The core never talks to hardware
//! directly: sessions hold a `&dyn EnergySensor` and only ever call
//! [`EnergySensor::read`], so any backend (or scripted double) can stand in.

mod powercap;
mod scripted;

pub use powercap::PowercapSensor;
pub use scripted::ScriptedSensor;

/// Sentinel counter value meaning "this domain is not measurable".
///
/// Distinct from a valid zero reading: a domain that exists but consumed
/// no energy reads `0`, a domain that cannot be read at all reads `-1`.
pub const SENTINEL: i64 = -1;

/// One raw counter snapshot: `2 × socket_count` cumulative microjoule
/// readings, interleaved `[pkg0, dram0, pkg1, dram1, …]`. Entries are
/// non-negative microjoules or [`SENTINEL`].
pub type Snapshot = Vec<i64>;

/// A source of raw energy-counter snapshots.
///
/// Implementations must be fully initialized before the first session
/// begins; this crate does not manage sensor discovery, permissions, or
/// lifecycle beyond construction. Reads are infallible by contract: a
/// domain that cannot be read yields [`SENTINEL`], never an error. Counter
/// wraparound correction, if any, is the implementation's responsibility —
/// consecutive reads handed to a session are assumed to come from the same
/// monotonically increasing counter epoch.
pub trait EnergySensor {
    /// Read the current cumulative counters for all monitored sockets.
    fn read(&self) -> Snapshot;

    /// Number of monitored sockets. Every snapshot from [`read`](Self::read)
    /// has exactly twice this many entries.
    fn socket_count(&self) -> usize;
}
