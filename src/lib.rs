//! # rapl-probe
//!
//! Measure the energy consumed by arbitrary code regions through RAPL
//! hardware counters (CPU package and DRAM domains, per socket), and
//! aggregate repeated measurements into point estimates with statistical
//! confidence.
//!
//! ## Quick start
//!
//! ```no_run
//! use rapl_probe::{EnergyMeter, Policy, PowercapSensor};
//!
//! # fn main() -> rapl_probe::Result<()> {
//! let sensor = PowercapSensor::new()?;
//!
//! let value = EnergyMeter::new(&sensor)
//!     .iterations(30)
//!     .policy(Policy::Confidence)
//!     .run("fibonacci", || fibonacci(32))?;
//! # let _ = value;
//! # Ok(()) }
//! # fn fibonacci(n: u64) -> u64 { if n < 2 { n } else { fibonacci(n - 1) + fibonacci(n - 2) } }
//! ```
//!
//! Two aggregation policies are available:
//!
//! - **global** (default): one measurement window around all iterations,
//!   normalized to a per-iteration average. Best for cheap operations,
//!   where per-run session overhead would dominate.
//! - **confidence**: independent windows, reduced to a mean and a 95%
//!   confidence half-width per field. Requires the `stats` feature
//!   (on by default).
//!
//! For a single region without repetition, use a [`Session`] directly —
//! its [`scope`](Session::scope) method brackets a closure and exports the
//! result in one call.
//!
//! ## ⚠️ What the numbers mean
//!
//! RAPL counters meter whole power domains, not your code: everything else
//! running on the socket during the window is included. Session
//! bookkeeping sits inside the measured window too — a small, uncorrected
//! bias. Treat single raw readings as noisy and prefer the confidence
//! policy for anything you intend to compare.
//!
//! A domain the hardware cannot meter is reported as *absent* (the sensor
//! reads the `-1` sentinel for it), which is different from a measured
//! zero.
//!
//! ## Platform support
//!
//! The bundled [`PowercapSensor`] needs Linux with the `intel_rapl`
//! powercap driver (Intel and modern AMD CPUs) and read access to
//! `/sys/class/powercap`. The core is sensor-agnostic: anything
//! implementing [`EnergySensor`] plugs in, including the scripted test
//! double [`ScriptedSensor`].

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod error;
mod meter;
mod result;

pub mod measurement;
pub mod output;
pub mod sensor;

#[cfg(feature = "stats")]
pub mod statistics;

pub use config::{Config, Policy};
pub use error::{Error, Result};
pub use measurement::{Reading, Session};
pub use meter::EnergyMeter;
pub use output::{BufferSink, OutputSink, PrintSink};
pub use result::ResultRecord;
pub use sensor::{EnergySensor, PowercapSensor, ScriptedSensor, Snapshot};
