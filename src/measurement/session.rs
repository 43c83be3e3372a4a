//! One bounded begin/end measurement window.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use super::delta::{delta, dram_series, filter_unsupported, package_series};
use crate::error::{Error, Result};
use crate::output::OutputSink;
use crate::result::ResultRecord;
use crate::sensor::{EnergySensor, Snapshot};

/// Raw outcome of one begin/end pair, before any unit conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reading {
    /// Elapsed wall-clock time, nanoseconds.
    pub duration_ns: u64,
    /// Per-socket package energy delta in microjoules, `None` when the
    /// domain is unsupported.
    pub pkg: Option<Vec<i64>>,
    /// Per-socket DRAM energy delta in microjoules.
    pub dram: Option<Vec<i64>>,
}

/// Measures the energy consumed between [`begin`](Session::begin) and
/// [`end`](Session::end).
///
/// The sensor is an explicit dependency: sessions never reach for shared
/// process state, so the caller controls the sensor's lifetime and can
/// substitute a scripted one in tests. A session is single-threaded and
/// lives for one (or, reused, several) begin/end windows; each completed
/// window can be frozen into a [`ResultRecord`] and exported.
///
/// ```no_run
/// use rapl_probe::{PowercapSensor, PrintSink, Session};
///
/// # fn main() -> rapl_probe::Result<()> {
/// let sensor = PowercapSensor::new()?;
/// let mut sink = PrintSink::new();
/// let mut session = Session::new("parse", &sensor);
/// let value = session.scope(&mut sink, || expensive_parse())?;
/// # Ok(()) }
/// # fn expensive_parse() -> u32 { 0 }
/// ```
pub struct Session<'s> {
    label: String,
    sensor: &'s dyn EnergySensor,
    begin: Option<BeginState>,
    record: Option<ResultRecord>,
}

struct BeginState {
    timestamp_ns: u64,
    started: Instant,
    snapshot: Snapshot,
}

impl<'s> Session<'s> {
    /// Create a session reading from `sensor` under `label`.
    pub fn new(label: impl Into<String>, sensor: &'s dyn EnergySensor) -> Self {
        Self {
            label: label.into(),
            sensor,
            begin: None,
            record: None,
        }
    }

    /// Measurement label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Start recording: snapshot the counters, then the clock.
    ///
    /// The counter read comes first on entry and last on exit, so the
    /// energy window always encloses the time window.
    pub fn begin(&mut self) {
        let snapshot = self.sensor.read();
        self.begin = Some(BeginState {
            timestamp_ns: unix_now_ns(),
            started: Instant::now(),
            snapshot,
        });
    }

    /// Stop recording and decompose the counter delta.
    ///
    /// Returns the elapsed nanoseconds plus the package and DRAM series
    /// after sentinel detection. The begin state is kept, so a reused
    /// session may call `begin` again for the next window.
    ///
    /// # Errors
    ///
    /// [`Error::Unmeasured`] when called without a prior `begin`.
    pub fn end(&mut self) -> Result<Reading> {
        let begin = self.begin.as_ref().ok_or(Error::Unmeasured)?;
        let duration_ns = begin.started.elapsed().as_nanos() as u64;
        let snap_end = self.sensor.read();

        let delta = delta(&begin.snapshot, &snap_end);
        Ok(Reading {
            duration_ns,
            pkg: filter_unsupported(package_series(&delta)),
            dram: filter_unsupported(dram_series(&delta)),
        })
    }

    /// Freeze a raw reading into this session's [`ResultRecord`].
    ///
    /// # Errors
    ///
    /// [`Error::Unmeasured`] when the session was never begun (there is no
    /// start timestamp to attach).
    pub fn record_raw(&mut self, reading: Reading) -> Result<()> {
        let begin = self.begin.as_ref().ok_or(Error::Unmeasured)?;
        self.record = Some(ResultRecord::raw(
            self.label.clone(),
            begin.timestamp_ns,
            reading.duration_ns,
            reading.pkg,
            reading.dram,
        ));
        Ok(())
    }

    /// Freeze a confidence-policy summary into this session's record,
    /// converting nanoseconds to seconds. Empty domain series (the table
    /// had no columns for that domain) come out as absent fields.
    ///
    /// # Errors
    ///
    /// [`Error::Unmeasured`] when the session was never begun.
    #[cfg(feature = "stats")]
    pub fn record_summary(&mut self, summary: &crate::statistics::Summary) -> Result<()> {
        let begin = self.begin.as_ref().ok_or(Error::Unmeasured)?;
        self.record = Some(ResultRecord {
            label: self.label.clone(),
            timestamp: begin.timestamp_ns as f64 / 1e9,
            duration: summary.duration_mean_ns / 1e9,
            pkg: non_empty(&summary.pkg_mean),
            dram: non_empty(&summary.dram_mean),
            duration_conf: Some(summary.duration_conf_ns / 1e9),
            pkg_conf: non_empty(&summary.pkg_conf),
            dram_conf: non_empty(&summary.dram_conf),
        });
        Ok(())
    }

    /// The frozen measurement record.
    ///
    /// # Errors
    ///
    /// [`Error::Unmeasured`] when no measurement has completed yet.
    pub fn result(&self) -> Result<&ResultRecord> {
        self.record.as_ref().ok_or(Error::Unmeasured)
    }

    /// Hand the frozen record to an output sink.
    ///
    /// # Errors
    ///
    /// [`Error::Unmeasured`] when no measurement has completed yet.
    pub fn export(&self, sink: &mut dyn OutputSink) -> Result<()> {
        sink.add(self.result()?);
        Ok(())
    }

    /// Scoped measurement: begin, run `f`, end, record, export.
    ///
    /// The bookkeeping runs on the ordinary return path — there is no
    /// exception-driven control flow to forget. If `f` panics, the unwind
    /// carries the session away unrecorded and nothing reaches the sink.
    pub fn scope<T>(&mut self, sink: &mut dyn OutputSink, f: impl FnOnce() -> T) -> Result<T> {
        self.begin();
        let value = f();
        let reading = self.end()?;
        self.record_raw(reading)?;
        self.export(sink)?;
        Ok(value)
    }
}

/// Unix-epoch nanoseconds. Clamps to zero on a pre-epoch clock rather
/// than failing the measurement.
fn unix_now_ns() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(feature = "stats")]
fn non_empty(series: &[f64]) -> Option<Vec<f64>> {
    if series.is_empty() {
        None
    } else {
        Some(series.to_vec())
    }
}
