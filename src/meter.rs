//! Repeated-run aggregation around a target operation.

use log::debug;

use crate::config::{Config, Policy};
use crate::error::Result;
use crate::measurement::Session;
use crate::output::{OutputSink, PrintSink};
use crate::sensor::EnergySensor;

#[cfg(not(feature = "stats"))]
use crate::error::Error;

/// Runs a target operation `n` times, aggregates the energy samples under
/// the configured [`Policy`], emits one record to the configured sink, and
/// hands back the operation's own (last) return value — instrumentation
/// stays transparent to callers relying on the wrapped operation's output.
///
/// Policy names only enter through [`Policy::from_str`]; an unrecognized
/// name fails there, before a meter ever runs, with no partial work and no
/// sink invocation.
///
/// ```no_run
/// use rapl_probe::{EnergyMeter, Policy, PowercapSensor};
///
/// # fn main() -> rapl_probe::Result<()> {
/// let sensor = PowercapSensor::new()?;
/// let mut meter = EnergyMeter::new(&sensor)
///     .iterations(100)
///     .policy(Policy::Confidence);
///
/// let sorted = meter.run("sort", || {
///     let mut v: Vec<u32> = (0..10_000).rev().collect();
///     v.sort();
///     v
/// })?;
/// # let _ = sorted;
/// # Ok(()) }
/// ```
pub struct EnergyMeter<'s, K: OutputSink = PrintSink> {
    sensor: &'s dyn EnergySensor,
    sink: K,
    config: Config,
}

impl<'s> EnergyMeter<'s, PrintSink> {
    /// Create a meter over `sensor` with the default configuration:
    /// one iteration, global policy, [`PrintSink`] output.
    pub fn new(sensor: &'s dyn EnergySensor) -> Self {
        Self {
            sensor,
            sink: PrintSink::new(),
            config: Config::default(),
        }
    }
}

impl<'s, K: OutputSink> EnergyMeter<'s, K> {
    /// Set how many times the target operation runs per measurement.
    /// Zero is clamped to one.
    pub fn iterations(mut self, n: usize) -> Self {
        self.config.iterations = n;
        self
    }

    /// Set the aggregation policy.
    pub fn policy(mut self, policy: Policy) -> Self {
        self.config.policy = policy;
        self
    }

    /// Replace the output sink.
    pub fn with_sink<K2: OutputSink>(self, sink: K2) -> EnergyMeter<'s, K2> {
        EnergyMeter {
            sensor: self.sensor,
            sink,
            config: self.config,
        }
    }

    /// The configured sink.
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Consume the meter and keep its sink (for sinks that buffer).
    pub fn into_sink(self) -> K {
        self.sink
    }

    /// Measure `f` under `label` and emit one record to the sink.
    ///
    /// Returns `f`'s last return value. Runs to completion unconditionally;
    /// a hung operation hangs the measurement.
    ///
    /// # Errors
    ///
    /// [`Error::MissingCapability`](crate::Error::MissingCapability) when
    /// the confidence policy is selected on a build without the `stats`
    /// feature — checked before the first run, never downgraded silently.
    pub fn run<T>(&mut self, label: &str, f: impl FnMut() -> T) -> Result<T> {
        let n = self.config.iterations.max(1);
        match self.config.policy {
            Policy::Global => self.run_global(label, n, f),
            Policy::Confidence => self.run_confidence(label, n, f),
        }
    }

    /// Higher-order form of [`run`](Self::run): wrap `f` once, call the
    /// result like the original operation, get a fresh aggregated record
    /// (and sink emission) per call.
    ///
    /// ```no_run
    /// # fn main() -> rapl_probe::Result<()> {
    /// # let sensor = rapl_probe::PowercapSensor::new()?;
    /// let mut meter = rapl_probe::EnergyMeter::new(&sensor).iterations(10);
    /// let mut checksum = meter.wrap("checksum", || (0u64..1 << 20).sum::<u64>());
    /// let total = checksum()?;
    /// # let _ = total;
    /// # Ok(()) }
    /// ```
    pub fn wrap<'a, T, F>(&'a mut self, label: impl Into<String>, mut f: F) -> impl FnMut() -> Result<T> + 'a
    where
        F: FnMut() -> T + 'a,
    {
        let label = label.into();
        move || self.run(&label, &mut f)
    }

    /// One wide session around all `n` invocations, normalized to a
    /// per-iteration average by [`ResultRecord::scaled`](crate::ResultRecord::scaled).
    fn run_global<T>(&mut self, label: &str, n: usize, mut f: impl FnMut() -> T) -> Result<T> {
        debug!("global measurement {:?}: {} iteration(s) in one window", label, n);
        let mut session = Session::new(label, self.sensor);

        session.begin();
        let mut value = f();
        for _ in 1..n {
            value = f();
        }
        let reading = session.end()?;

        session.record_raw(reading)?;
        let record = session.result()?.scaled(n as f64);
        self.sink.add(&record);
        Ok(value)
    }

    /// `n` independent sessions, one table row each, reduced to means and
    /// 95% confidence half-widths. The table layout is fixed by the first
    /// run's domain-series lengths.
    #[cfg(feature = "stats")]
    fn run_confidence<T>(&mut self, label: &str, n: usize, mut f: impl FnMut() -> T) -> Result<T> {
        use crate::statistics::SampleTable;

        debug!("confidence measurement {:?}: {} independent run(s)", label, n);
        let mut session = Session::new(label, self.sensor);

        session.begin();
        let mut value = f();
        let mut reading = session.end()?;

        let mut table = SampleTable::new(
            n,
            reading.pkg.as_ref().map_or(0, Vec::len),
            reading.dram.as_ref().map_or(0, Vec::len),
        );
        table.set_row(0, reading.duration_ns as f64, reading.pkg.as_deref(), reading.dram.as_deref());

        for row in 1..n {
            session.begin();
            value = f();
            reading = session.end()?;
            table.set_row(row, reading.duration_ns as f64, reading.pkg.as_deref(), reading.dram.as_deref());
        }

        session.record_summary(&table.summarize())?;
        session.export(&mut self.sink)?;
        Ok(value)
    }

    #[cfg(not(feature = "stats"))]
    fn run_confidence<T>(&mut self, _label: &str, _n: usize, _f: impl FnMut() -> T) -> Result<T> {
        Err(Error::MissingCapability(
            "the confidence policy requires the `stats` feature",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::BufferSink;
    use crate::sensor::ScriptedSensor;

    #[test]
    fn global_policy_scales_one_wide_window() {
        let sensor = ScriptedSensor::new(1, vec![vec![0, 0], vec![100, 40]]);
        let mut calls = 0;
        let mut meter = EnergyMeter::new(&sensor).iterations(4).with_sink(BufferSink::new());

        let value = meter
            .run("wide", || {
                calls += 1;
                calls
            })
            .unwrap();

        assert_eq!(value, 4);
        assert_eq!(calls, 4);
        // Two sensor reads total: the whole loop sits in one window.
        assert_eq!(sensor.frames_read(), 2);

        let records = meter.into_sink().into_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].pkg, Some(vec![25.0]));
        assert_eq!(records[0].dram, Some(vec![10.0]));
        assert_eq!(records[0].duration_conf, None);
    }

    #[cfg(feature = "stats")]
    #[test]
    fn confidence_policy_reduces_independent_runs() {
        // Three runs, two reads each, constant [100, 40] delta per run.
        let frames = vec![
            vec![0, 0],
            vec![100, 40],
            vec![200, 80],
            vec![300, 120],
            vec![400, 160],
            vec![500, 200],
        ];
        let sensor = ScriptedSensor::new(1, frames);
        let mut meter = EnergyMeter::new(&sensor)
            .iterations(3)
            .policy(Policy::Confidence)
            .with_sink(BufferSink::new());

        let value = meter.run("steady", || "done").unwrap();
        assert_eq!(value, "done");
        assert_eq!(sensor.frames_read(), 6);

        let records = meter.into_sink().into_records();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.pkg, Some(vec![100.0]));
        assert_eq!(record.dram, Some(vec![40.0]));
        // Constant energy sample: zero half-width.
        assert_eq!(record.pkg_conf, Some(vec![0.0]));
        assert_eq!(record.dram_conf, Some(vec![0.0]));
        assert!(record.duration_conf.is_some());
    }

    #[cfg(feature = "stats")]
    #[test]
    fn confidence_policy_drops_unsupported_domains() {
        // DRAM ends at -1 every run: all-negative delta, domain absent.
        let frames = vec![
            vec![0, 10],
            vec![50, -1],
            vec![100, 10],
            vec![150, -1],
        ];
        let sensor = ScriptedSensor::new(1, frames);
        let mut meter = EnergyMeter::new(&sensor)
            .iterations(2)
            .policy(Policy::Confidence)
            .with_sink(BufferSink::new());

        meter.run("nodram", || ()).unwrap();
        let records = meter.into_sink().into_records();
        assert_eq!(records[0].pkg, Some(vec![50.0]));
        assert_eq!(records[0].dram, None);
        assert_eq!(records[0].dram_conf, None);
    }

    #[cfg(not(feature = "stats"))]
    #[test]
    fn confidence_policy_needs_the_stats_feature() {
        let sensor = ScriptedSensor::new(1, vec![vec![0, 0]]);
        let mut calls = 0;
        let mut meter = EnergyMeter::new(&sensor)
            .policy(Policy::Confidence)
            .with_sink(BufferSink::new());

        let err = meter.run("no-stats", || calls += 1).unwrap_err();
        assert!(matches!(err, crate::Error::MissingCapability(_)));
        // Fails up front: the operation never ran, nothing reached the sink.
        assert_eq!(calls, 0);
        assert!(meter.into_sink().into_records().is_empty());
    }

    #[test]
    fn zero_iterations_clamps_to_one() {
        let sensor = ScriptedSensor::new(1, vec![vec![0, 0], vec![10, 4]]);
        let mut calls = 0;
        let mut meter = EnergyMeter::new(&sensor).iterations(0).with_sink(BufferSink::new());
        meter.run("once", || calls += 1).unwrap();
        assert_eq!(calls, 1);
    }

    #[test]
    fn wrap_reruns_the_aggregation_per_call() {
        let frames = vec![vec![0, 0], vec![10, 0], vec![20, 0], vec![30, 0]];
        let sensor = ScriptedSensor::new(1, frames);
        let mut meter = EnergyMeter::new(&sensor).with_sink(BufferSink::new());

        {
            let mut wrapped = meter.wrap("wrapped", || 7u32);
            assert_eq!(wrapped().unwrap(), 7);
            assert_eq!(wrapped().unwrap(), 7);
        }

        let records = meter.into_sink().into_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].pkg, Some(vec![10.0]));
        assert_eq!(records[1].pkg, Some(vec![10.0]));
    }
}
