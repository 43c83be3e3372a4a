//! Measurement result record.

use serde::{Deserialize, Serialize};

/// Immutable outcome of one measurement (or of an aggregation of several).
///
/// Durations and timestamps are in seconds, energies in microjoules.
/// `pkg`/`dram` are absent when the corresponding hardware domain is
/// unsupported; the confidence fields are absent unless the record came
/// out of the confidence policy. When a confidence series is present, its
/// value series is present too and has the same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Measurement label.
    pub label: String,
    /// Unix timestamp of the measurement start, in seconds.
    pub timestamp: f64,
    /// Measured duration in seconds.
    pub duration: f64,
    /// Per-socket package energy in microjoules.
    pub pkg: Option<Vec<f64>>,
    /// Per-socket DRAM energy in microjoules.
    pub dram: Option<Vec<f64>>,
    /// 95% confidence half-width on the duration, in seconds.
    pub duration_conf: Option<f64>,
    /// 95% confidence half-widths on `pkg`, in microjoules.
    pub pkg_conf: Option<Vec<f64>>,
    /// 95% confidence half-widths on `dram`, in microjoules.
    pub dram_conf: Option<Vec<f64>>,
}

impl ResultRecord {
    /// Build a record straight from one session's raw outcome.
    ///
    /// Nanoseconds are converted to seconds and integer microjoule deltas
    /// widened to floats; all confidence fields are left absent.
    pub fn raw(
        label: impl Into<String>,
        timestamp_ns: u64,
        duration_ns: u64,
        pkg: Option<Vec<i64>>,
        dram: Option<Vec<i64>>,
    ) -> Self {
        Self {
            label: label.into(),
            timestamp: timestamp_ns as f64 / 1e9,
            duration: duration_ns as f64 / 1e9,
            pkg: pkg.map(to_f64),
            dram: dram.map(to_f64),
            duration_conf: None,
            pkg_conf: None,
            dram_conf: None,
        }
    }

    /// Scale a record down by `n`: duration and every `pkg`/`dram` element
    /// are divided, label and timestamp are kept, and the confidence fields
    /// pass through untouched (the global policy, which is the only caller,
    /// never populates them — a single wide measurement normalized to a
    /// per-iteration estimate is not a statistical distribution).
    pub fn scaled(&self, n: f64) -> Self {
        Self {
            label: self.label.clone(),
            timestamp: self.timestamp,
            duration: self.duration / n,
            pkg: self.pkg.as_ref().map(|v| scale(v, n)),
            dram: self.dram.as_ref().map(|v| scale(v, n)),
            duration_conf: self.duration_conf,
            pkg_conf: self.pkg_conf.clone(),
            dram_conf: self.dram_conf.clone(),
        }
    }
}

fn to_f64(series: Vec<i64>) -> Vec<f64> {
    series.into_iter().map(|x| x as f64).collect()
}

fn scale(series: &[f64], n: f64) -> Vec<f64> {
    series.iter().map(|x| x / n).collect()
}
