//! Sample table and its confidence reduction.

use nalgebra::DMatrix;

/// Two-sided 95% z-score under the normal approximation.
///
/// The reduction leans on the Central Limit Theorem; no small-sample
/// (Student-t) correction is applied.
pub const CONFIDENCE_Z: f64 = 1.96;

/// One row per run, columns `Duration, Pkg_0..Pkg_{k-1}, Dram_0..Dram_{m-1}`.
///
/// The column layout (`k`, `m`) is fixed at construction from the first
/// run's domain-series lengths; every later row must match it. Durations
/// are stored in nanoseconds, energies in microjoules — unit conversion is
/// the caller's business.
pub struct SampleTable {
    data: DMatrix<f64>,
    pkg_cols: usize,
    dram_cols: usize,
}

/// Column-wise reduction of a [`SampleTable`]: per-column mean and 95%
/// confidence half-width (`CONFIDENCE_Z × sample_std / sqrt(n)`), in the
/// table's own units.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Mean duration, nanoseconds.
    pub duration_mean_ns: f64,
    /// Duration confidence half-width, nanoseconds.
    pub duration_conf_ns: f64,
    /// Per-socket package energy means, microjoules. Empty when the table
    /// carries no package columns.
    pub pkg_mean: Vec<f64>,
    /// Per-socket package confidence half-widths, microjoules.
    pub pkg_conf: Vec<f64>,
    /// Per-socket DRAM energy means, microjoules.
    pub dram_mean: Vec<f64>,
    /// Per-socket DRAM confidence half-widths, microjoules.
    pub dram_conf: Vec<f64>,
}

impl SampleTable {
    /// Allocate a table for `runs` rows with `pkg_cols` package and
    /// `dram_cols` DRAM columns.
    ///
    /// # Panics
    ///
    /// Panics when `runs` is zero; an empty table has no meaningful
    /// reduction.
    pub fn new(runs: usize, pkg_cols: usize, dram_cols: usize) -> Self {
        assert!(runs > 0, "sample table needs at least one run");
        Self {
            data: DMatrix::zeros(runs, 1 + pkg_cols + dram_cols),
            pkg_cols,
            dram_cols,
        }
    }

    /// Number of rows (runs).
    pub fn runs(&self) -> usize {
        self.data.nrows()
    }

    /// Fill one row with a run's duration and domain series.
    ///
    /// Absent domains are written as zero-length series and must stay
    /// absent for the whole table.
    ///
    /// # Panics
    ///
    /// Panics when the row index is out of range or a series length does
    /// not match the layout fixed at construction.
    pub fn set_row(&mut self, row: usize, duration_ns: f64, pkg: Option<&[i64]>, dram: Option<&[i64]>) {
        let pkg = pkg.unwrap_or(&[]);
        let dram = dram.unwrap_or(&[]);
        assert_eq!(pkg.len(), self.pkg_cols, "pkg series length changed between runs");
        assert_eq!(dram.len(), self.dram_cols, "dram series length changed between runs");

        self.data[(row, 0)] = duration_ns;
        for (i, &uj) in pkg.iter().enumerate() {
            self.data[(row, 1 + i)] = uj as f64;
        }
        for (i, &uj) in dram.iter().enumerate() {
            self.data[(row, 1 + self.pkg_cols + i)] = uj as f64;
        }
    }

    /// Reduce every column to mean and confidence half-width.
    pub fn summarize(&self) -> Summary {
        let (duration_mean_ns, duration_conf_ns) = self.column_stats(0);

        let mut pkg_mean = Vec::with_capacity(self.pkg_cols);
        let mut pkg_conf = Vec::with_capacity(self.pkg_cols);
        for i in 0..self.pkg_cols {
            let (mean, conf) = self.column_stats(1 + i);
            pkg_mean.push(mean);
            pkg_conf.push(conf);
        }

        let mut dram_mean = Vec::with_capacity(self.dram_cols);
        let mut dram_conf = Vec::with_capacity(self.dram_cols);
        for i in 0..self.dram_cols {
            let (mean, conf) = self.column_stats(1 + self.pkg_cols + i);
            dram_mean.push(mean);
            dram_conf.push(conf);
        }

        Summary {
            duration_mean_ns,
            duration_conf_ns,
            pkg_mean,
            pkg_conf,
            dram_mean,
            dram_conf,
        }
    }

    /// Mean and confidence half-width of one column.
    ///
    /// Sample standard deviation uses the n−1 denominator; a single-row
    /// table has no spread and reduces to `(value, 0)`.
    fn column_stats(&self, col: usize) -> (f64, f64) {
        let column = self.data.column(col);
        let n = column.len() as f64;
        let mean = column.sum() / n;
        if column.len() < 2 {
            return (mean, 0.0);
        }
        let var = column.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
        (mean, CONFIDENCE_Z * var.sqrt() / n.sqrt())
    }
}
