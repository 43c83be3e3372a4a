//! Statistical aggregation for repeated measurements.
//!
//! Only compiled with the `stats` feature (on by default). The confidence
//! policy collects one table row per run and reduces each column to a mean
//! and a normal-approximation 95% confidence half-width.

mod table;

pub use table::{SampleTable, Summary, CONFIDENCE_Z};
