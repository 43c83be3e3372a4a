//! Measurement sessions over a region of interest.
//!
//! A [`Session`] brackets a code region: it captures a counter snapshot
//! and a timestamp at [`begin`](Session::begin), another pair at
//! [`end`](Session::end), and decomposes the counter delta into per-domain
//! energy series with sentinel detection. Readings are taken synchronously
//! right before and after the measured region, so the reported duration
//! covers the region plus negligible bookkeeping overhead (a documented
//! source of bias, not corrected).

mod delta;
mod session;

pub use delta::{delta, dram_series, filter_unsupported, package_series};
pub use session::{Reading, Session};
