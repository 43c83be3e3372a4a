//! Counter deltas and sentinel-aware domain decomposition.
//!
//! A raw snapshot interleaves package and DRAM counters per socket.
//! The functions here turn two snapshots into per-domain energy series:
//! elementwise difference, even/odd split, then the sentinel rule that
//! decides whether a whole domain is unsupported.

/// Elementwise `end − begin`.
///
/// Both snapshots must come from the same monotonically increasing counter
/// epoch; wraparound correction is the sensor's contract, not this layer's.
///
/// # Panics
///
/// Panics if the snapshots have different lengths (the sensor contract
/// fixes the length to `2 × socket_count`).
pub fn delta(begin: &[i64], end: &[i64]) -> Vec<i64> {
    assert_eq!(begin.len(), end.len(), "snapshots must have equal length");
    end.iter().zip(begin).map(|(e, b)| e - b).collect()
}

/// Even-indexed entries of a delta: the per-socket package series.
pub fn package_series(delta: &[i64]) -> Vec<i64> {
    delta.iter().copied().step_by(2).collect()
}

/// Odd-indexed entries of a delta: the per-socket DRAM series.
pub fn dram_series(delta: &[i64]) -> Vec<i64> {
    delta.iter().copied().skip(1).step_by(2).collect()
}

/// Apply the sentinel rule to one domain series.
///
/// A series is unsupported (`None`) only when *every* element is negative.
/// If at least one element is non-negative the series is kept verbatim,
/// including any individual negative entries — per-socket sentinel
/// filtering is deliberately not done here, matching the behavior callers
/// already depend on.
pub fn filter_unsupported(series: Vec<i64>) -> Option<Vec<i64>> {
    if series.iter().any(|&x| x >= 0) {
        Some(series)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_of_identical_snapshots_is_zero() {
        let snap = vec![100, -1, 50, 7];
        assert_eq!(delta(&snap, &snap), vec![0, 0, 0, 0]);
    }

    #[test]
    fn delta_is_elementwise() {
        let begin = vec![10, 20, 30, 40];
        let end = vec![15, 22, 30, 39];
        assert_eq!(delta(&begin, &end), vec![5, 2, 0, -1]);
    }

    #[test]
    #[should_panic(expected = "equal length")]
    fn delta_rejects_mismatched_lengths() {
        delta(&[1, 2], &[1, 2, 3, 4]);
    }

    #[test]
    fn split_interleaved_domains() {
        let d = vec![1, 2, 3, 4, 5, 6];
        assert_eq!(package_series(&d), vec![1, 3, 5]);
        assert_eq!(dram_series(&d), vec![2, 4, 6]);
    }

    #[test]
    fn single_socket_split() {
        let d = vec![9, 4];
        assert_eq!(package_series(&d), vec![9]);
        assert_eq!(dram_series(&d), vec![4]);
    }

    #[test]
    fn all_negative_series_is_unsupported() {
        assert_eq!(filter_unsupported(vec![-1, -1]), None);
        assert_eq!(filter_unsupported(vec![-1]), None);
        assert_eq!(filter_unsupported(vec![-5, -2, -1]), None);
    }

    #[test]
    fn all_zero_series_is_supported() {
        // Zero is a valid reading, distinct from the sentinel.
        assert_eq!(filter_unsupported(vec![0, 0]), Some(vec![0, 0]));
    }

    #[test]
    fn partially_negative_series_is_kept_verbatim() {
        // One good socket keeps the whole series, -1 entries included.
        assert_eq!(filter_unsupported(vec![-1, 5]), Some(vec![-1, 5]));
        assert_eq!(filter_unsupported(vec![5, -1]), Some(vec![5, -1]));
    }
}
