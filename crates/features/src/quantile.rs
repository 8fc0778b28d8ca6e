//! Quantile estimation and outlier thresholding.
//!
//! All three flag columns use the same estimator: linear interpolation
//! between the closest ranks, `h = q * (n - 1)`. Undefined values are
//! excluded from the estimate and never flagged.

/// Returns the `q` quantile of `values` by linear interpolation.
///
/// Returns `None` for an empty slice or a NaN `q`. A `q` outside `[0, 1]`
/// is clamped to the nearest end, giving the minimum or the maximum.
#[must_use]
pub fn linear_quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() || q.is_nan() {
        return None;
    }
    let q = q.clamp(0.0, 1.0);

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let h = q * (sorted.len() - 1) as f64;
    let lower = h.floor() as usize;
    let upper = h.ceil() as usize;
    let frac = h - lower as f64;

    Some(sorted[lower] + frac * (sorted[upper] - sorted[lower]))
}

/// Flags each defined value strictly above the `q` quantile of the defined values.
///
/// Returns the flags and the threshold used (`None` if nothing was defined).
#[must_use]
pub fn threshold_flags(values: &[Option<f64>], q: f64) -> (Vec<bool>, Option<f64>) {
    let defined: Vec<f64> = values.iter().flatten().copied().collect();
    let threshold = linear_quantile(&defined, q);

    let flags = values
        .iter()
        .map(|v| match (v, threshold) {
            (Some(v), Some(t)) => *v > t,
            _ => false,
        })
        .collect();

    (flags, threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_between_ranks() {
        let values = [1.0, 2.0, 3.0, 4.0];
        // h = 0.9 * 3 = 2.7 -> 3 + 0.7 * (4 - 3)
        let q = linear_quantile(&values, 0.9).unwrap();
        assert!((q - 3.7).abs() < 1e-12);
    }

    #[test]
    fn median_of_odd_count_is_middle_value() {
        let values = [5.0, 1.0, 3.0];
        assert_eq!(linear_quantile(&values, 0.5), Some(3.0));
    }

    #[test]
    fn single_value_is_its_own_quantile() {
        assert_eq!(linear_quantile(&[0.25], 0.9), Some(0.25));
    }

    #[test]
    fn out_of_range_quantile_clamps_to_the_ends() {
        let values = [4.0, 1.0, 3.0];
        assert_eq!(linear_quantile(&values, 1.5), Some(4.0));
        assert_eq!(linear_quantile(&values, -0.5), Some(1.0));
        assert_eq!(linear_quantile(&values, f64::NAN), None);
    }

    #[test]
    fn empty_has_no_quantile() {
        assert_eq!(linear_quantile(&[], 0.9), None);
    }

    #[test]
    fn undefined_values_are_excluded_and_never_flagged() {
        let values = [None, Some(1.0), Some(2.0), None, Some(10.0)];
        let (flags, threshold) = threshold_flags(&values, 0.5);
        assert_eq!(threshold, Some(2.0));
        assert_eq!(flags, vec![false, false, false, false, true]);
    }

    #[test]
    fn all_undefined_flags_nothing() {
        let (flags, threshold) = threshold_flags(&[None, None], 0.9);
        assert!(threshold.is_none());
        assert_eq!(flags, vec![false, false]);
    }

    #[test]
    fn flag_count_tracks_upper_tail() {
        let values: Vec<Option<f64>> = (0..100).map(|i| Some(f64::from(i))).collect();
        let (flags, _) = threshold_flags(&values, 0.9);
        let count = flags.iter().filter(|&&f| f).count();
        // threshold 89.1 -> 90..=99 flagged
        assert_eq!(count, 10);
    }

    #[test]
    fn ties_at_threshold_are_not_flagged() {
        let values = vec![Some(0.0); 10];
        let (flags, threshold) = threshold_flags(&values, 0.9);
        assert_eq!(threshold, Some(0.0));
        assert!(flags.iter().all(|f| !f));
    }
}
