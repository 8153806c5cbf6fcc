//! Axis range policy: quantile clipping or full data range.

/// Linear-interpolation quantile of an ascending slice (numpy's default method).
/// `q` is clamped to [0, 1]. Returns NaN for an empty slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = pos - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

/// Quantile of unsorted samples.
pub fn quantile(samples: &[f64], q: f64) -> f64 {
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    quantile_sorted(&sorted, q)
}

/// (min, max) of the samples, or `None` when empty.
pub fn min_max(samples: &[f64]) -> Option<(f64, f64)> {
    if samples.is_empty() {
        return None;
    }
    Some(
        samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            }),
    )
}

/// Axis limits for one variable.
///
/// With `quantiles = Some([lo, hi])` the limits are the matching sample quantiles,
/// otherwise the full data range. Pure in its inputs, so every panel sharing a
/// variable on an axis gets identical limits.
pub fn axis_range(samples: &[f64], quantiles: Option<[f64; 2]>) -> Option<(f64, f64)> {
    if samples.is_empty() {
        return None;
    }
    match quantiles {
        Some([q_lo, q_hi]) => {
            let mut sorted = samples.to_vec();
            sorted.sort_by(f64::total_cmp);
            Some((quantile_sorted(&sorted, q_lo), quantile_sorted(&sorted, q_hi)))
        }
        None => min_max(samples),
    }
}
