/// Arithmetic mean of `series`, or 0 when the series is shorter than `period`.
///
/// The function does not window: callers pass the trailing `period` values.
/// A return of 0 therefore means "insufficient data" whenever the input was short.
pub fn sma(series: &[f64], period: usize) -> f64 {
    if series.is_empty() || series.len() < period {
        return 0.0;
    }
    series.iter().sum::<f64>() / series.len() as f64
}

/// SMA over the last `period` values of `series`.
pub fn trailing_sma(series: &[f64], period: usize) -> f64 {
    let start = series.len().saturating_sub(period);
    sma(&series[start..], period)
}
