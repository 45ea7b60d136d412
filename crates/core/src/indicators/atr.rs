// Average True Range with Wilder smoothing.
//
//   TR[i]      = max(H - L, |H - prevClose|, |L - prevClose|), prevClose = close[0] at i = 0
//   ATR[p-1]   = mean(TR[0..p])
//   ATR[i]     = (ATR[i-1] * (p - 1) + TR[i]) / p

/// True range for every bar. The first bar uses its own close as the previous close,
/// which reduces it to `high - low`.
pub fn true_range(high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
    let n = high.len().min(low.len()).min(close.len());
    (0..n)
        .map(|i| {
            let prev_close = if i == 0 { close[0] } else { close[i - 1] };
            let hl = high[i] - low[i];
            let hc = (high[i] - prev_close).abs();
            let lc = (low[i] - prev_close).abs();
            hl.max(hc).max(lc)
        })
        .collect()
}

/// ATR aligned index-for-index with the input.
///
/// Entries before `period - 1` are 0 placeholders. Returns an empty vector when the
/// input is shorter than `period` (or `period` is 0).
pub fn atr(high: &[f64], low: &[f64], close: &[f64], period: usize) -> Vec<f64> {
    let tr = true_range(high, low, close);
    if period == 0 || tr.len() < period {
        return Vec::new();
    }

    let p = period as f64;
    let mut out = vec![0.0; tr.len()];
    out[period - 1] = tr[..period].iter().sum::<f64>() / p;
    for i in period..tr.len() {
        out[i] = (out[i - 1] * (p - 1.0) + tr[i]) / p;
    }
    out
}
