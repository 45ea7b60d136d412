pub const DEFAULT_PERIOD: usize = 20;

const LAMBERT_CONSTANT: f64 = 0.015;

/// Commodity Channel Index over the trailing `period` bars.
///
/// Returns 0 with fewer than `period` bars or when the mean deviation is 0.
pub fn cci(high: &[f64], low: &[f64], close: &[f64], period: usize) -> f64 {
    let n = high.len().min(low.len()).min(close.len());
    if period == 0 || n < period {
        return 0.0;
    }

    let start = n - period;
    let typical: Vec<f64> = (start..n)
        .map(|i| (high[i] + low[i] + close[i]) / 3.0)
        .collect();

    let p = period as f64;
    let mean = typical.iter().sum::<f64>() / p;
    let mean_deviation = typical.iter().map(|tp| (tp - mean).abs()).sum::<f64>() / p;
    if mean_deviation == 0.0 {
        return 0.0;
    }

    (typical[period - 1] - mean) / (LAMBERT_CONSTANT * mean_deviation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_prices_yield_zero() {
        let flat = vec![75.0; 40];
        assert_eq!(cci(&flat, &flat, &flat, DEFAULT_PERIOD), 0.0);
    }

    #[test]
    fn short_history_yields_zero() {
        let v: Vec<f64> = (0..19).map(|i| i as f64).collect();
        assert_eq!(cci(&v, &v, &v, DEFAULT_PERIOD), 0.0);
    }

    #[test]
    fn uses_only_trailing_window() {
        // TP = [1, 2, 3]; mean 2; MAD 2/3; CCI = (3 - 2) / (0.015 * 2/3) = 100
        let prices = [1000.0, 1.0, 2.0, 3.0];
        let value = cci(&prices, &prices, &prices, 3);
        assert!((value - 100.0).abs() < 1e-9);
    }

    #[test]
    fn is_not_clamped() {
        let mut closes = vec![100.0; 19];
        closes.push(200.0);
        let value = cci(&closes, &closes, &closes, DEFAULT_PERIOD);
        // TP spike: (200 - 105) / (0.015 * 9.5) = 666.67
        assert!(value > 300.0);
    }
}
