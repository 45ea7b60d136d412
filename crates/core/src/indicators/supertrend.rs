use crate::domain::snapshot::Trend;
use crate::indicators::atr::atr;

pub const DEFAULT_PERIOD: usize = 10;
pub const DEFAULT_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupertrendReading {
    pub value: f64,
    pub trend: Trend,
}

impl SupertrendReading {
    fn neutral() -> Self {
        Self {
            value: 0.0,
            trend: Trend::Neutral,
        }
    }
}

/// Supertrend band at the last bar and the trend sign relative to it.
///
/// Bands and the trend line are seeded at `period - 1` and carried forward bar by bar.
/// Band membership is decided by exact equality with the previous band value: the line
/// only ever holds a copy of one of the two final bands, so no tolerance is applied.
pub fn supertrend(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    period: usize,
    multiplier: f64,
) -> SupertrendReading {
    let n = high.len().min(low.len()).min(close.len());
    if period == 0 || n < period {
        return SupertrendReading::neutral();
    }

    let atr = atr(&high[..n], &low[..n], &close[..n], period);
    let seed = period - 1;

    let mut basic_upper = Vec::with_capacity(n);
    let mut basic_lower = Vec::with_capacity(n);
    for i in 0..n {
        let hl2 = (high[i] + low[i]) / 2.0;
        basic_upper.push(hl2 + multiplier * atr[i]);
        basic_lower.push(hl2 - multiplier * atr[i]);
    }

    let mut final_upper = vec![basic_upper[seed]; n];
    let mut final_lower = vec![basic_lower[seed]; n];
    for i in period..n {
        let prev = final_upper[i - 1];
        final_upper[i] = if basic_upper[i] < prev || close[i - 1] > prev {
            basic_upper[i]
        } else {
            prev
        };

        let prev = final_lower[i - 1];
        final_lower[i] = if basic_lower[i] > prev || close[i - 1] < prev {
            basic_lower[i]
        } else {
            prev
        };
    }

    let mut line = vec![final_upper[seed]; n];
    for i in period..n {
        let prev = line[i - 1];
        let on_upper = prev == final_upper[i - 1];
        let on_lower = prev == final_lower[i - 1];

        line[i] = if on_upper && close[i] <= final_upper[i] {
            final_upper[i]
        } else if on_upper && close[i] >= final_upper[i] {
            final_lower[i]
        } else if on_lower && close[i] >= final_lower[i] {
            final_lower[i]
        } else if on_lower && close[i] <= final_lower[i] {
            final_upper[i]
        } else {
            prev
        };
    }

    let last = n - 1;
    let value = line[last];
    let trend = if close[last] > value {
        Trend::Up
    } else {
        Trend::Down
    };

    SupertrendReading { value, trend }
}
