pub const DEFAULT_PERIOD: usize = 14;

/// Value used when no RSI can be computed.
const NEUTRAL_RSI: f64 = 50.0;

/// RS substituted when the average loss is zero.
const RS_NO_LOSSES: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RsiReading {
    pub value: f64,
    /// Consecutive most-recent RSI moves in one direction: positive while rising,
    /// negative while falling, 0 when the last two values are equal.
    pub streak: i32,
}

/// Wilder-smoothed RSI series, one value per close from index `period` onward.
pub fn rsi_series(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() < period + 1 {
        return Vec::new();
    }

    let mut gains = Vec::with_capacity(closes.len() - 1);
    let mut losses = Vec::with_capacity(closes.len() - 1);
    for pair in closes.windows(2) {
        let change = pair[1] - pair[0];
        gains.push(if change > 0.0 { change } else { 0.0 });
        losses.push(if change < 0.0 { -change } else { 0.0 });
    }

    let p = period as f64;
    let mut avg_gain = gains[..period].iter().sum::<f64>() / p;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / p;

    let mut out = Vec::with_capacity(gains.len() - period + 1);
    out.push(rsi_from_averages(avg_gain, avg_loss));
    for i in period..gains.len() {
        avg_gain = (avg_gain * (p - 1.0) + gains[i]) / p;
        avg_loss = (avg_loss * (p - 1.0) + losses[i]) / p;
        out.push(rsi_from_averages(avg_gain, avg_loss));
    }
    out
}

pub fn rsi(closes: &[f64], period: usize) -> RsiReading {
    let series = rsi_series(closes, period);
    RsiReading {
        value: series.last().copied().unwrap_or(NEUTRAL_RSI),
        streak: streak(&series),
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    let rs = if avg_loss == 0.0 {
        RS_NO_LOSSES
    } else {
        avg_gain / avg_loss
    };
    100.0 - 100.0 / (1.0 + rs)
}

fn streak(values: &[f64]) -> i32 {
    let n = values.len();
    if n < 2 {
        return 0;
    }

    let rising = values[n - 1] > values[n - 2];
    let falling = values[n - 1] < values[n - 2];
    if !rising && !falling {
        return 0;
    }

    let mut count: i32 = 0;
    for i in (1..n).rev() {
        let moved = if rising {
            values[i] > values[i - 1]
        } else {
            values[i] < values[i - 1]
        };
        if !moved {
            break;
        }
        count += 1;
    }

    if rising {
        count
    } else {
        -count
    }
}
