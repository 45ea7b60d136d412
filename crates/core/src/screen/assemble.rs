use crate::domain::bar::BarSeries;
use crate::domain::snapshot::{gap_pct, IndicatorSnapshot};
use crate::indicators::{cci, crossover, rsi, sma::trailing_sma, supertrend};
use crate::time::in_market::trading_date;
use crate::universe::Instrument;
use serde::{Deserialize, Serialize};

/// Longest lookback (SMA-100). Shorter series are rejected, never padded.
pub const MIN_VALID_BARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectReason {
    InsufficientHistory { valid_bars: usize, required: usize },
    InvalidTimestamp { timestamp: i64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rejection {
    pub symbol: String,
    pub reason: RejectReason,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotOutcome {
    Accepted(IndicatorSnapshot),
    Rejected(Rejection),
}

impl SnapshotOutcome {
    pub fn snapshot(self) -> Option<IndicatorSnapshot> {
        match self {
            SnapshotOutcome::Accepted(s) => Some(s),
            SnapshotOutcome::Rejected(_) => None,
        }
    }
}

/// Computes the indicator snapshot for one instrument at its last bar.
pub fn assemble_snapshot(instrument: &Instrument, series: &BarSeries) -> SnapshotOutcome {
    let reject = |reason| {
        SnapshotOutcome::Rejected(Rejection {
            symbol: instrument.symbol.clone(),
            reason,
        })
    };

    let Some(last) = series.last().filter(|_| series.len() >= MIN_VALID_BARS) else {
        tracing::warn!(
            symbol = %instrument.symbol,
            valid_bars = series.len(),
            required = MIN_VALID_BARS,
            "not enough history; skipping instrument"
        );
        return reject(RejectReason::InsufficientHistory {
            valid_bars: series.len(),
            required: MIN_VALID_BARS,
        });
    };

    let Some(as_of_date) = trading_date(last.timestamp) else {
        return reject(RejectReason::InvalidTimestamp {
            timestamp: last.timestamp,
        });
    };

    let closes = series.closes();
    let highs = series.highs();
    let lows = series.lows();
    let price = last.close;

    let sma10 = trailing_sma(&closes, 10);
    let sma20 = trailing_sma(&closes, 20);
    let sma50 = trailing_sma(&closes, 50);
    let sma100 = trailing_sma(&closes, 100);

    let st = supertrend::supertrend(
        &highs,
        &lows,
        &closes,
        supertrend::DEFAULT_PERIOD,
        supertrend::DEFAULT_MULTIPLIER,
    );
    let rsi = rsi::rsi(&closes, rsi::DEFAULT_PERIOD);
    let cci = cci::cci(&highs, &lows, &closes, cci::DEFAULT_PERIOD);
    let crossovers = crossover::detect_crossovers(&closes, as_of_date);

    tracing::debug!(
        symbol = %instrument.symbol,
        price,
        supertrend = st.value,
        trend = ?st.trend,
        sma10,
        "computed snapshot"
    );

    SnapshotOutcome::Accepted(IndicatorSnapshot {
        symbol: instrument.symbol.clone(),
        name: instrument.name.clone(),
        as_of_date,
        current_price: price,
        sma10,
        sma20,
        sma50,
        sma100,
        gap10: gap_pct(price, sma10),
        gap20: gap_pct(price, sma20),
        gap50: gap_pct(price, sma50),
        gap100: gap_pct(price, sma100),
        above_sma10: price > sma10,
        above_sma20: price > sma20,
        above_sma50: price > sma50,
        above_sma100: price > sma100,
        supertrend: st.value,
        supertrend_trend: st.trend,
        rsi: rsi.value,
        rsi_streak: rsi.streak,
        cci,
        crossovers,
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::domain::bar::{Bar, BarSeries};

    pub const DAY: i64 = 86_400;
    // 2025-06-02 03:45 UTC, a session open in IST.
    pub const START: i64 = 1_748_835_900;

    pub fn series_from_closes(closes: &[f64]) -> BarSeries {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                timestamp: START + i as i64 * DAY,
                open: None,
                high: close + 0.5,
                low: close - 0.5,
                close,
            })
            .collect();
        BarSeries::try_new(bars).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::domain::bar::RawBar;
    use crate::domain::snapshot::Trend;
    use chrono::NaiveDate;

    fn instrument() -> Instrument {
        Instrument::new("RELIANCE.NS")
    }

    #[test]
    fn rising_series_is_above_every_average() {
        let closes: Vec<f64> = (0..100).map(|i| 100.0 + i as f64).collect();
        let snapshot = assemble_snapshot(&instrument(), &series_from_closes(&closes))
            .snapshot()
            .unwrap();

        assert_eq!(snapshot.name, "RELIANCE");
        assert_eq!(snapshot.current_price, 199.0);
        assert!(snapshot.above_sma10 && snapshot.above_sma20);
        assert!(snapshot.above_sma50 && snapshot.above_sma100);
        assert_eq!(snapshot.supertrend_trend, Trend::Up);
        for gap in [snapshot.gap10, snapshot.gap20, snapshot.gap50, snapshot.gap100] {
            assert!(gap > 0.0);
        }
        assert!((snapshot.sma100 - 149.5).abs() < 1e-9);
        assert!((snapshot.sma10 - 194.5).abs() < 1e-9);
    }

    #[test]
    fn as_of_date_comes_from_last_bar() {
        let closes: Vec<f64> = (0..100).map(|i| 100.0 + i as f64).collect();
        let snapshot = assemble_snapshot(&instrument(), &series_from_closes(&closes))
            .snapshot()
            .unwrap();
        // 99 days after 2025-06-02.
        assert_eq!(
            snapshot.as_of_date,
            NaiveDate::from_ymd_opt(2025, 9, 9).unwrap()
        );
    }

    #[test]
    fn ninety_nine_bars_are_rejected() {
        let closes: Vec<f64> = (0..99).map(|i| 100.0 + i as f64).collect();
        let outcome = assemble_snapshot(&instrument(), &series_from_closes(&closes));
        assert_eq!(
            outcome,
            SnapshotOutcome::Rejected(Rejection {
                symbol: "RELIANCE.NS".to_string(),
                reason: RejectReason::InsufficientHistory {
                    valid_bars: 99,
                    required: 100,
                },
            })
        );
    }

    #[test]
    fn null_filtering_can_push_below_minimum() {
        let raw: Vec<RawBar> = (0..105)
            .map(|i| {
                let close = 100.0 + i as f64;
                RawBar {
                    timestamp: START + i as i64 * DAY,
                    open: None,
                    high: Some(close + 1.0),
                    low: Some(close - 1.0),
                    close: if i % 10 == 0 { None } else { Some(close) },
                }
            })
            .collect();

        let series = BarSeries::from_raw(raw).unwrap();
        assert_eq!(series.len(), 94);
        assert!(assemble_snapshot(&instrument(), &series).snapshot().is_none());
    }

    #[test]
    fn flat_series_has_zero_cci_and_no_crossovers() {
        let closes = vec![250.0; 120];
        let snapshot = assemble_snapshot(&instrument(), &series_from_closes(&closes))
            .snapshot()
            .unwrap();
        assert_eq!(snapshot.cci, 0.0);
        assert_eq!(snapshot.gap10, 0.0);
        assert!(!snapshot.above_sma10);
        assert_eq!(snapshot.crossovers.sma10, None);
        assert_eq!(snapshot.crossovers.sma20, None);
        assert_eq!(snapshot.rsi_streak, 0);
    }

    #[test]
    fn rejection_serializes_with_reason_kind() {
        let rejection = Rejection {
            symbol: "TCS.NS".to_string(),
            reason: RejectReason::InsufficientHistory {
                valid_bars: 42,
                required: 100,
            },
        };
        let v = serde_json::to_value(&rejection).unwrap();
        assert_eq!(v["reason"]["kind"], "insufficient_history");
        assert_eq!(v["reason"]["valid_bars"], 42);
    }
}
