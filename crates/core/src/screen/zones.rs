use crate::domain::snapshot::{IndicatorSnapshot, Trend};
use serde::Serialize;
use std::cmp::Ordering;

const BUY_MAX_CCI: f64 = 50.0;
const SELL_MIN_CCI: f64 = 100.0;

/// Ranked buy-zone and sell-zone views over a snapshot collection.
///
/// The two lists are independent filters, not a partition: an instrument may be in
/// neither, and both lists may be empty.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneClassification<'a> {
    pub buy_zone: Vec<BuyCandidate<'a>>,
    pub sell_zone: Vec<&'a IndicatorSnapshot>,
}

/// Buy-zone entry: the snapshot plus the price's distance above the Supertrend line.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyCandidate<'a> {
    #[serde(flatten)]
    pub snapshot: &'a IndicatorSnapshot,
    /// Percent.
    pub supertrend_distance: f64,
}

impl<'a> BuyCandidate<'a> {
    fn new(snapshot: &'a IndicatorSnapshot) -> Self {
        Self {
            snapshot,
            supertrend_distance: snapshot.supertrend_distance_pct(),
        }
    }
}

/// Uptrend, above SMA-10/20/50, and CCI below 50.
pub fn in_buy_zone(s: &IndicatorSnapshot) -> bool {
    s.supertrend_trend == Trend::Up
        && s.above_sma10
        && s.above_sma20
        && s.above_sma50
        && s.cci < BUY_MAX_CCI
}

/// Downtrend below SMA-10, or CCI above 100, or below both SMA-10 and SMA-20.
pub fn in_sell_zone(s: &IndicatorSnapshot) -> bool {
    (s.supertrend_trend == Trend::Down && !s.above_sma10)
        || s.cci > SELL_MIN_CCI
        || (!s.above_sma10 && !s.above_sma20)
}

pub fn classify(snapshots: &[IndicatorSnapshot]) -> ZoneClassification<'_> {
    let mut buy_zone: Vec<_> = snapshots.iter().filter(|s| in_buy_zone(s)).collect();
    // Most oversold first.
    buy_zone.sort_by(|a, b| by_cci(a, b).then_with(|| a.symbol.cmp(&b.symbol)));
    let buy_zone = buy_zone.into_iter().map(BuyCandidate::new).collect();

    let mut sell_zone: Vec<_> = snapshots.iter().filter(|s| in_sell_zone(s)).collect();
    // Most overbought first.
    sell_zone.sort_by(|a, b| by_cci(b, a).then_with(|| a.symbol.cmp(&b.symbol)));

    ZoneClassification {
        buy_zone,
        sell_zone,
    }
}

fn by_cci(a: &IndicatorSnapshot, b: &IndicatorSnapshot) -> Ordering {
    a.cci.partial_cmp(&b.cci).unwrap_or(Ordering::Equal)
}
