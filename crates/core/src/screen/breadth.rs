use crate::domain::snapshot::IndicatorSnapshot;
use crate::screen::zones::ZoneClassification;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmaBreadth {
    pub above: usize,
    pub below: usize,
    pub avg_gap: f64,
}

/// How much of the basket sits above each moving average.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketBreadth {
    pub total: usize,
    pub sma10: SmaBreadth,
    pub sma20: SmaBreadth,
    pub sma50: SmaBreadth,
    pub sma100: SmaBreadth,
    pub buy_zone: usize,
    pub sell_zone: usize,
}

impl MarketBreadth {
    pub fn compute(snapshots: &[IndicatorSnapshot], zones: &ZoneClassification<'_>) -> Self {
        Self {
            total: snapshots.len(),
            sma10: sma_breadth(snapshots, |s| (s.above_sma10, s.gap10)),
            sma20: sma_breadth(snapshots, |s| (s.above_sma20, s.gap20)),
            sma50: sma_breadth(snapshots, |s| (s.above_sma50, s.gap50)),
            sma100: sma_breadth(snapshots, |s| (s.above_sma100, s.gap100)),
            buy_zone: zones.buy_zone.len(),
            sell_zone: zones.sell_zone.len(),
        }
    }

    /// Share of the basket above SMA-10, in percent.
    pub fn pct_above_sma10(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.sma10.above as f64 / self.total as f64 * 100.0
    }
}

fn sma_breadth(
    snapshots: &[IndicatorSnapshot],
    pick: impl Fn(&IndicatorSnapshot) -> (bool, f64),
) -> SmaBreadth {
    let mut out = SmaBreadth::default();
    let mut total_gap = 0.0;
    for s in snapshots {
        let (above, gap) = pick(s);
        if above {
            out.above += 1;
        } else {
            out.below += 1;
        }
        total_gap += gap;
    }
    if !snapshots.is_empty() {
        out.avg_gap = total_gap / snapshots.len() as f64;
    }
    out
}
