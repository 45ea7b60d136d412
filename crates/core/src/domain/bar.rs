use anyhow::ensure;
use serde::{Deserialize, Serialize};

/// One trading day's observation. `timestamp` is Unix epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: i64,
    pub open: Option<f64>,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// A bar as delivered by an upstream quote source, before null filtering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub timestamp: i64,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
}

impl RawBar {
    /// A bar is usable only when close, high and low are all present.
    pub fn into_bar(self) -> Option<Bar> {
        Some(Bar {
            timestamp: self.timestamp,
            open: self.open,
            high: self.high?,
            low: self.low?,
            close: self.close?,
        })
    }
}

/// Chronologically ordered bars for one instrument, oldest first.
///
/// Timestamps are strictly increasing. Missing trading days are not interpolated:
/// indicators index the series positionally.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    bars: Vec<Bar>,
}

impl BarSeries {
    pub fn try_new(bars: Vec<Bar>) -> anyhow::Result<Self> {
        for (idx, pair) in bars.windows(2).enumerate() {
            ensure!(
                pair[1].timestamp > pair[0].timestamp,
                "bar timestamps must be strictly increasing (index {}: {} after {})",
                idx + 1,
                pair[1].timestamp,
                pair[0].timestamp
            );
        }
        Ok(Self { bars })
    }

    /// Drops null-bearing bars, then validates ordering.
    pub fn from_raw(raw: impl IntoIterator<Item = RawBar>) -> anyhow::Result<Self> {
        Self::try_new(raw.into_iter().filter_map(RawBar::into_bar).collect())
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }
}
