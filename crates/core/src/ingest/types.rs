use crate::domain::bar::RawBar;
use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Daily chart payload in the Yahoo v8 `chart` shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartResponse {
    pub chart: ChartBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartBody {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<ChartError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartResult {
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: ChartIndicators,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartIndicators {
    #[serde(default)]
    pub quote: Vec<ChartQuote>,
}

/// Parallel OHLC arrays; any entry may be null on days the feed has gaps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartQuote {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

impl ChartResponse {
    /// One raw bar per timestamp. Nulls are kept; `BarSeries::from_raw` filters them.
    pub fn into_raw_bars(self) -> anyhow::Result<Vec<RawBar>> {
        if let Some(err) = self.chart.error {
            anyhow::bail!("chart error {}: {}", err.code, err.description);
        }

        let result = self
            .chart
            .result
            .and_then(|r| r.into_iter().next())
            .context("chart response has no result")?;
        let quote = result
            .indicators
            .quote
            .into_iter()
            .next()
            .context("chart result has no quote block")?;

        let at = |v: &[Option<f64>], i: usize| v.get(i).copied().flatten();
        Ok(result
            .timestamp
            .iter()
            .enumerate()
            .map(|(i, &timestamp)| RawBar {
                timestamp,
                open: at(&quote.open, i),
                high: at(&quote.high, i),
                low: at(&quote.low, i),
                close: at(&quote.close, i),
            })
            .collect())
    }
}
