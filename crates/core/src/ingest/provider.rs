use crate::config::Settings;
use crate::domain::bar::RawBar;
use crate::ingest::types::ChartResponse;
use crate::universe::Instrument;
use anyhow::{Context, Result};
use chrono::{Duration as ChronoDuration, Utc};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::time::Duration;

const MAX_BACKOFF_SHIFT: u32 = 6;
const CHART_PATH: [&str; 3] = ["v8", "finance", "chart"];

// The chart endpoint rejects requests without a browser-like agent.
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Source of daily bars for one instrument, oldest first, nulls preserved.
#[async_trait::async_trait]
pub trait BarProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn fetch_daily_bars(&self, instrument: &Instrument) -> Result<Vec<RawBar>>;
}

#[derive(Debug, Clone)]
pub struct HttpChartProvider {
    http: reqwest::Client,
    base_url: String,
    retries: u32,
    lookback_days: i64,
}

impl HttpChartProvider {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.quote_provider_timeout_secs))
            .build()
            .context("failed to build quote provider http client")?;

        Ok(Self {
            http,
            base_url: settings.quote_provider_base_url.clone(),
            retries: settings.quote_provider_retries,
            lookback_days: settings.quote_lookback_days,
        })
    }

    fn url(&self, symbol: &str) -> Result<reqwest::Url> {
        let base = &self.base_url;
        let mut url = reqwest::Url::parse(base)
            .with_context(|| format!("invalid quote provider base url: {base}"))?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("quote provider base url cannot be a base: {base}"))?
            .pop_if_empty()
            .extend(CHART_PATH)
            .push(symbol);
        Ok(url)
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers
    }

    async fn fetch_once(&self, symbol: &str) -> Result<Vec<RawBar>> {
        let url = self.url(symbol)?;
        let end = Utc::now();
        let start = end - ChronoDuration::days(self.lookback_days);

        let res = self
            .http
            .get(url)
            .headers(self.headers())
            .query(&[
                ("period1", start.timestamp().to_string()),
                ("period2", end.timestamp().to_string()),
                ("interval", "1d".to_string()),
            ])
            .send()
            .await
            .context("quote provider request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read quote provider response")?;
        if !status.is_success() {
            anyhow::bail!("quote provider HTTP {status}: {text}");
        }

        let parsed = serde_json::from_str::<ChartResponse>(&text)
            .context("failed to parse quote provider response into ChartResponse")?;
        parsed.into_raw_bars()
    }
}

#[async_trait::async_trait]
impl BarProvider for HttpChartProvider {
    fn provider_name(&self) -> &'static str {
        "http_chart"
    }

    async fn fetch_daily_bars(&self, instrument: &Instrument) -> Result<Vec<RawBar>> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.fetch_once(&instrument.symbol).await {
                Ok(bars) => return Ok(bars),
                Err(err) => {
                    if attempt >= self.retries {
                        return Err(err)
                            .with_context(|| format!("fetch {} failed", instrument.symbol));
                    }
                    let backoff = backoff_for(attempt);
                    tracing::warn!(
                        attempt,
                        ?backoff,
                        symbol = %instrument.symbol,
                        error = %err,
                        "quote fetch failed; retrying"
                    );
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }
}

/// 1s, 2s, 4s, ... capped at 64s.
fn backoff_for(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt.saturating_sub(1).min(MAX_BACKOFF_SHIFT))
}
