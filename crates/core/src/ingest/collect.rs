use crate::config::Settings;
use crate::domain::bar::BarSeries;
use crate::ingest::provider::BarProvider;
use crate::screen::InstrumentSeries;
use crate::universe::Instrument;
use std::time::Duration;

const MAX_LOGGED_FAILURES: usize = 10;

#[derive(Debug, Clone, Copy, Default)]
pub struct CollectOptions {
    /// Pause between consecutive instrument requests.
    pub req_delay: Duration,
}

impl CollectOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            req_delay: Duration::from_millis(settings.quote_req_delay_ms),
        }
    }
}

/// Fetches and normalizes bars for every instrument.
///
/// Instruments whose fetch or normalization fails are logged and left out; the
/// screen is computed over whatever was obtained.
pub async fn collect_universe(
    provider: &dyn BarProvider,
    instruments: &[Instrument],
    opts: CollectOptions,
) -> Vec<InstrumentSeries> {
    let mut out = Vec::with_capacity(instruments.len());
    let mut failures: usize = 0;

    for (idx, instrument) in instruments.iter().enumerate() {
        if idx != 0 && !opts.req_delay.is_zero() {
            tokio::time::sleep(opts.req_delay).await;
        }

        let result = provider
            .fetch_daily_bars(instrument)
            .await
            .and_then(BarSeries::from_raw);

        match result {
            Ok(series) => {
                tracing::debug!(
                    symbol = %instrument.symbol,
                    valid_bars = series.len(),
                    "bars collected"
                );
                out.push(InstrumentSeries {
                    instrument: instrument.clone(),
                    series,
                });
            }
            Err(err) => {
                failures += 1;
                if failures <= MAX_LOGGED_FAILURES {
                    tracing::warn!(
                        idx,
                        symbol = %instrument.symbol,
                        provider = provider.provider_name(),
                        failure_count = failures,
                        error = %format!("{err:#}"),
                        "bar fetch failed; skipping instrument"
                    );
                }
            }
        }
    }

    tracing::info!(
        provider = provider.provider_name(),
        requested = instruments.len(),
        collected = out.len(),
        failures,
        "bar collection finished"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bar::RawBar;
    use anyhow::Result;

    struct StubProvider;

    #[async_trait::async_trait]
    impl BarProvider for StubProvider {
        fn provider_name(&self) -> &'static str {
            "stub"
        }

        async fn fetch_daily_bars(&self, instrument: &Instrument) -> Result<Vec<RawBar>> {
            let bar = |timestamp| RawBar {
                timestamp,
                open: None,
                high: Some(2.0),
                low: Some(1.0),
                close: Some(1.5),
            };
            match instrument.name.as_str() {
                "DOWN" => anyhow::bail!("upstream unavailable"),
                "UNORDERED" => Ok(vec![bar(2), bar(1)]),
                _ => Ok(vec![bar(1), bar(2), bar(3)]),
            }
        }
    }

    #[tokio::test]
    async fn skips_failed_and_malformed_instruments() {
        let instruments = vec![
            Instrument::new("TCS.NS"),
            Instrument::new("DOWN.NS"),
            Instrument::new("UNORDERED.NS"),
            Instrument::new("INFY.NS"),
        ];

        let out = collect_universe(&StubProvider, &instruments, CollectOptions::default()).await;
        let names: Vec<_> = out.iter().map(|s| s.instrument.name.as_str()).collect();
        assert_eq!(names, vec!["TCS", "INFY"]);
        assert_eq!(out[0].series.len(), 3);
    }
}
