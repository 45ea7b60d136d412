pub mod domain;
pub mod indicators;
pub mod ingest;
pub mod screen;
pub mod time;
pub mod universe;

pub mod config {
    use anyhow::Context;
    use std::str::FromStr;

    const DEFAULT_QUOTE_PROVIDER_BASE_URL: &str = "https://query1.finance.yahoo.com";
    const DEFAULT_QUOTE_PROVIDER_TIMEOUT_SECS: u64 = 15;
    const DEFAULT_QUOTE_PROVIDER_RETRIES: u32 = 3;
    const DEFAULT_QUOTE_LOOKBACK_DAYS: i64 = 150;
    const DEFAULT_REFRESH_SECS: u64 = 300;
    const DEFAULT_PORT: u16 = 3000;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub sentry_dsn: Option<String>,
        pub quote_provider_base_url: String,
        pub quote_provider_timeout_secs: u64,
        pub quote_provider_retries: u32,
        pub quote_lookback_days: i64,
        pub quote_req_delay_ms: u64,
        pub universe_symbols: Option<String>,
        pub refresh_secs: u64,
        pub port: u16,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_lookup(|key| std::env::var(key).ok())
        }

        /// Builds settings from an arbitrary variable source. Blank values count as unset.
        pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
            let var = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

            let quote_provider_timeout_secs = parse_or(
                &var,
                "QUOTE_PROVIDER_TIMEOUT_SECS",
                DEFAULT_QUOTE_PROVIDER_TIMEOUT_SECS,
            )?;
            anyhow::ensure!(
                quote_provider_timeout_secs >= 1,
                "QUOTE_PROVIDER_TIMEOUT_SECS must be >= 1"
            );

            let quote_provider_retries =
                parse_or(&var, "QUOTE_PROVIDER_RETRIES", DEFAULT_QUOTE_PROVIDER_RETRIES)?;
            anyhow::ensure!(quote_provider_retries >= 1, "QUOTE_PROVIDER_RETRIES must be >= 1");

            let quote_lookback_days =
                parse_or(&var, "QUOTE_LOOKBACK_DAYS", DEFAULT_QUOTE_LOOKBACK_DAYS)?;
            anyhow::ensure!(quote_lookback_days >= 1, "QUOTE_LOOKBACK_DAYS must be >= 1");

            let refresh_secs = parse_or(&var, "SCREEN_REFRESH_SECS", DEFAULT_REFRESH_SECS)?;
            anyhow::ensure!(refresh_secs >= 1, "SCREEN_REFRESH_SECS must be >= 1");

            Ok(Self {
                sentry_dsn: var("SENTRY_DSN"),
                quote_provider_base_url: var("QUOTE_PROVIDER_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_QUOTE_PROVIDER_BASE_URL.to_string()),
                quote_provider_timeout_secs,
                quote_provider_retries,
                quote_lookback_days,
                quote_req_delay_ms: parse_or(&var, "QUOTE_REQ_DELAY_MS", 0)?,
                universe_symbols: var("UNIVERSE_SYMBOLS"),
                refresh_secs,
                port: parse_or(&var, "PORT", DEFAULT_PORT)?,
            })
        }
    }

    fn parse_or<T>(var: impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        match var(key) {
            Some(s) => s
                .trim()
                .parse::<T>()
                .with_context(|| format!("{key} is not a valid number: {s}")),
            None => Ok(default),
        }
    }

}
