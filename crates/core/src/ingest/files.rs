use crate::domain::bar::RawBar;
use crate::ingest::provider::BarProvider;
use crate::ingest::types::ChartResponse;
use crate::universe::Instrument;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Reads chart JSON saved as `<dir>/<SYMBOL>.json` (or `<dir>/<NAME>.json`).
#[derive(Debug, Clone)]
pub struct DirectoryBarProvider {
    dir: PathBuf,
}

impl DirectoryBarProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        anyhow::ensure!(
            dir.is_dir(),
            "input directory does not exist: {}",
            dir.display()
        );
        Ok(Self { dir })
    }

    fn locate(&self, instrument: &Instrument) -> Option<PathBuf> {
        [&instrument.symbol, &instrument.name]
            .into_iter()
            .map(|stem| self.dir.join(format!("{stem}.json")))
            .find(|p| p.is_file())
    }
}

#[async_trait::async_trait]
impl BarProvider for DirectoryBarProvider {
    fn provider_name(&self) -> &'static str {
        "directory"
    }

    async fn fetch_daily_bars(&self, instrument: &Instrument) -> Result<Vec<RawBar>> {
        let path = self.locate(instrument).with_context(|| {
            format!(
                "no chart file for {} in {}",
                instrument.symbol,
                self.dir.display()
            )
        })?;
        read_chart_file(&path).await
    }
}

pub async fn read_chart_file(path: &Path) -> Result<Vec<RawBar>> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let parsed = serde_json::from_str::<ChartResponse>(&text)
        .with_context(|| format!("{} is not a chart response", path.display()))?;
    parsed.into_raw_bars()
}
