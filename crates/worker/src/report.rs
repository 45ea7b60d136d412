use anyhow::Context;
use serde::Serialize;
use std::path::Path;
use zonescan_core::screen::breadth::MarketBreadth;
use zonescan_core::screen::zones::ZoneClassification;
use zonescan_core::screen::Screen;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport<'a> {
    pub screen: &'a Screen,
    pub zones: ZoneClassification<'a>,
    pub breadth: MarketBreadth,
}

impl<'a> RunReport<'a> {
    pub fn new(screen: &'a Screen) -> Self {
        Self {
            screen,
            zones: screen.zones(),
            breadth: screen.breadth(),
        }
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize run report")
    }

    /// Writes to `path`, or to stdout when no path is given.
    pub fn write(&self, path: Option<&Path>) -> anyhow::Result<()> {
        let json = self.to_json()?;
        match path {
            Some(p) => std::fs::write(p, json)
                .with_context(|| format!("failed to write report to {}", p.display())),
            None => {
                println!("{json}");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zonescan_core::domain::bar::{Bar, BarSeries};
    use zonescan_core::screen::{refresh, InstrumentSeries};
    use zonescan_core::universe::Instrument;

    fn input(symbol: &str, closes: impl Iterator<Item = f64>) -> InstrumentSeries {
        let bars = closes
            .enumerate()
            .map(|(i, close)| Bar {
                timestamp: 1_748_835_900 + i as i64 * 86_400,
                open: None,
                high: close + 0.5,
                low: close - 0.5,
                close,
            })
            .collect();
        InstrumentSeries {
            instrument: Instrument::new(symbol),
            series: BarSeries::try_new(bars).unwrap(),
        }
    }

    #[test]
    fn report_includes_zones_and_breadth() {
        let screen = refresh(
            None,
            vec![
                input("TCS.NS", (0..120).map(|i| 100.0 + i as f64)),
                input("ITC.NS", (0..120).map(|i| 400.0 - i as f64)),
                input("INFY.NS", (0..50).map(|i| 100.0 + i as f64)),
            ],
        );

        let json = RunReport::new(&screen).to_json().unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["screen"]["generation"], 1);
        assert_eq!(v["screen"]["snapshots"].as_array().unwrap().len(), 2);
        assert_eq!(v["screen"]["rejections"][0]["symbol"], "INFY.NS");
        assert_eq!(v["breadth"]["total"], 2);
        assert_eq!(v["zones"]["sellZone"].as_array().unwrap().len(), 2);
        assert!(v["zones"]["buyZone"].as_array().unwrap().is_empty());
    }

    #[test]
    fn writes_report_file() {
        let screen = refresh(None, vec![input("TCS.NS", (0..120).map(|i| 100.0 + i as f64))]);
        let path = std::env::temp_dir().join(format!("zonescan-report-{}.json", screen.run_id));

        RunReport::new(&screen).write(Some(&path)).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"TCS.NS\""));
        std::fs::remove_file(&path).ok();
    }
}
