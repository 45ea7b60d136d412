use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrossDirection {
    Above,
    Below,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossEvent {
    pub direction: CrossDirection,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Crossovers {
    pub sma10: Option<CrossEvent>,
    pub sma20: Option<CrossEvent>,
}

/// Point-in-time indicator values for one instrument, computed at its last bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSnapshot {
    pub symbol: String,
    pub name: String,
    pub as_of_date: NaiveDate,
    pub current_price: f64,

    pub sma10: f64,
    pub sma20: f64,
    pub sma50: f64,
    pub sma100: f64,

    pub gap10: f64,
    pub gap20: f64,
    pub gap50: f64,
    pub gap100: f64,

    #[serde(rename = "aboveSMA10")]
    pub above_sma10: bool,
    #[serde(rename = "aboveSMA20")]
    pub above_sma20: bool,
    #[serde(rename = "aboveSMA50")]
    pub above_sma50: bool,
    #[serde(rename = "aboveSMA100")]
    pub above_sma100: bool,

    pub supertrend: f64,
    pub supertrend_trend: Trend,

    pub rsi: f64,
    pub rsi_streak: i32,

    pub cci: f64,

    pub crossovers: Crossovers,
}

impl IndicatorSnapshot {
    /// Distance of the price from the Supertrend band, in percent.
    pub fn supertrend_distance_pct(&self) -> f64 {
        gap_pct(self.current_price, self.supertrend)
    }
}

/// `(price - reference) / reference * 100`, or 0 when the reference is exactly 0.
pub fn gap_pct(price: f64, reference: f64) -> f64 {
    if reference == 0.0 {
        return 0.0;
    }
    (price - reference) / reference * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gap_is_zero_for_zero_reference() {
        assert_eq!(gap_pct(120.0, 0.0), 0.0);
    }

    #[test]
    fn gap_is_signed_percentage() {
        assert!((gap_pct(110.0, 100.0) - 10.0).abs() < 1e-12);
        assert!((gap_pct(90.0, 100.0) + 10.0).abs() < 1e-12);
    }

    #[test]
    fn serializes_dashboard_field_names() {
        let snapshot = IndicatorSnapshot {
            symbol: "TCS.NS".to_string(),
            name: "TCS".to_string(),
            as_of_date: NaiveDate::from_ymd_opt(2025, 11, 14).unwrap(),
            current_price: 101.0,
            sma10: 100.0,
            sma20: 99.0,
            sma50: 98.0,
            sma100: 97.0,
            gap10: 1.0,
            gap20: 2.0,
            gap50: 3.0,
            gap100: 4.0,
            above_sma10: true,
            above_sma20: true,
            above_sma50: true,
            above_sma100: true,
            supertrend: 95.0,
            supertrend_trend: Trend::Up,
            rsi: 60.0,
            rsi_streak: 2,
            cci: 40.0,
            crossovers: Crossovers {
                sma10: Some(CrossEvent {
                    direction: CrossDirection::Above,
                    date: NaiveDate::from_ymd_opt(2025, 11, 14).unwrap(),
                }),
                sma20: None,
            },
        };

        let v = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(v["currentPrice"], 101.0);
        assert_eq!(v["aboveSMA10"], true);
        assert_eq!(v["supertrendTrend"], "up");
        assert_eq!(v["asOfDate"], "2025-11-14");
        assert_eq!(v["crossovers"]["sma10"]["direction"], "above");
        assert!(v["crossovers"]["sma20"].is_null());

        assert!((snapshot.supertrend_distance_pct() - 600.0 / 95.0).abs() < 1e-9);
    }
}
