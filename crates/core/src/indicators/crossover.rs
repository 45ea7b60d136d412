use crate::domain::snapshot::{CrossDirection, CrossEvent, Crossovers};
use crate::indicators::sma::trailing_sma;
use chrono::NaiveDate;

/// Direction of a price/SMA cross between two consecutive observations.
pub fn detect_cross(
    prev_price: f64,
    prev_sma: f64,
    price: f64,
    sma: f64,
) -> Option<CrossDirection> {
    if prev_price <= prev_sma && price > sma {
        Some(CrossDirection::Above)
    } else if prev_price >= prev_sma && price < sma {
        Some(CrossDirection::Below)
    } else {
        None
    }
}

/// Crossovers of the last close against SMA-10 and SMA-20.
///
/// Only the last two bars are compared; the previous SMA is recomputed from the closes
/// with the last bar dropped. Both results are `None` unless there are at least two
/// closes and both previous SMAs have enough history.
pub fn detect_crossovers(closes: &[f64], as_of_date: NaiveDate) -> Crossovers {
    let n = closes.len();
    if n < 2 {
        return Crossovers::default();
    }

    let prev_closes = &closes[..n - 1];
    let prev_sma10 = trailing_sma(prev_closes, 10);
    let prev_sma20 = trailing_sma(prev_closes, 20);
    if prev_sma10 == 0.0 || prev_sma20 == 0.0 {
        return Crossovers::default();
    }

    let price = closes[n - 1];
    let prev_price = closes[n - 2];
    let sma10 = trailing_sma(closes, 10);
    let sma20 = trailing_sma(closes, 20);

    let event = |direction| CrossEvent {
        direction,
        date: as_of_date,
    };

    Crossovers {
        sma10: detect_cross(prev_price, prev_sma10, price, sma10).map(event),
        sma20: detect_cross(prev_price, prev_sma20, price, sma20).map(event),
    }
}
