use chrono::{DateTime, FixedOffset, NaiveDate};

// India Standard Time, UTC+05:30. NSE daily bars are stamped at the session open.
const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Trading date of a bar stamped with Unix epoch seconds, in IST.
///
/// Returns `None` only for timestamps outside chrono's representable range.
pub fn trading_date(timestamp: i64) -> Option<NaiveDate> {
    let ist = FixedOffset::east_opt(IST_OFFSET_SECS)?;
    let utc = DateTime::from_timestamp(timestamp, 0)?;
    Some(utc.with_timezone(&ist).date_naive())
}
