use crate::error::CoreError;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use std::str::FromStr;

/// Validate IANA timezone name
pub fn validate_timezone(timezone: &str) -> Result<Tz, CoreError> {
    Tz::from_str(timezone)
        .map_err(|_| CoreError::InvalidTimezone(format!("Invalid timezone: {}", timezone)))
}

/// Calendar date of `at_time` in the given timezone.
pub fn date_in(timezone: &str, at_time: DateTime<Utc>) -> Result<NaiveDate, CoreError> {
    let tz = validate_timezone(timezone)?;
    Ok(at_time.with_timezone(&tz).date_naive())
}

/// "Today" as seen from the given timezone. Urgency and advancement are
/// always computed against this date.
pub fn today_in(timezone: &str) -> Result<NaiveDate, CoreError> {
    date_in(timezone, Utc::now())
}
