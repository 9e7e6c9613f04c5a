use anyhow::{anyhow, Result};
use chrono::{NaiveDate, NaiveTime};
use chrono_english::{parse_date_string, Dialect};

/// Parses a due date, either ISO `YYYY-MM-DD` or an English phrase such as
/// "tomorrow" or "next friday" relative to `today`.
pub fn parse_due_date(date_str: &str, today: NaiveDate) -> Result<NaiveDate> {
    let date_str = date_str.trim();
    if let Ok(date) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
        return Ok(date);
    }

    let now = today.and_time(NaiveTime::MIN).and_utc();
    parse_date_string(date_str, now, Dialect::Us)
        .map(|parsed| parsed.date_naive())
        .map_err(|e| anyhow!("Failed to parse due date '{}': {}", date_str, e))
}

/// Splits a `login[:name]` user spec.
pub fn parse_user_spec(spec: &str) -> Result<(&str, Option<&str>)> {
    let (login, name) = match spec.split_once(':') {
        Some((login, name)) => (login.trim(), Some(name.trim()).filter(|n| !n.is_empty())),
        None => (spec.trim(), None),
    };
    if login.is_empty() {
        return Err(anyhow!("Invalid user '{}': login cannot be empty", spec));
    }
    Ok((login, name))
}
