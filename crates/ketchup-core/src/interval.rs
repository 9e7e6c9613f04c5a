//! Interval arithmetic for recurring series.
//!
//! Two pure functions drive the whole scheduler:
//!
//! - [`urgency`] ranks overdue tasks by how late they are relative to how
//!   often they recur. A daily chore three days late scores `3.0`; a yearly
//!   chore three days late scores roughly `0.008`.
//! - [`advance`] computes the due date of the next occurrence. Callers anchor
//!   it on the completion date, not on the stale due date, so a task finished
//!   late does not leave a backlog of already-overdue successors.
//!
//! Urgency uses fixed day weights per unit (a month is always 30 days). They
//! are a ranking signal only and are not meant to be calendar accurate.
//! Advancement, on the other hand, is calendar aware: month, quarter and
//! year steps go through chrono's month arithmetic, which clamps the day of
//! month to the last day of the target month.
//!
//! Because of that clamping, month arithmetic is lossy. Advancing Jan 31 by
//! one month yields Feb 28 and advancing that by another month yields
//! Mar 28, not Mar 31.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error::CoreError;

/// Recurrence granularity of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum IntervalUnit {
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl IntervalUnit {
    pub const ALL: [IntervalUnit; 5] = [
        IntervalUnit::Day,
        IntervalUnit::Week,
        IntervalUnit::Month,
        IntervalUnit::Quarter,
        IntervalUnit::Year,
    ];

    /// Fixed day weight used for urgency scoring.
    #[inline]
    pub fn days(self) -> i64 {
        match self {
            IntervalUnit::Day => 1,
            IntervalUnit::Week => 7,
            IntervalUnit::Month => 30,
            IntervalUnit::Quarter => 91,
            IntervalUnit::Year => 365,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IntervalUnit::Day => "day",
            IntervalUnit::Week => "week",
            IntervalUnit::Month => "month",
            IntervalUnit::Quarter => "quarter",
            IntervalUnit::Year => "year",
        }
    }
}

impl fmt::Display for IntervalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid interval unit: {0} (expected one of day, week, month, quarter, year)")]
pub struct ParseIntervalUnitError(String);

impl FromStr for IntervalUnit {
    type Err = ParseIntervalUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" => Ok(IntervalUnit::Day),
            "week" => Ok(IntervalUnit::Week),
            "month" => Ok(IntervalUnit::Month),
            "quarter" => Ok(IntervalUnit::Quarter),
            "year" => Ok(IntervalUnit::Year),
            _ => Err(ParseIntervalUnitError(s.to_string())),
        }
    }
}

/// Scores how overdue a task is relative to its recurrence interval.
///
/// Returns `0.0` when `today` is on or before `due_date`. Otherwise returns
/// `days_overdue / (interval_count * unit.days())`.
pub fn urgency(
    due_date: NaiveDate,
    interval_count: u32,
    interval_unit: IntervalUnit,
    today: NaiveDate,
) -> f64 {
    debug_assert!(interval_count >= 1, "interval_count must be positive");

    let days_overdue = (today - due_date).num_days();
    if days_overdue <= 0 {
        return 0.0;
    }

    let interval = Interval {
        count: interval_count,
        unit: interval_unit,
    };
    days_overdue as f64 / interval.in_days() as f64
}

/// Computes the next due date `interval_count` units after `anchor`.
///
/// Day and week steps are exact day arithmetic. Month, quarter and year steps
/// add calendar months and clamp the day of month to the end of the target
/// month.
pub fn advance(
    anchor: NaiveDate,
    interval_count: u32,
    interval_unit: IntervalUnit,
) -> Result<NaiveDate, CoreError> {
    debug_assert!(interval_count >= 1, "interval_count must be positive");

    let count = u64::from(interval_count);
    let next = match interval_unit {
        IntervalUnit::Day => anchor.checked_add_days(Days::new(count)),
        IntervalUnit::Week => anchor.checked_add_days(Days::new(7 * count)),
        IntervalUnit::Month => add_months(anchor, interval_count),
        IntervalUnit::Quarter => interval_count
            .checked_mul(3)
            .and_then(|months| add_months(anchor, months)),
        IntervalUnit::Year => interval_count
            .checked_mul(12)
            .and_then(|months| add_months(anchor, months)),
    };

    next.ok_or_else(|| {
        CoreError::DateOutOfRange(format!(
            "{} + {} {}",
            anchor, interval_count, interval_unit
        ))
    })
}

#[inline]
fn add_months(anchor: NaiveDate, months: u32) -> Option<NaiveDate> {
    anchor.checked_add_months(Months::new(months))
}

/// Renders an urgency score as the short badge shown next to overdue tasks.
pub fn format_urgency(urgency: f64) -> String {
    format!("{:.1}x", urgency)
}

/// A validated recurrence interval: a positive count of some unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub count: u32,
    pub unit: IntervalUnit,
}

impl Interval {
    pub fn new(count: u32, unit: IntervalUnit) -> Result<Self, CoreError> {
        if count < 1 {
            return Err(CoreError::InvalidInput(
                "Interval count must be at least 1".to_string(),
            ));
        }
        Ok(Self { count, unit })
    }

    /// Length of the interval in urgency days.
    pub fn in_days(&self) -> i64 {
        i64::from(self.count) * self.unit.days()
    }

    pub fn urgency(&self, due_date: NaiveDate, today: NaiveDate) -> f64 {
        urgency(due_date, self.count, self.unit, today)
    }

    pub fn advance(&self, anchor: NaiveDate) -> Result<NaiveDate, CoreError> {
        advance(anchor, self.count, self.unit)
    }

    /// "1 week", "2 weeks".
    pub fn describe(&self) -> String {
        if self.count == 1 {
            format!("{} {}", self.count, self.unit)
        } else {
            format!("{} {}s", self.count, self.unit)
        }
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self {
            count: 1,
            unit: IntervalUnit::Day,
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
