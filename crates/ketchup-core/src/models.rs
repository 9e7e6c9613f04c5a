use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::interval::{Interval, IntervalUnit};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub login: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Name to greet the user with, falling back to the login.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.login)
    }
}

/// A recurring chore: a markdown note plus the interval it repeats on.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Series {
    pub id: i64,
    pub user_id: i64,
    pub note: String,
    pub interval_unit: IntervalUnit,
    pub interval_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Series {
    pub fn interval(&self) -> Interval {
        Interval {
            count: self.interval_count,
            unit: self.interval_unit,
        }
    }

    /// First line of the note, used as the display name of its tasks.
    pub fn title(&self) -> &str {
        note_title(&self.note)
    }
}

/// One occurrence of a series.
///
/// A task is active while `completed_at` is `None`. Each series has exactly
/// one active task; once completed the task becomes a history entry whose
/// note remains editable.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub series_id: i64,
    pub due_date: NaiveDate,
    pub completed_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
    /// Per-task interval override; falls back to the series when unset
    pub interval_unit: Option<IntervalUnit>,
    pub interval_count: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn is_active(&self) -> bool {
        self.completed_at.is_none()
    }

    /// The interval this task recurs on: its own override, else the series'.
    pub fn effective_interval(&self, series: &Series) -> Interval {
        effective_interval(
            self.interval_count,
            self.interval_unit,
            series.interval(),
        )
    }
}

/// An active task joined with the series fields needed to list it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActiveTask {
    pub id: i64,
    pub series_id: i64,
    pub due_date: NaiveDate,
    pub task_interval_unit: Option<IntervalUnit>,
    pub task_interval_count: Option<u32>,
    pub series_note: String,
    pub series_interval_unit: IntervalUnit,
    pub series_interval_count: u32,
}

impl ActiveTask {
    pub fn interval(&self) -> Interval {
        effective_interval(
            self.task_interval_count,
            self.task_interval_unit,
            Interval {
                count: self.series_interval_count,
                unit: self.series_interval_unit,
            },
        )
    }

    pub fn title(&self) -> &str {
        note_title(&self.series_note)
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_date < today
    }

    pub fn urgency(&self, today: NaiveDate) -> f64 {
        self.interval().urgency(self.due_date, today)
    }
}

/// A completed task as shown in a series' history.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompletedTask {
    pub id: i64,
    pub due_date: NaiveDate,
    pub completed_at: DateTime<Utc>,
    pub note: Option<String>,
}

fn effective_interval(
    count: Option<u32>,
    unit: Option<IntervalUnit>,
    fallback: Interval,
) -> Interval {
    match (count, unit) {
        (Some(count), Some(unit)) => Interval { count, unit },
        (Some(count), None) => Interval { count, ..fallback },
        (None, Some(unit)) => Interval { unit, ..fallback },
        (None, None) => fallback,
    }
}

fn note_title(note: &str) -> &str {
    note.lines().next().map(str::trim).unwrap_or_default()
}

// ============================================================================
// Data Transfer Objects (DTOs)
// ============================================================================

/// Data required to create a new series and its first task.
#[derive(Debug, Clone)]
pub struct NewSeriesData {
    pub note: String,
    pub interval: Interval,
    pub first_due_date: NaiveDate,
}

/// Partial update of a series. `None` leaves a field untouched.
///
/// When either interval field is present both are written, the missing one
/// taken from the current series. `due_date` moves the active task.
#[derive(Debug, Clone, Default)]
pub struct UpdateSeriesData {
    pub note: Option<String>,
    pub interval_count: Option<u32>,
    pub interval_unit: Option<IntervalUnit>,
    pub due_date: Option<NaiveDate>,
}

impl UpdateSeriesData {
    pub fn is_empty(&self) -> bool {
        self.note.is_none()
            && self.interval_count.is_none()
            && self.interval_unit.is_none()
            && self.due_date.is_none()
    }
}

/// What an update actually changed; absent fields were not touched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeriesUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_unit: Option<IntervalUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

/// An already-completed occurrence to insert directly into history.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub due_date: NaiveDate,
    pub completed_at: DateTime<Utc>,
    pub note: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SeriesDetail {
    pub series: Series,
    pub active_task: Option<Task>,
    /// Completed tasks, most recently completed first
    pub history: Vec<CompletedTask>,
}

#[derive(Debug, Clone)]
pub struct CompletionResult {
    pub completed: Task,
    pub next: Task,
}

// ============================================================================
// Dashboard
// ============================================================================

/// Ordering of the overdue column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Urgency,
    Date,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Urgency => write!(f, "urgency"),
            SortOrder::Date => write!(f, "date"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid sort order: {0}")]
pub struct ParseSortOrderError(String);

impl FromStr for SortOrder {
    type Err = ParseSortOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "urgency" => Ok(SortOrder::Urgency),
            "date" | "due" => Ok(SortOrder::Date),
            _ => Err(ParseSortOrderError(s.to_string())),
        }
    }
}

/// Active tasks split into overdue and upcoming as of `today`.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub today: NaiveDate,
    /// Due before today, most urgent first
    pub overdue: Vec<ActiveTask>,
    /// Due today or later, soonest first
    pub upcoming: Vec<ActiveTask>,
}

impl Dashboard {
    pub fn new(tasks: Vec<ActiveTask>, today: NaiveDate) -> Self {
        let (mut overdue, mut upcoming): (Vec<_>, Vec<_>) =
            tasks.into_iter().partition(|t| t.is_overdue(today));

        overdue.sort_by(|a, b| by_urgency(a, b, today));
        upcoming.sort_by(|a, b| a.due_date.cmp(&b.due_date).then(a.id.cmp(&b.id)));

        Self {
            today,
            overdue,
            upcoming,
        }
    }

    /// Re-sorts the overdue column.
    pub fn sort_overdue(&mut self, order: SortOrder) {
        let today = self.today;
        match order {
            SortOrder::Urgency => self.overdue.sort_by(|a, b| by_urgency(a, b, today)),
            SortOrder::Date => self
                .overdue
                .sort_by(|a, b| a.due_date.cmp(&b.due_date).then(a.id.cmp(&b.id))),
        }
    }
}

fn by_urgency(a: &ActiveTask, b: &ActiveTask, today: NaiveDate) -> Ordering {
    b.urgency(today)
        .total_cmp(&a.urgency(today))
        .then(a.due_date.cmp(&b.due_date))
        .then(a.id.cmp(&b.id))
}
