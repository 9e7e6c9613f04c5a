//! Demo data for a fresh database.
//!
//! [`demo_series`] builds a set of series relative to a given day so the
//! dashboard always shows a mix of overdue and upcoming work, and
//! [`load`] writes any such set for one user.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use tracing::info;

use crate::error::CoreError;
use crate::interval::{Interval, IntervalUnit};
use crate::models::{HistoryEntry, NewSeriesData};
use crate::repository::Repository;

/// A series to seed, with its first due date and completed history.
#[derive(Debug, Clone)]
pub struct SeedSeries {
    pub note: String,
    pub interval: Interval,
    pub due_date: NaiveDate,
    pub history: Vec<SeedHistory>,
}

#[derive(Debug, Clone)]
pub struct SeedHistory {
    pub due_date: NaiveDate,
    pub completed_at: DateTime<Utc>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub series: usize,
    pub tasks: usize,
}

fn day(today: NaiveDate, offset: i64) -> NaiveDate {
    today + Duration::days(offset)
}

fn done(today: NaiveDate, due: i64, completed: i64, note: Option<&str>) -> SeedHistory {
    SeedHistory {
        due_date: day(today, due),
        completed_at: day(today, completed).and_time(NaiveTime::MIN).and_utc(),
        note: note.map(str::to_string),
    }
}

fn series(
    note: &str,
    count: u32,
    unit: IntervalUnit,
    due: NaiveDate,
    history: Vec<SeedHistory>,
) -> SeedSeries {
    SeedSeries {
        note: note.to_string(),
        interval: Interval { count, unit },
        due_date: due,
        history,
    }
}

/// The demo data set, with dates relative to `today`.
pub fn demo_series(today: NaiveDate) -> Vec<SeedSeries> {
    use IntervalUnit::*;

    vec![
        series(
            "Water the plants\n\nCheck soil moisture *before* watering",
            3,
            Day,
            day(today, -6),
            vec![
                done(today, -9, -9, Some("Done, no issues")),
                done(today, -12, -11, None),
            ],
        ),
        series("Clean the kitchen", 1, Week, day(today, -4), vec![]),
        series(
            "Review finances",
            1,
            Month,
            day(today, -3),
            vec![done(
                today,
                -33,
                -32,
                Some("All good\n\n- Checked statements\n- Updated budget"),
            )],
        ),
        series(
            "Dentist appointment\n\n**Dr. Chen**, 10am\n555-0142 to reschedule",
            1,
            Quarter,
            day(today, -1),
            vec![
                done(today, -92, -92, Some("Rescheduled from **last week**")),
                done(today, -183, -182, None),
            ],
        ),
        series(
            "Call Mom\n\nAsk about *weekend plans*\n- Bring **birthday cake**\n- Check flight times",
            2,
            Week,
            day(today, 2),
            vec![
                done(today, -12, -12, Some("Had to call back *twice*")),
                done(today, -26, -25, None),
            ],
        ),
        series("Oil change", 3, Month, day(today, 8), vec![]),
        series(
            "Replace HVAC filter\n\nSize: **20x25x1**",
            1,
            Quarter,
            day(today, 18),
            vec![done(
                today,
                -73,
                -73,
                Some("All good\n\n- Changed filter\n- Reset thermostat"),
            )],
        ),
        series(
            "Back up laptop\n\n- Time Machine to external drive\n- Sync cloud photos\n- Verify **offsite** backup",
            1,
            Month,
            day(today, 24),
            vec![
                done(today, -6, -6, Some("Took longer than expected, **2 hours** instead of 1")),
                done(today, -36, -35, None),
            ],
        ),
        series(
            "Check smoke detectors",
            1,
            Year,
            day(today, 140),
            vec![
                done(today, -225, -225, Some("Replaced batteries in **hallway** unit")),
                done(today, -590, -589, None),
            ],
        ),
        series("Haircut", 2, Month, day(today, 45), vec![]),
    ]
}

/// Creates every series in `data` for `user_id`, with its first active task
/// and its completed history.
pub async fn load<R>(repo: &R, user_id: i64, data: &[SeedSeries]) -> Result<SeedSummary, CoreError>
where
    R: Repository + ?Sized,
{
    let mut summary = SeedSummary::default();

    for item in data {
        let detail = repo
            .create_series_with_first_task(
                user_id,
                NewSeriesData {
                    note: item.note.clone(),
                    interval: item.interval,
                    first_due_date: item.due_date,
                },
            )
            .await?;
        summary.series += 1;
        summary.tasks += 1;

        for entry in &item.history {
            repo.record_history(
                user_id,
                detail.series.id,
                HistoryEntry {
                    due_date: entry.due_date,
                    completed_at: entry.completed_at,
                    note: entry.note.clone(),
                },
            )
            .await?;
            summary.tasks += 1;
        }
    }

    info!(user_id, series = summary.series, tasks = summary.tasks, "seeded demo data");
    Ok(summary)
}
