use anyhow::Result;
use chrono::NaiveDate;
use ketchup_core::interval::Interval;
use ketchup_core::models::{NewSeriesData, User};
use ketchup_core::repository::Repository;
use owo_colors::OwoColorize;

use crate::cli::AddCommand;
use crate::parser::parse_due_date;
use crate::views::table::friendly_date;

pub async fn add_series(
    repo: &impl Repository,
    user: &User,
    today: NaiveDate,
    command: AddCommand,
) -> Result<()> {
    let first_due_date = match command.due.as_deref() {
        Some(due) => parse_due_date(due, today)?,
        None => today,
    };
    let interval = Interval::new(command.count, command.unit)?;

    let detail = repo
        .create_series_with_first_task(
            user.id,
            NewSeriesData {
                note: command.note,
                interval,
                first_due_date,
            },
        )
        .await?;

    println!(
        "{} series {}: '{}' every {}",
        "Added".green().bold(),
        detail.series.id,
        detail.series.title(),
        interval.describe()
    );
    if let Some(task) = &detail.active_task {
        println!(
            "  First task {} due {} ({})",
            task.id,
            task.due_date,
            friendly_date(task.due_date, today)
        );
    }

    Ok(())
}
