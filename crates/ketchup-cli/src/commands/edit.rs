use anyhow::Result;
use chrono::NaiveDate;
use ketchup_core::error::CoreError;
use ketchup_core::interval::Interval;
use ketchup_core::models::{UpdateSeriesData, User};
use ketchup_core::repository::Repository;
use owo_colors::OwoColorize;

use crate::cli::EditCommand;
use crate::parser::parse_due_date;

pub async fn edit_series(
    repo: &impl Repository,
    user: &User,
    today: NaiveDate,
    command: EditCommand,
) -> Result<()> {
    let update_data = UpdateSeriesData {
        note: command.note,
        interval_count: command.count,
        interval_unit: command.unit,
        due_date: command
            .due
            .as_deref()
            .map(|due| parse_due_date(due, today))
            .transpose()?,
    };

    if update_data.is_empty() {
        return Err(CoreError::InvalidInput(
            "Nothing to update; pass --note, --count, --unit or --due".to_string(),
        )
        .into());
    }

    let update = repo
        .update_series(user.id, command.series_id, update_data)
        .await?;

    if command.json {
        println!("{}", serde_json::to_string_pretty(&update)?);
        return Ok(());
    }

    println!("{} series {}", "Updated".green().bold(), command.series_id);
    if let Some(note) = &update.note {
        println!("  Note: {}", note.lines().next().unwrap_or_default());
    }
    if let (Some(count), Some(unit)) = (update.interval_count, update.interval_unit) {
        println!("  Every: {}", Interval { count, unit }.describe());
    }
    if let Some(due_date) = update.due_date {
        println!("  Due: {}", due_date);
    }

    Ok(())
}
