use anyhow::Result;
use chrono::NaiveDate;
use ketchup_core::models::User;
use ketchup_core::repository::Repository;
use owo_colors::OwoColorize;

use crate::cli::DoneCommand;
use crate::views::table::friendly_date;

pub async fn complete_task(
    repo: &impl Repository,
    user: &User,
    today: NaiveDate,
    command: DoneCommand,
) -> Result<()> {
    let result = repo.complete_task(user.id, command.task_id, today).await?;

    println!("{} task {}", "Completed".green().bold(), result.completed.id);
    println!(
        "Next task {} due {} ({})",
        result.next.id,
        result.next.due_date,
        friendly_date(result.next.due_date, today)
    );

    Ok(())
}
