use anyhow::Result;
use chrono::NaiveDate;
use ketchup_core::models::User;
use ketchup_core::repository::Repository;

use crate::cli::ListCommand;
use crate::config::Config;
use crate::views::table::display_dashboard;

pub async fn list_tasks(
    repo: &impl Repository,
    user: &User,
    today: NaiveDate,
    command: ListCommand,
    config: &Config,
) -> Result<()> {
    let mut dashboard = repo.find_dashboard(user.id, today).await?;
    dashboard.sort_overdue(command.sort.unwrap_or(config.default_sort));

    display_dashboard(&dashboard);

    Ok(())
}
