use anyhow::Result;
use chrono::NaiveDate;
use ketchup_core::error::CoreError;
use ketchup_core::models::User;
use ketchup_core::repository::Repository;

use crate::cli::ShowCommand;
use crate::views::table::display_series;

pub async fn show_series(
    repo: &impl Repository,
    user: &User,
    today: NaiveDate,
    command: ShowCommand,
) -> Result<()> {
    let detail = repo
        .find_series_detail(user.id, command.series_id)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound(format!("Series with id {} not found", command.series_id))
        })?;

    display_series(&detail, today);

    Ok(())
}
