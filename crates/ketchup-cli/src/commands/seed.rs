use anyhow::Result;
use chrono::NaiveDate;
use ketchup_core::models::User;
use ketchup_core::repository::Repository;
use ketchup_core::seed;
use owo_colors::OwoColorize;

pub async fn seed_demo_data(repo: &impl Repository, user: &User, today: NaiveDate) -> Result<()> {
    let data = seed::demo_series(today);
    let summary = seed::load(repo, user.id, &data).await?;

    println!(
        "{} {} series and {} tasks for {}",
        "Seeded".green().bold(),
        summary.series,
        summary.tasks,
        user.display_name()
    );

    Ok(())
}
