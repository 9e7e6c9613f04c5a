use anyhow::Result;
use ketchup_core::models::User;
use ketchup_core::repository::Repository;
use owo_colors::OwoColorize;

use crate::cli::UserCommand;

pub async fn user_command(repo: &impl Repository, user: &User, command: UserCommand) -> Result<()> {
    let user = if command.email_clear {
        repo.update_user_email(user.id, None).await?
    } else if let Some(email) = command.email.as_deref() {
        repo.update_user_email(user.id, Some(email)).await?
    } else {
        user.clone()
    };

    println!("{}", user.login.bold());
    println!("Name:  {}", user.name.as_deref().unwrap_or("-"));
    println!("Email: {}", user.email.as_deref().unwrap_or("-"));

    Ok(())
}
