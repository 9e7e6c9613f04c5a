use anyhow::Result;
use dialoguer::Input;
use ketchup_core::models::User;
use ketchup_core::repository::Repository;
use owo_colors::OwoColorize;
use serde_json::json;

use crate::cli::NoteCommand;

pub async fn set_task_note(repo: &impl Repository, user: &User, command: NoteCommand) -> Result<()> {
    let note = match command.note {
        Some(note) => note,
        None => Input::<String>::new()
            .with_prompt("Note (empty to clear)")
            .allow_empty(true)
            .interact_text()?,
    };

    let saved = repo.update_task_note(user.id, command.task_id, &note).await?;

    if command.json {
        let body = json!({ "id": command.task_id, "note": saved });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    match saved {
        Some(note) => println!("{} note on task {}: {}", "Saved".green().bold(), command.task_id, note),
        None => println!("{} note on task {}", "Cleared".yellow().bold(), command.task_id),
    }

    Ok(())
}
