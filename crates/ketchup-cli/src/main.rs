use anyhow::{Context, Result};
use clap::Parser;
use ketchup_core::db;
use ketchup_core::error::CoreError;
use ketchup_core::repository::SqliteRepository;
use ketchup_core::timezone;
use owo_colors::{OwoColorize, Style};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod parser;
mod util;
mod views;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    // Quiet by default so stdout stays clean for scripting.
    // Override with RUST_LOG=ketchup=debug.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ketchup=warn,ketchup_core=warn,sqlx=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        handle_error(e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = config::Config::new().context("Failed to load configuration")?;
    debug!(%config, "loaded configuration");

    let user_spec = util::user_spec(cli.user, config.default_user.as_deref())?;
    let today = timezone::today_in(&config.timezone)?;

    let db_pool = db::establish_connection(&config.database_path).await?;
    let repository = SqliteRepository::new(db_pool);
    let user = util::resolve_user(&repository, &user_spec).await?;
    debug!(user_id = user.id, login = %user.login, %today, "resolved user");

    match cli.command.unwrap_or(Commands::List(Default::default())) {
        Commands::List(command) => {
            commands::list::list_tasks(&repository, &user, today, command, &config).await
        }
        Commands::Add(command) => commands::add::add_series(&repository, &user, today, command).await,
        Commands::Show(command) => {
            commands::show::show_series(&repository, &user, today, command).await
        }
        Commands::Done(command) => {
            commands::done::complete_task(&repository, &user, today, command).await
        }
        Commands::Edit(command) => {
            commands::edit::edit_series(&repository, &user, today, command).await
        }
        Commands::Note(command) => commands::note::set_task_note(&repository, &user, command).await,
        Commands::Seed => commands::seed::seed_demo_data(&repository, &user, today).await,
        Commands::User(command) => commands::user::user_command(&repository, &user, command).await,
    }
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    if let Some(core_error) = err.downcast_ref::<CoreError>() {
        match core_error {
            CoreError::NotFound(s) => {
                eprintln!("{} {}", "Error:".style(error_style), s);
            }
            CoreError::InvalidInput(s) => {
                eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
            }
            CoreError::InvalidTimezone(s) => {
                eprintln!(
                    "{} {}. Use an IANA name such as {}",
                    "Error:".style(error_style),
                    s,
                    "Europe/Berlin".yellow()
                );
            }
            CoreError::TaskNotCompleted(id) => {
                eprintln!(
                    "{} Task {} is still active; complete it with {} first",
                    "Error:".style(error_style),
                    id,
                    format!("ketchup done {}", id).yellow()
                );
            }
            CoreError::Database(e) => {
                eprintln!("{} Database error: {}", "Error:".style(error_style), e);
            }
            _ => eprintln!("{} {}", "Error:".style(error_style), core_error),
        }
    } else {
        eprintln!("{} {:#}", "Error:".style(error_style), err);
    }
}
