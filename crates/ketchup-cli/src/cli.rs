use clap::{Args, Parser, Subcommand};
use ketchup_core::interval::IntervalUnit;
use ketchup_core::models::SortOrder;

/// Ketchup: keep up with recurring chores, and catch up when you fall behind
#[derive(Parser, Debug)]
#[command(name = "ketchup", author, version, about, long_about = None)]
pub struct Cli {
    /// Act as this user, given as `login` or `login:name`
    #[arg(long, global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show overdue and upcoming tasks (default)
    List(ListCommand),
    /// Start a new recurring series
    Add(AddCommand),
    /// Show a series with its history
    Show(ShowCommand),
    /// Complete a task and schedule the next one
    Done(DoneCommand),
    /// Change a series
    Edit(EditCommand),
    /// Set or clear the note on a completed task
    Note(NoteCommand),
    /// Load demo data for the current user
    Seed,
    /// Show the current user, optionally changing their email
    User(UserCommand),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListCommand {
    /// Order of the overdue table: urgency or date
    #[arg(long)]
    pub sort: Option<SortOrder>,
}

#[derive(Args, Debug, Clone)]
pub struct AddCommand {
    /// Note for the series; the first line is its title
    pub note: String,
    /// How many units between occurrences
    #[arg(short, long, default_value_t = 1)]
    pub count: u32,
    /// Interval unit: day, week, month, quarter or year
    #[arg(short, long, default_value_t = IntervalUnit::Day)]
    pub unit: IntervalUnit,
    /// First due date, e.g. 2026-03-01 or "next friday" (defaults to today)
    #[arg(short, long)]
    pub due: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ShowCommand {
    /// The ID of the series
    pub series_id: i64,
}

#[derive(Args, Debug, Clone)]
pub struct DoneCommand {
    /// The ID of the active task
    pub task_id: i64,
}

#[derive(Args, Debug, Clone)]
pub struct EditCommand {
    /// The ID of the series to edit
    pub series_id: i64,

    #[arg(long)]
    pub note: Option<String>,

    #[arg(long)]
    pub count: Option<u32>,

    #[arg(long)]
    pub unit: Option<IntervalUnit>,

    /// Move the active task to this date
    #[arg(long)]
    pub due: Option<String>,

    /// Print the changed fields as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct NoteCommand {
    /// The ID of the completed task
    pub task_id: i64,

    /// New note; prompts when omitted, an empty note clears it
    pub note: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct UserCommand {
    /// Set the email address
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long, conflicts_with = "email")]
    pub email_clear: bool,
}
