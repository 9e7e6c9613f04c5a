//! # Ketchup Core Library
//!
//! Storage and scheduling for recurring chores that you catch up on when you
//! can.
//!
//! A [`models::Series`] is a note plus an interval ("every 2 weeks"). Each
//! series always has exactly one active [`models::Task`]. Completing it
//! stamps it as done and schedules the next one, counted from the day it was
//! actually completed. Overdue tasks are ranked by urgency, the number of
//! intervals they are late.
//!
//! ## Core Modules
//!
//! - [`interval`]: Urgency scoring and due date advancement
//! - [`db`]: Database connection and migration management
//! - [`models`]: Core data structures and transfer objects
//! - [`repository`]: Data access layer with Repository pattern
//! - [`seed`]: Demo data
//! - [`timezone`]: Computing "today" in a configured zone
//! - [`error`]: Error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use ketchup_core::{
//!     db,
//!     interval::{Interval, IntervalUnit},
//!     models::NewSeriesData,
//!     repository::{SeriesRepository, SqliteRepository, TaskRepository, UserRepository},
//!     timezone,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = db::establish_connection("ketchup.db").await?;
//!     let repo = SqliteRepository::new(pool);
//!
//!     let user = repo.find_or_create_user("alice@example.com", Some("Alice")).await?;
//!     let today = timezone::today_in("Europe/Berlin")?;
//!
//!     let created = repo
//!         .create_series_with_first_task(
//!             user.id,
//!             NewSeriesData {
//!                 note: "Call Mom".to_string(),
//!                 interval: Interval::new(2, IntervalUnit::Week)?,
//!                 first_due_date: today,
//!             },
//!         )
//!         .await?;
//!
//!     if let Some(task) = created.active_task {
//!         let result = repo.complete_task(user.id, task.id, today).await?;
//!         println!("Next due {}", result.next.due_date);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod error;
pub mod interval;
pub mod models;
pub mod repository;
pub mod seed;
pub mod timezone;
