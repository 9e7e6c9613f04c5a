use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{
    ActiveTask, CompletionResult, Dashboard, HistoryEntry, NewSeriesData, Series, SeriesDetail,
    SeriesUpdate, Task, UpdateSeriesData, User,
};
use async_trait::async_trait;
use chrono::NaiveDate;

// Domain modules
pub mod series;
pub mod tasks;
pub mod users;

// Traits are defined in this module and implemented in respective domain modules.
// Every operation that takes a `user_id` treats records owned by someone else
// as missing.

/// Domain-specific trait for user operations
#[async_trait]
pub trait UserRepository {
    /// Returns the user with `login`, creating it with `name` if absent.
    async fn find_or_create_user(&self, login: &str, name: Option<&str>) -> Result<User, CoreError>;
    async fn find_user_by_login(&self, login: &str) -> Result<User, CoreError>;
    /// Sets the user's email, trimmed. A blank or absent email clears it.
    async fn update_user_email(&self, user_id: i64, email: Option<&str>) -> Result<User, CoreError>;
}

/// Domain-specific trait for series operations
#[async_trait]
pub trait SeriesRepository {
    /// Creates a series together with its first active task, atomically.
    async fn create_series_with_first_task(
        &self,
        user_id: i64,
        data: NewSeriesData,
    ) -> Result<SeriesDetail, CoreError>;
    async fn find_series(&self, user_id: i64, series_id: i64) -> Result<Option<Series>, CoreError>;
    async fn find_series_detail(
        &self,
        user_id: i64,
        series_id: i64,
    ) -> Result<Option<SeriesDetail>, CoreError>;
    async fn update_series(
        &self,
        user_id: i64,
        series_id: i64,
        data: UpdateSeriesData,
    ) -> Result<SeriesUpdate, CoreError>;
}

/// Domain-specific trait for task operations
#[async_trait]
pub trait TaskRepository {
    async fn find_active_tasks(&self, user_id: i64) -> Result<Vec<ActiveTask>, CoreError>;
    async fn find_dashboard(&self, user_id: i64, today: NaiveDate) -> Result<Dashboard, CoreError>;
    /// Completes the active task and schedules its successor from `today`,
    /// atomically.
    async fn complete_task(
        &self,
        user_id: i64,
        task_id: i64,
        today: NaiveDate,
    ) -> Result<CompletionResult, CoreError>;
    /// Sets the note on a completed task. An empty note clears it.
    async fn update_task_note(
        &self,
        user_id: i64,
        task_id: i64,
        note: &str,
    ) -> Result<Option<String>, CoreError>;
    /// Inserts an already-completed occurrence into a series' history.
    async fn record_history(
        &self,
        user_id: i64,
        series_id: i64,
        entry: HistoryEntry,
    ) -> Result<Task, CoreError>;
}

/// Main repository trait that composes all domain traits
pub trait Repository: UserRepository + SeriesRepository + TaskRepository + Send + Sync {}

/// SQLite implementation of the repository pattern
pub struct SqliteRepository {
    pool: DbPool,
}

impl SqliteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database pool for internal use across modules
    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl Repository for SqliteRepository {}

/// Narrows a result set that should hold exactly one row.
///
/// Queries passed through here should use `LIMIT 2` so that a duplicate is
/// detected without reading the whole table.
pub(crate) fn sole<T>(mut rows: Vec<T>, what: impl FnOnce() -> String) -> Result<T, CoreError> {
    if rows.len() > 1 {
        return Err(CoreError::TooManyRows);
    }
    rows.pop().ok_or_else(|| CoreError::NotFound(what()))
}
