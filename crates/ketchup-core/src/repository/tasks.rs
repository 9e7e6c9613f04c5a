use crate::error::CoreError;
use crate::models::{ActiveTask, CompletionResult, Dashboard, HistoryEntry, Series, Task};
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::{Sqlite, Transaction};
use tracing::{debug, info};

#[async_trait]
impl super::TaskRepository for SqliteRepository {
    async fn find_active_tasks(&self, user_id: i64) -> Result<Vec<ActiveTask>, CoreError> {
        let tasks = sqlx::query_as(
            r#"SELECT
                t.id, t.series_id, t.due_date,
                t.interval_unit AS task_interval_unit,
                t.interval_count AS task_interval_count,
                s.note AS series_note,
                s.interval_unit AS series_interval_unit,
                s.interval_count AS series_interval_count
            FROM tasks t
            JOIN series s ON s.id = t.series_id
            WHERE s.user_id = $1 AND t.completed_at IS NULL
            ORDER BY t.due_date, t.id"#,
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;
        Ok(tasks)
    }

    async fn find_dashboard(&self, user_id: i64, today: NaiveDate) -> Result<Dashboard, CoreError> {
        let tasks = self.find_active_tasks(user_id).await?;
        let dashboard = Dashboard::new(tasks, today);
        debug!(
            user_id,
            %today,
            overdue = dashboard.overdue.len(),
            upcoming = dashboard.upcoming.len(),
            "loaded dashboard"
        );
        Ok(dashboard)
    }

    async fn complete_task(
        &self,
        user_id: i64,
        task_id: i64,
        today: NaiveDate,
    ) -> Result<CompletionResult, CoreError> {
        let mut tx = self.pool().begin().await?;

        let task = Self::find_owned_task_in_transaction(&mut tx, user_id, task_id)
            .await?
            .filter(Task::is_active)
            .ok_or_else(|| CoreError::NotFound(format!("No active task with id {}", task_id)))?;

        let series: Series = sqlx::query_as("SELECT * FROM series WHERE id = $1")
            .bind(task.series_id)
            .fetch_one(&mut *tx)
            .await?;

        // The next occurrence is anchored on today, not on the old due date
        let next_due = task.effective_interval(&series).advance(today)?;
        let now = Utc::now();

        let completed: Task = sqlx::query_as(
            r#"UPDATE tasks
            SET completed_at = $1, updated_at = $1
            WHERE id = $2
            RETURNING *"#,
        )
        .bind(now)
        .bind(task.id)
        .fetch_one(&mut *tx)
        .await?;

        let next: Task = sqlx::query_as(
            r#"INSERT INTO tasks (series_id, due_date, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            RETURNING *"#,
        )
        .bind(series.id)
        .bind(next_due)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            task_id = completed.id,
            series_id = series.id,
            next_task_id = next.id,
            next_due = %next.due_date,
            "completed task"
        );

        Ok(CompletionResult { completed, next })
    }

    async fn update_task_note(
        &self,
        user_id: i64,
        task_id: i64,
        note: &str,
    ) -> Result<Option<String>, CoreError> {
        let mut tx = self.pool().begin().await?;

        let task = Self::find_owned_task_in_transaction(&mut tx, user_id, task_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Task with id {} not found", task_id)))?;

        if task.is_active() {
            return Err(CoreError::TaskNotCompleted(task_id));
        }

        let note = Some(note.trim())
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        sqlx::query("UPDATE tasks SET note = $1, updated_at = $2 WHERE id = $3")
            .bind(&note)
            .bind(Utc::now())
            .bind(task_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        debug!(task_id, cleared = note.is_none(), "updated task note");

        Ok(note)
    }

    async fn record_history(
        &self,
        user_id: i64,
        series_id: i64,
        entry: HistoryEntry,
    ) -> Result<Task, CoreError> {
        let mut tx = self.pool().begin().await?;

        Self::find_owned_series_in_transaction(&mut tx, user_id, series_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Series with id {} not found", series_id)))?;

        let task: Task = sqlx::query_as(
            r#"INSERT INTO tasks (series_id, due_date, completed_at, note, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING *"#,
        )
        .bind(series_id)
        .bind(entry.due_date)
        .bind(entry.completed_at)
        .bind(&entry.note)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(task)
    }
}

impl SqliteRepository {
    async fn find_owned_task_in_transaction<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        user_id: i64,
        task_id: i64,
    ) -> Result<Option<Task>, CoreError> {
        let task = sqlx::query_as(
            r#"SELECT t.*
            FROM tasks t
            JOIN series s ON s.id = t.series_id
            WHERE t.id = $1 AND s.user_id = $2"#,
        )
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(task)
    }
}
