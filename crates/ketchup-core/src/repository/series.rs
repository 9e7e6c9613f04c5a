use crate::error::CoreError;
use crate::interval::Interval;
use crate::models::{
    CompletedTask, NewSeriesData, Series, SeriesDetail, SeriesUpdate, Task, UpdateSeriesData,
};
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, Transaction};
use tracing::info;

#[async_trait]
impl super::SeriesRepository for SqliteRepository {
    async fn create_series_with_first_task(
        &self,
        user_id: i64,
        data: NewSeriesData,
    ) -> Result<SeriesDetail, CoreError> {
        let note = validate_note(&data.note)?;
        let interval = Interval::new(data.interval.count, data.interval.unit)?;

        let mut tx = self.pool().begin().await?;
        let now = Utc::now();

        let series: Series = sqlx::query_as(
            r#"INSERT INTO series (user_id, note, interval_unit, interval_count, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING *"#,
        )
        .bind(user_id)
        .bind(note)
        .bind(interval.unit)
        .bind(interval.count)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        let first_task: Task = sqlx::query_as(
            r#"INSERT INTO tasks (series_id, due_date, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            RETURNING *"#,
        )
        .bind(series.id)
        .bind(data.first_due_date)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            series_id = series.id,
            interval = %interval,
            first_due_date = %first_task.due_date,
            "created series"
        );

        Ok(SeriesDetail {
            series,
            active_task: Some(first_task),
            history: Vec::new(),
        })
    }

    async fn find_series(&self, user_id: i64, series_id: i64) -> Result<Option<Series>, CoreError> {
        let series = sqlx::query_as("SELECT * FROM series WHERE id = $1 AND user_id = $2")
            .bind(series_id)
            .bind(user_id)
            .fetch_optional(self.pool())
            .await?;
        Ok(series)
    }

    async fn find_series_detail(
        &self,
        user_id: i64,
        series_id: i64,
    ) -> Result<Option<SeriesDetail>, CoreError> {
        let Some(series) = self.find_series(user_id, series_id).await? else {
            return Ok(None);
        };

        let active_task: Option<Task> =
            sqlx::query_as("SELECT * FROM tasks WHERE series_id = $1 AND completed_at IS NULL")
                .bind(series.id)
                .fetch_optional(self.pool())
                .await?;

        let history: Vec<CompletedTask> = sqlx::query_as(
            r#"SELECT id, due_date, completed_at, note
            FROM tasks
            WHERE series_id = $1 AND completed_at IS NOT NULL
            ORDER BY completed_at DESC, id DESC"#,
        )
        .bind(series.id)
        .fetch_all(self.pool())
        .await?;

        Ok(Some(SeriesDetail {
            series,
            active_task,
            history,
        }))
    }

    async fn update_series(
        &self,
        user_id: i64,
        series_id: i64,
        data: UpdateSeriesData,
    ) -> Result<SeriesUpdate, CoreError> {
        let mut tx = self.pool().begin().await?;

        let current = Self::find_owned_series_in_transaction(&mut tx, user_id, series_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Series with id {} not found", series_id)))?;

        // Validate everything before writing anything
        let note = data.note.as_deref().map(validate_note).transpose()?;
        let interval = if data.interval_count.is_some() || data.interval_unit.is_some() {
            Some(Interval::new(
                data.interval_count.unwrap_or(current.interval_count),
                data.interval_unit.unwrap_or(current.interval_unit),
            )?)
        } else {
            None
        };

        let now = Utc::now();
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE series SET ");
        let mut updated = false;

        if let Some(note) = note {
            qb.push("note = ");
            qb.push_bind(note.to_string());
            updated = true;
        }

        if let Some(interval) = interval {
            if updated {
                qb.push(", ");
            }
            qb.push("interval_count = ");
            qb.push_bind(interval.count);
            qb.push(", interval_unit = ");
            qb.push_bind(interval.unit);
            updated = true;
        }

        if updated {
            qb.push(", updated_at = ");
            qb.push_bind(now);
            qb.push(" WHERE id = ");
            qb.push_bind(series_id);

            qb.build().execute(&mut *tx).await?;
        }

        if let Some(due_date) = data.due_date {
            sqlx::query(
                r#"UPDATE tasks
                SET due_date = $1, updated_at = $2
                WHERE series_id = $3 AND completed_at IS NULL"#,
            )
            .bind(due_date)
            .bind(now)
            .bind(series_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let update = SeriesUpdate {
            note: note.map(str::to_string),
            interval_count: interval.map(|i| i.count),
            interval_unit: interval.map(|i| i.unit),
            due_date: data.due_date,
        };
        info!(series_id, ?update, "updated series");

        Ok(update)
    }
}

impl SqliteRepository {
    pub(crate) async fn find_owned_series_in_transaction<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        user_id: i64,
        series_id: i64,
    ) -> Result<Option<Series>, CoreError> {
        let series = sqlx::query_as("SELECT * FROM series WHERE id = $1 AND user_id = $2")
            .bind(series_id)
            .bind(user_id)
            .fetch_optional(&mut **tx)
            .await?;
        Ok(series)
    }
}

/// Notes are stored trimmed and must not be blank.
fn validate_note(note: &str) -> Result<&str, CoreError> {
    let note = note.trim();
    if note.is_empty() {
        return Err(CoreError::InvalidInput("Note cannot be empty".to_string()));
    }
    Ok(note)
}
