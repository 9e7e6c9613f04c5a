use chrono::{NaiveDate, TimeZone, Utc};
use ketchup_core::db::establish_connection;
use ketchup_core::error::CoreError;
use ketchup_core::interval::{Interval, IntervalUnit};
use ketchup_core::models::*;
use ketchup_core::repository::{
    SeriesRepository, SqliteRepository, TaskRepository, UserRepository,
};
use ketchup_core::seed;
use tempfile::TempDir;

/// Helper function to create a test database
async fn setup_test_db() -> (SqliteRepository, TempDir) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("test.db");

    let pool = establish_connection(&db_path.to_string_lossy())
        .await
        .expect("Failed to establish test database connection");

    (SqliteRepository::new(pool), temp_dir)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn create_test_user(repo: &SqliteRepository, login: &str) -> User {
    repo.find_or_create_user(login, None)
        .await
        .expect("Failed to create test user")
}

/// Helper function to create a test series
async fn create_test_series(
    repo: &SqliteRepository,
    user: &User,
    note: &str,
    count: u32,
    unit: IntervalUnit,
    due: NaiveDate,
) -> SeriesDetail {
    repo.create_series_with_first_task(
        user.id,
        NewSeriesData {
            note: note.to_string(),
            interval: Interval::new(count, unit).unwrap(),
            first_due_date: due,
        },
    )
    .await
    .expect("Failed to create test series")
}

fn active_id(detail: &SeriesDetail) -> i64 {
    detail.active_task.as_ref().expect("series has an active task").id
}

#[tokio::test]
async fn test_find_or_create_user_is_idempotent() {
    let (repo, _temp_dir) = setup_test_db().await;

    let first = repo
        .find_or_create_user("alice@example.com", Some("Alice"))
        .await
        .unwrap();
    let second = repo
        .find_or_create_user("  alice@example.com ", Some("Someone Else"))
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.display_name(), "Alice");

    let found = repo.find_user_by_login("alice@example.com").await.unwrap();
    assert_eq!(found.id, first.id);
}

#[tokio::test]
async fn test_find_user_by_login_missing() {
    let (repo, _temp_dir) = setup_test_db().await;

    let result = repo.find_user_by_login("nobody").await;
    assert!(matches!(result, Err(CoreError::NotFound(_))));

    let result = repo.find_or_create_user("   ", None).await;
    assert!(matches!(result, Err(CoreError::InvalidInput(_))));
}

#[tokio::test]
async fn test_create_series_with_first_task() {
    let (repo, _temp_dir) = setup_test_db().await;
    let user = create_test_user(&repo, "alice").await;

    let detail = create_test_series(
        &repo,
        &user,
        "  Call Mom\n\nAsk about plans  ",
        2,
        IntervalUnit::Week,
        date(2026, 3, 1),
    )
    .await;

    assert_eq!(detail.series.note, "Call Mom\n\nAsk about plans");
    assert_eq!(detail.series.title(), "Call Mom");
    assert_eq!(detail.series.interval().describe(), "2 weeks");

    let task = detail.active_task.unwrap();
    assert!(task.is_active());
    assert_eq!(task.due_date, date(2026, 3, 1));

    let active = repo.find_active_tasks(user.id).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, task.id);
}

#[tokio::test]
async fn test_create_series_rejects_invalid_input() {
    let (repo, _temp_dir) = setup_test_db().await;
    let user = create_test_user(&repo, "alice").await;

    let blank = repo
        .create_series_with_first_task(
            user.id,
            NewSeriesData {
                note: "   ".to_string(),
                interval: Interval::default(),
                first_due_date: date(2026, 3, 1),
            },
        )
        .await;
    assert!(matches!(blank, Err(CoreError::InvalidInput(_))));

    let zero = repo
        .create_series_with_first_task(
            user.id,
            NewSeriesData {
                note: "Water plants".to_string(),
                interval: Interval {
                    count: 0,
                    unit: IntervalUnit::Day,
                },
                first_due_date: date(2026, 3, 1),
            },
        )
        .await;
    assert!(matches!(zero, Err(CoreError::InvalidInput(_))));

    assert!(repo.find_active_tasks(user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_complete_task_anchors_on_today() {
    let (repo, _temp_dir) = setup_test_db().await;
    let user = create_test_user(&repo, "alice").await;
    let detail =
        create_test_series(&repo, &user, "Call Mom", 2, IntervalUnit::Week, date(2026, 3, 1)).await;

    // Completed nine days late; the next one counts from today
    let result = repo
        .complete_task(user.id, active_id(&detail), date(2026, 3, 10))
        .await
        .unwrap();

    assert!(result.completed.completed_at.is_some());
    assert!(result.next.is_active());
    assert_eq!(result.next.series_id, detail.series.id);
    assert_eq!(result.next.due_date, date(2026, 3, 24));

    let refreshed = repo
        .find_series_detail(user.id, detail.series.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(refreshed.active_task.unwrap().id, result.next.id);
    assert_eq!(refreshed.history.len(), 1);
    assert_eq!(refreshed.history[0].id, result.completed.id);
    assert_eq!(refreshed.history[0].due_date, date(2026, 3, 1));
}

#[tokio::test]
async fn test_complete_task_month_end_clamps() {
    let (repo, _temp_dir) = setup_test_db().await;
    let user = create_test_user(&repo, "alice").await;
    let detail = create_test_series(
        &repo,
        &user,
        "Review finances",
        1,
        IntervalUnit::Month,
        date(2026, 1, 31),
    )
    .await;

    let result = repo
        .complete_task(user.id, active_id(&detail), date(2026, 1, 31))
        .await
        .unwrap();
    assert_eq!(result.next.due_date, date(2026, 2, 28));
}

#[tokio::test]
async fn test_complete_task_twice_fails() {
    let (repo, _temp_dir) = setup_test_db().await;
    let user = create_test_user(&repo, "alice").await;
    let detail =
        create_test_series(&repo, &user, "Haircut", 2, IntervalUnit::Month, date(2026, 3, 1)).await;
    let task_id = active_id(&detail);

    repo.complete_task(user.id, task_id, date(2026, 3, 1))
        .await
        .unwrap();
    let again = repo.complete_task(user.id, task_id, date(2026, 3, 1)).await;
    assert!(matches!(again, Err(CoreError::NotFound(_))));

    // Still exactly one active task
    assert_eq!(repo.find_active_tasks(user.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_one_active_task_per_series_is_enforced() {
    let (repo, temp_dir) = setup_test_db().await;
    let user = create_test_user(&repo, "alice").await;
    let detail =
        create_test_series(&repo, &user, "Oil change", 3, IntervalUnit::Month, date(2026, 3, 1))
            .await;

    let pool = establish_connection(&temp_dir.path().join("test.db").to_string_lossy())
        .await
        .unwrap();
    let duplicate = sqlx::query(
        "INSERT INTO tasks (series_id, due_date, created_at, updated_at) VALUES ($1, $2, $3, $3)",
    )
    .bind(detail.series.id)
    .bind(date(2026, 4, 1))
    .bind(Utc::now())
    .execute(&pool)
    .await;
    assert!(duplicate.is_err());

    // A completed task does not count towards the limit
    let completed = sqlx::query(
        "INSERT INTO tasks (series_id, due_date, completed_at, created_at, updated_at) VALUES ($1, $2, $3, $3, $3)",
    )
    .bind(detail.series.id)
    .bind(date(2026, 2, 1))
    .bind(Utc::now())
    .execute(&pool)
    .await;
    assert!(completed.is_ok());
}

#[tokio::test]
async fn test_other_users_records_are_not_found() {
    let (repo, _temp_dir) = setup_test_db().await;
    let alice = create_test_user(&repo, "alice").await;
    let bob = create_test_user(&repo, "bob").await;
    let detail =
        create_test_series(&repo, &alice, "Call Mom", 1, IntervalUnit::Week, date(2026, 3, 1))
            .await;
    let task_id = active_id(&detail);

    assert!(repo
        .find_series(bob.id, detail.series.id)
        .await
        .unwrap()
        .is_none());
    assert!(repo
        .find_series_detail(bob.id, detail.series.id)
        .await
        .unwrap()
        .is_none());
    assert!(repo.find_active_tasks(bob.id).await.unwrap().is_empty());

    let completion = repo.complete_task(bob.id, task_id, date(2026, 3, 1)).await;
    assert!(matches!(completion, Err(CoreError::NotFound(_))));

    let update = repo
        .update_series(
            bob.id,
            detail.series.id,
            UpdateSeriesData {
                note: Some("Hijacked".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(update, Err(CoreError::NotFound(_))));

    let series = repo
        .find_series(alice.id, detail.series.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(series.note, "Call Mom");
}

#[tokio::test]
async fn test_update_task_note() {
    let (repo, _temp_dir) = setup_test_db().await;
    let user = create_test_user(&repo, "alice").await;
    let detail =
        create_test_series(&repo, &user, "Water plants", 3, IntervalUnit::Day, date(2026, 3, 1))
            .await;
    let task_id = active_id(&detail);

    // Active tasks cannot carry a note
    let early = repo.update_task_note(user.id, task_id, "Too soon").await;
    assert!(matches!(early, Err(CoreError::TaskNotCompleted(id)) if id == task_id));

    repo.complete_task(user.id, task_id, date(2026, 3, 2))
        .await
        .unwrap();

    let note = repo
        .update_task_note(user.id, task_id, "  Soil was dry \n")
        .await
        .unwrap();
    assert_eq!(note.as_deref(), Some("Soil was dry"));

    let cleared = repo.update_task_note(user.id, task_id, "   ").await.unwrap();
    assert_eq!(cleared, None);

    let refreshed = repo
        .find_series_detail(user.id, detail.series.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(refreshed.history[0].note, None);

    let missing = repo.update_task_note(user.id, 9999, "x").await;
    assert!(matches!(missing, Err(CoreError::NotFound(_))));
}

#[tokio::test]
async fn test_update_series_partial() {
    let (repo, _temp_dir) = setup_test_db().await;
    let user = create_test_user(&repo, "alice").await;
    let detail =
        create_test_series(&repo, &user, "Call Mom", 2, IntervalUnit::Week, date(2026, 3, 1)).await;

    // Only the count: the unit is kept and both are reported
    let update = repo
        .update_series(
            user.id,
            detail.series.id,
            UpdateSeriesData {
                interval_count: Some(3),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(update.interval_count, Some(3));
    assert_eq!(update.interval_unit, Some(IntervalUnit::Week));
    assert_eq!(update.note, None);
    assert_eq!(update.due_date, None);

    let update = repo
        .update_series(
            user.id,
            detail.series.id,
            UpdateSeriesData {
                note: Some(" Call Dad ".to_string()),
                due_date: Some(date(2026, 3, 5)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(update.note.as_deref(), Some("Call Dad"));
    assert_eq!(update.due_date, Some(date(2026, 3, 5)));

    let refreshed = repo
        .find_series_detail(user.id, detail.series.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(refreshed.series.note, "Call Dad");
    assert_eq!(refreshed.series.interval().describe(), "3 weeks");
    assert_eq!(refreshed.active_task.unwrap().due_date, date(2026, 3, 5));
}

#[tokio::test]
async fn test_update_series_invalid_changes_nothing() {
    let (repo, _temp_dir) = setup_test_db().await;
    let user = create_test_user(&repo, "alice").await;
    let detail =
        create_test_series(&repo, &user, "Call Mom", 2, IntervalUnit::Week, date(2026, 3, 1)).await;

    let result = repo
        .update_series(
            user.id,
            detail.series.id,
            UpdateSeriesData {
                note: Some("New note".to_string()),
                interval_count: Some(0),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(CoreError::InvalidInput(_))));

    let result = repo
        .update_series(
            user.id,
            detail.series.id,
            UpdateSeriesData {
                note: Some("  ".to_string()),
                due_date: Some(date(2026, 4, 1)),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(CoreError::InvalidInput(_))));

    let refreshed = repo
        .find_series_detail(user.id, detail.series.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(refreshed.series.note, "Call Mom");
    assert_eq!(refreshed.series.interval_count, 2);
    assert_eq!(refreshed.active_task.unwrap().due_date, date(2026, 3, 1));
}

#[tokio::test]
async fn test_dashboard_partitions_and_ranks() {
    let (repo, _temp_dir) = setup_test_db().await;
    let user = create_test_user(&repo, "alice").await;
    let today = date(2026, 3, 10);

    // 9 days late on a yearly chore: barely urgent
    let yearly =
        create_test_series(&repo, &user, "Smoke detectors", 1, IntervalUnit::Year, date(2026, 3, 1))
            .await;
    // 2 days late on a daily chore: very urgent
    let daily =
        create_test_series(&repo, &user, "Dishes", 1, IntervalUnit::Day, date(2026, 3, 8)).await;
    let later =
        create_test_series(&repo, &user, "Haircut", 2, IntervalUnit::Month, date(2026, 4, 1)).await;
    let due_today =
        create_test_series(&repo, &user, "Laundry", 1, IntervalUnit::Week, today).await;

    let mut dashboard = repo.find_dashboard(user.id, today).await.unwrap();

    let overdue: Vec<_> = dashboard.overdue.iter().map(|t| t.series_id).collect();
    assert_eq!(overdue, vec![daily.series.id, yearly.series.id]);

    let upcoming: Vec<_> = dashboard.upcoming.iter().map(|t| t.series_id).collect();
    assert_eq!(upcoming, vec![due_today.series.id, later.series.id]);

    assert_eq!(dashboard.overdue[0].urgency(today), 2.0);
    assert_eq!(dashboard.overdue[0].title(), "Dishes");

    dashboard.sort_overdue(SortOrder::Date);
    let overdue: Vec<_> = dashboard.overdue.iter().map(|t| t.series_id).collect();
    assert_eq!(overdue, vec![yearly.series.id, daily.series.id]);
}

#[tokio::test]
async fn test_record_history_requires_ownership() {
    let (repo, _temp_dir) = setup_test_db().await;
    let alice = create_test_user(&repo, "alice").await;
    let bob = create_test_user(&repo, "bob").await;
    let detail =
        create_test_series(&repo, &alice, "Dentist", 1, IntervalUnit::Quarter, date(2026, 3, 1))
            .await;

    let entry = HistoryEntry {
        due_date: date(2025, 12, 1),
        completed_at: Utc.with_ymd_and_hms(2025, 12, 2, 10, 0, 0).unwrap(),
        note: Some("Cleaning".to_string()),
    };

    let denied = repo
        .record_history(bob.id, detail.series.id, entry.clone())
        .await;
    assert!(matches!(denied, Err(CoreError::NotFound(_))));

    let task = repo
        .record_history(alice.id, detail.series.id, entry)
        .await
        .unwrap();
    assert!(!task.is_active());
    assert_eq!(task.note.as_deref(), Some("Cleaning"));
}

#[tokio::test]
async fn test_seed_loads_demo_data() {
    let (repo, _temp_dir) = setup_test_db().await;
    let user = create_test_user(&repo, "demo@example.com").await;
    let today = date(2026, 3, 10);

    let data = seed::demo_series(today);
    let history: usize = data.iter().map(|s| s.history.len()).sum();

    let summary = seed::load(&repo, user.id, &data).await.unwrap();
    assert_eq!(summary.series, data.len());
    assert_eq!(summary.tasks, data.len() + history);

    let dashboard = repo.find_dashboard(user.id, today).await.unwrap();
    assert_eq!(dashboard.overdue.len(), 4);
    assert_eq!(dashboard.upcoming.len(), 6);
    assert!(dashboard.overdue[0].title().starts_with("Water the plants"));
}

#[tokio::test]
async fn test_update_user_email() {
    let (repo, _temp_dir) = setup_test_db().await;
    let user = create_test_user(&repo, "alice").await;
    assert_eq!(user.email, None);

    let updated = repo
        .update_user_email(user.id, Some("  alice@example.com "))
        .await
        .unwrap();
    assert_eq!(updated.email.as_deref(), Some("alice@example.com"));

    let found = repo.find_user_by_login("alice").await.unwrap();
    assert_eq!(found.email.as_deref(), Some("alice@example.com"));

    let cleared = repo.update_user_email(user.id, Some("   ")).await.unwrap();
    assert_eq!(cleared.email, None);

    repo.update_user_email(user.id, Some("a@example.com"))
        .await
        .unwrap();
    let cleared = repo.update_user_email(user.id, None).await.unwrap();
    assert_eq!(cleared.email, None);

    let missing = repo.update_user_email(9999, Some("x@example.com")).await;
    assert!(matches!(missing, Err(CoreError::NotFound(_))));
}

#[tokio::test]
async fn test_task_interval_override_from_storage() {
    let (repo, temp_dir) = setup_test_db().await;
    let user = create_test_user(&repo, "alice").await;
    let detail = create_test_series(
        &repo,
        &user,
        "Water plants",
        1,
        IntervalUnit::Month,
        date(2026, 3, 1),
    )
    .await;
    let task_id = active_id(&detail);

    let pool = establish_connection(&temp_dir.path().join("test.db").to_string_lossy())
        .await
        .unwrap();
    sqlx::query("UPDATE tasks SET interval_unit = $1, interval_count = $2 WHERE id = $3")
        .bind(IntervalUnit::Day)
        .bind(2u32)
        .bind(task_id)
        .execute(&pool)
        .await
        .unwrap();

    let today = date(2026, 3, 5);

    // Four days late on a two day override, not on the monthly series
    let dashboard = repo.find_dashboard(user.id, today).await.unwrap();
    assert_eq!(dashboard.overdue.len(), 1);
    assert_eq!(
        dashboard.overdue[0].interval(),
        Interval::new(2, IntervalUnit::Day).unwrap()
    );
    assert_eq!(dashboard.overdue[0].urgency(today), 2.0);

    let result = repo.complete_task(user.id, task_id, today).await.unwrap();
    assert_eq!(result.next.due_date, date(2026, 3, 7));

    // The successor falls back to the series interval
    assert_eq!(result.next.interval_unit, None);
    assert_eq!(result.next.interval_count, None);
    assert_eq!(
        result.next.effective_interval(&detail.series),
        Interval::new(1, IntervalUnit::Month).unwrap()
    );

    // An override of only the count keeps the series unit
    sqlx::query("UPDATE tasks SET interval_count = $1 WHERE id = $2")
        .bind(3u32)
        .bind(result.next.id)
        .execute(&pool)
        .await
        .unwrap();
    let active = repo.find_active_tasks(user.id).await.unwrap();
    assert_eq!(
        active[0].interval(),
        Interval::new(3, IntervalUnit::Month).unwrap()
    );
}
