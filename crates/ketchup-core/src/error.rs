use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Task {0} is still active; notes can only be added to completed tasks")]
    TaskNotCompleted(i64),

    #[error("Expected exactly one row, got multiple")]
    TooManyRows,

    #[error("Date out of range: {0}")]
    DateOutOfRange(String),
}

impl From<crate::interval::ParseIntervalUnitError> for CoreError {
    fn from(err: crate::interval::ParseIntervalUnitError) -> Self {
        CoreError::InvalidInput(err.to_string())
    }
}
