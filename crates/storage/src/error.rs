use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Uniqueness rejected by a store that reports it without a SQLSTATE,
    /// such as an in-memory `RatingStore`.
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn is_unique_violation(&self) -> bool {
        match self {
            StorageError::Database(sqlx::Error::Database(e)) => e.code().as_deref() == Some("23505"),
            StorageError::UniqueViolation(_) => true,
            _ => false,
        }
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23503")
        )
    }
}

/// Errors surfaced by the rating service.
///
/// The first three kinds carry a caller-facing message; `Storage` wraps
/// anything the store reported that has no business meaning.
#[derive(Debug, Error)]
pub enum RatingError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type RatingResult<T> = std::result::Result<T, RatingError>;

pub const ARTICLE_NOT_FOUND: &str = "Article not found";
pub const RATING_NOT_FOUND: &str = "Rating not found for this article";
pub const RATING_EXISTS: &str = "Rating already exists for this article";

impl RatingError {
    /// Maps constraint failures raised by the store onto the rating taxonomy.
    pub fn from_store(error: StorageError) -> Self {
        if error.is_unique_violation() {
            Self::Conflict(RATING_EXISTS.to_string())
        } else if error.is_foreign_key_violation() {
            Self::NotFound(ARTICLE_NOT_FOUND.to_string())
        } else {
            Self::Storage(error)
        }
    }
}
