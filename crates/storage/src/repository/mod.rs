use async_trait::async_trait;

use crate::dto::rating::RatingFilter;
use crate::error::Result;
use crate::models::{ArticleRating, Bookmark, NewRating, RatingAggregate, RatingChanges};

pub mod bookmark;
pub mod rating;

/// Persistence for article ratings. No validation happens at this level.
#[async_trait]
pub trait RatingStore: Send + Sync {
    async fn create(&self, rating: &NewRating) -> Result<ArticleRating>;

    async fn find_by_article_id(&self, article_id: i64) -> Result<Option<ArticleRating>>;

    /// Returns `None` when no rating exists for the article.
    async fn update(&self, article_id: i64, changes: &RatingChanges) -> Result<Option<ArticleRating>>;

    /// Returns whether a row was removed.
    async fn delete(&self, article_id: i64) -> Result<bool>;

    async fn find_many(&self, filter: &RatingFilter) -> Result<Vec<ArticleRating>>;

    async fn stats(&self) -> Result<RatingAggregate>;
}

/// Read access to the bookmarks that ratings attach to.
#[async_trait]
pub trait BookmarkLookup: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Bookmark>>;
}
