use sqlx::PgPool;
use storage::{
    dto::rating::{
        CreateRatingRequest, RatingListQuery, RatingStats, UpdateRatingRequest,
    },
    error::RatingResult,
    models::ArticleRating,
    repository::{bookmark::BookmarkRepository, rating::RatingRepository},
    services::rating::RatingService,
};

fn rating_service(pool: &PgPool) -> RatingService<RatingRepository<'_>, BookmarkRepository<'_>> {
    RatingService::new(RatingRepository::new(pool), BookmarkRepository::new(pool))
}

/// List ratings matching the caller's filters
pub async fn list_ratings(pool: &PgPool, query: &RatingListQuery) -> RatingResult<Vec<ArticleRating>> {
    rating_service(pool).get_ratings(query).await
}

/// Aggregate statistics over all ratings
pub async fn rating_stats(pool: &PgPool) -> RatingResult<RatingStats> {
    rating_service(pool).get_rating_stats().await
}

/// Get the rating of an article, if any
pub async fn get_rating(pool: &PgPool, article_id: i64) -> RatingResult<Option<ArticleRating>> {
    rating_service(pool).get_rating(article_id).await
}

/// Rate an article
pub async fn create_rating(
    pool: &PgPool,
    article_id: i64,
    request: &CreateRatingRequest,
) -> RatingResult<ArticleRating> {
    rating_service(pool).create_rating(article_id, request).await
}

/// Update an article's rating
pub async fn update_rating(
    pool: &PgPool,
    article_id: i64,
    request: &UpdateRatingRequest,
) -> RatingResult<ArticleRating> {
    rating_service(pool).update_rating(article_id, request).await
}

/// Delete an article's rating
pub async fn delete_rating(pool: &PgPool, article_id: i64) -> RatingResult<()> {
    rating_service(pool).delete_rating(article_id).await
}
