use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::rating::{CreateRatingRequest, RatingListQuery, RatingStats, UpdateRatingRequest},
    error::RATING_NOT_FOUND,
    models::ArticleRating,
};

use crate::error::{ApiResult, WebError};

use super::services;

#[utoipa::path(
    get,
    path = "/api/ratings",
    params(RatingListQuery),
    responses(
        (status = 200, description = "Ratings matching the filters", body = Vec<ArticleRating>),
        (status = 400, description = "Invalid score filter")
    ),
    tag = "ratings"
)]
pub async fn list_ratings(
    State(db): State<Database>,
    Query(query): Query<RatingListQuery>,
) -> ApiResult<Response> {
    let ratings = services::list_ratings(db.pool(), &query).await?;

    Ok(Json(ratings).into_response())
}

#[utoipa::path(
    get,
    path = "/api/ratings/stats",
    responses(
        (status = 200, description = "Aggregate rating statistics", body = RatingStats)
    ),
    tag = "ratings"
)]
pub async fn rating_stats(State(db): State<Database>) -> ApiResult<Response> {
    let stats = services::rating_stats(db.pool()).await?;

    Ok(Json(stats).into_response())
}

#[utoipa::path(
    get,
    path = "/api/ratings/{article_id}",
    params(
        ("article_id" = i64, Path, description = "Article (bookmark) ID")
    ),
    responses(
        (status = 200, description = "Rating found", body = ArticleRating),
        (status = 404, description = "Article has no rating")
    ),
    tag = "ratings"
)]
pub async fn get_rating(
    State(db): State<Database>,
    Path(article_id): Path<i64>,
) -> ApiResult<Response> {
    let rating = services::get_rating(db.pool(), article_id)
        .await?
        .ok_or_else(|| WebError::NotFound(RATING_NOT_FOUND.to_string()))?;

    Ok(Json(rating).into_response())
}

#[utoipa::path(
    post,
    path = "/api/ratings/{article_id}",
    params(
        ("article_id" = i64, Path, description = "Article (bookmark) ID")
    ),
    request_body = CreateRatingRequest,
    responses(
        (status = 201, description = "Rating created", body = ArticleRating),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Article not found"),
        (status = 409, description = "Article already rated")
    ),
    tag = "ratings"
)]
pub async fn create_rating(
    State(db): State<Database>,
    Path(article_id): Path<i64>,
    Json(req): Json<CreateRatingRequest>,
) -> ApiResult<Response> {
    let rating = services::create_rating(db.pool(), article_id, &req).await?;

    Ok((StatusCode::CREATED, Json(rating)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/ratings/{article_id}",
    params(
        ("article_id" = i64, Path, description = "Article (bookmark) ID")
    ),
    request_body = UpdateRatingRequest,
    responses(
        (status = 200, description = "Rating updated", body = ArticleRating),
        (status = 400, description = "Validation error or empty payload"),
        (status = 404, description = "Article or rating not found")
    ),
    tag = "ratings"
)]
pub async fn update_rating(
    State(db): State<Database>,
    Path(article_id): Path<i64>,
    Json(req): Json<UpdateRatingRequest>,
) -> ApiResult<Response> {
    let rating = services::update_rating(db.pool(), article_id, &req).await?;

    Ok(Json(rating).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/ratings/{article_id}",
    params(
        ("article_id" = i64, Path, description = "Article (bookmark) ID")
    ),
    responses(
        (status = 204, description = "Rating deleted"),
        (status = 404, description = "Article or rating not found")
    ),
    tag = "ratings"
)]
pub async fn delete_rating(
    State(db): State<Database>,
    Path(article_id): Path<i64>,
) -> ApiResult<Response> {
    services::delete_rating(db.pool(), article_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
