use validator::{Validate, ValidationErrors};

use crate::dto::common::Pagination;
use crate::dto::rating::{
    CreateRatingRequest, RatingFilter, RatingListQuery, RatingStats, SortField, SortOrder,
    UpdateRatingRequest,
};
use crate::error::{
    ARTICLE_NOT_FOUND, RATING_EXISTS, RATING_NOT_FOUND, RatingError, RatingResult,
};
use crate::models::{ArticleRating, DimensionScores, NewRating, RatingChanges};
use crate::repository::{BookmarkLookup, RatingStore};

/// Bounds of the `minScore`/`maxScore` listing filters (1 to 10 scale)
const SCORE_FILTER_MIN: f64 = 1.0;
const SCORE_FILTER_MAX: f64 = 10.0;

/// Factor between the 1 to 10 dimension scale and the stored total score
const TOTAL_SCORE_SCALE: f64 = 10.0;

/// Compute the stored total score: `round(sum / 5 * 10)`
pub fn compute_total_score(scores: &DimensionScores) -> i32 {
    let mean = f64::from(scores.sum()) / 5.0;
    (mean * TOTAL_SCORE_SCALE).round() as i32
}

/// Turn caller-supplied listing options into a store filter.
///
/// Sort key, order and paging fall back to defaults; score bounds are
/// rejected when out of range and rescaled to the stored total score.
pub fn normalize_list_options(query: &RatingListQuery) -> RatingResult<RatingFilter> {
    let defaults = RatingFilter::default();

    for (name, bound) in [("minScore", query.min_score), ("maxScore", query.max_score)] {
        if let Some(value) = bound
            && !(SCORE_FILTER_MIN..=SCORE_FILTER_MAX).contains(&value)
        {
            return Err(RatingError::Validation(format!(
                "{name} must be between 1 and 10"
            )));
        }
    }

    if let (Some(min), Some(max)) = (query.min_score, query.max_score)
        && min > max
    {
        return Err(RatingError::Validation(
            "minScore cannot be greater than maxScore".to_string(),
        ));
    }

    Ok(RatingFilter {
        sort_by: query
            .sort_by
            .as_deref()
            .map(SortField::parse)
            .unwrap_or(defaults.sort_by),
        order: query
            .order
            .as_deref()
            .map(SortOrder::parse)
            .unwrap_or(defaults.order),
        pagination: Pagination::clamped(query.limit, query.offset),
        min_total_score: query.min_score.map(|score| score * TOTAL_SCORE_SCALE),
        max_total_score: query.max_score.map(|score| score * TOTAL_SCORE_SCALE),
        has_comment: query.has_comment,
    })
}

/// Accept a dimension score only if it is a whole number in 1..=10.
fn dimension(name: &str, value: f64) -> RatingResult<i32> {
    if !value.is_finite() || value.fract() != 0.0 || !(1.0..=10.0).contains(&value) {
        return Err(RatingError::Validation(format!(
            "{name} must be an integer between 1 and 10"
        )));
    }

    Ok(value as i32)
}

fn merged_dimension(name: &str, value: Option<f64>, current: i32) -> RatingResult<i32> {
    value.map_or(Ok(current), |value| dimension(name, value))
}

fn validation_message(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{}: {}", field, e.code))
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

fn validate_request(request: &impl Validate) -> RatingResult<()> {
    request
        .validate()
        .map_err(|errors| RatingError::Validation(validation_message(&errors)))
}

/// Business rules for article ratings.
///
/// The store is only trusted for persistence; every precondition, the score
/// formula and option normalization live here.
pub struct RatingService<R, B> {
    ratings: R,
    bookmarks: B,
}

impl<R: RatingStore, B: BookmarkLookup> RatingService<R, B> {
    pub fn new(ratings: R, bookmarks: B) -> Self {
        Self { ratings, bookmarks }
    }

    async fn ensure_article_exists(&self, article_id: i64) -> RatingResult<()> {
        self.bookmarks
            .find_by_id(article_id)
            .await
            .map_err(RatingError::from_store)?
            .map(|_| ())
            .ok_or_else(|| RatingError::NotFound(ARTICLE_NOT_FOUND.to_string()))
    }

    async fn existing_rating(&self, article_id: i64) -> RatingResult<ArticleRating> {
        self.ratings
            .find_by_article_id(article_id)
            .await
            .map_err(RatingError::from_store)?
            .ok_or_else(|| RatingError::NotFound(RATING_NOT_FOUND.to_string()))
    }

    /// Rate an article that has no rating yet
    pub async fn create_rating(
        &self,
        article_id: i64,
        request: &CreateRatingRequest,
    ) -> RatingResult<ArticleRating> {
        self.ensure_article_exists(article_id).await?;

        let existing = self
            .ratings
            .find_by_article_id(article_id)
            .await
            .map_err(RatingError::from_store)?;
        if existing.is_some() {
            return Err(RatingError::Conflict(RATING_EXISTS.to_string()));
        }

        validate_request(request)?;
        let scores = DimensionScores {
            practical_value: dimension("practicalValue", request.practical_value)?,
            technical_depth: dimension("technicalDepth", request.technical_depth)?,
            understanding: dimension("understanding", request.understanding)?,
            novelty: dimension("novelty", request.novelty)?,
            importance: dimension("importance", request.importance)?,
        };

        let new_rating = NewRating {
            article_id,
            scores,
            total_score: compute_total_score(&scores),
            comment: request.comment.clone(),
        };

        // A concurrent create can pass the check above; the unique index on
        // article_id rejects the second insert.
        let rating = self
            .ratings
            .create(&new_rating)
            .await
            .map_err(RatingError::from_store)?;

        tracing::info!(
            article_id,
            rating_id = rating.id,
            total_score = rating.total_score,
            "Rating created"
        );

        Ok(rating)
    }

    pub async fn get_rating(&self, article_id: i64) -> RatingResult<Option<ArticleRating>> {
        self.ratings
            .find_by_article_id(article_id)
            .await
            .map_err(RatingError::from_store)
    }

    /// Merge the supplied fields into the stored rating and recompute its total
    pub async fn update_rating(
        &self,
        article_id: i64,
        request: &UpdateRatingRequest,
    ) -> RatingResult<ArticleRating> {
        self.ensure_article_exists(article_id).await?;
        let current = self.existing_rating(article_id).await?;

        if request.is_empty() {
            return Err(RatingError::Validation("No fields to update".to_string()));
        }

        validate_request(request)?;
        let scores = DimensionScores {
            practical_value: merged_dimension(
                "practicalValue",
                request.practical_value,
                current.practical_value,
            )?,
            technical_depth: merged_dimension(
                "technicalDepth",
                request.technical_depth,
                current.technical_depth,
            )?,
            understanding: merged_dimension(
                "understanding",
                request.understanding,
                current.understanding,
            )?,
            novelty: merged_dimension("novelty", request.novelty, current.novelty)?,
            importance: merged_dimension("importance", request.importance, current.importance)?,
        };

        let changes = RatingChanges {
            scores,
            total_score: compute_total_score(&scores),
            comment: request.comment.clone().or(current.comment),
        };

        let rating = self
            .ratings
            .update(article_id, &changes)
            .await
            .map_err(RatingError::from_store)?
            .ok_or_else(|| RatingError::NotFound(RATING_NOT_FOUND.to_string()))?;

        tracing::info!(
            article_id,
            total_score = rating.total_score,
            "Rating updated"
        );

        Ok(rating)
    }

    /// Delete the rating of an article. Deleting twice reports `NotFound`.
    pub async fn delete_rating(&self, article_id: i64) -> RatingResult<()> {
        self.ensure_article_exists(article_id).await?;
        self.existing_rating(article_id).await?;

        let deleted = self
            .ratings
            .delete(article_id)
            .await
            .map_err(RatingError::from_store)?;
        if !deleted {
            return Err(RatingError::NotFound(RATING_NOT_FOUND.to_string()));
        }

        tracing::info!(article_id, "Rating deleted");

        Ok(())
    }

    pub async fn get_ratings(&self, query: &RatingListQuery) -> RatingResult<Vec<ArticleRating>> {
        let filter = normalize_list_options(query)?;
        tracing::debug!(?filter, "Listing ratings");

        self.ratings
            .find_many(&filter)
            .await
            .map_err(RatingError::from_store)
    }

    pub async fn get_rating_stats(&self) -> RatingResult<RatingStats> {
        let aggregate = self.ratings.stats().await.map_err(RatingError::from_store)?;

        if aggregate.total_count == 0 {
            return Ok(RatingStats::default());
        }

        Ok(RatingStats {
            total_count: aggregate.total_count,
            average_score: aggregate.avg_total_score.unwrap_or(0.0) / TOTAL_SCORE_SCALE,
            average_practical_value: aggregate.avg_practical_value.unwrap_or(0.0),
            average_technical_depth: aggregate.avg_technical_depth.unwrap_or(0.0),
            average_understanding: aggregate.avg_understanding.unwrap_or(0.0),
            average_novelty: aggregate.avg_novelty.unwrap_or(0.0),
            average_importance: aggregate.avg_importance.unwrap_or(0.0),
            ratings_with_comments: aggregate.ratings_with_comments,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{Duration, Utc};

    use super::*;
    use crate::error::{Result, StorageError};
    use crate::models::{Bookmark, RatingAggregate};

    #[derive(Default)]
    struct StoreState {
        rows: Vec<ArticleRating>,
        next_id: i64,
        last_filter: Option<RatingFilter>,
        hide_existing: bool,
        inserts: usize,
    }

    /// In-memory store with the same unique constraint as the real table
    #[derive(Clone, Default)]
    struct MemoryRatingStore {
        state: Arc<Mutex<StoreState>>,
    }

    impl MemoryRatingStore {
        fn last_filter(&self) -> Option<RatingFilter> {
            self.state.lock().unwrap().last_filter.clone()
        }

        fn inserts(&self) -> usize {
            self.state.lock().unwrap().inserts
        }

        /// Lookups miss, as if another request inserted concurrently.
        fn hide_existing(&self) {
            self.state.lock().unwrap().hide_existing = true;
        }
    }

    fn sort_key(rating: &ArticleRating, field: SortField) -> i64 {
        match field {
            SortField::TotalScore => rating.total_score.into(),
            SortField::CreatedAt => rating.created_at.and_utc().timestamp_micros(),
            SortField::PracticalValue => rating.practical_value.into(),
            SortField::TechnicalDepth => rating.technical_depth.into(),
            SortField::Understanding => rating.understanding.into(),
            SortField::Novelty => rating.novelty.into(),
            SortField::Importance => rating.importance.into(),
        }
    }

    fn mean(rows: &[ArticleRating], value: impl Fn(&ArticleRating) -> i32) -> Option<f64> {
        if rows.is_empty() {
            return None;
        }
        let sum: i32 = rows.iter().map(value).sum();
        Some(f64::from(sum) / rows.len() as f64)
    }

    #[async_trait]
    impl RatingStore for MemoryRatingStore {
        async fn create(&self, rating: &NewRating) -> Result<ArticleRating> {
            let mut state = self.state.lock().unwrap();
            if state.rows.iter().any(|r| r.article_id == rating.article_id) {
                return Err(StorageError::UniqueViolation(
                    "article_ratings_article_id_key".to_string(),
                ));
            }

            state.next_id += 1;
            state.inserts += 1;
            // Spread creation times so createdAt ordering is deterministic
            let now = Utc::now().naive_utc() + Duration::seconds(state.next_id);
            let row = ArticleRating {
                id: state.next_id,
                article_id: rating.article_id,
                practical_value: rating.scores.practical_value,
                technical_depth: rating.scores.technical_depth,
                understanding: rating.scores.understanding,
                novelty: rating.scores.novelty,
                importance: rating.scores.importance,
                total_score: rating.total_score,
                comment: rating.comment.clone(),
                created_at: now,
                updated_at: now,
            };
            state.rows.push(row.clone());
            Ok(row)
        }

        async fn find_by_article_id(&self, article_id: i64) -> Result<Option<ArticleRating>> {
            let state = self.state.lock().unwrap();
            if state.hide_existing {
                return Ok(None);
            }
            Ok(state.rows.iter().find(|r| r.article_id == article_id).cloned())
        }

        async fn update(
            &self,
            article_id: i64,
            changes: &RatingChanges,
        ) -> Result<Option<ArticleRating>> {
            let mut state = self.state.lock().unwrap();
            let Some(row) = state.rows.iter_mut().find(|r| r.article_id == article_id) else {
                return Ok(None);
            };

            row.practical_value = changes.scores.practical_value;
            row.technical_depth = changes.scores.technical_depth;
            row.understanding = changes.scores.understanding;
            row.novelty = changes.scores.novelty;
            row.importance = changes.scores.importance;
            row.total_score = changes.total_score;
            row.comment = changes.comment.clone();
            row.updated_at = row.updated_at + Duration::milliseconds(1);
            Ok(Some(row.clone()))
        }

        async fn delete(&self, article_id: i64) -> Result<bool> {
            let mut state = self.state.lock().unwrap();
            let before = state.rows.len();
            state.rows.retain(|r| r.article_id != article_id);
            Ok(state.rows.len() < before)
        }

        async fn find_many(&self, filter: &RatingFilter) -> Result<Vec<ArticleRating>> {
            let mut state = self.state.lock().unwrap();
            state.last_filter = Some(filter.clone());

            let mut rows: Vec<ArticleRating> = state
                .rows
                .iter()
                .filter(|r| {
                    filter
                        .min_total_score
                        .is_none_or(|min| f64::from(r.total_score) >= min)
                })
                .filter(|r| {
                    filter
                        .max_total_score
                        .is_none_or(|max| f64::from(r.total_score) <= max)
                })
                .filter(|r| filter.has_comment.is_none_or(|wanted| r.has_comment() == wanted))
                .cloned()
                .collect();

            rows.sort_by_key(|r| (sort_key(r, filter.sort_by), r.id));
            if filter.order == SortOrder::Desc {
                rows.reverse();
            }

            Ok(rows
                .into_iter()
                .skip(filter.pagination.offset as usize)
                .take(filter.pagination.limit as usize)
                .collect())
        }

        async fn stats(&self) -> Result<RatingAggregate> {
            let state = self.state.lock().unwrap();
            let rows = &state.rows;
            Ok(RatingAggregate {
                total_count: rows.len() as i64,
                avg_total_score: mean(rows, |r| r.total_score),
                avg_practical_value: mean(rows, |r| r.practical_value),
                avg_technical_depth: mean(rows, |r| r.technical_depth),
                avg_understanding: mean(rows, |r| r.understanding),
                avg_novelty: mean(rows, |r| r.novelty),
                avg_importance: mean(rows, |r| r.importance),
                ratings_with_comments: rows.iter().filter(|r| r.has_comment()).count() as i64,
            })
        }
    }

    struct KnownBookmarks(HashSet<i64>);

    #[async_trait]
    impl BookmarkLookup for KnownBookmarks {
        async fn find_by_id(&self, id: i64) -> Result<Option<Bookmark>> {
            Ok(self.0.contains(&id).then(|| Bookmark {
                id,
                url: format!("https://example.com/articles/{id}"),
                title: format!("Article {id}"),
                description: None,
                created_at: Utc::now().naive_utc(),
            }))
        }
    }

    const MISSING_ARTICLE: i64 = 404;

    fn setup() -> (RatingService<MemoryRatingStore, KnownBookmarks>, MemoryRatingStore) {
        let store = MemoryRatingStore::default();
        let bookmarks = KnownBookmarks((1..=10).collect());
        (RatingService::new(store.clone(), bookmarks), store)
    }

    fn request(scores: [f64; 5], comment: Option<&str>) -> CreateRatingRequest {
        CreateRatingRequest {
            practical_value: scores[0],
            technical_depth: scores[1],
            understanding: scores[2],
            novelty: scores[3],
            importance: scores[4],
            comment: comment.map(String::from),
        }
    }

    fn scores(values: [i32; 5]) -> DimensionScores {
        DimensionScores {
            practical_value: values[0],
            technical_depth: values[1],
            understanding: values[2],
            novelty: values[3],
            importance: values[4],
        }
    }

    #[test]
    fn test_total_score_formula() {
        assert_eq!(compute_total_score(&scores([8, 7, 9, 6, 8])), 76);
        assert_eq!(compute_total_score(&scores([10, 10, 10, 10, 10])), 100);
        assert_eq!(compute_total_score(&scores([1, 1, 1, 1, 1])), 10);
        assert_eq!(compute_total_score(&scores([10, 7, 9, 6, 8])), 80);
    }

    #[test]
    fn test_normalize_defaults() {
        let filter = normalize_list_options(&RatingListQuery::default()).unwrap();
        assert_eq!(filter, RatingFilter::default());
        assert_eq!(filter.sort_by, SortField::CreatedAt);
        assert_eq!(filter.order, SortOrder::Desc);
        assert_eq!(filter.pagination.limit, 20);
        assert_eq!(filter.pagination.offset, 0);
    }

    #[test]
    fn test_normalize_rescales_score_bounds() {
        let query = RatingListQuery {
            min_score: Some(7.5),
            max_score: Some(10.0),
            ..Default::default()
        };
        let filter = normalize_list_options(&query).unwrap();
        assert_eq!(filter.min_total_score, Some(75.0));
        assert_eq!(filter.max_total_score, Some(100.0));
    }

    #[test]
    fn test_normalize_rejects_out_of_range_bounds() {
        for (min, max) in [
            (Some(0.5), None),
            (None, Some(10.5)),
            (Some(f64::NAN), None),
            (Some(8.0), Some(5.0)),
        ] {
            let query = RatingListQuery {
                min_score: min,
                max_score: max,
                ..Default::default()
            };
            assert!(matches!(
                normalize_list_options(&query),
                Err(RatingError::Validation(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_create_rating_computes_total_score() {
        let (service, store) = setup();

        let rating = service
            .create_rating(1, &request([8.0, 7.0, 9.0, 6.0, 8.0], Some("solid read")))
            .await
            .unwrap();

        assert_eq!(rating.article_id, 1);
        assert_eq!(rating.total_score, 76);
        assert_eq!(rating.comment.as_deref(), Some("solid read"));
        assert_eq!(rating.created_at, rating.updated_at);
        assert_eq!(store.inserts(), 1);
    }

    #[tokio::test]
    async fn test_create_rating_missing_article_checked_first() {
        let (service, store) = setup();

        let err = service
            .create_rating(MISSING_ARTICLE, &request([0.0, 11.0, 5.0, 5.0, 5.0], None))
            .await
            .unwrap_err();

        assert!(matches!(err, RatingError::NotFound(msg) if msg == ARTICLE_NOT_FOUND));
        assert_eq!(store.inserts(), 0);
    }

    #[tokio::test]
    async fn test_create_rating_twice_conflicts_regardless_of_fields() {
        let (service, _store) = setup();
        service
            .create_rating(2, &request([5.0; 5], None))
            .await
            .unwrap();

        let err = service
            .create_rating(2, &request([10.0; 5], None))
            .await
            .unwrap_err();
        assert!(matches!(err, RatingError::Conflict(_)));

        let err = service
            .create_rating(2, &request([42.0; 5], None))
            .await
            .unwrap_err();
        assert!(matches!(err, RatingError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_rating_unique_violation_from_store_is_conflict() {
        let (service, store) = setup();
        service
            .create_rating(3, &request([6.0; 5], None))
            .await
            .unwrap();

        store.hide_existing();
        let err = service
            .create_rating(3, &request([7.0; 5], None))
            .await
            .unwrap_err();

        assert!(matches!(err, RatingError::Conflict(msg) if msg == RATING_EXISTS));
    }

    #[tokio::test]
    async fn test_create_rating_rejects_invalid_dimensions() {
        let (service, store) = setup();

        for bad in [0.0, 11.0, -1.0, f64::NAN, 8.5] {
            let err = service
                .create_rating(4, &request([8.0, 7.0, bad, 6.0, 8.0], None))
                .await
                .unwrap_err();
            assert!(
                matches!(err, RatingError::Validation(_)),
                "{bad} should be rejected"
            );
        }
        assert_eq!(store.inserts(), 0);
    }

    #[tokio::test]
    async fn test_create_rating_accepts_inclusive_bounds() {
        let (service, _store) = setup();

        let low = service
            .create_rating(4, &request([1.0; 5], None))
            .await
            .unwrap();
        assert_eq!(low.total_score, 10);

        let high = service
            .create_rating(5, &request([10.0; 5], None))
            .await
            .unwrap();
        assert_eq!(high.total_score, 100);
    }

    #[tokio::test]
    async fn test_create_rating_comment_length_boundary() {
        let (service, _store) = setup();
        let at_limit = "x".repeat(1000);
        let over_limit = "x".repeat(1001);

        let err = service
            .create_rating(6, &request([5.0; 5], Some(&over_limit)))
            .await
            .unwrap_err();
        assert!(matches!(err, RatingError::Validation(_)));

        let rating = service
            .create_rating(6, &request([5.0; 5], Some(&at_limit)))
            .await
            .unwrap();
        assert_eq!(rating.comment.map(|c| c.chars().count()), Some(1000));
    }

    #[tokio::test]
    async fn test_get_rating_returns_none_when_absent() {
        let (service, _store) = setup();

        assert!(service.get_rating(1).await.unwrap().is_none());
        assert!(service.get_rating(MISSING_ARTICLE).await.unwrap().is_none());

        service
            .create_rating(1, &request([5.0; 5], None))
            .await
            .unwrap();
        assert_eq!(service.get_rating(1).await.unwrap().unwrap().total_score, 50);
    }

    #[tokio::test]
    async fn test_update_rating_recomputes_from_merged_scores() {
        let (service, _store) = setup();
        let created = service
            .create_rating(1, &request([8.0, 7.0, 9.0, 6.0, 8.0], Some("first pass")))
            .await
            .unwrap();

        let updated = service
            .update_rating(
                1,
                &UpdateRatingRequest {
                    practical_value: Some(10.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.practical_value, 10);
        assert_eq!(updated.technical_depth, 7);
        assert_eq!(updated.total_score, 80);
        assert_eq!(updated.comment.as_deref(), Some("first pass"));
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn test_update_rating_comment_only_keeps_consistent_total() {
        let (service, _store) = setup();
        service
            .create_rating(1, &request([8.0, 7.0, 9.0, 6.0, 8.0], None))
            .await
            .unwrap();

        let updated = service
            .update_rating(
                1,
                &UpdateRatingRequest {
                    comment: Some("revisited".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.total_score, 76);
        assert_eq!(updated.comment.as_deref(), Some("revisited"));
    }

    #[tokio::test]
    async fn test_update_rating_empty_payload_rejected() {
        let (service, _store) = setup();
        service
            .create_rating(1, &request([5.0; 5], None))
            .await
            .unwrap();

        let err = service
            .update_rating(1, &UpdateRatingRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RatingError::Validation(msg) if msg == "No fields to update"));
    }

    #[tokio::test]
    async fn test_update_rating_not_found_messages_differ() {
        let (service, _store) = setup();
        let change = UpdateRatingRequest {
            novelty: Some(3.0),
            ..Default::default()
        };

        let missing_article = service
            .update_rating(MISSING_ARTICLE, &change)
            .await
            .unwrap_err();
        let missing_rating = service.update_rating(1, &change).await.unwrap_err();

        assert!(matches!(&missing_article, RatingError::NotFound(msg) if msg == ARTICLE_NOT_FOUND));
        assert!(matches!(&missing_rating, RatingError::NotFound(msg) if msg == RATING_NOT_FOUND));
        assert_ne!(missing_article.to_string(), missing_rating.to_string());
    }

    #[tokio::test]
    async fn test_update_rating_rejects_invalid_fields() {
        let (service, _store) = setup();
        service
            .create_rating(1, &request([5.0; 5], None))
            .await
            .unwrap();

        for change in [
            UpdateRatingRequest {
                importance: Some(11.0),
                ..Default::default()
            },
            UpdateRatingRequest {
                understanding: Some(2.5),
                ..Default::default()
            },
            UpdateRatingRequest {
                comment: Some("y".repeat(1001)),
                ..Default::default()
            },
        ] {
            let err = service.update_rating(1, &change).await.unwrap_err();
            assert!(matches!(err, RatingError::Validation(_)));
        }

        assert_eq!(service.get_rating(1).await.unwrap().unwrap().total_score, 50);
    }

    #[tokio::test]
    async fn test_delete_rating_is_not_idempotent() {
        let (service, _store) = setup();
        service
            .create_rating(7, &request([5.0; 5], None))
            .await
            .unwrap();

        service.delete_rating(7).await.unwrap();
        assert!(service.get_rating(7).await.unwrap().is_none());

        let err = service.delete_rating(7).await.unwrap_err();
        assert!(matches!(err, RatingError::NotFound(msg) if msg == RATING_NOT_FOUND));

        let err = service.delete_rating(MISSING_ARTICLE).await.unwrap_err();
        assert!(matches!(err, RatingError::NotFound(msg) if msg == ARTICLE_NOT_FOUND));
    }

    #[tokio::test]
    async fn test_get_ratings_clamps_and_falls_back() {
        let (service, store) = setup();

        service
            .get_ratings(&RatingListQuery {
                limit: Some(500),
                offset: Some(-5),
                sort_by: Some("bogus".to_string()),
                order: Some("up".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let filter = store.last_filter().unwrap();
        assert_eq!(filter.pagination.limit, 100);
        assert_eq!(filter.pagination.offset, 0);
        assert_eq!(filter.sort_by, SortField::CreatedAt);
        assert_eq!(filter.order, SortOrder::Desc);
    }

    #[tokio::test]
    async fn test_get_ratings_min_above_max_rejected() {
        let (service, store) = setup();

        let err = service
            .get_ratings(&RatingListQuery {
                min_score: Some(8.0),
                max_score: Some(5.0),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, RatingError::Validation(_)));
        assert!(store.last_filter().is_none());
    }

    #[tokio::test]
    async fn test_get_ratings_filters_and_sorts() {
        let (service, _store) = setup();
        service
            .create_rating(1, &request([8.0, 7.0, 9.0, 6.0, 8.0], Some("")))
            .await
            .unwrap();
        service
            .create_rating(2, &request([10.0; 5], Some("must read")))
            .await
            .unwrap();
        service
            .create_rating(3, &request([3.0; 5], None))
            .await
            .unwrap();
        service
            .create_rating(4, &request([6.0; 5], Some("   ")))
            .await
            .unwrap();

        let by_score = service
            .get_ratings(&RatingListQuery {
                sort_by: Some("totalScore".to_string()),
                order: Some("asc".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        let totals: Vec<i32> = by_score.iter().map(|r| r.total_score).collect();
        assert_eq!(totals, vec![30, 60, 76, 100]);

        let newest_first = service.get_ratings(&RatingListQuery::default()).await.unwrap();
        let articles: Vec<i64> = newest_first.iter().map(|r| r.article_id).collect();
        assert_eq!(articles, vec![4, 3, 2, 1]);

        let at_least_seven = service
            .get_ratings(&RatingListQuery {
                min_score: Some(7.0),
                ..Default::default()
            })
            .await
            .unwrap();
        let articles: HashSet<i64> = at_least_seven.iter().map(|r| r.article_id).collect();
        assert_eq!(articles, HashSet::from([1, 2]));

        let without_comment = service
            .get_ratings(&RatingListQuery {
                has_comment: Some(false),
                ..Default::default()
            })
            .await
            .unwrap();
        let articles: HashSet<i64> = without_comment.iter().map(|r| r.article_id).collect();
        assert_eq!(articles, HashSet::from([1, 3, 4]));

        let with_comment = service
            .get_ratings(&RatingListQuery {
                has_comment: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(with_comment.len(), 1);
        assert_eq!(with_comment[0].article_id, 2);

        let second_page = service
            .get_ratings(&RatingListQuery {
                sort_by: Some("totalScore".to_string()),
                limit: Some(2),
                offset: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();
        let totals: Vec<i32> = second_page.iter().map(|r| r.total_score).collect();
        assert_eq!(totals, vec![60, 30]);
    }

    #[tokio::test]
    async fn test_rating_stats_empty_is_all_zero() {
        let (service, _store) = setup();

        let stats = service.get_rating_stats().await.unwrap();

        assert_eq!(stats, RatingStats::default());
        assert_eq!(stats.total_count, 0);
        assert_eq!(stats.average_score, 0.0);
        assert!(!stats.average_importance.is_nan());
    }

    #[tokio::test]
    async fn test_rating_stats_aggregates() {
        let (service, _store) = setup();
        service
            .create_rating(1, &request([8.0, 7.0, 9.0, 6.0, 8.0], Some("")))
            .await
            .unwrap();
        service
            .create_rating(2, &request([10.0; 5], Some("great")))
            .await
            .unwrap();

        let stats = service.get_rating_stats().await.unwrap();

        assert_eq!(stats.total_count, 2);
        assert_eq!(stats.average_score, 8.8);
        assert_eq!(stats.average_practical_value, 9.0);
        assert_eq!(stats.average_technical_depth, 8.5);
        assert_eq!(stats.average_understanding, 9.5);
        assert_eq!(stats.average_novelty, 8.0);
        assert_eq!(stats.average_importance, 9.0);
        assert_eq!(stats.ratings_with_comments, 1);
    }
}
