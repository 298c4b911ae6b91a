use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::RatingStore;
use crate::dto::rating::RatingFilter;
use crate::error::Result;
use crate::models::{ArticleRating, NewRating, RatingAggregate, RatingChanges};

const RATING_COLUMNS: &str = "id, article_id, practical_value, technical_depth, understanding, \
     novelty, importance, total_score, comment, created_at, updated_at";

/// A comment counts only if it holds a non-whitespace character, same rule
/// as `ArticleRating::has_comment`.
const HAS_COMMENT: &str = r"comment IS NOT NULL AND comment ~ '\S'";
const NO_COMMENT: &str = r"(comment IS NULL OR comment !~ '\S')";

const STATS_SQL: &str = r"
    SELECT
        COUNT(*) AS total_count,
        AVG(total_score)::float8 AS avg_total_score,
        AVG(practical_value)::float8 AS avg_practical_value,
        AVG(technical_depth)::float8 AS avg_technical_depth,
        AVG(understanding)::float8 AS avg_understanding,
        AVG(novelty)::float8 AS avg_novelty,
        AVG(importance)::float8 AS avg_importance,
        COUNT(*) FILTER (WHERE comment IS NOT NULL AND comment ~ '\S') AS ratings_with_comments
    FROM article_ratings
";

fn build_list_query(filter: &RatingFilter) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::<Postgres>::new("SELECT ");
    query.push(RATING_COLUMNS);
    query.push(" FROM article_ratings WHERE 1=1");

    if let Some(min) = filter.min_total_score {
        query.push(" AND total_score >= ");
        query.push_bind(min);
    }

    if let Some(max) = filter.max_total_score {
        query.push(" AND total_score <= ");
        query.push_bind(max);
    }

    match filter.has_comment {
        Some(true) => {
            query.push(" AND ");
            query.push(HAS_COMMENT);
        }
        Some(false) => {
            query.push(" AND ");
            query.push(NO_COMMENT);
        }
        None => {}
    }

    // id keeps pages stable when sort keys tie
    let direction = filter.order.as_sql();
    query.push(" ORDER BY ");
    query.push(filter.sort_by.as_column());
    query.push(" ");
    query.push(direction);
    query.push(", id ");
    query.push(direction);

    query.push(" LIMIT ");
    query.push_bind(filter.pagination.limit);
    query.push(" OFFSET ");
    query.push_bind(filter.pagination.offset);

    query
}

pub struct RatingRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RatingRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl<'a> RatingStore for RatingRepository<'a> {
    async fn create(&self, rating: &NewRating) -> Result<ArticleRating> {
        let sql = format!(
            r#"
            INSERT INTO article_ratings (article_id, practical_value, technical_depth,
                                         understanding, novelty, importance, total_score, comment)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {RATING_COLUMNS}
            "#
        );

        let created = sqlx::query_as::<_, ArticleRating>(&sql)
            .bind(rating.article_id)
            .bind(rating.scores.practical_value)
            .bind(rating.scores.technical_depth)
            .bind(rating.scores.understanding)
            .bind(rating.scores.novelty)
            .bind(rating.scores.importance)
            .bind(rating.total_score)
            .bind(&rating.comment)
            .fetch_one(self.pool)
            .await?;

        Ok(created)
    }

    async fn find_by_article_id(&self, article_id: i64) -> Result<Option<ArticleRating>> {
        let sql = format!("SELECT {RATING_COLUMNS} FROM article_ratings WHERE article_id = $1");

        let rating = sqlx::query_as::<_, ArticleRating>(&sql)
            .bind(article_id)
            .fetch_optional(self.pool)
            .await?;

        Ok(rating)
    }

    async fn update(&self, article_id: i64, changes: &RatingChanges) -> Result<Option<ArticleRating>> {
        let sql = format!(
            r#"
            UPDATE article_ratings
            SET practical_value = $2,
                technical_depth = $3,
                understanding = $4,
                novelty = $5,
                importance = $6,
                total_score = $7,
                comment = $8,
                updated_at = NOW()
            WHERE article_id = $1
            RETURNING {RATING_COLUMNS}
            "#
        );

        let updated = sqlx::query_as::<_, ArticleRating>(&sql)
            .bind(article_id)
            .bind(changes.scores.practical_value)
            .bind(changes.scores.technical_depth)
            .bind(changes.scores.understanding)
            .bind(changes.scores.novelty)
            .bind(changes.scores.importance)
            .bind(changes.total_score)
            .bind(&changes.comment)
            .fetch_optional(self.pool)
            .await?;

        Ok(updated)
    }

    async fn delete(&self, article_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM article_ratings WHERE article_id = $1")
            .bind(article_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_many(&self, filter: &RatingFilter) -> Result<Vec<ArticleRating>> {
        let mut query = build_list_query(filter);

        let ratings = query
            .build_query_as::<ArticleRating>()
            .fetch_all(self.pool)
            .await?;

        Ok(ratings)
    }

    async fn stats(&self) -> Result<RatingAggregate> {
        let aggregate = sqlx::query_as::<_, RatingAggregate>(STATS_SQL)
            .fetch_one(self.pool)
            .await?;

        Ok(aggregate)
    }
}
