use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Multi-dimensional rating of a single article
///
/// Each dimension is scored 1 to 10. `total_score` is derived from the five
/// dimensions and stored on a 10 to 100 scale: `round(sum / 5 * 10)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRating {
    pub id: i64,
    pub article_id: i64,
    pub practical_value: i32,
    pub technical_depth: i32,
    pub understanding: i32,
    pub novelty: i32,
    pub importance: i32,
    pub total_score: i32,
    pub comment: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl ArticleRating {
    pub fn has_comment(&self) -> bool {
        self.comment
            .as_deref()
            .is_some_and(|comment| !comment.trim().is_empty())
    }
}

/// Raw aggregate row over every stored rating.
///
/// Averages are `None` when the table is empty. `avg_total_score` is still on
/// the stored 10 to 100 scale.
#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct RatingAggregate {
    pub total_count: i64,
    pub avg_total_score: Option<f64>,
    pub avg_practical_value: Option<f64>,
    pub avg_technical_depth: Option<f64>,
    pub avg_understanding: Option<f64>,
    pub avg_novelty: Option<f64>,
    pub avg_importance: Option<f64>,
    pub ratings_with_comments: i64,
}

/// The five caller-supplied dimension scores of a rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionScores {
    pub practical_value: i32,
    pub technical_depth: i32,
    pub understanding: i32,
    pub novelty: i32,
    pub importance: i32,
}

impl DimensionScores {
    pub fn sum(&self) -> i32 {
        self.practical_value + self.technical_depth + self.understanding + self.novelty + self.importance
    }
}

impl From<&ArticleRating> for DimensionScores {
    fn from(rating: &ArticleRating) -> Self {
        Self {
            practical_value: rating.practical_value,
            technical_depth: rating.technical_depth,
            understanding: rating.understanding,
            novelty: rating.novelty,
            importance: rating.importance,
        }
    }
}

/// Row handed to the store on insert. Already validated and scored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRating {
    pub article_id: i64,
    pub scores: DimensionScores,
    pub total_score: i32,
    pub comment: Option<String>,
}

/// Fully merged values written back on update.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingChanges {
    pub scores: DimensionScores,
    pub total_score: i32,
    pub comment: Option<String>,
}
