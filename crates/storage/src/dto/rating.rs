use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::common::Pagination;

/// Request payload for rating an article
///
/// Dimension scores are accepted as plain JSON numbers so that fractional or
/// non-finite values are reported as validation failures.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRatingRequest {
    #[validate(range(min = 1.0, max = 10.0, message = "practicalValue must be between 1 and 10"))]
    pub practical_value: f64,

    #[validate(range(min = 1.0, max = 10.0, message = "technicalDepth must be between 1 and 10"))]
    pub technical_depth: f64,

    #[validate(range(min = 1.0, max = 10.0, message = "understanding must be between 1 and 10"))]
    pub understanding: f64,

    #[validate(range(min = 1.0, max = 10.0, message = "novelty must be between 1 and 10"))]
    pub novelty: f64,

    #[validate(range(min = 1.0, max = 10.0, message = "importance must be between 1 and 10"))]
    pub importance: f64,

    #[validate(length(max = 1000, message = "comment must be at most 1000 characters"))]
    pub comment: Option<String>,
}

/// Request payload for a partial rating update
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRatingRequest {
    #[validate(range(min = 1.0, max = 10.0, message = "practicalValue must be between 1 and 10"))]
    pub practical_value: Option<f64>,

    #[validate(range(min = 1.0, max = 10.0, message = "technicalDepth must be between 1 and 10"))]
    pub technical_depth: Option<f64>,

    #[validate(range(min = 1.0, max = 10.0, message = "understanding must be between 1 and 10"))]
    pub understanding: Option<f64>,

    #[validate(range(min = 1.0, max = 10.0, message = "novelty must be between 1 and 10"))]
    pub novelty: Option<f64>,

    #[validate(range(min = 1.0, max = 10.0, message = "importance must be between 1 and 10"))]
    pub importance: Option<f64>,

    #[validate(length(max = 1000, message = "comment must be at most 1000 characters"))]
    pub comment: Option<String>,
}

impl UpdateRatingRequest {
    pub fn is_empty(&self) -> bool {
        self.practical_value.is_none()
            && self.technical_depth.is_none()
            && self.understanding.is_none()
            && self.novelty.is_none()
            && self.importance.is_none()
            && self.comment.is_none()
    }
}

/// Raw listing options as received from the caller. Nothing here is trusted;
/// the rating service normalizes it into a [`RatingFilter`].
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RatingListQuery {
    /// One of totalScore, createdAt, practicalValue, technicalDepth,
    /// understanding, novelty, importance
    pub sort_by: Option<String>,
    /// asc or desc
    pub order: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// Lower bound on the 1 to 10 scale
    pub min_score: Option<f64>,
    /// Upper bound on the 1 to 10 scale
    pub max_score: Option<f64>,
    pub has_comment: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    TotalScore,
    #[default]
    CreatedAt,
    PracticalValue,
    TechnicalDepth,
    Understanding,
    Novelty,
    Importance,
}

impl SortField {
    /// Unknown keys fall back to `createdAt`.
    pub fn parse(key: &str) -> Self {
        match key {
            "totalScore" => Self::TotalScore,
            "createdAt" => Self::CreatedAt,
            "practicalValue" => Self::PracticalValue,
            "technicalDepth" => Self::TechnicalDepth,
            "understanding" => Self::Understanding,
            "novelty" => Self::Novelty,
            "importance" => Self::Importance,
            _ => Self::default(),
        }
    }

    pub fn as_column(&self) -> &'static str {
        match self {
            Self::TotalScore => "total_score",
            Self::CreatedAt => "created_at",
            Self::PracticalValue => "practical_value",
            Self::TechnicalDepth => "technical_depth",
            Self::Understanding => "understanding",
            Self::Novelty => "novelty",
            Self::Importance => "importance",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(key: &str) -> Self {
        match key {
            "asc" => Self::Asc,
            "desc" => Self::Desc,
            _ => Self::default(),
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Normalized listing options handed to the store
///
/// Score bounds are on the stored 10 to 100 `total_score` scale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingFilter {
    pub sort_by: SortField,
    pub order: SortOrder,
    pub pagination: Pagination,
    pub min_total_score: Option<f64>,
    pub max_total_score: Option<f64>,
    pub has_comment: Option<bool>,
}

/// Aggregate statistics over every rating
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingStats {
    pub total_count: i64,
    /// Mean total score on the 1 to 10 scale
    pub average_score: f64,
    pub average_practical_value: f64,
    pub average_technical_depth: f64,
    pub average_understanding: f64,
    pub average_novelty: f64,
    pub average_importance: f64,
    pub ratings_with_comments: i64,
}
