mod bookmark;
mod rating;

pub use bookmark::Bookmark;
pub use rating::{ArticleRating, DimensionScores, NewRating, RatingAggregate, RatingChanges};
