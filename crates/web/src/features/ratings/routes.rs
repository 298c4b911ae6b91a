use axum::{Router, routing::get};
use storage::Database;

use super::handlers::{
    create_rating, delete_rating, get_rating, list_ratings, rating_stats, update_rating,
};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/", get(list_ratings))
        .route("/stats", get(rating_stats))
        .route(
            "/:article_id",
            get(get_rating)
                .post(create_rating)
                .put(update_rating)
                .delete(delete_rating),
        )
}
