use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use storage::Database;

use crate::features::ratings;

pub fn router() -> Router<Database> {
    Router::new()
        .route("/health", get(health))
        .nest("/api/ratings", ratings::routes::routes())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
