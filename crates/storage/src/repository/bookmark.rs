use async_trait::async_trait;
use sqlx::PgPool;

use super::BookmarkLookup;
use crate::error::Result;
use crate::models::Bookmark;

pub struct BookmarkRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BookmarkRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl<'a> BookmarkLookup for BookmarkRepository<'a> {
    async fn find_by_id(&self, id: i64) -> Result<Option<Bookmark>> {
        let bookmark = sqlx::query_as::<_, Bookmark>(
            r#"
            SELECT id, url, title, description, created_at
            FROM bookmarks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(bookmark)
    }
}
