use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Bookmark, BookmarkChanges, NewBookmark};
use crate::db::DbError;

const BOOKMARK_COLUMNS: &str =
    "id, user_id, title, link, description, created_at, updated_at";

/// Every query is scoped by owner; another user's bookmark is indistinguishable from a missing one.
#[async_trait]
pub trait BookmarkRepo: Send + Sync {
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Bookmark>, DbError>;
    async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Option<Bookmark>, DbError>;
    async fn create(&self, user_id: Uuid, new: &NewBookmark) -> Result<Bookmark, DbError>;
    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        changes: &BookmarkChanges,
    ) -> Result<Option<Bookmark>, DbError>;
    /// Returns whether a row was removed.
    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, DbError>;
}

#[derive(Clone)]
pub struct PgBookmarkRepo {
    db: PgPool,
}

impl PgBookmarkRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookmarkRepo for PgBookmarkRepo {
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Bookmark>, DbError> {
        let rows = sqlx::query_as::<_, Bookmark>(&format!(
            r#"
            SELECT {BOOKMARK_COLUMNS}
              FROM bookmarks
             WHERE user_id = $1
             ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Option<Bookmark>, DbError> {
        let row = sqlx::query_as::<_, Bookmark>(&format!(
            "SELECT {BOOKMARK_COLUMNS} FROM bookmarks WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn create(&self, user_id: Uuid, new: &NewBookmark) -> Result<Bookmark, DbError> {
        let row = sqlx::query_as::<_, Bookmark>(&format!(
            r#"
            INSERT INTO bookmarks (id, user_id, title, link, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {BOOKMARK_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&new.title)
        .bind(&new.link)
        .bind(new.description.as_deref())
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        changes: &BookmarkChanges,
    ) -> Result<Option<Bookmark>, DbError> {
        let row = sqlx::query_as::<_, Bookmark>(&format!(
            r#"
            UPDATE bookmarks
               SET title       = COALESCE($3, title),
                   link        = COALESCE($4, link),
                   description = COALESCE($5, description),
                   updated_at  = now()
             WHERE id = $1 AND user_id = $2
            RETURNING {BOOKMARK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(changes.title.as_deref())
        .bind(changes.link.as_deref())
        .bind(changes.description.as_deref())
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, DbError> {
        let res = sqlx::query("DELETE FROM bookmarks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
