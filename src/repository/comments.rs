//! Comments repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::comment::{Comment, NewComment},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentsRepository: Send + Sync {
    async fn create(&self, comment: &NewComment) -> AppResult<Comment>;

    /// Comments on any of the given items, oldest first
    async fn list_by_items(&self, item_ids: &[i64]) -> AppResult<Vec<Comment>>;
}

#[derive(Clone)]
pub struct PgCommentsRepository {
    pool: Pool<Postgres>,
}

impl PgCommentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentsRepository for PgCommentsRepository {
    async fn create(&self, comment: &NewComment) -> AppResult<Comment> {
        let row = sqlx::query_as::<_, Comment>(
            r#"
            WITH inserted AS (
                INSERT INTO comments (text, item_id, author_id, created_at)
                VALUES ($1, $2, $3, $4)
                RETURNING id, text, item_id, author_id, created_at
            )
            SELECT c.id, c.text, c.item_id, c.author_id, u.name AS author_name, c.created_at
            FROM inserted c
            JOIN users u ON u.id = c.author_id
            "#,
        )
        .bind(&comment.text)
        .bind(comment.item_id)
        .bind(comment.author_id)
        .bind(comment.created)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_by_items(&self, item_ids: &[i64]) -> AppResult<Vec<Comment>> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, Comment>(
            r#"
            SELECT c.id, c.text, c.item_id, c.author_id, u.name AS author_name, c.created_at
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.item_id = ANY($1)
            ORDER BY c.created_at, c.id
            "#,
        )
        .bind(item_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
