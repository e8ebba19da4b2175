//! Item requests repository

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::request::ItemRequest,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestsRepository: Send + Sync {
    async fn create(&self, requestor_id: i64, description: &str, created: NaiveDateTime) -> AppResult<ItemRequest>;

    /// Get request by ID, `NotFound` if missing
    async fn get_by_id(&self, id: i64) -> AppResult<ItemRequest>;

    /// Requests made by the user, newest first
    async fn list_by_requestor(&self, requestor_id: i64) -> AppResult<Vec<ItemRequest>>;

    /// Requests made by everyone else, newest first
    async fn list_by_others(&self, user_id: i64, limit: i64, offset: i64) -> AppResult<Vec<ItemRequest>>;
}

#[derive(Clone)]
pub struct PgRequestsRepository {
    pool: Pool<Postgres>,
}

impl PgRequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RequestsRepository for PgRequestsRepository {
    async fn create(&self, requestor_id: i64, description: &str, created: NaiveDateTime) -> AppResult<ItemRequest> {
        let row = sqlx::query_as::<_, ItemRequest>(
            r#"
            INSERT INTO requests (description, requestor_id, created)
            VALUES ($1, $2, $3)
            RETURNING id, description, requestor_id, created
            "#,
        )
        .bind(description)
        .bind(requestor_id)
        .bind(created)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_by_id(&self, id: i64) -> AppResult<ItemRequest> {
        sqlx::query_as::<_, ItemRequest>(
            "SELECT id, description, requestor_id, created FROM requests WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Item request with ID {} not found.", id)))
    }

    async fn list_by_requestor(&self, requestor_id: i64) -> AppResult<Vec<ItemRequest>> {
        let rows = sqlx::query_as::<_, ItemRequest>(
            r#"
            SELECT id, description, requestor_id, created FROM requests
            WHERE requestor_id = $1
            ORDER BY created DESC, id DESC
            "#,
        )
        .bind(requestor_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_by_others(&self, user_id: i64, limit: i64, offset: i64) -> AppResult<Vec<ItemRequest>> {
        let rows = sqlx::query_as::<_, ItemRequest>(
            r#"
            SELECT id, description, requestor_id, created FROM requests
            WHERE requestor_id != $1
            ORDER BY created DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
