//! Items repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::item::{Item, NewItem, UpdateItem},
};

use super::contains_pattern;

const ITEM_COLUMNS: &str = "id, name, description, is_available, owner_id, request_id";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemsRepository: Send + Sync {
    async fn create(&self, item: &NewItem) -> AppResult<Item>;

    /// Get item by ID, `NotFound` if missing
    async fn get_by_id(&self, id: i64) -> AppResult<Item>;

    /// Apply the present fields of `data`
    async fn update(&self, id: i64, data: &UpdateItem) -> AppResult<Item>;

    /// Items of one owner ordered by ID
    async fn list_by_owner(&self, owner_id: i64) -> AppResult<Vec<Item>>;

    /// Available items whose name or description contains `text`, ignoring case
    async fn search(&self, text: &str) -> AppResult<Vec<Item>>;

    /// Items answering any of the given item requests
    async fn list_by_requests(&self, request_ids: &[i64]) -> AppResult<Vec<Item>>;
}

#[derive(Clone)]
pub struct PgItemsRepository {
    pool: Pool<Postgres>,
}

impl PgItemsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemsRepository for PgItemsRepository {
    async fn create(&self, item: &NewItem) -> AppResult<Item> {
        let query = format!(
            r#"
            INSERT INTO items (name, description, is_available, owner_id, request_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            ITEM_COLUMNS
        );
        let row = sqlx::query_as::<_, Item>(&query)
            .bind(&item.name)
            .bind(&item.description)
            .bind(item.available)
            .bind(item.owner_id)
            .bind(item.request_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Item> {
        let query = format!("SELECT {} FROM items WHERE id = $1", ITEM_COLUMNS);
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item not found with ID: {}", id)))
    }

    async fn update(&self, id: i64, data: &UpdateItem) -> AppResult<Item> {
        let query = format!(
            r#"
            UPDATE items
            SET name = COALESCE($1, name),
                description = COALESCE($2, description),
                is_available = COALESCE($3, is_available)
            WHERE id = $4
            RETURNING {}
            "#,
            ITEM_COLUMNS
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(&data.name)
            .bind(&data.description)
            .bind(data.available)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item not found with ID: {}", id)))
    }

    async fn list_by_owner(&self, owner_id: i64) -> AppResult<Vec<Item>> {
        let query = format!("SELECT {} FROM items WHERE owner_id = $1 ORDER BY id", ITEM_COLUMNS);
        let items = sqlx::query_as::<_, Item>(&query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn search(&self, text: &str) -> AppResult<Vec<Item>> {
        let query = format!(
            r#"
            SELECT {} FROM items
            WHERE is_available
              AND (name ILIKE $1 OR description ILIKE $1)
            ORDER BY id
            "#,
            ITEM_COLUMNS
        );
        let items = sqlx::query_as::<_, Item>(&query)
            .bind(contains_pattern(text))
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn list_by_requests(&self, request_ids: &[i64]) -> AppResult<Vec<Item>> {
        if request_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {} FROM items WHERE request_id = ANY($1) ORDER BY id",
            ITEM_COLUMNS
        );
        let items = sqlx::query_as::<_, Item>(&query)
            .bind(request_ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }
}
