//! Item model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{booking::BookingShort, comment::CommentDto, not_blank};

/// Item record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[sqlx(rename = "is_available")]
    pub available: bool,
    pub owner_id: i64,
    pub request_id: Option<i64>,
}

/// Item as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemDto {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub request_id: Option<i64>,
}

impl From<Item> for ItemDto {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            available: item.available,
            request_id: item.request_id,
        }
    }
}

/// Item with booking window and comments
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetails {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub request_id: Option<i64>,
    /// Latest approved booking that has started (owner only)
    pub last_booking: Option<BookingShort>,
    /// Earliest approved booking that has not started yet (owner only)
    pub next_booking: Option<BookingShort>,
    pub comments: Vec<CommentDto>,
}

impl ItemDetails {
    pub fn new(item: Item, comments: Vec<CommentDto>) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            available: item.available,
            request_id: item.request_id,
            last_booking: None,
            next_booking: None,
            comments,
        }
    }
}

/// Item created in answer to an item request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemAnswer {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
}

impl From<Item> for ItemAnswer {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            owner_id: item.owner_id,
        }
    }
}

/// Create item request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateItem {
    #[validate(required(message = "Name is required"), custom(function = "not_blank"))]
    pub name: Option<String>,
    #[validate(required(message = "Description is required"), custom(function = "not_blank"))]
    pub description: Option<String>,
    #[validate(required(message = "Availability is required"))]
    pub available: Option<bool>,
    /// Item request this item answers; `0` is treated as absent
    pub request_id: Option<i64>,
}

/// Values written when inserting an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: i64,
    pub request_id: Option<i64>,
}

/// Partial item update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItem {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
}

/// Search query
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ItemSearchQuery {
    /// Text matched against name and description, case-insensitively
    pub text: Option<String>,
}
