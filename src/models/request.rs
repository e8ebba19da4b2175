//! Item request model (a user asking the community for an item)

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{item::ItemAnswer, not_blank};

/// Item request record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ItemRequest {
    pub id: i64,
    pub description: String,
    pub requestor_id: i64,
    pub created: NaiveDateTime,
}

/// Item request with the items offered in answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequestDto {
    pub id: i64,
    pub description: String,
    pub requestor: i64,
    pub created: NaiveDateTime,
    pub items: Vec<ItemAnswer>,
}

impl ItemRequestDto {
    pub fn new(request: ItemRequest, items: Vec<ItemAnswer>) -> Self {
        Self {
            id: request.id,
            description: request.description,
            requestor: request.requestor_id,
            created: request.created,
            items,
        }
    }
}

/// Create item request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateItemRequest {
    #[validate(required(message = "Description is required"), custom(function = "not_blank"))]
    pub description: Option<String>,
}

/// Pagination for the "other users' requests" listing
#[derive(Debug, Clone, Serialize, Deserialize, IntoParams)]
pub struct RequestPageQuery {
    /// Index of the first element
    #[serde(default)]
    pub from: i64,
    /// Page size
    #[serde(default = "default_page_size")]
    pub size: i64,
}

fn default_page_size() -> i64 {
    10
}

impl Default for RequestPageQuery {
    fn default() -> Self {
        Self {
            from: 0,
            size: default_page_size(),
        }
    }
}
