//! Items, search and comments

use std::collections::HashMap;

use chrono::{NaiveDateTime, Utc};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{Booking, BookingShort},
        comment::{CommentDto, CreateComment, NewComment},
        item::{CreateItem, ItemDetails, ItemDto, NewItem, UpdateItem},
        required,
    },
    repository::Repository,
};

use super::users::ensure_user;

#[derive(Clone)]
pub struct ItemsService {
    repository: Repository,
}

impl ItemsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn create_item(&self, owner_id: i64, data: CreateItem) -> AppResult<ItemDto> {
        ensure_user(&self.repository, owner_id).await?;
        data.validate()?;

        // 0 means "not answering a request"
        let request_id = data.request_id.filter(|id| *id != 0);
        if let Some(request_id) = request_id {
            self.repository.requests.get_by_id(request_id).await?;
        }

        let item = self
            .repository
            .items
            .create(&NewItem {
                name: required(data.name, "Name")?,
                description: required(data.description, "Description")?,
                available: required(data.available, "Availability")?,
                owner_id,
                request_id,
            })
            .await?;

        tracing::info!(item_id = item.id, owner_id, "Item created");
        Ok(item.into())
    }

    /// Apply a partial update; only the owner may change an item
    pub async fn update_item(&self, user_id: i64, item_id: i64, data: UpdateItem) -> AppResult<ItemDto> {
        let item = self.repository.items.get_by_id(item_id).await?;
        if item.owner_id != user_id {
            return Err(AppError::NotFound(format!(
                "Item with ID {} not found for owner {}",
                item_id, user_id
            )));
        }

        let updated = self.repository.items.update(item_id, &data).await?;
        tracing::info!(item_id, "Item updated");
        Ok(updated.into())
    }

    /// Item with comments; booking window only when viewed by its owner
    pub async fn get_item(&self, user_id: i64, item_id: i64) -> AppResult<ItemDetails> {
        let item = self.repository.items.get_by_id(item_id).await?;
        let comments = self
            .repository
            .comments
            .list_by_items(&[item_id])
            .await?
            .into_iter()
            .map(CommentDto::from)
            .collect();

        let is_owner = item.owner_id == user_id;
        let mut details = ItemDetails::new(item, comments);

        if is_owner {
            let bookings = self.repository.bookings.approved_for_items(&[item_id]).await?;
            let (last, next) = last_and_next(&bookings, Utc::now().naive_utc());
            details.last_booking = last;
            details.next_booking = next;
        }
        Ok(details)
    }

    /// All items of one owner, each with its booking window and comments
    pub async fn list_owner_items(&self, owner_id: i64) -> AppResult<Vec<ItemDetails>> {
        let items = self.repository.items.list_by_owner(owner_id).await?;
        let ids: Vec<i64> = items.iter().map(|item| item.id).collect();

        let mut bookings: HashMap<i64, Vec<Booking>> = HashMap::new();
        for booking in self.repository.bookings.approved_for_items(&ids).await? {
            bookings.entry(booking.item.id).or_default().push(booking);
        }
        let mut comments: HashMap<i64, Vec<CommentDto>> = HashMap::new();
        for comment in self.repository.comments.list_by_items(&ids).await? {
            comments.entry(comment.item_id).or_default().push(comment.into());
        }

        let now = Utc::now().naive_utc();
        Ok(items
            .into_iter()
            .map(|item| {
                let item_id = item.id;
                let mut details = ItemDetails::new(item, comments.remove(&item_id).unwrap_or_default());
                if let Some(item_bookings) = bookings.get(&item_id) {
                    let (last, next) = last_and_next(item_bookings, now);
                    details.last_booking = last;
                    details.next_booking = next;
                }
                details
            })
            .collect())
    }

    /// Available items matching `text`; blank text finds nothing
    pub async fn search_items(&self, text: &str) -> AppResult<Vec<ItemDto>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }
        let items = self.repository.items.search(text).await?;
        Ok(items.into_iter().map(ItemDto::from).collect())
    }

    /// Comment on an item the user has finished renting
    pub async fn add_comment(&self, user_id: i64, item_id: i64, data: CreateComment) -> AppResult<CommentDto> {
        let now = Utc::now().naive_utc();

        if !self
            .repository
            .bookings
            .has_completed_booking(item_id, user_id, now)
            .await?
        {
            return Err(AppError::InvalidRequest(format!(
                "User {} has no completed booking of item {}",
                user_id, item_id
            )));
        }

        data.validate()?;
        let text = required(data.text, "Text")?;

        self.repository.items.get_by_id(item_id).await?;
        ensure_user(&self.repository, user_id).await?;

        let comment = self
            .repository
            .comments
            .create(&NewComment {
                text,
                item_id,
                author_id: user_id,
                created: now,
            })
            .await?;

        tracing::info!(comment_id = comment.id, item_id, user_id, "Comment added");
        Ok(comment.into())
    }
}

/// Latest approved booking that has started and earliest one still ahead.
///
/// `bookings` must be sorted by `start` ascending.
fn last_and_next(bookings: &[Booking], now: NaiveDateTime) -> (Option<BookingShort>, Option<BookingShort>) {
    let last = bookings.iter().filter(|b| b.start < now).last();
    let next = bookings.iter().find(|b| b.start > now);
    (last.map(BookingShort::from), next.map(BookingShort::from))
}
