//! In-memory store for development and tests
//!
//! Implements every repository trait over one shared state so that joins
//! (booking -> item -> owner) behave like the SQL ones.

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use parking_lot::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{Booking, BookingQuery, BookingRole, BookingStatus, NewBooking},
        comment::{Comment, NewComment},
        item::{Item, NewItem, UpdateItem},
        request::ItemRequest,
        user::{UpdateUser, User},
    },
};

use super::{BookingsRepository, CommentsRepository, ItemsRepository, RequestsRepository, UsersRepository};

#[derive(Debug, Clone)]
struct BookingRecord {
    id: i64,
    start: NaiveDateTime,
    end: NaiveDateTime,
    status: BookingStatus,
    item_id: i64,
    booker_id: i64,
}

#[derive(Debug, Clone)]
struct CommentRecord {
    id: i64,
    text: String,
    item_id: i64,
    author_id: i64,
    created: NaiveDateTime,
}

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<i64, User>,
    items: BTreeMap<i64, Item>,
    bookings: BTreeMap<i64, BookingRecord>,
    comments: BTreeMap<i64, CommentRecord>,
    requests: BTreeMap<i64, ItemRequest>,
    last_id: i64,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn email_taken(&self, email: &str, exclude_id: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| Some(u.id) != exclude_id && u.email.eq_ignore_ascii_case(email))
    }

    fn user(&self, id: i64) -> AppResult<&User> {
        self.users
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    fn item(&self, id: i64) -> AppResult<&Item> {
        self.items
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("Item not found with ID: {}", id)))
    }

    /// Joins a booking row with its item and booker
    fn booking(&self, record: &BookingRecord) -> Option<Booking> {
        let item = self.items.get(&record.item_id)?;
        let booker = self.users.get(&record.booker_id)?;
        Some(Booking {
            id: record.id,
            start: record.start,
            end: record.end,
            status: record.status,
            item: item.clone(),
            booker: booker.clone(),
        })
    }

    fn bookings_where(&self, predicate: impl Fn(&Booking) -> bool) -> Vec<Booking> {
        self.bookings
            .values()
            .filter_map(|record| self.booking(record))
            .filter(|booking| predicate(booking))
            .collect()
    }

    fn comment(&self, record: &CommentRecord) -> Option<Comment> {
        let author = self.users.get(&record.author_id)?;
        Some(Comment {
            id: record.id,
            text: record.text.clone(),
            item_id: record.item_id,
            author_id: record.author_id,
            author_name: author.name.clone(),
            created: record.created,
        })
    }

    /// Removes a user together with everything that references it
    fn remove_user(&mut self, id: i64) -> bool {
        if self.users.remove(&id).is_none() {
            return false;
        }
        let owned: Vec<i64> = self
            .items
            .values()
            .filter(|item| item.owner_id == id)
            .map(|item| item.id)
            .collect();
        self.items.retain(|_, item| item.owner_id != id);
        self.bookings
            .retain(|_, b| b.booker_id != id && !owned.contains(&b.item_id));
        self.comments
            .retain(|_, c| c.author_id != id && !owned.contains(&c.item_id));

        let dropped_requests: Vec<i64> = self
            .requests
            .values()
            .filter(|r| r.requestor_id == id)
            .map(|r| r.id)
            .collect();
        self.requests.retain(|_, r| r.requestor_id != id);
        for item in self.items.values_mut() {
            if item.request_id.is_some_and(|r| dropped_requests.contains(&r)) {
                item.request_id = None;
            }
        }
        true
    }
}

/// Shared in-memory state behind all five repository traits
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UsersRepository for MemoryStore {
    async fn create(&self, name: &str, email: &str) -> AppResult<User> {
        let mut state = self.state.write();
        if state.email_taken(email, None) {
            return Err(AppError::Conflict("Email is already in use".to_string()));
        }
        let user = User {
            id: state.next_id(),
            name: name.to_string(),
            email: email.to_string(),
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: i64) -> AppResult<User> {
        self.state.read().user(id).cloned()
    }

    async fn exists(&self, id: i64) -> AppResult<bool> {
        Ok(self.state.read().users.contains_key(&id))
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.state.read().users.values().cloned().collect())
    }

    async fn update(&self, id: i64, data: &UpdateUser) -> AppResult<User> {
        let mut state = self.state.write();
        state.user(id)?;
        if let Some(email) = &data.email {
            if state.email_taken(email, Some(id)) {
                return Err(AppError::Conflict("Email is already in use".to_string()));
            }
        }
        let user = state
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))?;
        if let Some(name) = &data.name {
            user.name = name.clone();
        }
        if let Some(email) = &data.email {
            user.email = email.clone();
        }
        Ok(user.clone())
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        if !self.state.write().remove_user(id) {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }
        Ok(())
    }

    async fn email_exists(&self, email: &str, exclude_id: Option<i64>) -> AppResult<bool> {
        Ok(self.state.read().email_taken(email, exclude_id))
    }
}

#[async_trait]
impl ItemsRepository for MemoryStore {
    async fn create(&self, item: &NewItem) -> AppResult<Item> {
        let mut state = self.state.write();
        state.user(item.owner_id)?;
        let created = Item {
            id: state.next_id(),
            name: item.name.clone(),
            description: item.description.clone(),
            available: item.available,
            owner_id: item.owner_id,
            request_id: item.request_id.filter(|r| state.requests.contains_key(r)),
        };
        state.items.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Item> {
        self.state.read().item(id).cloned()
    }

    async fn update(&self, id: i64, data: &UpdateItem) -> AppResult<Item> {
        let mut state = self.state.write();
        let item = state
            .items
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Item not found with ID: {}", id)))?;
        if let Some(name) = &data.name {
            item.name = name.clone();
        }
        if let Some(description) = &data.description {
            item.description = description.clone();
        }
        if let Some(available) = data.available {
            item.available = available;
        }
        Ok(item.clone())
    }

    async fn list_by_owner(&self, owner_id: i64) -> AppResult<Vec<Item>> {
        Ok(self
            .state
            .read()
            .items
            .values()
            .filter(|item| item.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn search(&self, text: &str) -> AppResult<Vec<Item>> {
        let needle = text.to_lowercase();
        Ok(self
            .state
            .read()
            .items
            .values()
            .filter(|item| {
                item.available
                    && (item.name.to_lowercase().contains(&needle)
                        || item.description.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect())
    }

    async fn list_by_requests(&self, request_ids: &[i64]) -> AppResult<Vec<Item>> {
        Ok(self
            .state
            .read()
            .items
            .values()
            .filter(|item| item.request_id.is_some_and(|r| request_ids.contains(&r)))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BookingsRepository for MemoryStore {
    async fn create(&self, booking: &NewBooking) -> AppResult<Booking> {
        let mut state = self.state.write();
        state.item(booking.item_id)?;
        state.user(booking.booker_id)?;
        let record = BookingRecord {
            id: state.next_id(),
            start: booking.start,
            end: booking.end,
            status: BookingStatus::Waiting,
            item_id: booking.item_id,
            booker_id: booking.booker_id,
        };
        state.bookings.insert(record.id, record.clone());
        state
            .booking(&record)
            .ok_or_else(|| AppError::Internal(format!("Booking {} vanished after insert", record.id)))
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Booking> {
        let state = self.state.read();
        state
            .bookings
            .get(&id)
            .and_then(|record| state.booking(record))
            .ok_or_else(|| AppError::NotFound(format!("Booking not found with ID: {}", id)))
    }

    async fn exists_for_user(&self, user_id: i64) -> AppResult<bool> {
        let state = self.state.read();
        Ok(state
            .bookings
            .values()
            .filter_map(|record| state.booking(record))
            .any(|booking| booking.involves(user_id)))
    }

    async fn list_for_user(&self, user_id: i64) -> AppResult<Vec<Booking>> {
        let mut bookings = self.state.read().bookings_where(|b| b.involves(user_id));
        BookingQuery::All.sort(&mut bookings);
        Ok(bookings)
    }

    async fn find(&self, role: BookingRole, user_id: i64, query: BookingQuery) -> AppResult<Vec<Booking>> {
        let mut bookings = self
            .state
            .read()
            .bookings_where(|b| b.matches_role(role, user_id) && query.matches(b));
        query.sort(&mut bookings);
        Ok(bookings)
    }

    async fn set_status_if_waiting(&self, id: i64, status: BookingStatus) -> AppResult<Option<Booking>> {
        let mut state = self.state.write();
        let record = match state.bookings.get_mut(&id) {
            Some(record) if record.status == BookingStatus::Waiting => {
                record.status = status;
                record.clone()
            }
            _ => return Ok(None),
        };
        Ok(state.booking(&record))
    }

    async fn has_completed_booking(&self, item_id: i64, booker_id: i64, now: NaiveDateTime) -> AppResult<bool> {
        Ok(self.state.read().bookings.values().any(|b| {
            b.item_id == item_id
                && b.booker_id == booker_id
                && b.status == BookingStatus::Approved
                && b.end < now
        }))
    }

    async fn approved_for_items(&self, item_ids: &[i64]) -> AppResult<Vec<Booking>> {
        let mut bookings = self.state.read().bookings_where(|b| {
            b.status == BookingStatus::Approved && item_ids.contains(&b.item.id)
        });
        bookings.sort_by(|a, b| a.start.cmp(&b.start));
        Ok(bookings)
    }
}

#[async_trait]
impl CommentsRepository for MemoryStore {
    async fn create(&self, comment: &NewComment) -> AppResult<Comment> {
        let mut state = self.state.write();
        state.item(comment.item_id)?;
        state.user(comment.author_id)?;
        let record = CommentRecord {
            id: state.next_id(),
            text: comment.text.clone(),
            item_id: comment.item_id,
            author_id: comment.author_id,
            created: comment.created,
        };
        state.comments.insert(record.id, record.clone());
        state
            .comment(&record)
            .ok_or_else(|| AppError::Internal(format!("Comment {} vanished after insert", record.id)))
    }

    async fn list_by_items(&self, item_ids: &[i64]) -> AppResult<Vec<Comment>> {
        let state = self.state.read();
        let mut comments: Vec<Comment> = state
            .comments
            .values()
            .filter(|c| item_ids.contains(&c.item_id))
            .filter_map(|c| state.comment(c))
            .collect();
        comments.sort_by(|a, b| a.created.cmp(&b.created).then(a.id.cmp(&b.id)));
        Ok(comments)
    }
}

#[async_trait]
impl RequestsRepository for MemoryStore {
    async fn create(&self, requestor_id: i64, description: &str, created: NaiveDateTime) -> AppResult<ItemRequest> {
        let mut state = self.state.write();
        state.user(requestor_id)?;
        let request = ItemRequest {
            id: state.next_id(),
            description: description.to_string(),
            requestor_id,
            created,
        };
        state.requests.insert(request.id, request.clone());
        Ok(request)
    }

    async fn get_by_id(&self, id: i64) -> AppResult<ItemRequest> {
        self.state
            .read()
            .requests
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Item request with ID {} not found.", id)))
    }

    async fn list_by_requestor(&self, requestor_id: i64) -> AppResult<Vec<ItemRequest>> {
        let mut requests: Vec<ItemRequest> = self
            .state
            .read()
            .requests
            .values()
            .filter(|r| r.requestor_id == requestor_id)
            .cloned()
            .collect();
        requests.sort_by(|a, b| b.created.cmp(&a.created).then(b.id.cmp(&a.id)));
        Ok(requests)
    }

    async fn list_by_others(&self, user_id: i64, limit: i64, offset: i64) -> AppResult<Vec<ItemRequest>> {
        let mut requests: Vec<ItemRequest> = self
            .state
            .read()
            .requests
            .values()
            .filter(|r| r.requestor_id != user_id)
            .cloned()
            .collect();
        requests.sort_by(|a, b| b.created.cmp(&a.created).then(b.id.cmp(&a.id)));
        Ok(requests
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .collect())
    }
}
