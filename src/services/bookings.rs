//! Booking lifecycle and state-based listing

use chrono::{NaiveDateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::booking::{BookingDto, BookingRole, BookingState, BookingStatus, NewBooking},
    repository::Repository,
};

use super::users::ensure_user;

#[derive(Clone)]
pub struct BookingsService {
    repository: Repository,
}

impl BookingsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a WAITING booking of `item_id` for `booker_id`.
    ///
    /// The time range is checked before anything is read from the store.
    pub async fn create_booking(
        &self,
        booker_id: i64,
        item_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> AppResult<BookingDto> {
        if start > end {
            return Err(AppError::InvalidRequest("start cannot be after end".to_string()));
        }
        if start == end {
            return Err(AppError::InvalidRequest("start cannot equal end".to_string()));
        }

        ensure_user(&self.repository, booker_id).await?;
        let item = self.repository.items.get_by_id(item_id).await?;

        if !item.available {
            return Err(AppError::InvalidRequest(format!(
                "Item with ID {} is not available for booking",
                item_id
            )));
        }
        // Reported as a missing item, not as forbidden
        if item.owner_id == booker_id {
            return Err(AppError::NotFound(format!(
                "Item with ID {} cannot be booked by its owner",
                item_id
            )));
        }

        let booking = self
            .repository
            .bookings
            .create(&NewBooking {
                item_id,
                booker_id,
                start,
                end,
            })
            .await?;

        tracing::info!(booking_id = booking.id, item_id, booker_id, "Booking created");
        Ok(booking.into())
    }

    /// Approve or reject a WAITING booking as the item's owner
    pub async fn set_approval(&self, user_id: i64, booking_id: i64, approved: bool) -> AppResult<BookingDto> {
        let booking = self.repository.bookings.get_by_id(booking_id).await?;

        if booking.item.owner_id != user_id {
            return Err(AppError::InvalidRequest(format!(
                "User {} is not the owner of item {}",
                user_id, booking.item.id
            )));
        }
        if booking.status != BookingStatus::Waiting {
            return Err(AppError::InvalidRequest(format!(
                "Booking {} has already been {}",
                booking_id, booking.status
            )));
        }

        let status = if approved {
            BookingStatus::Approved
        } else {
            BookingStatus::Rejected
        };

        let updated = self
            .repository
            .bookings
            .set_status_if_waiting(booking_id, status)
            .await?
            .ok_or_else(|| {
                AppError::InvalidRequest(format!("Booking {} has already been decided", booking_id))
            })?;

        tracing::info!(booking_id, %status, "Booking status changed");
        Ok(updated.into())
    }

    /// Fetch a booking visible to its booker or the item's owner.
    ///
    /// Missing and foreign bookings produce the same error.
    pub async fn get_booking(&self, booking_id: i64, user_id: i64) -> AppResult<BookingDto> {
        let not_found = || {
            AppError::NotFound(format!(
                "Booking {} not found for user {}",
                booking_id, user_id
            ))
        };

        let booking = match self.repository.bookings.get_by_id(booking_id).await {
            Ok(booking) => booking,
            Err(AppError::NotFound(_)) => return Err(not_found()),
            Err(e) => return Err(e),
        };

        if !booking.involves(user_id) {
            return Err(not_found());
        }
        Ok(booking.into())
    }

    /// List bookings for `user_id` in `role`, filtered by the optional state keyword
    pub async fn list_bookings(
        &self,
        role: BookingRole,
        user_id: i64,
        state: Option<&str>,
    ) -> AppResult<Vec<BookingDto>> {
        let state = state.map(str::parse::<BookingState>).transpose()?;

        if role == BookingRole::Owner && !self.repository.bookings.exists_for_user(user_id).await? {
            return Err(AppError::NotFound(format!(
                "No bookings found for user with ID: {}",
                user_id
            )));
        }

        let now = Utc::now().naive_utc();

        let bookings = match state {
            None => {
                tracing::info!(%role, user_id, "Listing bookings without state");
                self.repository.bookings.list_for_user(user_id).await?
            }
            Some(state) => {
                tracing::info!(%role, user_id, %state, "Listing bookings");
                let found = self
                    .repository
                    .bookings
                    .find(role, user_id, state.query(now))
                    .await?;
                if found.is_empty() && state.fails_when_empty() {
                    return Err(AppError::NotFound(format!(
                        "No bookings found for {} with ID: {}",
                        role, user_id
                    )));
                }
                found
            }
        };

        Ok(bookings.into_iter().map(BookingDto::from).collect())
    }
}
