//! Data models for ShareIt

pub mod booking;
pub mod comment;
pub mod item;
pub mod request;
pub mod user;

// Re-export commonly used types
pub use booking::{Booking, BookingDto, BookingQuery, BookingRole, BookingState, BookingStatus};
pub use comment::{Comment, CommentDto};
pub use item::{Item, ItemDetails, ItemDto};
pub use request::{ItemRequest, ItemRequestDto};
pub use user::User;

use validator::ValidationError;

use crate::error::{AppError, AppResult};

/// Rejects strings made only of whitespace
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("must not be blank".into());
        return Err(error);
    }
    Ok(())
}

/// Unwraps a field that validation has already required
pub(crate) fn required<T>(value: Option<T>, field: &str) -> AppResult<T> {
    value.ok_or_else(|| AppError::InvalidRequest(format!("{} is required", field)))
}
