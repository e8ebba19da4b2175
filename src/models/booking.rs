//! Booking model, status/state keywords and store query shapes

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, Postgres};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{
    item::{Item, ItemDto},
    user::User,
};
use crate::error::AppError;

/// Booking status. WAITING is initial, the others are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Waiting,
    Approved,
    Rejected,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Waiting => "WAITING",
            BookingStatus::Approved => "APPROVED",
            BookingStatus::Rejected => "REJECTED",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WAITING" => Ok(BookingStatus::Waiting),
            "APPROVED" => Ok(BookingStatus::Approved),
            "REJECTED" => Ok(BookingStatus::Rejected),
            _ => Err(format!("Invalid booking status: {}", s)),
        }
    }
}

// Stored as VARCHAR
impl sqlx::Type<Postgres> for BookingStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for BookingStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for BookingStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Which side of a booking the caller is listing from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingRole {
    /// The user who requested the booking
    Booker,
    /// The owner of the booked item
    Owner,
}

impl std::fmt::Display for BookingRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingRole::Booker => write!(f, "booker"),
            BookingRole::Owner => write!(f, "owner"),
        }
    }
}

/// Caller-supplied state keyword selecting a booking subset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingState {
    All,
    Current,
    Past,
    Future,
    Waiting,
    Rejected,
}

impl BookingState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingState::All => "ALL",
            BookingState::Current => "CURRENT",
            BookingState::Past => "PAST",
            BookingState::Future => "FUTURE",
            BookingState::Waiting => "WAITING",
            BookingState::Rejected => "REJECTED",
        }
    }

    /// Store query for this state, evaluated against a single captured `now`.
    ///
    /// `FUTURE` routes to the same query as `ALL`; there is no `start > now`
    /// filter behind it.
    pub fn query(&self, now: NaiveDateTime) -> BookingQuery {
        match self {
            BookingState::All | BookingState::Future => BookingQuery::All,
            BookingState::Waiting => BookingQuery::Status(BookingStatus::Waiting),
            BookingState::Rejected => BookingQuery::Status(BookingStatus::Rejected),
            BookingState::Current => BookingQuery::Current(now),
            BookingState::Past => BookingQuery::Past(now),
        }
    }

    /// Whether an empty result is reported as `NotFound` instead of `[]`
    pub fn fails_when_empty(&self) -> bool {
        matches!(self, BookingState::All | BookingState::Future)
    }
}

impl std::fmt::Display for BookingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BookingState {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALL" => Ok(BookingState::All),
            "CURRENT" => Ok(BookingState::Current),
            "PAST" => Ok(BookingState::Past),
            "FUTURE" => Ok(BookingState::Future),
            "WAITING" => Ok(BookingState::Waiting),
            "REJECTED" => Ok(BookingState::Rejected),
            _ => Err(AppError::InvalidRequest(format!("Unknown state: {}", s))),
        }
    }
}

/// Filter applied by the booking store, together with its ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingQuery {
    /// Every booking for the role, `start` DESC
    All,
    /// Bookings with the given status, `start` DESC
    Status(BookingStatus),
    /// `start <= now < end`, `start` ASC
    Current(NaiveDateTime),
    /// `end < now`, `end` DESC
    Past(NaiveDateTime),
}

impl BookingQuery {
    pub fn matches(&self, booking: &Booking) -> bool {
        match self {
            BookingQuery::All => true,
            BookingQuery::Status(status) => booking.status == *status,
            BookingQuery::Current(now) => booking.is_current(*now),
            BookingQuery::Past(now) => booking.is_past(*now),
        }
    }

    /// Sort a result set the way the store query orders it
    pub fn sort(&self, bookings: &mut [Booking]) {
        match self {
            BookingQuery::All | BookingQuery::Status(_) => {
                bookings.sort_by(|a, b| b.start.cmp(&a.start))
            }
            BookingQuery::Current(_) => bookings.sort_by(|a, b| a.start.cmp(&b.start)),
            BookingQuery::Past(_) => bookings.sort_by(|a, b| b.end.cmp(&a.end)),
        }
    }
}

/// Booking joined with its item and booker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub id: i64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub status: BookingStatus,
    pub item: Item,
    pub booker: User,
}

impl Booking {
    /// `start <= now < end`
    pub fn is_current(&self, now: NaiveDateTime) -> bool {
        self.start <= now && now < self.end
    }

    /// `end < now`
    pub fn is_past(&self, now: NaiveDateTime) -> bool {
        self.end < now
    }

    pub fn involves(&self, user_id: i64) -> bool {
        self.booker.id == user_id || self.item.owner_id == user_id
    }

    pub fn matches_role(&self, role: BookingRole, user_id: i64) -> bool {
        match role {
            BookingRole::Booker => self.booker.id == user_id,
            BookingRole::Owner => self.item.owner_id == user_id,
        }
    }
}

/// Values written when inserting a booking; status is always WAITING
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub item_id: i64,
    pub booker_id: i64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Booking as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingDto {
    pub id: i64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub status: BookingStatus,
    pub item: ItemDto,
    pub booker: User,
}

impl From<Booking> for BookingDto {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            start: booking.start,
            end: booking.end,
            status: booking.status,
            item: booking.item.into(),
            booker: booking.booker,
        }
    }
}

/// Booking summary embedded in item views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingShort {
    pub id: i64,
    pub booker_id: i64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl From<&Booking> for BookingShort {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id,
            booker_id: booking.booker.id,
            start: booking.start,
            end: booking.end,
        }
    }
}

/// Create booking request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBooking {
    #[validate(required(message = "Item ID cannot be null"))]
    pub item_id: Option<i64>,
    #[validate(required(message = "Start time cannot be null"))]
    pub start: Option<NaiveDateTime>,
    #[validate(required(message = "End time cannot be null"))]
    pub end: Option<NaiveDateTime>,
}

/// Query parameters for booking lists
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
pub struct BookingListQuery {
    /// ALL, CURRENT, PAST, FUTURE, WAITING or REJECTED
    pub state: Option<String>,
    pub from: Option<i64>,
    pub size: Option<i64>,
}

/// Query parameters for the approval endpoint
#[derive(Debug, Clone, Serialize, Deserialize, IntoParams)]
pub struct ApprovalQuery {
    pub approved: bool,
}
