//! Bookings repository

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{FromRow, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{Booking, BookingQuery, BookingRole, BookingStatus, NewBooking},
        item::Item,
        user::User,
    },
};

/// Booking joined with item and booker, one row per booking
const BOOKING_SELECT: &str = r#"
    SELECT b.id, b.start_date, b.end_date, b.status,
           i.id AS item_id, i.name AS item_name, i.description AS item_description,
           i.is_available AS item_available, i.owner_id AS item_owner_id,
           i.request_id AS item_request_id,
           u.id AS booker_id, u.name AS booker_name, u.email AS booker_email
    FROM bookings b
    JOIN items i ON b.item_id = i.id
    JOIN users u ON b.booker_id = u.id
"#;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingsRepository: Send + Sync {
    /// Insert a WAITING booking
    async fn create(&self, booking: &NewBooking) -> AppResult<Booking>;

    /// Get booking by ID, `NotFound` if missing
    async fn get_by_id(&self, id: i64) -> AppResult<Booking>;

    /// Whether the user has any booking, as booker or as item owner
    async fn exists_for_user(&self, user_id: i64) -> AppResult<bool>;

    /// Bookings where the user is booker or item owner, `start` DESC
    async fn list_for_user(&self, user_id: i64) -> AppResult<Vec<Booking>>;

    /// Bookings for one role matching `query`, in the query's ordering
    async fn find(&self, role: BookingRole, user_id: i64, query: BookingQuery) -> AppResult<Vec<Booking>>;

    /// Set `status` only if the booking is still WAITING.
    ///
    /// Returns `None` when the booking left WAITING in the meantime.
    async fn set_status_if_waiting(&self, id: i64, status: BookingStatus) -> AppResult<Option<Booking>>;

    /// Whether the user has an APPROVED booking of the item that ended before `now`
    async fn has_completed_booking(&self, item_id: i64, booker_id: i64, now: NaiveDateTime) -> AppResult<bool>;

    /// APPROVED bookings of the given items, `start` ASC
    async fn approved_for_items(&self, item_ids: &[i64]) -> AppResult<Vec<Booking>>;
}

#[derive(Debug, FromRow)]
struct BookingRow {
    id: i64,
    start_date: NaiveDateTime,
    end_date: NaiveDateTime,
    status: BookingStatus,
    item_id: i64,
    item_name: String,
    item_description: String,
    item_available: bool,
    item_owner_id: i64,
    item_request_id: Option<i64>,
    booker_id: i64,
    booker_name: String,
    booker_email: String,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Booking {
            id: row.id,
            start: row.start_date,
            end: row.end_date,
            status: row.status,
            item: Item {
                id: row.item_id,
                name: row.item_name,
                description: row.item_description,
                available: row.item_available,
                owner_id: row.item_owner_id,
                request_id: row.item_request_id,
            },
            booker: User {
                id: row.booker_id,
                name: row.booker_name,
                email: row.booker_email,
            },
        }
    }
}

#[derive(Clone)]
pub struct PgBookingsRepository {
    pool: Pool<Postgres>,
}

impl PgBookingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn fetch_by_id<'e, E>(executor: E, id: i64) -> AppResult<Option<Booking>>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let query = format!("{} WHERE b.id = $1", BOOKING_SELECT);
        let row = sqlx::query_as::<_, BookingRow>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(row.map(Booking::from))
    }
}

#[async_trait]
impl BookingsRepository for PgBookingsRepository {
    async fn create(&self, booking: &NewBooking) -> AppResult<Booking> {
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO bookings (start_date, end_date, item_id, booker_id, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(booking.start)
        .bind(booking.end)
        .bind(booking.item_id)
        .bind(booking.booker_id)
        .bind(BookingStatus::Waiting)
        .fetch_one(&mut *tx)
        .await?;

        let created = Self::fetch_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Booking {} vanished after insert", id)))?;

        tx.commit().await?;
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Booking> {
        Self::fetch_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking not found with ID: {}", id)))
    }

    async fn exists_for_user(&self, user_id: i64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM bookings b
                JOIN items i ON b.item_id = i.id
                WHERE b.booker_id = $1 OR i.owner_id = $1
            )
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn list_for_user(&self, user_id: i64) -> AppResult<Vec<Booking>> {
        let query = format!(
            "{} WHERE b.booker_id = $1 OR i.owner_id = $1 ORDER BY b.start_date DESC",
            BOOKING_SELECT
        );
        let rows = sqlx::query_as::<_, BookingRow>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Booking::from).collect())
    }

    async fn find(&self, role: BookingRole, user_id: i64, query: BookingQuery) -> AppResult<Vec<Booking>> {
        let role_clause = match role {
            BookingRole::Booker => "b.booker_id = $1",
            BookingRole::Owner => "i.owner_id = $1",
        };
        let (filter, order) = match query {
            BookingQuery::All => ("", "b.start_date DESC"),
            BookingQuery::Status(_) => (" AND b.status = $2", "b.start_date DESC"),
            BookingQuery::Current(_) => (" AND b.start_date <= $2 AND b.end_date > $2", "b.start_date ASC"),
            BookingQuery::Past(_) => (" AND b.end_date < $2", "b.end_date DESC"),
        };
        let sql = format!(
            "{} WHERE {}{} ORDER BY {}, b.id",
            BOOKING_SELECT, role_clause, filter, order
        );

        let mut builder = sqlx::query_as::<_, BookingRow>(&sql).bind(user_id);
        match query {
            BookingQuery::All => {}
            BookingQuery::Status(status) => builder = builder.bind(status),
            BookingQuery::Current(now) | BookingQuery::Past(now) => builder = builder.bind(now),
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Booking::from).collect())
    }

    async fn set_status_if_waiting(&self, id: i64, status: BookingStatus) -> AppResult<Option<Booking>> {
        let mut tx = self.pool.begin().await?;

        let updated: Option<i64> = sqlx::query_scalar(
            "UPDATE bookings SET status = $1 WHERE id = $2 AND status = $3 RETURNING id",
        )
        .bind(status)
        .bind(id)
        .bind(BookingStatus::Waiting)
        .fetch_optional(&mut *tx)
        .await?;

        let booking = match updated {
            Some(id) => Self::fetch_by_id(&mut *tx, id).await?,
            None => None,
        };

        tx.commit().await?;
        Ok(booking)
    }

    async fn has_completed_booking(&self, item_id: i64, booker_id: i64, now: NaiveDateTime) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM bookings
                WHERE item_id = $1 AND booker_id = $2 AND status = $3 AND end_date < $4
            )
            "#,
        )
        .bind(item_id)
        .bind(booker_id)
        .bind(BookingStatus::Approved)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn approved_for_items(&self, item_ids: &[i64]) -> AppResult<Vec<Booking>> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "{} WHERE b.item_id = ANY($1) AND b.status = $2 ORDER BY b.start_date ASC",
            BOOKING_SELECT
        );
        let rows = sqlx::query_as::<_, BookingRow>(&query)
            .bind(item_ids)
            .bind(BookingStatus::Approved)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Booking::from).collect())
    }
}
