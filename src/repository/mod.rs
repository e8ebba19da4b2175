//! Repository layer for database operations
//!
//! Each store is a trait so the services can run against PostgreSQL or the
//! in-memory store without knowing which.

pub mod bookings;
pub mod comments;
pub mod items;
pub mod memory;
pub mod requests;
pub mod users;

use std::sync::Arc;

use sqlx::{Pool, Postgres};

pub use bookings::BookingsRepository;
pub use comments::CommentsRepository;
pub use items::ItemsRepository;
pub use requests::RequestsRepository;
pub use users::UsersRepository;

/// Main repository struct holding one handle per store
#[derive(Clone)]
pub struct Repository {
    pub users: Arc<dyn UsersRepository>,
    pub items: Arc<dyn ItemsRepository>,
    pub bookings: Arc<dyn BookingsRepository>,
    pub comments: Arc<dyn CommentsRepository>,
    pub requests: Arc<dyn RequestsRepository>,
}

impl Repository {
    /// Create a repository backed by the given PostgreSQL pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: Arc::new(users::PgUsersRepository::new(pool.clone())),
            items: Arc::new(items::PgItemsRepository::new(pool.clone())),
            bookings: Arc::new(bookings::PgBookingsRepository::new(pool.clone())),
            comments: Arc::new(comments::PgCommentsRepository::new(pool.clone())),
            requests: Arc::new(requests::PgRequestsRepository::new(pool)),
        }
    }

    /// Create a repository backed by a fresh in-memory store
    pub fn in_memory() -> Self {
        let store = Arc::new(memory::MemoryStore::new());
        Self {
            users: store.clone(),
            items: store.clone(),
            bookings: store.clone(),
            comments: store.clone(),
            requests: store,
        }
    }
}

/// `LIKE` pattern matching `text` anywhere, with wildcards escaped
pub(crate) fn contains_pattern(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Maps a unique-constraint violation to `Conflict`, passes other errors through
pub(crate) fn map_unique_violation(e: sqlx::Error, message: &str) -> crate::error::AppError {
    match e.as_database_error().and_then(|d| d.code()) {
        Some(code) if code == "23505" => crate::error::AppError::Conflict(message.to_string()),
        _ => crate::error::AppError::Database(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("drill"), "%drill%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
    }
}
