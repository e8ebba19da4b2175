//! User directory service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        required,
        user::{CreateUser, UpdateUser, User},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a user; the email must not be taken
    pub async fn create_user(&self, data: CreateUser) -> AppResult<User> {
        data.validate()?;
        let name = required(data.name, "Name")?;
        let email = required(data.email, "Email")?;

        if self.repository.users.email_exists(&email, None).await? {
            return Err(AppError::Conflict(format!("Email {} is already in use", email)));
        }

        let user = self.repository.users.create(name.trim(), &email).await?;
        tracing::info!(user_id = user.id, "User created");
        Ok(user)
    }

    pub async fn get_user(&self, id: i64) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }

    /// Apply a partial update; a new email must not belong to another user
    pub async fn update_user(&self, id: i64, data: UpdateUser) -> AppResult<User> {
        data.validate()?;

        if let Some(email) = &data.email {
            if self.repository.users.email_exists(email, Some(id)).await? {
                return Err(AppError::Conflict(format!("Email {} is already in use", email)));
            }
        }

        let user = self.repository.users.update(id, &data).await?;
        tracing::info!(user_id = id, "User updated");
        Ok(user)
    }

    pub async fn delete_user(&self, id: i64) -> AppResult<()> {
        self.repository.users.delete(id).await?;
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }
}

/// Shared existence check used by the other services
pub(crate) async fn ensure_user(repository: &Repository, id: i64) -> AppResult<()> {
    if !repository.users.exists(id).await? {
        return Err(AppError::NotFound(format!("User with id {} not found", id)));
    }
    Ok(())
}
