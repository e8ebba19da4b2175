//! Item requests service

use std::collections::HashMap;

use chrono::Utc;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        item::ItemAnswer,
        request::{CreateItemRequest, ItemRequest, ItemRequestDto},
        required,
    },
    repository::Repository,
};

use super::users::ensure_user;

#[derive(Clone)]
pub struct RequestsService {
    repository: Repository,
}

impl RequestsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn create_request(&self, user_id: i64, data: CreateItemRequest) -> AppResult<ItemRequestDto> {
        ensure_user(&self.repository, user_id).await?;
        data.validate()?;
        let description = required(data.description, "Description")?;

        let request = self
            .repository
            .requests
            .create(user_id, &description, Utc::now().naive_utc())
            .await?;

        tracing::info!(request_id = request.id, user_id, "Item request created");
        Ok(ItemRequestDto::new(request, Vec::new()))
    }

    /// The user's own requests, newest first
    pub async fn list_own(&self, user_id: i64) -> AppResult<Vec<ItemRequestDto>> {
        ensure_user(&self.repository, user_id).await?;
        let requests = self.repository.requests.list_by_requestor(user_id).await?;
        self.with_answers(requests).await
    }

    /// One page of other users' requests, newest first.
    ///
    /// `from` is rounded down to a multiple of `size`.
    pub async fn list_others(&self, user_id: i64, from: i64, size: i64) -> AppResult<Vec<ItemRequestDto>> {
        if from < 0 || size <= 0 {
            return Err(AppError::InvalidRequest(format!(
                "Invalid paging parameters: from={}, size={}",
                from, size
            )));
        }
        ensure_user(&self.repository, user_id).await?;

        let offset = (from / size) * size;
        let requests = self
            .repository
            .requests
            .list_by_others(user_id, size, offset)
            .await?;
        self.with_answers(requests).await
    }

    pub async fn get_request(&self, user_id: i64, request_id: i64) -> AppResult<ItemRequestDto> {
        ensure_user(&self.repository, user_id).await?;
        let request = self.repository.requests.get_by_id(request_id).await?;
        let mut answered = self.with_answers(vec![request]).await?;
        answered
            .pop()
            .ok_or_else(|| AppError::Internal(format!("Item request {} lost its view", request_id)))
    }

    /// Attach the items offered in answer to each request
    async fn with_answers(&self, requests: Vec<ItemRequest>) -> AppResult<Vec<ItemRequestDto>> {
        let ids: Vec<i64> = requests.iter().map(|r| r.id).collect();
        let mut answers: HashMap<i64, Vec<ItemAnswer>> = HashMap::new();
        for item in self.repository.items.list_by_requests(&ids).await? {
            if let Some(request_id) = item.request_id {
                answers.entry(request_id).or_default().push(item.into());
            }
        }

        Ok(requests
            .into_iter()
            .map(|request| {
                let items = answers.remove(&request.id).unwrap_or_default();
                ItemRequestDto::new(request, items)
            })
            .collect())
    }
}
