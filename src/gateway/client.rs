//! HTTP client forwarding validated calls to the ShareIt server

use std::time::Duration;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    response::{IntoResponse, Response},
};
use reqwest::RequestBuilder;

use crate::{api::SHARER_HEADER, config::GatewayConfig, error::AppResult};

#[derive(Clone)]
pub struct ShareItClient {
    http: reqwest::Client,
    base_url: String,
}

impl ShareItClient {
    pub fn new(config: &GatewayConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.server_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request to `path` on the server, acting as `user_id` when given
    pub fn request(&self, method: Method, path: &str, user_id: Option<i64>) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.base_url, path));
        match user_id {
            Some(id) => builder.header(SHARER_HEADER, id),
            None => builder,
        }
    }

    /// Send the request and relay the server's status and body unchanged
    pub async fn relay(&self, request: RequestBuilder) -> AppResult<Response> {
        let response = request.send().await?;

        let status = response.status();
        let content_type = response.headers().get(CONTENT_TYPE).cloned();
        let body = response.bytes().await?;

        tracing::debug!(%status, bytes = body.len(), "Relaying server response");

        let mut relayed = (status, body).into_response();
        if let Some(content_type) = content_type {
            relayed.headers_mut().insert(CONTENT_TYPE, content_type);
        }
        Ok(relayed)
    }

    pub async fn get(&self, path: &str, user_id: Option<i64>) -> AppResult<Response> {
        self.relay(self.request(Method::GET, path, user_id)).await
    }

    pub async fn delete(&self, path: &str, user_id: Option<i64>) -> AppResult<Response> {
        self.relay(self.request(Method::DELETE, path, user_id)).await
    }
}
