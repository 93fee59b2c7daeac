// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

//! HTTP client for the to-do service.

use std::future::Future;

use chrono::Utc;
use common::{Task, TaskPayload};
use reqwest::{Client, Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Default URL for local development.
pub const DEFAULT_URL: &str = "http://localhost:5000";

/// HTTP client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    Server(String),
}

/// The calls the view needs from the service.
pub trait TodoApi {
    fn list_todos(&self) -> impl Future<Output = Result<Vec<Task>, ClientError>> + Send;

    fn create_todo(
        &self,
        payload: &TaskPayload,
    ) -> impl Future<Output = Result<Task, ClientError>> + Send;

    fn update_todo(
        &self,
        id: &str,
        payload: &TaskPayload,
    ) -> impl Future<Output = Result<Task, ClientError>> + Send;

    fn delete_todo(&self, id: &str) -> impl Future<Output = Result<(), ClientError>> + Send;
}

/// Error body returned by the service.
#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// HTTP client for the to-do service.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
    client: Client,
}

impl TodoClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, &url)
    }

    /// Handle response, converting HTTP errors to ClientError.
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(Self::error_from(response).await)
        }
    }

    /// Handle response that returns an empty body (204 No Content).
    async fn handle_empty_response(response: reqwest::Response) -> Result<(), ClientError> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::error_from(response).await)
        }
    }

    async fn error_from(response: reqwest::Response) -> ClientError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        classify(status, &body)
    }
}

/// Maps a failed status and its body onto a `ClientError`,
/// preferring the service's `{"message": ...}` text over the raw body.
fn classify(status: StatusCode, body: &str) -> ClientError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| body.to_string());
    match status {
        StatusCode::BAD_REQUEST => ClientError::BadRequest(message),
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        _ => ClientError::Server(format!("{}: {}", status, message)),
    }
}

impl TodoApi for TodoClient {
    async fn list_todos(&self) -> Result<Vec<Task>, ClientError> {
        // Cache-busting parameter; the server ignores it.
        let stamp = Utc::now().timestamp_millis().to_string();
        let response = self
            .request(Method::GET, "/todos")
            .query(&[("_ts", stamp)])
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn create_todo(&self, payload: &TaskPayload) -> Result<Task, ClientError> {
        let response = self
            .request(Method::POST, "/todos")
            .json(payload)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn update_todo(&self, id: &str, payload: &TaskPayload) -> Result<Task, ClientError> {
        let response = self
            .request(Method::PUT, &format!("/todos/{}", id))
            .json(payload)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn delete_todo(&self, id: &str) -> Result<(), ClientError> {
        let response = self
            .request(Method::DELETE, &format!("/todos/{}", id))
            .send()
            .await?;
        Self::handle_empty_response(response).await
    }
}
