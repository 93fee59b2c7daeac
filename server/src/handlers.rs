// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use crate::store::TaskStore;
use axum::{
    extract::{FromRequest, Json, Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::{Task, TaskPayload, ValidationError};
use tracing::{debug, info};

/// JSON body extractor whose rejections answer with our `{"message"}` error shape.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct TaskBody<T>(pub T);

/// Handler for listing every task.
/// Any query string (e.g. a client cache-buster) is ignored.
pub async fn list_tasks<S: TaskStore>(
    State(store): State<S>, // State injection (store handle)
) -> Result<Json<Vec<Task>>, AppError> {
    let tasks = store.find_all().await?;
    info!("Successfully retrieved {} tasks.", tasks.len());
    Ok(Json(tasks))
}

/// Handler for creating a new task.
pub async fn create_task<S: TaskStore>(
    State(store): State<S>,
    TaskBody(payload): TaskBody<TaskPayload>, // Extracting the request body as JSON
) -> Result<(StatusCode, Json<Task>), AppError> {
    debug!("Received request to create task: {:?}", payload.title);

    let fields = payload.validate()?;
    let new_task = store.insert(fields).await?;

    info!("Task created successfully with ID: {}", new_task.id);

    // Return a 201 Created status with the new task as JSON.
    Ok((StatusCode::CREATED, Json(new_task)))
}

/// Handler for replacing a task's title, description and alert.
pub async fn update_task<S: TaskStore>(
    State(store): State<S>,
    Path(task_id): Path<String>, // Extract task ID from the URL path
    TaskBody(payload): TaskBody<TaskPayload>,
) -> Result<Json<Task>, AppError> {
    debug!("Received request to update task with ID: {}", task_id);

    let fields = payload.validate()?;

    match store.replace(&task_id, fields).await? {
        Some(task) => {
            info!("Task with ID {} updated successfully.", task_id);
            Ok(Json(task))
        }
        None => Err(AppError::not_found()),
    }
}

/// Handler for deleting a task by ID.
/// Deleting an unknown ID is treated as success: the task is gone either way.
pub async fn delete_task<S: TaskStore>(
    State(store): State<S>,
    Path(task_id): Path<String>,
) -> Result<StatusCode, AppError> {
    debug!("Attempting to delete task with ID: {}", task_id);

    if store.delete(&task_id).await? {
        info!("Task with ID {} deleted successfully.", task_id);
    } else {
        info!("Task with ID {} was already absent.", task_id);
    }

    Ok(StatusCode::NO_CONTENT)
}

// --- Custom Error Handling ---

/// Our custom error type for the application.
#[derive(Debug)]
pub struct AppError {
    code: StatusCode,
    message: String,
}

impl AppError {
    fn new(code: StatusCode, message: &str) -> Self {
        Self {
            code,
            message: message.to_string(),
        }
    }

    fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Todo not found")
    }

    pub fn code(&self) -> StatusCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Rejected input never reaches the store.
impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, &err.to_string())
    }
}

/// A body that is valid JSON but has the wrong shape (e.g. `"alert": "tomorrow"`)
/// is a validation failure. Other rejections keep axum's status code.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let code = match rejection {
            JsonRejection::JsonDataError(_) => StatusCode::BAD_REQUEST,
            ref other => other.status(),
        };
        Self::new(code, &rejection.body_text())
    }
}

/// Allows converting an `anyhow::Error` (coming from the store)
/// into our `AppError`, keeping the underlying message.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!("Store error: {:?}", err);
        Self {
            code: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("{err:#}"),
        }
    }
}

/// Allows Axum to convert our `AppError` into an HTTP `Response`.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(
            "Responding with error: status_code={}, message={}",
            self.code.as_u16(),
            self.message
        );
        (
            self.code,
            Json(serde_json::json!({ "message": self.message })),
        )
            .into_response()
    }
}
