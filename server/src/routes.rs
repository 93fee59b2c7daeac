// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use crate::handlers;
use crate::store::TaskStore;
use axum::{
    Router,
    routing::{get, put},
};

/// Creates and configures the application router.
pub fn create_router<S: TaskStore>(store: S) -> Router {
    Router::new()
        // `GET /todos` lists every task, `POST /todos` creates one
        .route(
            "/todos",
            get(handlers::list_tasks::<S>).post(handlers::create_task::<S>),
        )
        // `PUT /todos/{id}` replaces a task, `DELETE /todos/{id}` removes it
        .route(
            "/todos/{id}",
            put(handlers::update_task::<S>).delete(handlers::delete_task::<S>),
        )
        // Adds the store handle to the application state
        .with_state(store)
}
