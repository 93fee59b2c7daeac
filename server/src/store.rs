// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use common::{Task, TaskFields};
use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Persistence seam for tasks.
///
/// A store handle is cloned into every request through the router state,
/// so implementations are cheap to clone and share their backing storage.
pub trait TaskStore: Clone + Send + Sync + 'static {
    /// Persists a new task, assigning its id and timestamps.
    fn insert(&self, fields: TaskFields) -> impl Future<Output = Result<Task>> + Send;

    /// Returns every task in insertion order.
    fn find_all(&self) -> impl Future<Output = Result<Vec<Task>>> + Send;

    /// Replaces title, description and alert of the task with `id`.
    /// Returns `None` when no such task exists.
    fn replace(
        &self,
        id: &str,
        fields: TaskFields,
    ) -> impl Future<Output = Result<Option<Task>>> + Send;

    /// Hard deletes the task with `id`. Returns false if nothing was removed.
    fn delete(&self, id: &str) -> impl Future<Output = Result<bool>> + Send;
}

/// Builds a fresh task record from validated fields.
pub(crate) fn new_task(fields: TaskFields) -> Task {
    let now = Utc::now();
    Task {
        id: Uuid::new_v4().to_string(),
        title: fields.title,
        description: fields.description,
        alert: fields.alert,
        created_at: now,
        updated_at: now,
    }
}

/// Process-local store, used for tests and `--store memory` runs.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tasks: Arc<RwLock<Vec<Task>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TaskStore for MemoryStore {
    async fn insert(&self, fields: TaskFields) -> Result<Task> {
        let task = new_task(fields);
        debug!("Inserting task {} into memory store", task.id);
        self.tasks.write().push(task.clone());
        Ok(task)
    }

    async fn find_all(&self) -> Result<Vec<Task>> {
        Ok(self.tasks.read().clone())
    }

    async fn replace(&self, id: &str, fields: TaskFields) -> Result<Option<Task>> {
        let mut tasks = self.tasks.write();
        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        task.title = fields.title;
        task.description = fields.description;
        task.alert = fields.alert;
        task.updated_at = Utc::now();
        Ok(Some(task.clone()))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut tasks = self.tasks.write();
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        Ok(tasks.len() < before)
    }
}
