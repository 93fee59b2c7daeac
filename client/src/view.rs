// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

//! State of the single to-do view: the task list, the shared create/edit
//! form, transient status messages and the client-only reminders.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use common::{AlertPayload, Task, TaskPayload, validate_title};
use tracing::{debug, warn};

use crate::api::TodoApi;

/// How long a status message stays visible.
pub const FLASH_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

/// A transient status message.
#[derive(Debug, Clone)]
pub struct Flash {
    pub kind: FlashKind,
    pub text: String,
    shown_at: Instant,
}

impl Flash {
    pub fn expires_at(&self) -> Instant {
        self.shown_at + FLASH_TTL
    }
}

/// Reminder annotation kept only in this view's memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub date: String,
    pub time: String,
    pub phone: String,
}

/// Contents of the open "Set Alert" modal.
#[derive(Debug, Clone, Default)]
pub struct ReminderDraft {
    pub task_id: String,
    pub date: String,
    pub time: String,
    pub phone: String,
}

pub struct TodoView<A> {
    api: A,
    tasks: Vec<Task>,
    title: String,
    description: String,
    editing: Option<String>,
    flash: Option<Flash>,
    reminders: HashMap<String, Reminder>,
    modal: Option<ReminderDraft>,
}

impl<A: TodoApi> TodoView<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            tasks: Vec::new(),
            title: String::new(),
            description: String::new(),
            editing: None,
            flash: None,
            reminders: HashMap::new(),
            modal: None,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Id of the task selected for editing, if the form is in edit mode.
    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn flash(&self) -> Option<&Flash> {
        self.flash.as_ref()
    }

    pub fn reminder(&self, task_id: &str) -> Option<&Reminder> {
        self.reminders.get(task_id)
    }

    pub fn reminder_draft(&self) -> Option<&ReminderDraft> {
        self.modal.as_ref()
    }

    pub fn reminder_draft_mut(&mut self) -> Option<&mut ReminderDraft> {
        self.modal.as_mut()
    }

    /// Fetches the full list and replaces the displayed one.
    /// Reminders do not survive a re-fetch.
    pub async fn load(&mut self) {
        match self.api.list_todos().await {
            Ok(tasks) => {
                debug!("Fetched {} tasks", tasks.len());
                self.tasks = tasks;
                self.reminders.clear();
            }
            Err(e) => {
                warn!("Error fetching tasks: {}", e);
                self.show(FlashKind::Error, "Error fetching tasks!");
            }
        }
    }

    /// Submits the form: creates a task, or saves the one being edited.
    pub async fn submit(&mut self) {
        if validate_title(&self.title).is_err() {
            self.show(FlashKind::Error, "Please enter a title!");
            return;
        }
        match self.editing.clone() {
            Some(id) => self.save_edit(&id).await,
            None => self.create().await,
        }
    }

    async fn create(&mut self) {
        let payload = TaskPayload::new(self.title.clone(), self.form_description());
        match self.api.create_todo(&payload).await {
            Ok(task) => {
                self.tasks.push(task);
                self.clear_form();
                self.show(FlashKind::Success, "Task added successfully!");
            }
            Err(e) => {
                warn!("Error adding task: {}", e);
                self.show(FlashKind::Error, "Error adding task!");
            }
        }
    }

    async fn save_edit(&mut self, id: &str) {
        // Updates replace the whole record, so the stored alert is sent back as is.
        let alert = self
            .tasks
            .iter()
            .find(|t| t.id == id)
            .and_then(|t| t.alert.clone())
            .map(AlertPayload::from);
        let payload = TaskPayload {
            title: self.title.clone(),
            description: self.form_description(),
            alert,
        };

        match self.api.update_todo(id, &payload).await {
            Ok(_) => {
                self.editing = None;
                self.clear_form();
                self.load().await;
                // The save went through even if the re-fetch did not.
                self.show(FlashKind::Success, "Task updated successfully!");
            }
            Err(e) => {
                warn!("Error updating task: {}", e);
                self.show(FlashKind::Error, "Error updating task!");
            }
        }
    }

    /// Switches the form to edit mode for `id`. Returns false for unknown ids.
    pub fn begin_edit(&mut self, id: &str) -> bool {
        let Some(task) = self.tasks.iter().find(|t| t.id == id) else {
            return false;
        };
        self.title = task.title.clone();
        self.description = task.description.clone().unwrap_or_default();
        self.editing = Some(task.id.clone());
        true
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.clear_form();
    }

    pub async fn delete(&mut self, id: &str) {
        match self.api.delete_todo(id).await {
            Ok(()) => {
                self.load().await;
                self.show(FlashKind::Success, "Task deleted successfully!");
            }
            Err(e) => {
                warn!("Error deleting task: {}", e);
                self.show(FlashKind::Error, "Error deleting task!");
            }
        }
    }

    /// Opens an empty reminder modal for `id`.
    pub fn open_reminder(&mut self, id: &str) {
        self.modal = Some(ReminderDraft {
            task_id: id.to_string(),
            ..Default::default()
        });
    }

    pub fn cancel_reminder(&mut self) {
        self.modal = None;
    }

    /// Stores the drafted reminder. All three fields are required;
    /// otherwise the modal stays open and an error is shown.
    pub fn confirm_reminder(&mut self) -> bool {
        let Some(draft) = self.modal.as_ref() else {
            return false;
        };
        if draft.date.is_empty() || draft.time.is_empty() || draft.phone.is_empty() {
            self.show(
                FlashKind::Error,
                "Please fill all fields before setting an alert!",
            );
            return false;
        }

        let reminder = Reminder {
            date: draft.date.clone(),
            time: draft.time.clone(),
            phone: draft.phone.clone(),
        };
        let text = format!(
            "Alert set for {} at {} (Phone: {})",
            reminder.date, reminder.time, reminder.phone
        );
        self.reminders.insert(draft.task_id.clone(), reminder);
        self.modal = None;
        self.show(FlashKind::Success, &text);
        true
    }

    /// Clears the status message once it has been visible for `FLASH_TTL`.
    pub fn tick(&mut self, now: Instant) {
        let expired = self
            .flash
            .as_ref()
            .is_some_and(|f| now >= f.expires_at());
        if expired {
            self.flash = None;
        }
    }

    pub fn dismiss(&mut self) {
        self.flash = None;
    }

    fn show(&mut self, kind: FlashKind, text: &str) {
        self.flash = Some(Flash {
            kind,
            text: text.to_string(),
            shown_at: Instant::now(),
        });
    }

    /// The description as typed; only an empty field is left out.
    fn form_description(&self) -> Option<String> {
        (!self.description.is_empty()).then(|| self.description.clone())
    }

    fn clear_form(&mut self) {
        self.title.clear();
        self.description.clear();
    }
}
