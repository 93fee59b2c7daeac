// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Represents a to-do item as stored by the server and returned by the API.
///
/// Field names are serialized in camelCase (`createdAt`, `updatedAt`).
/// `description` and `alert` are omitted from the JSON when unset.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque identifier assigned by the store.
    pub id: String,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert: Option<Alert>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// A complete alert: all three fields are always present together.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Format: YYYY-MM-DD
    pub date: String,
    /// Format: HH:MM
    pub time: String,
    pub phone: String,
}

/// Request body for both creating and updating a task.
///
/// Everything is loose on the wire so that a missing title or a partial
/// alert reaches validation and gets a meaningful 400 instead of a
/// deserialization rejection.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct TaskPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert: Option<AlertPayload>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct AlertPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// The validated fields of a task, as handed to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskFields {
    pub title: String,
    pub description: Option<String>,
    pub alert: Option<Alert>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title cannot be empty.")]
    EmptyTitle,

    #[error("Alert must have date, time, and phone.")]
    IncompleteAlert,
}

/// Rejects titles that are empty or only whitespace.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(())
}

impl TaskPayload {
    pub fn new(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            title: title.into(),
            description,
            alert: None,
        }
    }

    /// Checks the title and the all-or-nothing alert rule.
    /// Only presence is checked, formats are taken as given.
    pub fn validate(self) -> Result<TaskFields, ValidationError> {
        validate_title(&self.title)?;

        let alert = match self.alert {
            None => None,
            Some(alert) => Some(alert.into_alert()?),
        };

        Ok(TaskFields {
            title: self.title,
            description: self.description,
            alert,
        })
    }
}

impl AlertPayload {
    fn into_alert(self) -> Result<Alert, ValidationError> {
        match (
            present(self.date),
            present(self.time),
            present(self.phone),
        ) {
            (Some(date), Some(time), Some(phone)) => Ok(Alert { date, time, phone }),
            _ => Err(ValidationError::IncompleteAlert),
        }
    }
}

impl From<Alert> for AlertPayload {
    fn from(alert: Alert) -> Self {
        Self {
            date: Some(alert.date),
            time: Some(alert.time),
            phone: Some(alert.phone),
        }
    }
}

// An empty string counts as missing.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
