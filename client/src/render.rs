// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use crate::api::TodoApi;
use crate::view::{FlashKind, TodoView};

/// Renders the whole view as plain text.
pub fn render<A: TodoApi>(view: &TodoView<A>) -> String {
    let mut out = String::from("== To-Do List ==\n");

    if let Some(flash) = view.flash() {
        let tag = match flash.kind {
            FlashKind::Success => "ok",
            FlashKind::Error => "error",
        };
        out.push_str(&format!("[{}] {}  (dismiss to close)\n", tag, flash.text));
    }

    let button = if view.editing().is_some() {
        "Save Changes"
    } else {
        "Add Task"
    };
    out.push_str(&format!(
        "Title: {:?}  Description: {:?}  [{}]\n",
        view.title(),
        view.description(),
        button
    ));

    if view.tasks().is_empty() {
        out.push_str("(no tasks)\n");
    }
    for (i, task) in view.tasks().iter().enumerate() {
        match &task.description {
            Some(description) => {
                out.push_str(&format!("{}. {} - {}\n", i + 1, task.title, description))
            }
            None => out.push_str(&format!("{}. {}\n", i + 1, task.title)),
        }
        if let Some(reminder) = view.reminder(&task.id) {
            out.push_str(&format!(
                "   date {} time {} phone {}\n",
                reminder.date, reminder.time, reminder.phone
            ));
        }
    }

    if let Some(draft) = view.reminder_draft() {
        out.push_str(&format!(
            "-- Set Alert --\n   date {:?} time {:?} phone {:?}\n",
            draft.date, draft.time, draft.phone
        ));
    }

    out
}
