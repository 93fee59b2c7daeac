// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use crate::store::{TaskStore, new_task};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use common::{Alert, Task, TaskFields};
use sqlx::{Sqlite, SqlitePool, migrate::MigrateDatabase};
use tracing::{debug, info};

/// Establishes the database connection pool.
/// If the database does not exist, it creates it.
/// It also ensures the `todos` table has the correct schema.
pub async fn establish_connection_pool(database_url: &str) -> Result<SqlitePool> {
    if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
        info!("Creating database {}", database_url);
        Sqlite::create_database(database_url)
            .await
            .context("Failed to create database")?;
    } else {
        info!("Database already exists.");
    }

    let pool = SqlitePool::connect(database_url)
        .await
        .context("Failed to connect to database")?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Creates the `todos` table if it is missing. Safe to run on every start.
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS todos (
            id TEXT PRIMARY KEY NOT NULL,
            title TEXT NOT NULL,
            description TEXT NULL,
            alert_date TEXT NULL,
            alert_time TEXT NULL,
            alert_phone TEXT NULL,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create 'todos' table")?;

    info!("'todos' table is ready.");
    Ok(())
}

/// One row of the `todos` table. The alert is flattened into three columns.
#[derive(Debug, sqlx::FromRow)]
struct TaskRow {
    id: String,
    title: String,
    description: Option<String>,
    alert_date: Option<String>,
    alert_time: Option<String>,
    alert_phone: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        let alert = match (row.alert_date, row.alert_time, row.alert_phone) {
            (Some(date), Some(time), Some(phone)) => Some(Alert { date, time, phone }),
            _ => None,
        };
        Task {
            id: row.id,
            title: row.title,
            description: row.description,
            alert,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// `TaskStore` backed by a SQLite connection pool.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl TaskStore for SqliteStore {
    async fn insert(&self, fields: TaskFields) -> Result<Task> {
        let task = new_task(fields);
        let alert = task.alert.as_ref();

        debug!(
            "Insert values: id={}, title={}, description={:?}, alert={:?}, created_at={}",
            task.id, task.title, task.description, task.alert, task.created_at
        );

        sqlx::query(
            "INSERT INTO todos (id, title, description, alert_date, alert_time, alert_phone, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(alert.map(|a| a.date.as_str()))
        .bind(alert.map(|a| a.time.as_str()))
        .bind(alert.map(|a| a.phone.as_str()))
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await
        .context("Failed to insert todo into DB")?;

        Ok(task)
    }

    async fn find_all(&self) -> Result<Vec<Task>> {
        let rows = sqlx::query_as::<_, TaskRow>(
            "SELECT id, title, description, alert_date, alert_time, alert_phone, created_at, updated_at FROM todos ORDER BY rowid ASC;",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to retrieve todos from DB")?;

        Ok(rows.into_iter().map(Task::from).collect())
    }

    async fn replace(&self, id: &str, fields: TaskFields) -> Result<Option<Task>> {
        debug!("Attempting to update todo with ID: {}", id);
        let alert = fields.alert.as_ref();

        let row = sqlx::query_as::<_, TaskRow>(
            "UPDATE todos SET title = ?, description = ?, alert_date = ?, alert_time = ?, alert_phone = ?, updated_at = ? WHERE id = ? RETURNING id, title, description, alert_date, alert_time, alert_phone, created_at, updated_at",
        )
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(alert.map(|a| a.date.as_str()))
        .bind(alert.map(|a| a.time.as_str()))
        .bind(alert.map(|a| a.phone.as_str()))
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Failed to update todo with ID: {id}"))?;

        Ok(row.map(Task::from))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        debug!("Attempting to delete todo with ID: {}", id);
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to delete todo with ID: {id}"))?;

        let rows_affected = result.rows_affected();
        info!("Deleted {} rows for todo ID: {}", rows_affected, id);

        Ok(rows_affected > 0)
    }
}
