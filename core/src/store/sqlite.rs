//! SQLite-backed todo store.
//!
//! # Responsibility
//! - Open file or in-memory databases and bring the schema up to date.
//! - Keep SQL details behind the `TodoStore` contract.
//!
//! # Invariants
//! - Returned stores have migrations fully applied.
//! - Timestamps are stored as integer microseconds since the Unix epoch.
//! - Blocking SQLite calls never run on an async worker thread.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::migrations::apply_migrations;
use super::{check_limits, TodoStore};
use crate::error::{StoreError, StoreResult};
use crate::types::{NewTodo, Todo, TodoId, TodoStatus};

const TODO_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    completed,
    created_at,
    updated_at
FROM todos";

/// Durable store over a single SQLite connection.
#[derive(Debug, Clone)]
pub struct SqliteTodoStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteTodoStore {
    /// Opens (creating if needed) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let started_at = Instant::now();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path)?;
        let store = Self::bootstrap(conn)?;
        tracing::info!(
            path = %path.display(),
            duration_ms = started_at.elapsed().as_millis() as u64,
            "opened sqlite todo store"
        );
        Ok(store)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::bootstrap(conn)
    }

    fn bootstrap(mut conn: Connection) -> StoreResult<Self> {
        conn.busy_timeout(Duration::from_secs(5))?;
        apply_migrations(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs `op` against the connection on the blocking thread pool.
    async fn with_conn<T, F>(&self, op: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|_| StoreError::LockPoisoned)?;
            op(&guard)
        })
        .await?
    }
}

#[async_trait]
impl TodoStore for SqliteTodoStore {
    async fn insert(&self, todo: NewTodo) -> StoreResult<Todo> {
        check_limits(&todo.title, todo.description.as_deref())?;
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO todos (title, description, completed, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    todo.title.as_str(),
                    todo.description.as_deref(),
                    todo.completed,
                    todo.created_at.timestamp_micros(),
                    todo.updated_at.timestamp_micros(),
                ],
            )?;
            Ok(todo.with_id(conn.last_insert_rowid()))
        })
        .await
    }

    async fn find(&self, id: TodoId) -> StoreResult<Option<Todo>> {
        self.with_conn(move |conn| {
            let row = conn
                .query_row(&format!("{TODO_SELECT_SQL} WHERE id = ?1;"), [id], read_row)
                .optional()?;
            row.map(into_todo).transpose()
        })
        .await
    }

    async fn scan(&self, status: TodoStatus) -> StoreResult<Vec<Todo>> {
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "{TODO_SELECT_SQL}
                 WHERE (?1 IS NULL OR completed = ?1)
                 ORDER BY created_at DESC, id DESC;"
            ))?;
            let rows = stmt.query_map([status.completed()], read_row)?;

            let mut todos = Vec::new();
            for row in rows {
                todos.push(into_todo(row?)?);
            }
            Ok(todos)
        })
        .await
    }

    async fn save(&self, todo: &Todo) -> StoreResult<bool> {
        check_limits(&todo.title, todo.description.as_deref())?;
        let todo = todo.clone();
        self.with_conn(move |conn| {
            let changed = conn.execute(
                "UPDATE todos
                 SET title = ?1, description = ?2, completed = ?3, updated_at = ?4
                 WHERE id = ?5;",
                params![
                    todo.title.as_str(),
                    todo.description.as_deref(),
                    todo.completed,
                    todo.updated_at.timestamp_micros(),
                    todo.id,
                ],
            )?;
            Ok(changed > 0)
        })
        .await
    }

    async fn remove(&self, id: TodoId) -> StoreResult<bool> {
        self.with_conn(move |conn| {
            let changed = conn.execute("DELETE FROM todos WHERE id = ?1;", [id])?;
            Ok(changed > 0)
        })
        .await
    }
}

struct RawTodo {
    id: TodoId,
    title: String,
    description: Option<String>,
    completed: i64,
    created_at: i64,
    updated_at: i64,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<RawTodo> {
    Ok(RawTodo {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        completed: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

fn into_todo(raw: RawTodo) -> StoreResult<Todo> {
    let completed = match raw.completed {
        0 => false,
        1 => true,
        other => {
            return Err(StoreError::InvalidData(format!(
                "todo {} has completed = {other}",
                raw.id
            )))
        }
    };
    Ok(Todo {
        id: raw.id,
        title: raw.title,
        description: raw.description,
        completed,
        created_at: micros_to_datetime(raw.id, raw.created_at)?,
        updated_at: micros_to_datetime(raw.id, raw.updated_at)?,
    })
}

fn micros_to_datetime(id: TodoId, micros: i64) -> StoreResult<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros).ok_or_else(|| {
        StoreError::InvalidData(format!("todo {id} has out-of-range timestamp {micros}"))
    })
}
