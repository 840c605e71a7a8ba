//! Todo lifecycle management.
//!
//! # Responsibility
//! - Own the business rules for creating, reading, filtering, updating,
//!   toggling and deleting todos.
//! - Own the initial defaults and timestamp bookkeeping of every record.
//!
//! # Invariants
//! - `created_at` is written once; `updated_at` is refreshed on every
//!   successful mutation and never drops below `created_at`.
//! - Missing records are reported as `None` / `false`, never as errors.
//! - Storage failures propagate unchanged; nothing is retried.

use std::sync::Arc;

use crate::error::StoreResult;
use crate::store::TodoStore;
use crate::types::{now, NewTodo, Todo, TodoId, TodoPatch, TodoStatus};

/// Lifecycle manager over an already-open store.
#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    /// Lists matching todos, most recently created first.
    pub async fn list(&self, status: TodoStatus) -> StoreResult<Vec<Todo>> {
        let todos = self.store.scan(status).await?;
        tracing::debug!(status = status.as_str(), count = todos.len(), "listed todos");
        Ok(todos)
    }

    pub async fn get_by_id(&self, id: TodoId) -> StoreResult<Option<Todo>> {
        let todo = self.store.find(id).await?;
        tracing::debug!(todo_id = id, found = todo.is_some(), "fetched todo");
        Ok(todo)
    }

    /// Creates an active todo. `title` is stored exactly as given.
    pub async fn create(&self, title: String, description: Option<String>) -> StoreResult<Todo> {
        let at = now();
        let todo = self
            .store
            .insert(NewTodo {
                title,
                description,
                completed: false,
                created_at: at,
                updated_at: at,
            })
            .await?;
        tracing::info!(todo_id = todo.id, "created todo");
        Ok(todo)
    }

    /// Overwrites every field present in `patch`.
    ///
    /// Returns `None` when no todo has that id.
    pub async fn update(&self, id: TodoId, patch: TodoPatch) -> StoreResult<Option<Todo>> {
        let Some(mut todo) = self.store.find(id).await? else {
            return Ok(None);
        };
        patch.apply_to(&mut todo);
        let todo = self.persist(todo).await?;
        if let Some(todo) = &todo {
            tracing::info!(todo_id = todo.id, "updated todo");
        }
        Ok(todo)
    }

    /// Sets the completion flag. Returns `None` when no todo has that id.
    pub async fn toggle_status(&self, id: TodoId, completed: bool) -> StoreResult<Option<Todo>> {
        let Some(mut todo) = self.store.find(id).await? else {
            return Ok(None);
        };
        todo.completed = completed;
        let todo = self.persist(todo).await?;
        if let Some(todo) = &todo {
            tracing::info!(todo_id = todo.id, completed, "changed todo status");
        }
        Ok(todo)
    }

    /// Returns `true` when a todo was actually removed.
    pub async fn delete(&self, id: TodoId) -> StoreResult<bool> {
        let removed = self.store.remove(id).await?;
        if removed {
            tracing::info!(todo_id = id, "deleted todo");
        }
        Ok(removed)
    }

    /// Refreshes `updated_at` and writes the record back.
    ///
    /// A record deleted between the read and the write stays deleted.
    async fn persist(&self, mut todo: Todo) -> StoreResult<Option<Todo>> {
        todo.updated_at = now().max(todo.created_at);
        if self.store.save(&todo).await? {
            Ok(Some(todo))
        } else {
            Ok(None)
        }
    }
}
