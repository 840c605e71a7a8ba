//! In-process todo store.
//!
//! # Design
//! A `tokio::sync::RwLock` guards an ordered map and a monotonic id counter.
//! Every trait call takes the lock once, so each call is atomic. Nothing is
//! durable; the store lives as long as the process.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{check_limits, TodoStore};
use crate::error::StoreResult;
use crate::types::{NewTodo, Todo, TodoId, TodoStatus};

#[derive(Debug, Default)]
struct State {
    last_id: TodoId,
    rows: BTreeMap<TodoId, Todo>,
}

/// Volatile store used by tests and `--storage memory`.
#[derive(Debug, Clone, Default)]
pub struct MemoryTodoStore {
    state: Arc<RwLock<State>>,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn insert(&self, todo: NewTodo) -> StoreResult<Todo> {
        check_limits(&todo.title, todo.description.as_deref())?;
        let mut state = self.state.write().await;
        state.last_id += 1;
        let todo = todo.with_id(state.last_id);
        state.rows.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn find(&self, id: TodoId) -> StoreResult<Option<Todo>> {
        Ok(self.state.read().await.rows.get(&id).cloned())
    }

    async fn scan(&self, status: TodoStatus) -> StoreResult<Vec<Todo>> {
        let state = self.state.read().await;
        let mut todos: Vec<Todo> = state
            .rows
            .values()
            .filter(|todo| status.matches(todo))
            .cloned()
            .collect();
        todos.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(todos)
    }

    async fn save(&self, todo: &Todo) -> StoreResult<bool> {
        check_limits(&todo.title, todo.description.as_deref())?;
        let mut state = self.state.write().await;
        match state.rows.get_mut(&todo.id) {
            Some(stored) => {
                *stored = todo.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove(&self, id: TodoId) -> StoreResult<bool> {
        Ok(self.state.write().await.rows.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::now;

    fn new_todo(title: &str) -> NewTodo {
        let at = now();
        NewTodo {
            title: title.to_string(),
            description: None,
            completed: false,
            created_at: at,
            updated_at: at,
        }
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_remove() {
        let store = MemoryTodoStore::new();
        let first = store.insert(new_todo("a")).await.unwrap();
        assert!(store.remove(first.id).await.unwrap());
        let second = store.insert(new_todo("b")).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn scan_breaks_created_at_ties_by_newest_id() {
        let store = MemoryTodoStore::new();
        let mut a = new_todo("a");
        let mut b = new_todo("b");
        let at = now();
        a.created_at = at;
        b.created_at = at;
        store.insert(a).await.unwrap();
        store.insert(b).await.unwrap();

        let titles: Vec<String> = store
            .scan(TodoStatus::All)
            .await
            .unwrap()
            .into_iter()
            .map(|todo| todo.title)
            .collect();
        assert_eq!(titles, ["b", "a"]);
    }

    #[tokio::test]
    async fn save_reports_missing_record() {
        let store = MemoryTodoStore::new();
        let todo = new_todo("ghost").with_id(42);
        assert!(!store.save(&todo).await.unwrap());
        assert!(store.find(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn insert_rejects_overlong_title() {
        let store = MemoryTodoStore::new();
        let result = store.insert(new_todo(&"x".repeat(101))).await;
        assert!(result.is_err());
        assert!(store.scan(TodoStatus::All).await.unwrap().is_empty());
    }
}
