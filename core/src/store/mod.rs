//! Storage contract for todo records and its implementations.
//!
//! # Responsibility
//! - Insert with a generated id, point lookup, filtered ordered scan,
//!   full-record update and delete-by-id.
//!
//! # Invariants
//! - Each call is individually atomic; there are no multi-call transactions.
//! - Ids are never reused after deletion.
//! - `scan` orders by `created_at` descending, then by id descending.
//! - Length limits are enforced here, not by callers.

use async_trait::async_trait;

use crate::error::{StoreError, StoreResult};
use crate::types::{NewTodo, Todo, TodoId, TodoStatus, DESCRIPTION_MAX_CHARS, TITLE_MAX_CHARS};

mod memory;
pub mod migrations;
mod sqlite;

pub use memory::MemoryTodoStore;
pub use sqlite::SqliteTodoStore;

/// Durable keyed storage for todos.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Persists a new record and returns it with its assigned id.
    async fn insert(&self, todo: NewTodo) -> StoreResult<Todo>;

    async fn find(&self, id: TodoId) -> StoreResult<Option<Todo>>;

    /// Returns every record matching `status`, most recently created first.
    async fn scan(&self, status: TodoStatus) -> StoreResult<Vec<Todo>>;

    /// Overwrites the stored record with the same id.
    ///
    /// Returns `false` when no such record exists anymore.
    async fn save(&self, todo: &Todo) -> StoreResult<bool>;

    /// Returns `true` when a record was actually removed.
    async fn remove(&self, id: TodoId) -> StoreResult<bool>;
}

pub(crate) fn check_limits(title: &str, description: Option<&str>) -> StoreResult<()> {
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(StoreError::Constraint {
            field: "title",
            reason: format!("exceeds {TITLE_MAX_CHARS} characters"),
        });
    }
    if description.is_some_and(|value| value.chars().count() > DESCRIPTION_MAX_CHARS) {
        return Err(StoreError::Constraint {
            field: "description",
            reason: format!("exceeds {DESCRIPTION_MAX_CHARS} characters"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::check_limits;
    use crate::error::StoreError;

    #[test]
    fn limits_accept_boundary_lengths() {
        let title = "t".repeat(100);
        let description = "d".repeat(500);
        assert!(check_limits(&title, Some(&description)).is_ok());
        assert!(check_limits("", None).is_ok());
    }

    #[test]
    fn limits_count_characters_not_bytes() {
        let title = "é".repeat(100);
        assert!(check_limits(&title, None).is_ok());
    }

    #[test]
    fn limits_reject_long_fields() {
        let err = check_limits(&"t".repeat(101), None).unwrap_err();
        assert!(matches!(err, StoreError::Constraint { field: "title", .. }));

        let err = check_limits("ok", Some(&"d".repeat(501))).unwrap_err();
        assert!(matches!(err, StoreError::Constraint { field: "description", .. }));
    }
}
