//! Core of the todo service: data model, storage, lifecycle rules and
//! request validation.
//!
//! # Overview
//! Calls flow one way: `TodoDispatcher` validates raw transport input and
//! forwards well-formed requests to `TodoService`, which applies the business
//! rules against a `TodoStore`. Nothing here knows about HTTP.
//!
//! # Design
//! - The service is built from an already-open store and handed to the
//!   dispatcher, so there is no "not initialized" state to check at runtime.
//! - Validation failures and missing records are `Outcome` values; only
//!   storage faults travel as `StoreError`.
//! - Two stores ship with the crate: `SqliteTodoStore` for durable data and
//!   `MemoryTodoStore` for tests and throwaway runs.

pub mod dispatch;
pub mod error;
pub mod service;
pub mod store;
pub mod types;

pub use dispatch::{Outcome, TodoDispatcher};
pub use error::{StoreError, StoreResult};
pub use service::TodoService;
pub use store::{MemoryTodoStore, SqliteTodoStore, TodoStore};
pub use types::{
    Field, NewTodo, Todo, TodoId, TodoPatch, TodoStatus, DESCRIPTION_MAX_CHARS, TITLE_MAX_CHARS,
};
