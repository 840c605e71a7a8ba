//! Domain types for the todo resource.
//!
//! # Design
//! `Todo` is the only entity. `NewTodo` is the fully-defaulted record handed
//! to storage before an id exists, so the store never decides field defaults.
//! `TodoPatch` wraps every field in `Field` so an omitted key and a key set to
//! its zero value stay distinguishable all the way down to the merge.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Storage-assigned identifier of a todo.
pub type TodoId = i64;

/// Maximum title length accepted by storage, in characters.
pub const TITLE_MAX_CHARS: usize = 100;

/// Maximum description length accepted by storage, in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// A single todo item as stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    #[cfg_attr(feature = "openapi", schema(value_type = i64))]
    pub id: TodoId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A todo that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewTodo {
    /// Attaches the id generated by storage.
    pub fn with_id(self, id: TodoId) -> Todo {
        Todo {
            id,
            title: self.title,
            description: self.description,
            completed: self.completed,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Status filter for listing todos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TodoStatus {
    #[default]
    All,
    Completed,
    Active,
}

impl TodoStatus {
    /// Parses the `status` query value. Missing or unknown values mean `All`.
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("completed") => Self::Completed,
            Some("active") => Self::Active,
            _ => Self::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Completed => "completed",
            Self::Active => "active",
        }
    }

    /// Returns the `completed` value this filter selects, or `None` for `All`.
    pub fn completed(self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::Completed => Some(true),
            Self::Active => Some(false),
        }
    }

    pub fn matches(self, todo: &Todo) -> bool {
        self.completed().map_or(true, |completed| todo.completed == completed)
    }
}

/// Explicit presence marker for one field of a patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Field<T> {
    #[default]
    Absent,
    Present(T),
}

impl<T> Field<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Overwrites `target` when the field is present.
    pub fn apply_to(self, target: &mut T) {
        if let Self::Present(value) = self {
            *target = value;
        }
    }
}

/// Partial set of field updates for an existing todo.
///
/// `description: Present(None)` clears the stored description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Field<String>,
    pub description: Field<Option<String>>,
    pub completed: Field<bool>,
}

impl TodoPatch {
    pub fn is_empty(&self) -> bool {
        !self.title.is_present() && !self.description.is_present() && !self.completed.is_present()
    }

    /// Overwrites every present field of `todo`. Timestamps are left alone.
    pub fn apply_to(self, todo: &mut Todo) {
        self.title.apply_to(&mut todo.title);
        self.description.apply_to(&mut todo.description);
        self.completed.apply_to(&mut todo.completed);
    }
}

/// Current time at the precision every store can round-trip.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
