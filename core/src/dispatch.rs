//! Input validation and outcome mapping in front of `TodoService`.
//!
//! # Design
//! Every method takes the raw values a transport extracted (path segment,
//! query value, JSON body) and validates their shape before the service is
//! called. Results are `Outcome` values; only storage faults are `Err`.
//! The dispatcher holds no state of its own beyond the service handle.

use serde_json::{Map, Value};

use crate::error::StoreResult;
use crate::service::TodoService;
use crate::types::{Field, Todo, TodoId, TodoPatch, TodoStatus};

/// Result category of one dispatched operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// Success carrying data.
    Data(T),
    /// Success without a payload.
    Empty,
    NotFound,
    /// Malformed input; the reason is safe to show to the caller.
    BadRequest(String),
}

impl<T> Outcome<T> {
    fn found(value: Option<T>) -> Self {
        value.map_or(Self::NotFound, Self::Data)
    }
}

/// Converts a validation failure into an early `Ok(Outcome::BadRequest)`.
macro_rules! validate {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(reason) => {
                tracing::debug!(%reason, "rejected malformed request");
                return Ok(Outcome::BadRequest(reason));
            }
        }
    };
}

/// Validation and dispatch layer for the six todo operations.
#[derive(Clone)]
pub struct TodoDispatcher {
    service: TodoService,
}

impl TodoDispatcher {
    pub fn new(service: TodoService) -> Self {
        Self { service }
    }

    /// Lists todos. Unrecognized `status` values fall back to all todos.
    pub async fn list(&self, status: Option<&str>) -> StoreResult<Outcome<Vec<Todo>>> {
        let todos = self.service.list(TodoStatus::from_query(status)).await?;
        Ok(Outcome::Data(todos))
    }

    pub async fn get(&self, raw_id: &str) -> StoreResult<Outcome<Todo>> {
        let id = validate!(parse_id(raw_id));
        Ok(Outcome::found(self.service.get_by_id(id).await?))
    }

    /// Creates a todo from a `{title, description?}` body.
    pub async fn create(&self, body: &Value) -> StoreResult<Outcome<Todo>> {
        let fields = validate!(as_object(body));
        let title = validate!(required_title(fields));
        let description = validate!(optional_text(fields, "description")).flatten();
        Ok(Outcome::Data(self.service.create(title, description).await?))
    }

    /// Applies a `{title?, description?, completed?}` patch.
    pub async fn update(&self, raw_id: &str, body: &Value) -> StoreResult<Outcome<Todo>> {
        let id = validate!(parse_id(raw_id));
        let patch = validate!(parse_patch(body));
        Ok(Outcome::found(self.service.update(id, patch).await?))
    }

    /// Sets the completion flag from a `{completed}` body.
    pub async fn toggle_status(&self, raw_id: &str, body: &Value) -> StoreResult<Outcome<Todo>> {
        let id = validate!(parse_id(raw_id));
        let completed = validate!(parse_completed(body));
        Ok(Outcome::found(self.service.toggle_status(id, completed).await?))
    }

    pub async fn delete(&self, raw_id: &str) -> StoreResult<Outcome<()>> {
        let id = validate!(parse_id(raw_id));
        if self.service.delete(id).await? {
            Ok(Outcome::Empty)
        } else {
            Ok(Outcome::NotFound)
        }
    }
}

/// Id assigned to out-of-range path values. Storage never hands it out.
const UNASSIGNED_ID: TodoId = 0;

/// Reads the leading integer of a path segment.
///
/// Leading whitespace and a sign are allowed and anything after the digits is
/// ignored, so `"1abc"` and `"1.5"` both name todo 1. Only a segment with no
/// leading digits is rejected.
fn parse_id(raw: &str) -> Result<TodoId, String> {
    let trimmed = raw.trim_start();
    let unsigned = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
    let sign_len = trimmed.len() - unsigned.len();
    let digits = unsigned.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return Err(format!("invalid id `{raw}`: expected an integer"));
    }
    Ok(trimmed[..sign_len + digits]
        .parse::<TodoId>()
        .unwrap_or(UNASSIGNED_ID))
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, String> {
    body.as_object()
        .ok_or_else(|| "request body must be a JSON object".to_string())
}

fn required_title(fields: &Map<String, Value>) -> Result<String, String> {
    match fields.get("title") {
        None | Some(Value::Null) => Err("title is required".to_string()),
        Some(Value::String(title)) if title.trim().is_empty() => {
            Err("title is required".to_string())
        }
        Some(Value::String(title)) => Ok(title.clone()),
        Some(_) => Err("title must be a string".to_string()),
    }
}

/// Reads a nullable text field. Outer `None` means the key is absent.
fn optional_text(fields: &Map<String, Value>, key: &str) -> Result<Option<Option<String>>, String> {
    match fields.get(key) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(Value::String(value)) => Ok(Some(Some(value.clone()))),
        Some(_) => Err(format!("{key} must be a string or null")),
    }
}

fn parse_completed(body: &Value) -> Result<bool, String> {
    as_object(body)?
        .get("completed")
        .and_then(Value::as_bool)
        .ok_or_else(|| "completed must be a boolean".to_string())
}

fn parse_patch(body: &Value) -> Result<TodoPatch, String> {
    let fields = as_object(body)?;
    let mut patch = TodoPatch::default();

    match fields.get("title") {
        None => {}
        Some(Value::String(title)) => patch.title = Field::Present(title.clone()),
        Some(_) => return Err("title must be a string".to_string()),
    }
    if let Some(description) = optional_text(fields, "description")? {
        patch.description = Field::Present(description);
    }
    match fields.get("completed") {
        None => {}
        Some(Value::Bool(completed)) => patch.completed = Field::Present(*completed),
        Some(_) => return Err("completed must be a boolean".to_string()),
    }

    if patch.is_empty() {
        return Err("no updatable fields provided".to_string());
    }
    Ok(patch)
}
