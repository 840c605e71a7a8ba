//! OpenAPI document for the todo API.
//!
//! The request body types below exist only to describe payloads; handlers
//! receive raw JSON and leave shape validation to `TodoDispatcher`.

use todo_core::Todo;
use utoipa::{OpenApi, ToSchema};

use crate::error::ErrorBody;

/// Body of `POST /api/todos`.
#[derive(Debug, ToSchema)]
pub struct CreateTodoRequest {
    #[schema(max_length = 100, example = "Buy milk")]
    pub title: String,
    #[schema(max_length = 500)]
    pub description: Option<String>,
}

/// Body of `PUT /api/todos/{id}`. At least one field is required.
#[derive(Debug, ToSchema)]
pub struct UpdateTodoRequest {
    pub title: Option<String>,
    /// `null` clears the description.
    pub description: Option<String>,
    pub completed: Option<bool>,
}

/// Body of `PATCH /api/todos/{id}/status`.
#[derive(Debug, ToSchema)]
pub struct ToggleStatusRequest {
    pub completed: bool,
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Todo API",
        description = "Create, list, filter, update, complete and delete todo items."
    ),
    paths(
        crate::list_todos,
        crate::get_todo,
        crate::create_todo,
        crate::update_todo,
        crate::toggle_todo_status,
        crate::delete_todo,
    ),
    components(schemas(Todo, CreateTodoRequest, UpdateTodoRequest, ToggleStatusRequest, ErrorBody)),
    tags((name = "Todos", description = "Todo lifecycle management"))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::ApiDoc;
    use utoipa::OpenApi;

    #[test]
    fn document_lists_every_todo_route() {
        let json = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = json["paths"].as_object().unwrap();
        assert!(paths.contains_key("/api/todos"));
        assert!(paths.contains_key("/api/todos/{id}"));
        assert!(paths.contains_key("/api/todos/{id}/status"));
        assert!(paths["/api/todos/{id}"].get("delete").is_some());
    }

    #[test]
    fn todo_schema_uses_camel_case() {
        let json = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let todo = &json["components"]["schemas"]["Todo"]["properties"];
        assert!(todo.get("createdAt").is_some());
        assert!(todo.get("updatedAt").is_some());
    }
}
