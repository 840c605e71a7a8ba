//! HTTP binding for the todo service.
//!
//! # Design
//! Handlers stay thin: they pull the raw path segment, query value and JSON
//! body out of the request, hand them to `TodoDispatcher`, and translate the
//! resulting `Outcome` into a status code. All validation lives in the core
//! crate so the rules do not depend on axum.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use utoipa::{IntoParams, OpenApi};

use todo_core::{
    MemoryTodoStore, Outcome, SqliteTodoStore, Todo, TodoDispatcher, TodoService, TodoStore,
};

pub mod config;
pub mod error;
pub mod logging;
pub mod openapi;

pub use config::{Config, LogFormat, StorageKind};
pub use error::{ApiError, ErrorBody, ServerError};
pub use logging::init_logging;

/// Query string of `GET /api/todos`.
#[derive(Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// `all`, `completed` or `active`; anything else lists all todos.
    pub status: Option<String>,
}

impl ListQuery {
    /// Builds the filter from raw query pairs.
    ///
    /// A query that cannot be decoded, or that repeats `status`, carries no
    /// usable filter and lists all todos.
    pub fn from_pairs(pairs: Result<Query<Vec<(String, String)>>, QueryRejection>) -> Self {
        let Ok(Query(pairs)) = pairs else {
            return Self::default();
        };
        let mut values = pairs
            .into_iter()
            .filter(|(key, _)| key == "status")
            .map(|(_, value)| value);
        match (values.next(), values.next()) {
            (Some(status), None) => Self {
                status: Some(status),
            },
            _ => Self::default(),
        }
    }
}

/// Builds the router around an already-wired dispatcher.
pub fn app(dispatcher: TodoDispatcher) -> Router {
    let todos = Router::new()
        .route("/", get(list_todos).post(create_todo))
        .route("/{id}", get(get_todo).put(update_todo).delete(delete_todo))
        .route("/{id}/status", patch(toggle_todo_status));

    let mut router = Router::new()
        .route("/", get(root))
        .nest("/api/todos", todos)
        .route("/api/todos/", get(list_todos).post(create_todo));

    #[cfg(feature = "swagger-ui")]
    {
        use utoipa_swagger_ui::SwaggerUi;
        router = router.merge(
            SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
        );
    }
    #[cfg(not(feature = "swagger-ui"))]
    {
        router = router.route("/api-docs/openapi.json", get(openapi_json));
    }

    router = router.fallback(route_not_found);
    for (name, value) in security_headers() {
        router = router.layer(SetResponseHeaderLayer::if_not_present(name, value));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(dispatcher)
}

/// Hardening headers added to every response that does not set its own.
fn security_headers() -> [(HeaderName, HeaderValue); 6] {
    [
        (header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
        (header::X_FRAME_OPTIONS, HeaderValue::from_static("SAMEORIGIN")),
        (header::REFERRER_POLICY, HeaderValue::from_static("no-referrer")),
        (header::X_DNS_PREFETCH_CONTROL, HeaderValue::from_static("off")),
        (header::X_XSS_PROTECTION, HeaderValue::from_static("0")),
        (
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=15552000; includeSubDomains"),
        ),
    ]
}

/// Wires a dispatcher over the given store.
pub fn dispatcher(store: Arc<dyn TodoStore>) -> TodoDispatcher {
    TodoDispatcher::new(TodoService::new(store))
}

/// Dispatcher over a fresh in-memory store.
pub fn memory_dispatcher() -> TodoDispatcher {
    dispatcher(Arc::new(MemoryTodoStore::new()))
}

/// Opens the store selected by `config` and wires a dispatcher over it.
pub fn dispatcher_from_config(config: &Config) -> Result<TodoDispatcher, ServerError> {
    let store: Arc<dyn TodoStore> = match config.storage {
        StorageKind::Sqlite => Arc::new(SqliteTodoStore::open(&config.database_path)?),
        StorageKind::Memory => Arc::new(MemoryTodoStore::new()),
    };
    Ok(dispatcher(store))
}

/// Serves the API on `listener` until Ctrl-C is received.
pub async fn run(listener: TcpListener, dispatcher: TodoDispatcher) -> Result<(), std::io::Error> {
    axum::serve(listener, app(dispatcher))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(err) => {
            tracing::warn!(error = %err, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}

/// Maps a dispatch outcome to a response, using `success` for data payloads.
fn respond<T: Serialize>(outcome: Outcome<T>, success: StatusCode) -> Result<Response, ApiError> {
    match outcome {
        Outcome::Data(data) => Ok((success, Json(data)).into_response()),
        Outcome::Empty => Ok(StatusCode::NO_CONTENT.into_response()),
        Outcome::NotFound => Err(ApiError::NotFound),
        Outcome::BadRequest(reason) => Err(ApiError::BadRequest(reason)),
    }
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Todo list API",
        "endpoints": {
            "todos": "/api/todos",
            "documentation": "/api-docs",
            "openapi": "/api-docs/openapi.json",
        },
    }))
}

#[cfg(not(feature = "swagger-ui"))]
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(openapi::ApiDoc::openapi())
}

async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}

#[utoipa::path(
    get,
    path = "/api/todos",
    tag = "Todos",
    params(ListQuery),
    responses(
        (status = 200, description = "Matching todos, newest first", body = [Todo]),
        (status = 500, description = "Storage failure", body = ErrorBody),
    )
)]
async fn list_todos(
    State(todos): State<TodoDispatcher>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Response, ApiError> {
    let query = ListQuery::from_pairs(pairs);
    respond(todos.list(query.status.as_deref()).await?, StatusCode::OK)
}

#[utoipa::path(
    get,
    path = "/api/todos/{id}",
    tag = "Todos",
    params(("id" = i64, Path, description = "Todo id")),
    responses(
        (status = 200, description = "The todo", body = Todo),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "No todo with that id", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody),
    )
)]
async fn get_todo(
    State(todos): State<TodoDispatcher>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    respond(todos.get(&id).await?, StatusCode::OK)
}

#[utoipa::path(
    post,
    path = "/api/todos",
    tag = "Todos",
    request_body = openapi::CreateTodoRequest,
    responses(
        (status = 201, description = "Created todo", body = Todo),
        (status = 400, description = "Missing or blank title", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody),
    )
)]
async fn create_todo(
    State(todos): State<TodoDispatcher>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;
    respond(todos.create(&body).await?, StatusCode::CREATED)
}

#[utoipa::path(
    put,
    path = "/api/todos/{id}",
    tag = "Todos",
    params(("id" = i64, Path, description = "Todo id")),
    request_body = openapi::UpdateTodoRequest,
    responses(
        (status = 200, description = "Updated todo", body = Todo),
        (status = 400, description = "Malformed id or empty patch", body = ErrorBody),
        (status = 404, description = "No todo with that id", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody),
    )
)]
async fn update_todo(
    State(todos): State<TodoDispatcher>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;
    respond(todos.update(&id, &body).await?, StatusCode::OK)
}

#[utoipa::path(
    patch,
    path = "/api/todos/{id}/status",
    tag = "Todos",
    params(("id" = i64, Path, description = "Todo id")),
    request_body = openapi::ToggleStatusRequest,
    responses(
        (status = 200, description = "Todo with its new status", body = Todo),
        (status = 400, description = "Malformed id or non-boolean status", body = ErrorBody),
        (status = 404, description = "No todo with that id", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody),
    )
)]
async fn toggle_todo_status(
    State(todos): State<TodoDispatcher>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;
    respond(todos.toggle_status(&id, &body).await?, StatusCode::OK)
}

#[utoipa::path(
    delete,
    path = "/api/todos/{id}",
    tag = "Todos",
    params(("id" = i64, Path, description = "Todo id")),
    responses(
        (status = 204, description = "Todo deleted"),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "No todo with that id", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody),
    )
)]
async fn delete_todo(
    State(todos): State<TodoDispatcher>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    respond(todos.delete(&id).await?, StatusCode::NO_CONTENT)
}
