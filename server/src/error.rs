//! Error types for the HTTP layer and process bootstrap.
//!
//! # Design
//! `ApiError` is what a handler can fail with; its `IntoResponse` impl is the
//! only place a status code and `{"message": ...}` body are chosen for a
//! failure. Storage faults are logged here with full detail and answered with
//! an opaque message. `ServerError` covers startup and shutdown failures of
//! the binary.

use std::io;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use todo_core::StoreError;
use utoipa::ToSchema;

/// JSON body of every non-2xx response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
}

/// Failure of a single HTTP request.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound,
    RouteNotFound,
    Internal(StoreError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound | Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            Self::BadRequest(reason) => reason,
            Self::NotFound => "Todo not found".to_string(),
            Self::RouteNotFound => "Route not found".to_string(),
            Self::Internal(err) => {
                tracing::error!(error = %err, "storage failure while handling request");
                "Internal server error".to_string()
            }
        };
        (status, Json(ErrorBody { message })).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Internal(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Failures while starting or running the server process.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid log filter `{filter}`: {reason}")]
    LogFilter { filter: String, reason: String },

    #[error("failed to install log subscriber: {0}")]
    Logging(String),

    #[error("invalid bind address `{addr}`: {source}")]
    BindAddress {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to open todo store: {0}")]
    Store(#[from] StoreError),

    #[error("server i/o error: {0}")]
    Io(#[from] io::Error),
}
