//! Error type shared by the resolver, lister and HTTP handlers.

use std::io;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::views;

/// Everything that can stop a request from producing a page.
///
/// Oversized, binary and undecodable files are not errors; they are
/// [`crate::render::FileKind`] states rendered as placeholders.
#[derive(Error, Debug)]
pub enum BrowseError {
    /// The requested path escapes the repository root.
    #[error("Access denied: {0}")]
    ForbiddenPath(String),

    /// The requested path does not exist.
    #[error("Path not found: {0}")]
    NotFound(String),

    /// A directory listing was requested for something that is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A blocking filesystem task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, BrowseError>;

impl BrowseError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            BrowseError::ForbiddenPath(_) => StatusCode::FORBIDDEN,
            BrowseError::NotFound(_) | BrowseError::NotADirectory(_) => StatusCode::NOT_FOUND,
            BrowseError::Io(_) | BrowseError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the client. Internal failures stay generic.
    pub fn public_message(&self) -> &'static str {
        match self {
            BrowseError::ForbiddenPath(_) => "Access denied.",
            BrowseError::NotFound(_) => "Path not found.",
            BrowseError::NotADirectory(_) => "Requested path is not a directory.",
            BrowseError::Io(_) | BrowseError::Task(_) => "Could not process path.",
        }
    }
}

impl IntoResponse for BrowseError {
    fn into_response(self) -> Response {
        views::error_response(self.status_code(), self.public_message())
    }
}

/// JSON flavour of [`BrowseError`] for the `/api` routes.
#[derive(Debug)]
pub struct ApiError(pub BrowseError);

impl From<BrowseError> for ApiError {
    fn from(err: BrowseError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.0.public_message() }));
        (self.0.status_code(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_error_kinds_to_status_codes() {
        assert_eq!(
            BrowseError::ForbiddenPath("../x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            BrowseError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            BrowseError::NotADirectory("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        let io_err = BrowseError::from(io::Error::new(io::ErrorKind::Other, "boom"));
        assert_eq!(io_err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn internal_errors_do_not_leak_details() {
        let err = BrowseError::from(io::Error::new(io::ErrorKind::Other, "/secret/path"));
        assert!(!err.public_message().contains("secret"));
    }
}
