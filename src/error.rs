use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RestError>;

#[derive(Debug, Error)]
pub enum RestError {
    #[error("Endpoint '{endpoint}' not found on viewset {viewset}")]
    EndpointNotFound { viewset: String, endpoint: String },

    #[error("Invalid route path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Route already registered: {method} {path}")]
    DuplicateRoute { method: String, path: String },

    #[error("Route '{path}' conflicts with '{existing}'")]
    RouteConflict { path: String, existing: String },

    #[error("Dependency '{name}' was not injected into the request")]
    DependencyMissing { name: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RestError {
    pub fn status(&self) -> StatusCode {
        match self {
            RestError::NotFound(_) => StatusCode::NOT_FOUND,
            RestError::InvalidPayload(_) => StatusCode::UNPROCESSABLE_ENTITY,
            RestError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            RestError::Forbidden(_) => StatusCode::FORBIDDEN,
            RestError::EndpointNotFound { .. }
            | RestError::InvalidPath { .. }
            | RestError::DuplicateRoute { .. }
            | RestError::RouteConflict { .. }
            | RestError::DependencyMissing { .. }
            | RestError::Database(_)
            | RestError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<serde_json::Error> for RestError {
    fn from(err: serde_json::Error) -> Self {
        RestError::InvalidPayload(err.to_string())
    }
}

#[cfg(feature = "sea-orm-db")]
impl From<sea_orm::DbErr> for RestError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err {
            sea_orm::DbErr::Json(msg) => RestError::InvalidPayload(msg),
            other => RestError::Database(other.to_string()),
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            RestError::NotFound("item 1".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            RestError::InvalidPayload("missing field".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            RestError::Unauthorized("no token".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            RestError::DependencyMissing { name: "db".into() }.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_json_error_becomes_invalid_payload() {
        let err = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        assert!(matches!(RestError::from(err), RestError::InvalidPayload(_)));
    }

    #[tokio::test]
    async fn test_into_response_has_detail_body() {
        let response = RestError::Forbidden("read only".into()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["detail"], "Forbidden: read only");
    }
}
