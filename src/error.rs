// Errors raised while talking to the CRM API
use crate::domain::resource::Resource;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

pub type CrmResult<T> = Result<T, CrmError>;

#[derive(Debug, Error)]
pub enum CrmError {
    #[error("CRM API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CRM API returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("{} {id} not found", .resource.singular())]
    NotFound { resource: Resource, id: String },

    #[error("Failed to decode CRM API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("CRM API request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CrmError {
    /// Status to report to our own clients.
    ///
    /// Client errors from the CRM API (validation, conflicts) pass through;
    /// anything else upstream is a bad gateway.
    pub fn status_code(&self) -> StatusCode {
        match self {
            CrmError::NotFound { .. } => StatusCode::NOT_FOUND,
            CrmError::Status { status, .. } if status.is_client_error() => *status,
            CrmError::Status { .. } | CrmError::Decode(_) => StatusCode::BAD_GATEWAY,
            CrmError::Http(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            CrmError::Http(_) => StatusCode::BAD_GATEWAY,
            CrmError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            CrmError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CrmError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("CRM request failed: {}", self);
        } else {
            tracing::debug!("CRM request rejected: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
