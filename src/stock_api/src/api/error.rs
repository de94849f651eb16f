use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::{error, warn};

use crate::errors::{Error, ErrorKind};

/// JSON error body: `{"error": "...", "timestamp": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub timestamp: String,
}

/// An [`Error`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
        ErrorKind::InvalidSymbol => StatusCode::NOT_FOUND,
        ErrorKind::ExternalServiceFailure => StatusCode::BAD_GATEWAY,
        ErrorKind::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = status_for(kind);
        match kind {
            ErrorKind::ExternalServiceFailure => error!(error = %self.0, "Request failed"),
            _ => warn!(error = %self.0, status = status.as_u16(), "Request rejected"),
        }

        let body = ErrorBody {
            error: self.0.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        (status, Json(body)).into_response()
    }
}
