use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Failure kinds a callable endpoint reports to its caller.
///
/// The message is always caller-safe; details of the underlying failure are
/// logged where the error is created and never leave the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    Unauthenticated(&'static str),
    NotFound(&'static str),
    InvalidArgument(&'static str),
    ResourceExhausted(&'static str),
    Internal(&'static str),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            AppError::ResourceExhausted(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Canonical status name used by callable clients.
    pub fn status_name(&self) -> &'static str {
        match self {
            AppError::Unauthenticated(_) => "UNAUTHENTICATED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InvalidArgument(_) => "INVALID_ARGUMENT",
            AppError::ResourceExhausted(_) => "RESOURCE_EXHAUSTED",
            AppError::Internal(_) => "INTERNAL",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            AppError::Unauthenticated(msg)
            | AppError::NotFound(msg)
            | AppError::InvalidArgument(msg)
            | AppError::ResourceExhausted(msg)
            | AppError::Internal(msg) => msg,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    status: &'static str,
    message: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse {
            error: ErrorBody {
                code: status.as_u16(),
                status: self.status_name(),
                message: self.message(),
            },
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn error_body_carries_kind_and_message() {
        let response = AppError::NotFound("User not found in database").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"]["code"], 404);
        assert_eq!(json["error"]["status"], "NOT_FOUND");
        assert_eq!(json["error"]["message"], "User not found in database");
    }

    #[test]
    fn every_kind_maps_to_its_status() {
        assert_eq!(
            AppError::Unauthenticated("x").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::InvalidArgument("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::ResourceExhausted("x").status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AppError::Internal("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(AppError::Internal("x").status_name(), "INTERNAL");
    }
}
