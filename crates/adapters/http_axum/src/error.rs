//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use progrmobil_domain::error::{PayloadError, ProgrMobilError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`ProgrMobilError`] to an HTTP response with appropriate status code.
pub struct ApiError(ProgrMobilError);

impl From<ProgrMobilError> for ApiError {
    fn from(err: ProgrMobilError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ProgrMobilError::Validation(err @ ValidationError::Payload(payload)) => {
                let status = if matches!(payload, PayloadError::Malformed(_)) {
                    StatusCode::BAD_REQUEST
                } else {
                    StatusCode::UNPROCESSABLE_ENTITY
                };
                (status, err.to_string())
            }
            ProgrMobilError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ProgrMobilError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            ProgrMobilError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use progrmobil_domain::error::{FilterError, NotFoundError};

    fn status_of(err: impl Into<ProgrMobilError>) -> StatusCode {
        ApiError(err.into()).into_response().status()
    }

    #[test]
    fn should_map_each_error_kind_to_its_status() {
        assert_eq!(
            status_of(ValidationError::InvalidId("abc".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ValidationError::from(FilterError::NotAnObject)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ValidationError::from(PayloadError::Malformed("eof".into()))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ValidationError::from(PayloadError::MissingProperty("name"))),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(NotFoundError {
                entity: "Alumno",
                id: "9".into(),
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ProgrMobilError::Storage("disk full".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
