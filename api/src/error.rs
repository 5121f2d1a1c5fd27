use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use shared::ServiceError;
use tracing::error;

/// HTTP-facing wrapper around the service taxonomy.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

pub type ApiResult<T> = Result<Json<T>, ApiError>;

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ServiceError::Unauthenticated => (StatusCode::UNAUTHORIZED, self.0.to_string()),
            ServiceError::Forbidden => (StatusCode::FORBIDDEN, self.0.to_string()),
            ServiceError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, self.0.to_string()),
            ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, self.0.to_string()),
            ServiceError::Conflict(_) => (StatusCode::CONFLICT, self.0.to_string()),
            ServiceError::Database(e) => {
                // Store detail goes to the log, not the client.
                error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        let cases = [
            (ServiceError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (ServiceError::Forbidden, StatusCode::FORBIDDEN),
            (
                ServiceError::validation("bad amount"),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (ServiceError::NotFound("wallet"), StatusCode::NOT_FOUND),
            (
                ServiceError::conflict("already approved"),
                StatusCode::CONFLICT,
            ),
        ];

        for (err, expected) in cases {
            let response = ApiError(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
