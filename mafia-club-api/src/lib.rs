use axum::response::IntoResponse;
use mafia_club_app::ServiceError;

pub mod bot;
pub mod http;

/// Wraps the application error so the web view can answer with it.
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::http::Response<axum::body::Body> {
        let (status, msg) = match self.0 {
            ServiceError::NotFound(msg) => (axum::http::StatusCode::NOT_FOUND, msg),
            ServiceError::Validation(msg) => (axum::http::StatusCode::BAD_REQUEST, msg),
            ServiceError::Forbidden(msg) => (axum::http::StatusCode::FORBIDDEN, msg),
            ServiceError::Internal(msg) => (axum::http::StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        let body = serde_json::json!({ "error": msg });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        let cases = [
            (ServiceError::NotFound("x".into()), 404),
            (ServiceError::Validation("x".into()), 400),
            (ServiceError::Forbidden("x".into()), 403),
            (ServiceError::Internal("x".into()), 500),
        ];
        for (err, status) in cases {
            let response = ApiError(err).into_response();
            assert_eq!(response.status().as_u16(), status);
        }
    }
}
