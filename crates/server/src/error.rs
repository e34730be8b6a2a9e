use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::DbErr;
use thiserror::Error;

use crate::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("{field} is required")]
    Validation { field: &'static str },
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Database(DbErr),
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        // The only uniqueness constraint in the schema is the ticket number;
        // a violation means a concurrent creator won the race.
        if err.to_string().to_lowercase().contains("unique") {
            ApiError::Conflict("Ticket number already taken by a concurrent request".to_string())
        } else {
            ApiError::Database(err)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Database(db_err) => match db_err {
                DbErr::RecordNotFound(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        };

        if status_code.is_server_error() {
            tracing::error!(
                status = %status_code,
                error = %self,
                "request failed"
            );
        }

        let response = ApiResponse::<()>::error(&self.to_string());
        (status_code, Json(response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_maps_to_expected_http_statuses() {
        assert_eq!(
            ApiError::NotFound("missing".to_string())
                .into_response()
                .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Validation { field: "name" }.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::BadRequest("bad".to_string())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Conflict("taken".to_string())
                .into_response()
                .status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn record_not_found_maps_to_404_and_unique_violations_to_conflict() {
        let err: ApiError = DbErr::RecordNotFound("Ticket not found".to_string()).into();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);

        let err: ApiError = DbErr::Custom(
            "UNIQUE constraint failed: tickets.number".to_string(),
        )
        .into();
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }
}
