use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use derive_more::Display;
use serde_json::json;
use tracing::error;

use crate::application::ServiceError;
use crate::domain::RepositoryError;

/// Client-facing text for writes the database rejected; the database's own text stays in the log.
const CONSTRAINT_MESSAGE: &str = "Request conflicts with existing data or references a missing record";

/// Error returned by every handler. Rendered as `{"message": ...}`.
#[derive(Debug, Display)]
pub enum ApiError {
    #[display(fmt = "{}", _0)]
    BadRequest(String),
    #[display(fmt = "{}", _0)]
    NotFound(String),
    #[display(fmt = "{}", _0)]
    Conflict(String),
    #[display(fmt = "Something went wrong, Contact with system admin")]
    Internal,
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(e) => ApiError::BadRequest(e.to_string()),
            ServiceError::BadRequest(msg) => ApiError::BadRequest(msg),
            ServiceError::NotFound(msg) => ApiError::NotFound(msg),
            ServiceError::Conflict(msg) => ApiError::Conflict(msg),
            ServiceError::Repository(RepositoryError::Constraint(msg)) => {
                error!(error = %msg, "Constraint violation");
                ApiError::Conflict(CONSTRAINT_MESSAGE.to_string())
            }
            ServiceError::Repository(e) => {
                error!(error = %e, "Repository failure");
                ApiError::Internal
            }
            ServiceError::Internal(msg) => {
                error!(error = %msg, "Internal failure");
                ApiError::Internal
            }
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(e: RepositoryError) -> Self {
        ServiceError::Repository(e).into()
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.to_string()
        }))
    }
}
