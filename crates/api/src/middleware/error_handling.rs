//! # Error Handling Middleware
//!
//! Maps the domain error taxonomy onto HTTP status codes and JSON bodies so
//! every handler reports failures the same way.
//!
//! | error            | status |
//! |------------------|--------|
//! | `NotFound`       | 404    |
//! | `Validation`     | 400    |
//! | `InvalidForm`    | 422, with per-field messages under `fields` |
//! | `Authentication` | 401    |
//! | `Authorization`  | 403    |
//! | `Integrity`      | 409    |
//! | `Database`, `Internal` | 500 |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tutorsync_core::errors::{FieldErrors, TutorError};

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use tutorsync_api::middleware::error_handling::AppError;
/// use tutorsync_core::errors::TutorError;
///
/// async fn handler(found: bool) -> Result<Json<&'static str>, AppError> {
///     if !found {
///         return Err(TutorError::NotFound("Student not found".to_string()).into());
///     }
///     Ok(Json("ok"))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub TutorError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            TutorError::NotFound(_) => StatusCode::NOT_FOUND,
            TutorError::Validation(_) => StatusCode::BAD_REQUEST,
            TutorError::InvalidForm(_) => StatusCode::UNPROCESSABLE_ENTITY,
            TutorError::Authentication(_) => StatusCode::UNAUTHORIZED,
            TutorError::Authorization(_) => StatusCode::FORBIDDEN,
            TutorError::Integrity(_) => StatusCode::CONFLICT,
            TutorError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            TutorError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {:?}", self.0);
        } else {
            tracing::debug!("Request rejected ({}): {}", status, self.0);
        }

        let message = self.0.to_string();
        let body = match &self.0 {
            TutorError::InvalidForm(fields) => json!({ "error": message, "fields": fields }),
            _ => json!({ "error": message }),
        };

        (status, Json(body)).into_response()
    }
}

/// Allows `?` on `TutorResult` inside handlers.
impl From<TutorError> for AppError {
    fn from(err: TutorError) -> Self {
        AppError(err)
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError(TutorError::InvalidForm(errors))
    }
}

/// Wraps infrastructure failures as database errors.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(TutorError::Database(err))
    }
}

/// Maps a TutorError to an HTTP response
pub fn map_error(err: TutorError) -> Response {
    AppError(err).into_response()
}
