use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ccm_core::CcmError;

/// Carries an explicit HTTP 400 through the `anyhow::Error` chain.
#[derive(Debug)]
struct BadRequestError(String);

impl std::fmt::Display for BadRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BadRequestError {}

/// Carries an explicit HTTP 404 through the `anyhow::Error` chain.
#[derive(Debug)]
struct NotFoundError(String);

impl std::fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for NotFoundError {}

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
///
/// Every error body is `{ "success": false, "error": "..." }`; validation
/// failures add `validationErrors`.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(BadRequestError(msg.into()).into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self(NotFoundError(msg.into()).into())
    }

    fn status(&self) -> StatusCode {
        if self.0.is::<BadRequestError>() {
            return StatusCode::BAD_REQUEST;
        }
        if self.0.is::<NotFoundError>() {
            return StatusCode::NOT_FOUND;
        }
        match self.0.downcast_ref::<CcmError>() {
            Some(CcmError::ProjectNotFound(_) | CcmError::ProjectMissing(_)) => {
                StatusCode::NOT_FOUND
            }
            Some(
                CcmError::InvalidAgentId(_)
                | CcmError::InvalidPath(_)
                | CcmError::Validation(_),
            ) => StatusCode::BAD_REQUEST,
            Some(CcmError::Frontmatter(_) | CcmError::InvalidJson { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Some(
                CcmError::HomeNotFound | CcmError::Io(_) | CcmError::Yaml(_) | CcmError::Json(_),
            )
            | None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        let mut body = serde_json::json!({
            "success": false,
            "error": self.0.to_string(),
        });
        if let Some(CcmError::Validation(errors)) = self.0.downcast_ref::<CcmError>() {
            body["validationErrors"] = serde_json::json!(errors);
        }
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
