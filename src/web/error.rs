use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::errors::Error;

/// Failures a page handler cannot turn into a redirect.
#[derive(Debug)]
pub enum PageError {
    Internal(Error),
    /// The resource API answered with something the page cannot render.
    Upstream(StatusCode),
}

impl From<Error> for PageError {
    fn from(err: Error) -> Self {
        PageError::Internal(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::Internal(Error::Http(err)) => {
                tracing::error!(error = %err, "upstream unreachable");
                (StatusCode::BAD_GATEWAY, "Upstream API unavailable").into_response()
            }
            PageError::Internal(err) => {
                tracing::error!(error = %err, "page handler failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
            PageError::Upstream(status) => {
                tracing::error!(status = status.as_u16(), "upstream returned fatal status");
                (
                    StatusCode::BAD_GATEWAY,
                    format!("Upstream API error ({status})"),
                )
                    .into_response()
            }
        }
    }
}
