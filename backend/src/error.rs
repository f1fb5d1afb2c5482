use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::{PostId, VoteResponse};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Post {0} not found")]
    PostNotFound(PostId),

    #[error("Malformed vote body: {0}")]
    MalformedBody(String),

    #[error("Body post id {body} does not match path post id {path}")]
    PostIdMismatch { path: PostId, body: PostId },

    #[error("Internal error: {0:#}")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    fn status(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::PostNotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::MalformedBody(_) | AppError::PostIdMismatch { .. } => {
                (StatusCode::BAD_REQUEST, "bad_request")
            }
            AppError::InternalError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "error"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, status) = self.status();

        if code.is_server_error() {
            error!("{self}");
        }

        (code, Json(VoteResponse::failure(status))).into_response()
    }
}
