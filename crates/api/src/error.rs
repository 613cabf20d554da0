use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use repos::error::RepoError;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("general failure")]
    Failure(String),

    #[error("database error: `{0}`")]
    RepoError(#[from] RepoError),

    #[error("invalid request body: `{0}`")]
    InvalidBody(#[from] JsonRejection),

    #[error("Device id {0:?} contains no usable characters")]
    InvalidDeviceId(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::Failure(err) => {
                (StatusCode::BAD_REQUEST, format!("general failure : {}", err))
            }
            ApiError::RepoError(err) => {
                error!("Request failed on storage: {}", err);
                match err {
                    RepoError::TransactionError() => {
                        (StatusCode::SERVICE_UNAVAILABLE, "database unavailable".to_string())
                    }
                    _ => (StatusCode::INTERNAL_SERVER_ERROR, "database error".to_string()),
                }
            }
            ApiError::InvalidBody(err) => (err.status(), err.body_text()),
            ApiError::InvalidDeviceId(_) => (StatusCode::BAD_REQUEST, self.to_string()),
        };

        let body = Json(serde_json::json!({
            "result": "failed",
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
