use std::error::Error;

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::{article::ArticleError, quota::QuotaExceeded};

#[derive(Debug, Error)]
pub enum RestError {
    #[error(transparent)]
    QuotaExceeded(#[from] QuotaExceeded),

    #[error(transparent)]
    Article(#[from] ArticleError),

    #[error("No session attached to request")]
    MissingSession,
}

impl RestError {
    pub fn status(&self) -> StatusCode {
        match self {
            RestError::QuotaExceeded(_) => StatusCode::UNAUTHORIZED,
            RestError::Article(ArticleError::NotFound(_)) => StatusCode::NOT_FOUND,
            RestError::Article(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RestError::MissingSession => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!("{}: {:?}", self, self.source());
        } else {
            warn!("{}", self);
        }

        let payload = Json(json!({"error": self.to_string()}));

        (status, payload).into_response()
    }
}
