//! Mapping of [`ShortenerError`] onto HTTP responses

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use tracing::error;

use crate::errors::ShortenerError;

/// 错误响应体
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
    pub code: &'static str,
}

impl ResponseError for ShortenerError {
    fn status_code(&self) -> StatusCode {
        match self {
            ShortenerError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ShortenerError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        HttpResponse::build(status).json(ErrorBody {
            error: self.message(),
            code: self.code(),
        })
    }
}
