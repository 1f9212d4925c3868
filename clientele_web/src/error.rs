use axum::{extract::rejection::JsonRejection, http::StatusCode, Json};
use clientele::domain::DataAccessError;
use serde::Serialize;
use tracing::{error, info};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn not_found() -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            message: "Customer not found",
            error: None,
        }),
    )
}

/// 検証エラーは400、接続エラーは503、それ以外は500
pub fn access_error(message: &'static str, error: DataAccessError) -> ApiError {
    let status = if error.is_validation() {
        StatusCode::BAD_REQUEST
    } else if error.is_unavailable() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    if status == StatusCode::BAD_REQUEST {
        info!("{}: {}", message, error);
    } else {
        error!("{}: {}", message, error);
    }
    (
        status,
        Json(ErrorResponse {
            message,
            error: Some(error.to_string()),
        }),
    )
}

pub fn rejection(message: &'static str, rejection: JsonRejection) -> ApiError {
    info!("{}: {}", message, rejection.body_text());
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            message,
            error: Some(rejection.body_text()),
        }),
    )
}
