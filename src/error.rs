use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sweeper::UpstreamApiError;
use tracing::error;

#[derive(Debug)]
pub enum AppError {
    /// Missing or malformed request fields.
    BadRequest(String),
    /// Caller-supplied search pattern failed to compile.
    Pattern(String),
    /// Upstream API failure that carried a structured JSON payload;
    /// forwarded verbatim with the upstream's own status.
    Upstream {
        status: StatusCode,
        payload: serde_json::Value,
    },
    Internal(anyhow::Error),
}

impl AppError {
    /// Classify an error bubbling out of the sweeper crate. Regex
    /// compilation errors become 400s; upstream failures with a
    /// structured body are forwarded as-is; everything else is a 500.
    pub fn from_sweeper(err: anyhow::Error) -> Self {
        if let Some(re) = err.downcast_ref::<regex::Error>() {
            return AppError::Pattern(re.to_string());
        }
        if let Some(up) = err.downcast_ref::<UpstreamApiError>() {
            if let Some(payload) = &up.payload {
                return AppError::Upstream {
                    status: StatusCode::from_u16(up.status)
                        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                    payload: payload.clone(),
                };
            }
        }
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "message": msg }))).into_response()
            }
            AppError::Pattern(msg) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": format!("Invalid search pattern: {}", msg) })),
            )
                .into_response(),
            AppError::Upstream { status, payload } => {
                error!("Upstream error ({}): {}", status, payload);
                (status, Json(payload)).into_response()
            }
            AppError::Internal(err) => {
                error!("Internal error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "Something went wrong" })),
                )
                    .into_response()
            }
        }
    }
}

// Anyhow conversion
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}
