use crate::domain::error::PaymentError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Newtype over the domain error so the HTTP mapping lives in the adapter
/// layer, not in the domain.
pub struct ApiError(pub PaymentError);

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            PaymentError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            // Provider rejections surface to the caller with the provider's
            // own message, so the frontend can show something actionable.
            PaymentError::Gateway { message, .. } => (StatusCode::BAD_REQUEST, message.clone()),
            PaymentError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            PaymentError::NotFound(_) => (StatusCode::NOT_FOUND, "not found".to_string()),
            PaymentError::Config(msg) => {
                tracing::error!("configuration error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            PaymentError::Notification(msg) => {
                tracing::error!("notification error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "notification failed".to_string(),
                )
            }
            PaymentError::Database(err) => {
                tracing::error!("database error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
            PaymentError::Serialization(err) => {
                tracing::error!("serialization error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "ok": false,
            "error": message,
        });

        (status, Json(body)).into_response()
    }
}
