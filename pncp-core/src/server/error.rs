use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::errors::PncpError;

impl IntoResponse for PncpError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if self.is_not_found() {
            tracing::info!("{}: {}", self.error_code(), self);
        } else {
            tracing::warn!("Request failed with {}: {}", self.error_code(), self);
        }

        let body = json!({
            "detail": self.to_string(),
            "code": self.error_code(),
        });
        (status, Json(body)).into_response()
    }
}
