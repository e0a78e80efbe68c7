use crate::api::dto::ErrorResponse;
use crate::structure::StructureError;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

impl From<JsonRejection> for StructureError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(status = %rejection.status(), "rejected structure request body");
        Self::InvalidRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for StructureError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(%status, error = %self, "structure request failed");
        }
        let body = ErrorResponse {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
