/**
 * Error Conversion
 *
 * `IntoResponse` for backend errors, so handlers can return them directly.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "error": "Error message",
 *   "status": 400
 * }
 * ```
 */

use axum::{
    body::Body,
    http::header,
    response::{IntoResponse, Response},
};
use crate::backend::error::types::BackendError;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        if self.is_internal() {
            tracing::error!(error = %self, "Request failed with an internal error");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        let mut response = Response::new(Body::from(body.to_string()));
        *response.status_mut() = status;
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        response
    }
}
