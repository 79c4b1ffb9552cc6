/**
 * Error Conversion
 *
 * This module implements `IntoResponse` for `AuthError`, allowing handlers
 * and middleware to return errors directly. The error is converted to its
 * mapped status code with a JSON body of the shape:
 *
 * ```json
 * { "message": "Invalid username or password" }
 * ```
 *
 * The body carries only the coarse client-visible message; internal detail
 * stays in the logs.
 */

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use crate::error::types::AuthError;

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed with server error: {:?}", self);
        }

        let body = Json(serde_json::json!({ "message": message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_response_status() {
        let response = AuthError::MissingToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::Forbidden.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_into_response_body_shape() {
        let response = AuthError::InvalidCredentials.into_response();
        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["message"], "Invalid username or password");
    }
}
