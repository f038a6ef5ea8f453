use axum::{http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

/// JSON error body shared by every endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always true for error payloads
    pub error: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: true,
                message: message.into(),
                details: None,
            }),
        )
    }

    pub fn internal(
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> (StatusCode, Json<ErrorResponse>) {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: true,
                message: message.into(),
                details: Some(details.into()),
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_body_has_no_details() {
        let (status, Json(body)) = ErrorResponse::bad_request("nope");
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["message"], "nope");
        assert!(json.get("details").is_none());
    }

    #[test]
    fn internal_body_carries_details() {
        let (status, Json(body)) = ErrorResponse::internal("Unexpected error occurred.", "cause");
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.details.as_deref(), Some("cause"));
    }
}
