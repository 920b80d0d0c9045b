use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use codestreak_domain::shared::{DomainError, ErrorCode};

/// Error type returned by HTTP handlers.
///
/// Serializes as `{"message", "code"}` where `code` is the numeric
/// [`ErrorCode`]. Messages of internal failures are replaced with a generic
/// one; the detail only goes to the log.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Cron secret not configured")]
    CronSecretMissing,

    /// 500 with a message that is safe to show
    #[error("{0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

const INTERNAL_MESSAGE: &str = "Internal server error";

fn domain_status(err: &DomainError) -> StatusCode {
    match err {
        DomainError::Validation(_) | DomainError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        DomainError::NotFound(_) | DomainError::UserNotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::ExternalService(_) => StatusCode::BAD_GATEWAY,
        DomainError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ApiError {
    fn parts(&self) -> (StatusCode, ErrorCode, String) {
        match self {
            ApiError::Domain(err) => {
                let status = domain_status(err);
                let message = match err {
                    DomainError::Configuration(msg) => msg.clone(),
                    DomainError::UserNotFound(_) => "User not found".to_string(),
                    _ if status == StatusCode::INTERNAL_SERVER_ERROR => {
                        tracing::error!(error = %err, code = err.code().code(), "Request failed");
                        INTERNAL_MESSAGE.to_string()
                    }
                    _ => err.message().to_string(),
                };
                (status, err.code(), message)
            }
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ErrorCode::Unauthorized,
                "Unauthorized".to_string(),
            ),
            ApiError::CronSecretMissing => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::MissingSecret,
                "Cron secret not configured".to_string(),
            ),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InfrastructureError,
                msg.clone(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = json!({
            "message": message,
            "code": code.code(),
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn error_to_response(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }

    #[tokio::test]
    async fn test_validation_maps_to_400_with_message() {
        let err = ApiError::from(DomainError::Validation(
            "Invalid time format. Use HH:MM format.".to_string(),
        ));

        let (status, json) = error_to_response(err).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Invalid time format. Use HH:MM format.");
        assert_eq!(json["code"], 6001);
    }

    #[tokio::test]
    async fn test_not_found_and_user_not_found_map_to_404() {
        let (status, json) =
            error_to_response(DomainError::NotFound("Streak data not found".into()).into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "Streak data not found");

        let (status, json) =
            error_to_response(DomainError::UserNotFound("user-42".into()).into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "User not found");
        assert_eq!(json["code"], 2001);
    }

    #[tokio::test]
    async fn test_gateway_errors_keep_their_message() {
        let (status, json) = error_to_response(
            DomainError::ExternalService("Failed to fetch LeetCode profile".into()).into(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["message"], "Failed to fetch LeetCode profile");

        let (status, _) =
            error_to_response(DomainError::Timeout("activity query".into()).into()).await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn test_internal_errors_hide_detail() {
        let err = ApiError::from(DomainError::Repository(
            "no such table: streak_records".to_string(),
        ));

        let (status, json) = error_to_response(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["message"], "Internal server error");
        assert_eq!(json["code"], 4001);
    }

    #[tokio::test]
    async fn test_configuration_message_is_shown() {
        let (status, json) = error_to_response(
            DomainError::Configuration("EMAIL_PROVIDER must be smtp, resend or log".into()).into(),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["message"], "EMAIL_PROVIDER must be smtp, resend or log");
    }

    #[tokio::test]
    async fn test_cron_auth_errors() {
        let (status, json) = error_to_response(ApiError::Unauthorized).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["message"], "Unauthorized");

        let (status, json) = error_to_response(ApiError::CronSecretMissing).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["message"], "Cron secret not configured");
    }
}
