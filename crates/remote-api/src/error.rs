//! API error types and conversions

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use remote_core::{BridgeError, GatewayError, StoreError};
use serde::Serialize;
use validator::ValidationErrors;

/// API error type that converts to HTTP responses
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request - body failed its schema
    Validation(Vec<FieldViolation>),
    /// 400 Bad Request - plain text, referenced name not in the current set
    UnknownName { allowed: Vec<String> },
    /// 404 Not Found
    NotFound(String),
    /// 503 Service Unavailable - controller link is down
    ServiceUnavailable(String),
    /// 504 Gateway Timeout - controller did not reply in time
    GatewayTimeout(String),
    /// 500 Internal Server Error
    Internal(String),
}

/// One schema violation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub code: String,
    pub message: String,
}

/// Standard error response format
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

/// Validation error response format
#[derive(Serialize)]
struct ValidationResponse {
    error: &'static str,
    message: &'static str,
    details: Vec<FieldViolation>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::Validation(details) => {
                tracing::debug!(?details, "Request failed validation");
                let body = Json(ValidationResponse {
                    error: "validation_failed",
                    message: "Request body does not match its schema",
                    details,
                });
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            ApiError::UnknownName { allowed } => {
                let message = format!("name should be one of {}", allowed.join(","));
                tracing::debug!(%message, "Unknown name");
                return (StatusCode::BAD_REQUEST, message).into_response();
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg)
            }
            ApiError::GatewayTimeout(msg) => (StatusCode::GATEWAY_TIMEOUT, "gateway_timeout", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        };

        // Log errors at appropriate levels
        if status.is_server_error() {
            tracing::error!(error = error_type, %message, "API error");
        } else if status.is_client_error() {
            tracing::debug!(error = error_type, %message, "API client error");
        }

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::UnknownPreset { allowed, .. } => ApiError::UnknownName { allowed },
            GatewayError::DomainNotFound(domain) => {
                ApiError::NotFound(format!("No state stored for '{}'", domain))
            }
            GatewayError::Bridge(err) => err.into(),
            GatewayError::Store(err) => err.into(),
        }
    }
}

impl From<BridgeError> for ApiError {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::Timeout { .. } => ApiError::GatewayTimeout(err.to_string()),
            BridgeError::Link(link) => ApiError::ServiceUnavailable(link.to_string()),
            BridgeError::AlreadyPending(_) | BridgeError::Closed(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut details: Vec<FieldViolation> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| FieldViolation {
                    field: field.to_string(),
                    code: e.code.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| describe(&e.code, &e.params)),
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));
        ApiError::Validation(details)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let code = match &rejection {
            JsonRejection::JsonDataError(_) => "invalid_type",
            JsonRejection::JsonSyntaxError(_) => "invalid_json",
            JsonRejection::MissingJsonContentType(_) => "missing_content_type",
            _ => "unreadable_body",
        };
        ApiError::Validation(vec![FieldViolation {
            field: "body".to_string(),
            code: code.to_string(),
            message: rejection.body_text(),
        }])
    }
}

/// Human-readable message for a validator error without one
fn describe(
    code: &str,
    params: &std::collections::HashMap<std::borrow::Cow<'static, str>, serde_json::Value>,
) -> String {
    let param = |name: &str| params.get(name).map(|v| v.to_string());
    match code {
        "range" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("must be between {} and {}", min, max),
            (Some(min), None) => format!("must be at least {}", min),
            (None, Some(max)) => format!("must be at most {}", max),
            (None, None) => "out of range".to_string(),
        },
        "length" => match param("equal") {
            Some(equal) => format!("must have exactly {} entries", equal),
            None => "invalid length".to_string(),
        },
        other => format!("failed '{}' check", other),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::to_bytes;
    use remote_core::LinkError;
    use validator::Validate;

    use super::*;

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_unknown_name_is_plain_text() {
        let response = ApiError::from(GatewayError::UnknownPreset {
            name: "d".to_string(),
            allowed: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        })
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "name should be one of a,b,c");
    }

    #[test]
    fn test_bridge_error_status_mapping() {
        let timeout = ApiError::from(BridgeError::Timeout {
            event: "playing-status".to_string(),
            timeout: Duration::from_secs(5),
        });
        assert_eq!(timeout.into_response().status(), StatusCode::GATEWAY_TIMEOUT);

        let link = ApiError::from(BridgeError::Link(LinkError::ConnectionClosed));
        assert_eq!(link.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);

        let pending = ApiError::from(BridgeError::AlreadyPending("x".to_string()));
        assert_eq!(
            pending.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_details_describe_bounds() {
        let errors = remote_core::schema::VolumeRequest { value: 150.into() }
            .validate()
            .unwrap_err();

        match ApiError::from(errors) {
            ApiError::Validation(details) => {
                assert_eq!(details.len(), 1);
                assert_eq!(details[0].field, "value");
                assert_eq!(details[0].code, "range");
                assert!(details[0].message.starts_with("must be between"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
