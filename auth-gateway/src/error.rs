use auth_identity::IdentityError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use error_common::codes;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Body of every perimeter rejection
#[derive(Debug, Serialize, Deserialize)]
pub struct GatewayErrorResponse {
    /// Unique error ID for tracking
    pub error_id: String,
    pub error_type: String,
    /// Stable code from `error_common::codes`
    pub code: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// No usable session: absent, malformed, expired or incomplete
    #[error("Authentication required: {0}")]
    Unauthenticated(IdentityError),

    /// Tampered credential or one from a foreign issuer
    #[error("{0}")]
    InvalidSignature(IdentityError),

    #[error("CSRF token missing or invalid")]
    CsrfMismatch,

    #[error("Unroutable request: {0}")]
    UnroutableRequest(String),
}

impl From<IdentityError> for GatewayError {
    fn from(err: IdentityError) -> Self {
        if err.is_signature_failure() {
            GatewayError::InvalidSignature(err)
        } else {
            GatewayError::Unauthenticated(err)
        }
    }
}

impl GatewayError {
    pub fn missing_session() -> Self {
        GatewayError::Unauthenticated(IdentityError::MissingCredential)
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Unauthenticated(_) | GatewayError::InvalidSignature(_) => {
                StatusCode::UNAUTHORIZED
            }
            GatewayError::CsrfMismatch => StatusCode::FORBIDDEN,
            GatewayError::UnroutableRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            GatewayError::Unauthenticated(_) => "unauthenticated",
            GatewayError::InvalidSignature(_) => "invalid_signature",
            GatewayError::CsrfMismatch => "csrf_mismatch",
            GatewayError::UnroutableRequest(_) => "unroutable_request",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::Unauthenticated(IdentityError::MissingCredential) => {
                codes::authentication::MISSING_CREDENTIAL
            }
            GatewayError::Unauthenticated(IdentityError::SessionExpired) => {
                codes::authentication::TOKEN_EXPIRED
            }
            GatewayError::Unauthenticated(_) => codes::authentication::SESSION_INVALID,
            GatewayError::InvalidSignature(_) => codes::authentication::INVALID_SIGNATURE,
            GatewayError::CsrfMismatch => codes::csrf::TOKEN_MISMATCH,
            GatewayError::UnroutableRequest(_) => codes::routing::UNROUTABLE_REQUEST,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4().to_string();
        let status_code = self.status_code();

        tracing::warn!(
            error_id = %error_id,
            error_type = %self.error_type(),
            error_code = %self.code(),
            status_code = %status_code.as_u16(),
            error = %self,
            "Request rejected at perimeter"
        );

        let body = GatewayErrorResponse {
            error_id,
            error_type: self.error_type().to_string(),
            code: self.code().to_string(),
            message: self.to_string(),
            timestamp: Utc::now(),
        };

        (status_code, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_errors_split_by_kind() {
        assert!(matches!(
            GatewayError::from(IdentityError::SessionExpired),
            GatewayError::Unauthenticated(_)
        ));
        assert!(matches!(
            GatewayError::from(IdentityError::InvalidSignature),
            GatewayError::InvalidSignature(_)
        ));
        assert!(matches!(
            GatewayError::from(IdentityError::ForeignIssuer),
            GatewayError::InvalidSignature(_)
        ));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(GatewayError::missing_session().status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            GatewayError::InvalidSignature(IdentityError::InvalidSignature).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(GatewayError::CsrfMismatch.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_codes() {
        assert_eq!(GatewayError::missing_session().code(), "AUTH_2001");
        assert_eq!(
            GatewayError::from(IdentityError::SessionExpired).code(),
            "AUTH_2002"
        );
        assert_eq!(GatewayError::CsrfMismatch.code(), "CSRF_2101");
    }

    #[tokio::test]
    async fn test_response_body_shape() {
        use http_body_util::BodyExt;

        let response = GatewayError::CsrfMismatch.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: GatewayErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error_type, "csrf_mismatch");
        assert_eq!(body.code, "CSRF_2101");
        assert!(!body.error_id.is_empty());
    }
}
