//! Identity gateway trait abstraction.
//!
//! The console never talks to the identity backend directly. Everything it
//! needs is behind [`IdentityGateway`]: a pre-issuance existence check and
//! the authoritative login verification. Implementations include the
//! in-memory demo gateway and the reqwest-backed REST client; tests inject
//! whichever fits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::channel::OtpChannel;
use crate::auth::credentials::Credentials;

/// A granted back-office session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque session token.
    pub token: Uuid,
    /// Account the session was granted for.
    pub account: String,
    /// When the session stops being honored.
    pub expires_at: DateTime<Utc>,
}

/// Transport-level gateway failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("gateway unreachable: {0}")]
    Transport(String),
    #[error("gateway returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("malformed gateway response: {0}")]
    Decode(String),
}

/// Why the backend rejected a verification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthFailureReason {
    #[error("credentials were rejected")]
    InvalidCredentials,
    #[error("a one-time passcode did not match")]
    OtpMismatch,
    #[error("the authenticator code did not match")]
    AuthenticatorMismatch,
    #[error("the account is locked")]
    AccountLocked,
}

impl AuthFailureReason {
    /// Banner text shown to the user.
    ///
    /// Identical for every variant: the banner must not reveal which
    /// credential was wrong.
    pub fn user_message(&self) -> &'static str {
        "An error occurred. Please try again."
    }
}

/// Failure modes of [`IdentityGateway::verify_login`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    /// The backend understood the request and said no.
    #[error("login rejected: {0}")]
    Rejected(AuthFailureReason),
    /// The backend could not be asked.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// The two operations the login flow needs from an identity backend.
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// Check whether `value` identifies a known account on `channel`.
    ///
    /// Used only to gate passcode issuance, never for authentication.
    async fn identity_exists(&self, channel: OtpChannel, value: &str)
        -> Result<bool, GatewayError>;

    /// The authoritative credential check.
    async fn verify_login(&self, credentials: &Credentials) -> Result<Session, LoginError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_never_identifies_the_credential() {
        let reasons = [
            AuthFailureReason::InvalidCredentials,
            AuthFailureReason::OtpMismatch,
            AuthFailureReason::AuthenticatorMismatch,
            AuthFailureReason::AccountLocked,
        ];
        for reason in reasons {
            assert_eq!(reason.user_message(), "An error occurred. Please try again.");
        }
    }

    #[test]
    fn test_gateway_error_display() {
        let err = GatewayError::Status {
            status: 503,
            message: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "gateway returned status 503: maintenance");
    }

    #[test]
    fn test_login_error_wraps_gateway_error() {
        let err: LoginError = GatewayError::Transport("refused".to_string()).into();
        assert!(matches!(err, LoginError::Gateway(_)));
        assert_eq!(err.to_string(), "gateway unreachable: refused");
    }

    #[test]
    fn test_failure_reason_serde_names() {
        let json = serde_json::to_string(&AuthFailureReason::OtpMismatch).expect("serialize");
        assert_eq!(json, "\"otp_mismatch\"");
        let back: AuthFailureReason = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, AuthFailureReason::OtpMismatch);
    }

    #[test]
    fn test_session_round_trips_through_json() {
        let session = Session {
            token: Uuid::new_v4(),
            account: "admin@test.com".to_string(),
            expires_at: Utc::now(),
        };
        let json = serde_json::to_string(&session).expect("serialize");
        let back: Session = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, session);
    }
}
