//! REST adapter for the identity gateway.
//!
//! Talks JSON over HTTP to whatever backend the surrounding deployment
//! exposes:
//!
//! - `POST {base}/v1/identity/exists` with `{"channel", "value"}`
//! - `POST {base}/v1/login` with the full credentials record
//!
//! A 401 on login carries a `{"reason"}` body that maps onto
//! [`AuthFailureReason`]; anything else non-2xx is a [`GatewayError`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::auth::channel::OtpChannel;
use crate::auth::credentials::Credentials;
use crate::traits::gateway::{
    AuthFailureReason, GatewayError, IdentityGateway, LoginError, Session,
};

/// Request timeout for both gateway operations.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct ExistsRequest<'a> {
    channel: OtpChannel,
    value: &'a str,
}

#[derive(Debug, Deserialize)]
struct ExistsResponse {
    exists: bool,
}

#[derive(Debug, Deserialize)]
struct RejectionBody {
    reason: AuthFailureReason,
}

/// Identity gateway over HTTP.
#[derive(Debug, Clone)]
pub struct RestGateway {
    base_url: String,
    client: Client,
}

impl RestGateway {
    /// Create a gateway for the given base URL. Trailing slashes are
    /// tolerated.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl IdentityGateway for RestGateway {
    async fn identity_exists(
        &self,
        channel: OtpChannel,
        value: &str,
    ) -> Result<bool, GatewayError> {
        let url = format!("{}/v1/identity/exists", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&ExistsRequest { channel, value })
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: ExistsResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;
        Ok(body.exists)
    }

    async fn verify_login(&self, credentials: &Credentials) -> Result<Session, LoginError> {
        let url = format!("{}/v1/login", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(credentials)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))
            .map_err(LoginError::Gateway)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            // A missing or malformed rejection body still reads as a rejection.
            let reason = response
                .json::<RejectionBody>()
                .await
                .map(|body| body.reason)
                .unwrap_or(AuthFailureReason::InvalidCredentials);
            return Err(LoginError::Rejected(reason));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LoginError::Gateway(GatewayError::Status {
                status: status.as_u16(),
                message,
            }));
        }

        response
            .json::<Session>()
            .await
            .map_err(|e| LoginError::Gateway(GatewayError::Decode(e.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let gateway = RestGateway::new("http://gateway.local/");
        assert_eq!(gateway.base_url(), "http://gateway.local");
    }

    #[test]
    fn test_exists_request_serialization() {
        let request = ExistsRequest {
            channel: OtpChannel::Phone,
            value: "+11234567890",
        };
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(json["channel"], "phone");
        assert_eq!(json["value"], "+11234567890");
    }
}
