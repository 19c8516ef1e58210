//! In-memory identity gateway for demos and tests.
//!
//! This adapter backs the console when no `--gateway-url` is given. It can
//! be configured with known accounts and forced failures, and it records
//! every call so tests can verify gateway interactions without a network.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::auth::channel::OtpChannel;
use crate::auth::credentials::Credentials;
use crate::traits::gateway::{
    AuthFailureReason, GatewayError, IdentityGateway, LoginError, Session,
};

/// Lifetime of a demo session.
const SESSION_HOURS: i64 = 12;

/// An account the demo gateway recognizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoAccount {
    pub email: String,
    /// Full phone identity, country code included.
    pub phone: String,
    /// Expected password. Empty accepts any password, which is what the
    /// canned demo account uses.
    pub password: String,
}

/// A recorded gateway call for verification in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    IdentityExists { channel: OtpChannel, value: String },
    VerifyLogin { email: String },
}

/// Configurable in-memory gateway.
///
/// Clones share state, so a test can keep a handle for assertions while
/// the application owns another.
#[derive(Debug, Clone, Default)]
pub struct DemoGateway {
    accounts: Arc<Mutex<Vec<DemoAccount>>>,
    identity_failure: Arc<Mutex<Option<GatewayError>>>,
    login_failure: Arc<Mutex<Option<AuthFailureReason>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    latency: Duration,
}

impl DemoGateway {
    /// Create an empty gateway that knows no accounts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a gateway with the canned demo account.
    pub fn with_demo_accounts() -> Self {
        Self::with_accounts(vec![DemoAccount {
            email: "admin@test.com".to_string(),
            phone: "+11234567890".to_string(),
            password: String::new(),
        }])
    }

    pub fn with_accounts(accounts: Vec<DemoAccount>) -> Self {
        Self {
            accounts: Arc::new(Mutex::new(accounts)),
            ..Self::default()
        }
    }

    /// Add artificial latency to every call, for demo realism.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn add_account(&self, account: DemoAccount) {
        self.accounts.lock().unwrap().push(account);
    }

    /// Force every identity check to fail until cleared.
    pub fn set_identity_failure(&self, failure: Option<GatewayError>) {
        *self.identity_failure.lock().unwrap() = failure;
    }

    /// Force every verification to be rejected until cleared.
    pub fn set_login_failure(&self, failure: Option<AuthFailureReason>) {
        *self.login_failure.lock().unwrap() = failure;
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// How many times `verify_login` was called.
    pub fn verify_call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| matches!(call, RecordedCall::VerifyLogin { .. }))
            .count()
    }

    fn record(&self, call: RecordedCall) {
        self.calls.lock().unwrap().push(call);
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl IdentityGateway for DemoGateway {
    async fn identity_exists(
        &self,
        channel: OtpChannel,
        value: &str,
    ) -> Result<bool, GatewayError> {
        self.record(RecordedCall::IdentityExists {
            channel,
            value: value.to_string(),
        });
        self.simulate_latency().await;

        if let Some(failure) = self.identity_failure.lock().unwrap().clone() {
            return Err(failure);
        }

        let accounts = self.accounts.lock().unwrap();
        let known = accounts.iter().any(|account| match channel {
            OtpChannel::Email => account.email == value,
            OtpChannel::Phone => account.phone == value,
        });
        Ok(known)
    }

    async fn verify_login(&self, credentials: &Credentials) -> Result<Session, LoginError> {
        self.record(RecordedCall::VerifyLogin {
            email: credentials.email.clone(),
        });
        self.simulate_latency().await;

        if let Some(reason) = *self.login_failure.lock().unwrap() {
            return Err(LoginError::Rejected(reason));
        }

        let accounts = self.accounts.lock().unwrap();
        let account = accounts
            .iter()
            .find(|account| account.email == credentials.email)
            .ok_or(LoginError::Rejected(AuthFailureReason::InvalidCredentials))?;

        if !account.password.is_empty() && account.password != credentials.password {
            return Err(LoginError::Rejected(AuthFailureReason::InvalidCredentials));
        }

        Ok(Session {
            token: Uuid::new_v4(),
            account: account.email.clone(),
            expires_at: Utc::now() + chrono::Duration::hours(SESSION_HOURS),
        })
    }
}
