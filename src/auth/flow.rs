//! Login flow state transitions.
//!
//! [`LoginFlow`] owns the credential record, the per-channel passcode
//! lifecycle and the submission lifecycle, and exposes explicit transition
//! functions. The render layer observes the state but never mutates it
//! directly; the driver executes the asynchronous half: `begin_*` hands it
//! a descriptor to run against the gateway, `complete_*` applies the
//! outcome when it is posted back.
//!
//! Only one logical thread of control calls into a flow (the application's
//! select loop), so every transition is atomic with respect to the
//! countdown tick and to gateway completions.

use crate::traits::gateway::{AuthFailureReason, GatewayError, LoginError, Session};

use super::channel::{ChannelSet, ChannelState, OtpChannel, OTP_COOLDOWN_SECS};
use super::credentials::{CredentialField, Credentials};
use super::validate::{validate, ValidationError, ValidationResult};

/// Descriptor for an identity check the driver must execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpRequest {
    pub channel: OtpChannel,
    /// Identity value to confirm with the gateway (email address, or
    /// country code plus phone number).
    pub identity: String,
    /// Liveness tag: completions must echo this back.
    pub seq: u64,
}

/// Descriptor for a verification attempt the driver must execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitAttempt {
    /// Snapshot of the form at the moment of submission.
    pub credentials: Credentials,
    /// Liveness tag: completions must echo this back.
    pub seq: u64,
}

/// Lifecycle of the final verification submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed(AuthFailureReason),
}

/// The multi-factor login flow.
#[derive(Debug)]
pub struct LoginFlow {
    credentials: Credentials,
    channels: ChannelSet,
    submission: SubmissionState,
    field_errors: ValidationResult,
    submit_seq: u64,
}

impl Default for LoginFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginFlow {
    pub fn new() -> Self {
        Self {
            credentials: Credentials::default(),
            channels: ChannelSet::new(),
            submission: SubmissionState::Idle,
            field_errors: ValidationResult::default(),
            submit_seq: 0,
        }
    }

    // ------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn channel(&self, channel: OtpChannel) -> &ChannelState {
        self.channels.get(channel)
    }

    pub fn submission(&self) -> &SubmissionState {
        &self.submission
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.submission, SubmissionState::Submitting)
    }

    /// Inline error for one field, if the last submission attempt flagged it.
    pub fn field_error(&self, field: CredentialField) -> Option<ValidationError> {
        self.field_errors.get(field)
    }

    pub fn has_field_errors(&self) -> bool {
        !self.field_errors.is_empty()
    }

    /// Whether the request button for a channel is currently actionable.
    pub fn can_request(&self, channel: OtpChannel) -> bool {
        let state = self.channels.get(channel);
        !state.in_flight && !state.cooling_down() && !self.credentials.identity_missing(channel)
    }

    // ------------------------------------------------------------------
    // Form edits
    // ------------------------------------------------------------------

    pub fn push_char(&mut self, field: CredentialField, c: char) {
        self.credentials.push_char(field, c);
    }

    pub fn pop_char(&mut self, field: CredentialField) {
        self.credentials.pop_char(field);
    }

    pub fn toggle_remember(&mut self) {
        self.credentials.remember_me = !self.credentials.remember_me;
    }

    pub fn cycle_country(&mut self, step: isize) {
        self.credentials.cycle_country_code(step);
    }

    // ------------------------------------------------------------------
    // Channel state manager
    // ------------------------------------------------------------------

    /// Start a passcode request for a channel.
    ///
    /// Rejected (returns `None`) while a check is already in flight, while
    /// the resend cooldown is running, or while the identity field is
    /// empty. Otherwise marks the channel in flight and returns the
    /// descriptor the driver must run against the gateway.
    pub fn begin_otp_request(&mut self, channel: OtpChannel) -> Option<OtpRequest> {
        let identity_missing = self.credentials.identity_missing(channel);
        let state = self.channels.get_mut(channel);

        if state.in_flight || state.cooling_down() || identity_missing {
            tracing::debug!(%channel, "passcode request rejected");
            return None;
        }

        state.in_flight = true;
        state.request_seq += 1;
        let seq = state.request_seq;
        let identity = self.credentials.identity_value(channel);
        tracing::info!(%channel, seq, "passcode request started");
        Some(OtpRequest { channel, identity, seq })
    }

    /// Apply the outcome of an identity check.
    ///
    /// Stale completions (wrong sequence, or no request in flight) are
    /// discarded: a task finishing after the flow moved on must not touch
    /// its state. When the gateway confirmed the identity, the channel's
    /// requested flag toggles: issuing clears the passcode entry and arms
    /// the cooldown, while toggling an already-requested channel resets it.
    /// A gateway failure or an unknown identity leaves the channel as it
    /// was; the user gets no passcode row and no error surface.
    pub fn complete_otp_request(
        &mut self,
        channel: OtpChannel,
        seq: u64,
        outcome: Result<bool, GatewayError>,
    ) {
        let state = self.channels.get_mut(channel);
        if !state.in_flight || state.request_seq != seq {
            tracing::debug!(%channel, seq, "stale identity check discarded");
            return;
        }
        state.in_flight = false;

        match outcome {
            Ok(true) => {
                if state.requested {
                    state.requested = false;
                    state.seconds_remaining = 0;
                    tracing::info!(%channel, "passcode entry reset");
                } else {
                    state.requested = true;
                    state.seconds_remaining = OTP_COOLDOWN_SECS;
                    self.credentials.clear_otp(channel);
                    tracing::info!(%channel, "passcode issued, cooldown armed");
                }
            }
            Ok(false) => {
                tracing::warn!(%channel, "identity unknown, passcode not issued");
            }
            Err(err) => {
                tracing::warn!(%channel, error = %err, "identity check failed, passcode not issued");
            }
        }
    }

    // ------------------------------------------------------------------
    // Countdown
    // ------------------------------------------------------------------

    /// One second of cooldown elapsed. Decrements every active channel
    /// independently; returns whether anything changed.
    pub fn tick(&mut self) -> bool {
        let mut changed = false;
        for state in self.channels.iter_mut() {
            changed |= state.tick();
        }
        changed
    }

    // ------------------------------------------------------------------
    // Submission controller
    // ------------------------------------------------------------------

    /// Start a verification submission.
    ///
    /// Rejected while one is already running. A validation failure aborts
    /// with the submission state unchanged and the field errors stored for
    /// inline display; no gateway call is made. Otherwise transitions to
    /// `Submitting` and returns the attempt the driver must run.
    pub fn begin_submit(&mut self) -> Option<SubmitAttempt> {
        if self.is_submitting() {
            return None;
        }

        let result = validate(&self.credentials, &self.channels);
        if !result.is_empty() {
            tracing::debug!(errors = result.len(), "submission blocked by validation");
            self.field_errors = result;
            return None;
        }

        self.field_errors.clear();
        self.submit_seq += 1;
        self.submission = SubmissionState::Submitting;
        tracing::info!(seq = self.submit_seq, "verification submitted");
        Some(SubmitAttempt {
            credentials: self.credentials.clone(),
            seq: self.submit_seq,
        })
    }

    /// Apply the outcome of a verification attempt.
    ///
    /// Stale completions are discarded. Success yields the session for the
    /// caller to keep; failure parks the flow in `Failed` until the user
    /// retries by submitting again.
    pub fn complete_submit(
        &mut self,
        seq: u64,
        outcome: Result<Session, LoginError>,
    ) -> Option<Session> {
        if !self.is_submitting() || self.submit_seq != seq {
            tracing::debug!(seq, "stale verification outcome discarded");
            return None;
        }

        match outcome {
            Ok(session) => {
                self.submission = SubmissionState::Succeeded;
                tracing::info!(account = %session.account, "verification succeeded");
                Some(session)
            }
            Err(LoginError::Rejected(reason)) => {
                tracing::warn!(%reason, "verification rejected");
                self.submission = SubmissionState::Failed(reason);
                None
            }
            Err(LoginError::Gateway(err)) => {
                tracing::warn!(error = %err, "verification gateway error");
                self.submission = SubmissionState::Failed(AuthFailureReason::InvalidCredentials);
                None
            }
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// End this flow and start a fresh one in place.
    ///
    /// Clears the form, the channel lifecycles and the submission state.
    /// Sequence counters are preserved, which keeps late completions from
    /// the previous flow unmatchable.
    pub fn reset(&mut self) {
        self.credentials = Credentials::default();
        self.field_errors.clear();
        self.submission = SubmissionState::Idle;
        for state in self.channels.iter_mut() {
            state.reset();
        }
    }
}
