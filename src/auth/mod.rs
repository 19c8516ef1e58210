//! Multi-factor login flow.
//!
//! This module provides the sign-in state machine:
//! - Credentials record and field editing rules
//! - Per-channel passcode lifecycle with resend cooldowns
//! - Pure field validation
//! - The flow controller tying them to the submission lifecycle

pub mod channel;
pub mod credentials;
pub mod flow;
pub mod validate;

pub use channel::{ChannelSet, ChannelState, OtpChannel, OTP_COOLDOWN_SECS};
pub use credentials::{CredentialField, Credentials, CODE_LEN, COUNTRY_CODES};
pub use flow::{LoginFlow, OtpRequest, SubmissionState, SubmitAttempt};
pub use validate::{validate, ValidationError, ValidationResult};
