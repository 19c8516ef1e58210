//! Field validation for the sign-in form.
//!
//! [`validate`] is a pure function from the credential record (plus the
//! channel request flags, which decide whether the passcode fields are
//! constrained) to a map of field errors. An empty result means the record
//! is well-formed and may be submitted.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use super::channel::ChannelSet;
use super::credentials::{CredentialField, Credentials, CODE_LEN};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{1,14}$").expect("phone regex"));

/// Minimum password length.
pub const PASSWORD_MIN_LEN: usize = 8;

/// A single field-scoped rule violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Invalid phone number")]
    InvalidPhoneNumber,
    #[error("Password must be at least 8 characters long")]
    PasswordTooShort,
    #[error("OTP must be 6 digits")]
    OtpLength,
    #[error("Authenticator code must be 6 digits")]
    AuthenticatorLength,
}

/// Field errors keyed by field, in stable field order.
///
/// Errors are additive: every violated rule is reported, not just the first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: BTreeMap<CredentialField, ValidationError>,
}

impl ValidationResult {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: CredentialField) -> Option<ValidationError> {
        self.errors.get(&field).copied()
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (CredentialField, ValidationError)> + '_ {
        self.errors.iter().map(|(field, err)| (*field, *err))
    }

    fn insert(&mut self, field: CredentialField, error: ValidationError) {
        self.errors.insert(field, error);
    }
}

/// Validate the sign-in form. Pure: same input, same result, no side effects.
///
/// The passcode fields are only constrained while their channel is in the
/// requested state; the authenticator code is always required.
pub fn validate(credentials: &Credentials, channels: &ChannelSet) -> ValidationResult {
    let mut result = ValidationResult::default();

    if !EMAIL_RE.is_match(&credentials.email) {
        result.insert(CredentialField::Email, ValidationError::InvalidEmail);
    }
    if !PHONE_RE.is_match(&credentials.phone_number) {
        result.insert(CredentialField::PhoneNumber, ValidationError::InvalidPhoneNumber);
    }
    if credentials.password.chars().count() < PASSWORD_MIN_LEN {
        result.insert(CredentialField::Password, ValidationError::PasswordTooShort);
    }
    if channels.email.requested && !is_code(&credentials.email_otp) {
        result.insert(CredentialField::EmailOtp, ValidationError::OtpLength);
    }
    if channels.phone.requested && !is_code(&credentials.phone_otp) {
        result.insert(CredentialField::PhoneOtp, ValidationError::OtpLength);
    }
    if !is_code(&credentials.authenticator_code) {
        result.insert(
            CredentialField::AuthenticatorCode,
            ValidationError::AuthenticatorLength,
        );
    }

    result
}

fn is_code(value: &str) -> bool {
    value.len() == CODE_LEN && value.bytes().all(|b| b.is_ascii_digit())
}
