//! Credential record for the sign-in form.
//!
//! A single [`Credentials`] value backs the whole form. Edits go through
//! [`Credentials::push_char`] / [`Credentials::pop_char`] so that per-field
//! input rules (digit-only fields, length caps) live in one place instead of
//! being scattered across the key handler.

use serde::{Deserialize, Serialize};

use super::channel::OtpChannel;

/// Country codes offered by the phone field selector.
pub const COUNTRY_CODES: &[(&str, &str)] = &[
    ("+1", "US (+1)"),
    ("+44", "UK (+44)"),
    ("+91", "IN (+91)"),
];

/// Maximum digits accepted by the phone number field.
pub const PHONE_MAX_DIGITS: usize = 14;

/// Length of every one-time passcode and of the authenticator code.
pub const CODE_LEN: usize = 6;

/// The sign-in form record.
///
/// One instance per login flow, replaced field-by-field as the user edits.
/// Serializable so the REST gateway adapter can ship it as a JSON body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub country_code: String,
    pub phone_number: String,
    pub password: String,
    pub email_otp: String,
    pub phone_otp: String,
    pub authenticator_code: String,
    pub remember_me: bool,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            email: String::new(),
            country_code: COUNTRY_CODES[0].0.to_string(),
            phone_number: String::new(),
            password: String::new(),
            email_otp: String::new(),
            phone_otp: String::new(),
            authenticator_code: String::new(),
            remember_me: false,
        }
    }
}

/// Editable text fields of the sign-in form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CredentialField {
    Email,
    PhoneNumber,
    Password,
    EmailOtp,
    PhoneOtp,
    AuthenticatorCode,
}

impl CredentialField {
    /// Label shown next to the field.
    pub fn label(&self) -> &'static str {
        match self {
            CredentialField::Email => "Email",
            CredentialField::PhoneNumber => "Phone Number",
            CredentialField::Password => "Password",
            CredentialField::EmailOtp => "Email OTP",
            CredentialField::PhoneOtp => "Phone OTP",
            CredentialField::AuthenticatorCode => "Authenticator Code",
        }
    }
}

impl Credentials {
    /// Append a character to a field, applying that field's input rules.
    ///
    /// Digit-only fields silently drop non-digits; capped fields silently
    /// drop input past their maximum length.
    pub fn push_char(&mut self, field: CredentialField, c: char) {
        match field {
            CredentialField::Email => {
                if !c.is_control() {
                    self.email.push(c);
                }
            }
            CredentialField::Password => {
                if !c.is_control() {
                    self.password.push(c);
                }
            }
            CredentialField::PhoneNumber => {
                if c.is_ascii_digit() && self.phone_number.len() < PHONE_MAX_DIGITS {
                    self.phone_number.push(c);
                }
            }
            CredentialField::EmailOtp => push_code_digit(&mut self.email_otp, c),
            CredentialField::PhoneOtp => push_code_digit(&mut self.phone_otp, c),
            CredentialField::AuthenticatorCode => push_code_digit(&mut self.authenticator_code, c),
        }
    }

    /// Remove the last character of a field.
    pub fn pop_char(&mut self, field: CredentialField) {
        self.field_mut(field).pop();
    }

    /// Current text of a field, for rendering.
    pub fn field(&self, field: CredentialField) -> &str {
        match field {
            CredentialField::Email => &self.email,
            CredentialField::PhoneNumber => &self.phone_number,
            CredentialField::Password => &self.password,
            CredentialField::EmailOtp => &self.email_otp,
            CredentialField::PhoneOtp => &self.phone_otp,
            CredentialField::AuthenticatorCode => &self.authenticator_code,
        }
    }

    fn field_mut(&mut self, field: CredentialField) -> &mut String {
        match field {
            CredentialField::Email => &mut self.email,
            CredentialField::PhoneNumber => &mut self.phone_number,
            CredentialField::Password => &mut self.password,
            CredentialField::EmailOtp => &mut self.email_otp,
            CredentialField::PhoneOtp => &mut self.phone_otp,
            CredentialField::AuthenticatorCode => &mut self.authenticator_code,
        }
    }

    /// Clear the passcode entry for one channel.
    pub fn clear_otp(&mut self, channel: OtpChannel) {
        match channel {
            OtpChannel::Email => self.email_otp.clear(),
            OtpChannel::Phone => self.phone_otp.clear(),
        }
    }

    /// The value sent to the identity gateway when requesting a passcode.
    ///
    /// The phone identity includes the selected country code.
    pub fn identity_value(&self, channel: OtpChannel) -> String {
        match channel {
            OtpChannel::Email => self.email.clone(),
            OtpChannel::Phone => format!("{}{}", self.country_code, self.phone_number),
        }
    }

    /// Whether the user has not yet typed anything identifying for a channel.
    pub fn identity_missing(&self, channel: OtpChannel) -> bool {
        match channel {
            OtpChannel::Email => self.email.is_empty(),
            OtpChannel::Phone => self.phone_number.is_empty(),
        }
    }

    /// Move the country code selector by `step` entries, wrapping around.
    pub fn cycle_country_code(&mut self, step: isize) {
        let idx = COUNTRY_CODES
            .iter()
            .position(|(code, _)| *code == self.country_code)
            .unwrap_or(0);
        let len = COUNTRY_CODES.len() as isize;
        let next = (idx as isize + step).rem_euclid(len) as usize;
        self.country_code = COUNTRY_CODES[next].0.to_string();
    }
}

fn push_code_digit(target: &mut String, c: char) {
    if c.is_ascii_digit() && target.len() < CODE_LEN {
        target.push(c);
    }
}
