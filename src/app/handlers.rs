//! Message handling: applying async gateway completions to the app.

use crate::auth::channel::OtpChannel;

use super::{App, AppMessage, Focus, Screen};

impl App {
    /// Apply a completion message posted by a spawned gateway call.
    pub fn handle_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::IdentityCheckComplete { channel, seq, outcome } => {
                self.flow.complete_otp_request(channel, seq, outcome);
                self.nudge_focus_off_hidden_row(channel);
                self.mark_dirty();
            }
            AppMessage::LoginComplete { seq, outcome } => {
                if let Some(session) = self.flow.complete_submit(seq, outcome) {
                    self.session = Some(session);
                    self.screen = Screen::Session;
                }
                self.mark_dirty();
            }
        }
    }

    /// A reset toggle can remove the OTP row that currently holds focus.
    fn nudge_focus_off_hidden_row(&mut self, channel: OtpChannel) {
        let requested = self.flow.channel(channel).requested;
        match (channel, self.focus) {
            (OtpChannel::Email, Focus::EmailOtp) if !requested => {
                self.focus = Focus::SendEmailOtp;
            }
            (OtpChannel::Phone, Focus::PhoneOtp) if !requested => {
                self.focus = Focus::SendPhoneOtp;
            }
            _ => {}
        }
    }
}
