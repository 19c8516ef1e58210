//! Gateway-facing actions.
//!
//! These methods bridge the flow's transition functions and the async
//! world: a `begin_*` transition hands back a descriptor, a task is
//! spawned to run it against the gateway, and the outcome comes back
//! through the message channel. The tasks are fire-and-forget; if the run
//! loop is gone by the time they finish, the send fails and nothing else
//! happens.

use std::sync::Arc;

use crate::auth::channel::OtpChannel;

use super::{App, AppMessage};

impl App {
    /// Request (or reset) the passcode for a channel.
    ///
    /// No-op when the flow rejects the request (cooldown running, check
    /// already in flight, or empty identity field).
    pub fn request_otp(&mut self, channel: OtpChannel) {
        let Some(request) = self.flow.begin_otp_request(channel) else {
            return;
        };

        let gateway = Arc::clone(&self.gateway);
        let tx = self.message_tx.clone();
        tokio::spawn(async move {
            let outcome = gateway.identity_exists(request.channel, &request.identity).await;
            // The receiver may be gone after teardown; a failed send is a no-op.
            let _ = tx.send(AppMessage::IdentityCheckComplete {
                channel: request.channel,
                seq: request.seq,
                outcome,
            });
        });
        self.mark_dirty();
    }

    /// Submit the form for verification.
    ///
    /// No-op when a submission is already running; validation failures
    /// surface as inline field errors without any gateway call.
    pub fn submit(&mut self) {
        let Some(attempt) = self.flow.begin_submit() else {
            self.mark_dirty();
            return;
        };

        let gateway = Arc::clone(&self.gateway);
        let tx = self.message_tx.clone();
        tokio::spawn(async move {
            let outcome = gateway.verify_login(&attempt.credentials).await;
            let _ = tx.send(AppMessage::LoginComplete {
                seq: attempt.seq,
                outcome,
            });
        });
        self.mark_dirty();
    }
}
