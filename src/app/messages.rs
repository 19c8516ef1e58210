//! AppMessage enum for async communication within the application.

use crate::auth::channel::OtpChannel;
use crate::traits::gateway::{GatewayError, LoginError, Session};

/// Messages posted back by spawned gateway calls.
///
/// Every message carries the sequence number of the request that spawned
/// it; the flow discards completions whose number no longer matches.
#[derive(Debug, Clone)]
pub enum AppMessage {
    /// An identity check finished.
    IdentityCheckComplete {
        channel: OtpChannel,
        seq: u64,
        outcome: Result<bool, GatewayError>,
    },
    /// A verification attempt finished.
    LoginComplete {
        seq: u64,
        outcome: Result<Session, LoginError>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_check_complete_construction() {
        let msg = AppMessage::IdentityCheckComplete {
            channel: OtpChannel::Email,
            seq: 3,
            outcome: Ok(true),
        };
        let cloned = msg.clone();
        match cloned {
            AppMessage::IdentityCheckComplete { channel, seq, outcome } => {
                assert_eq!(channel, OtpChannel::Email);
                assert_eq!(seq, 3);
                assert_eq!(outcome, Ok(true));
            }
            _ => panic!("Expected IdentityCheckComplete variant"),
        }
    }

    #[test]
    fn test_login_complete_carries_failure() {
        let msg = AppMessage::LoginComplete {
            seq: 1,
            outcome: Err(LoginError::Gateway(GatewayError::Transport(
                "refused".to_string(),
            ))),
        };
        let _ = format!("{:?}", msg);
    }
}
