//! End-to-end exercises of the login flow against the demo gateway.
//!
//! These tests drive the same begin/complete transitions the application's
//! run loop drives, with the gateway calls awaited inline.

use vestibule::adapters::demo::{DemoAccount, DemoGateway, RecordedCall};
use vestibule::auth::channel::{OtpChannel, OTP_COOLDOWN_SECS};
use vestibule::auth::credentials::CredentialField;
use vestibule::auth::flow::{LoginFlow, SubmissionState};
use vestibule::traits::gateway::{AuthFailureReason, GatewayError, IdentityGateway};

fn type_into(flow: &mut LoginFlow, field: CredentialField, text: &str) {
    for c in text.chars() {
        flow.push_char(field, c);
    }
}

fn filled_flow() -> LoginFlow {
    let mut flow = LoginFlow::new();
    type_into(&mut flow, CredentialField::Email, "admin@test.com");
    type_into(&mut flow, CredentialField::PhoneNumber, "1234567890");
    type_into(&mut flow, CredentialField::Password, "longenough");
    type_into(&mut flow, CredentialField::AuthenticatorCode, "654321");
    flow
}

/// Run one passcode request to completion against the gateway.
async fn drive_otp_request(flow: &mut LoginFlow, gateway: &DemoGateway, channel: OtpChannel) {
    let request = flow.begin_otp_request(channel).expect("request accepted");
    let outcome = gateway.identity_exists(request.channel, &request.identity).await;
    flow.complete_otp_request(request.channel, request.seq, outcome);
}

#[tokio::test]
async fn test_phone_request_issue_cooldown_resend_reset_cycle() {
    let gateway = DemoGateway::with_demo_accounts();
    let mut flow = filled_flow();

    // Issue: the channel arms its full cooldown.
    drive_otp_request(&mut flow, &gateway, OtpChannel::Phone).await;
    let state = flow.channel(OtpChannel::Phone);
    assert!(state.requested);
    assert_eq!(state.seconds_remaining, OTP_COOLDOWN_SECS);

    // While cooling down, further requests are no-ops.
    assert!(flow.begin_otp_request(OtpChannel::Phone).is_none());

    // Sixty ticks later the channel is resend-ready.
    for _ in 0..60 {
        flow.tick();
    }
    let state = flow.channel(OtpChannel::Phone);
    assert!(state.requested);
    assert_eq!(state.seconds_remaining, 0);

    // The next toggle resets the channel instead of re-arming it.
    drive_otp_request(&mut flow, &gateway, OtpChannel::Phone).await;
    let state = flow.channel(OtpChannel::Phone);
    assert!(!state.requested);
    assert_eq!(state.seconds_remaining, 0);

    // And the toggle after that issues again with a fresh cooldown.
    drive_otp_request(&mut flow, &gateway, OtpChannel::Phone).await;
    let state = flow.channel(OtpChannel::Phone);
    assert!(state.requested);
    assert_eq!(state.seconds_remaining, OTP_COOLDOWN_SECS);

    // The gateway was consulted once per accepted toggle.
    let identity_checks = gateway
        .calls()
        .iter()
        .filter(|call| matches!(call, RecordedCall::IdentityExists { .. }))
        .count();
    assert_eq!(identity_checks, 3);
}

#[tokio::test]
async fn test_unknown_identity_never_reveals_passcode_row() {
    let gateway = DemoGateway::with_demo_accounts();
    let mut flow = filled_flow();

    // Replace the email with one the gateway does not know.
    for _ in 0.."admin@test.com".len() {
        flow.pop_char(CredentialField::Email);
    }
    type_into(&mut flow, CredentialField::Email, "nobody@test.com");

    drive_otp_request(&mut flow, &gateway, OtpChannel::Email).await;

    let state = flow.channel(OtpChannel::Email);
    assert!(!state.requested);
    assert_eq!(state.seconds_remaining, 0);
}

#[tokio::test]
async fn test_identity_outage_is_swallowed_and_channel_recovers() {
    let gateway = DemoGateway::with_demo_accounts();
    gateway.set_identity_failure(Some(GatewayError::Transport("down".to_string())));
    let mut flow = filled_flow();

    drive_otp_request(&mut flow, &gateway, OtpChannel::Email).await;
    assert!(!flow.channel(OtpChannel::Email).requested);

    // Once the gateway is healthy again the same channel can issue.
    gateway.set_identity_failure(None);
    drive_otp_request(&mut flow, &gateway, OtpChannel::Email).await;
    assert!(flow.channel(OtpChannel::Email).requested);
}

#[tokio::test]
async fn test_submit_happy_path_verifies_exactly_once() {
    let gateway = DemoGateway::with_demo_accounts();
    let mut flow = filled_flow();

    assert_eq!(flow.submission(), &SubmissionState::Idle);

    let attempt = flow.begin_submit().expect("validated");
    assert_eq!(flow.submission(), &SubmissionState::Submitting);

    let outcome = gateway.verify_login(&attempt.credentials).await;
    let session = flow.complete_submit(attempt.seq, outcome).expect("granted");

    assert_eq!(flow.submission(), &SubmissionState::Succeeded);
    assert_eq!(session.account, "admin@test.com");
    assert_eq!(gateway.verify_call_count(), 1);
}

#[tokio::test]
async fn test_short_password_blocks_submission_entirely() {
    let gateway = DemoGateway::with_demo_accounts();
    let mut flow = filled_flow();
    for _ in 0..3 {
        flow.pop_char(CredentialField::Password);
    }
    assert_eq!(flow.credentials().password.len(), 7);

    assert!(flow.begin_submit().is_none());

    assert_eq!(flow.submission(), &SubmissionState::Idle);
    assert!(flow.field_error(CredentialField::Password).is_some());
    assert_eq!(gateway.verify_call_count(), 0);
}

#[tokio::test]
async fn test_full_two_factor_submission_with_both_channels() {
    let gateway = DemoGateway::with_demo_accounts();
    let mut flow = filled_flow();

    drive_otp_request(&mut flow, &gateway, OtpChannel::Email).await;
    drive_otp_request(&mut flow, &gateway, OtpChannel::Phone).await;

    // Both passcode rows are open; submission requires them filled.
    assert!(flow.begin_submit().is_none());
    assert!(flow.field_error(CredentialField::EmailOtp).is_some());
    assert!(flow.field_error(CredentialField::PhoneOtp).is_some());

    type_into(&mut flow, CredentialField::EmailOtp, "111111");
    type_into(&mut flow, CredentialField::PhoneOtp, "222222");

    let attempt = flow.begin_submit().expect("validated");
    let outcome = gateway.verify_login(&attempt.credentials).await;
    assert!(flow.complete_submit(attempt.seq, outcome).is_some());
}

#[tokio::test]
async fn test_rejected_login_shows_generic_banner_and_allows_retry() {
    let gateway = DemoGateway::with_accounts(vec![DemoAccount {
        email: "admin@test.com".to_string(),
        phone: "+11234567890".to_string(),
        password: "right-password".to_string(),
    }]);
    let mut flow = filled_flow();

    let attempt = flow.begin_submit().expect("validated");
    let outcome = gateway.verify_login(&attempt.credentials).await;
    assert!(flow.complete_submit(attempt.seq, outcome).is_none());

    match flow.submission() {
        SubmissionState::Failed(reason) => {
            assert_eq!(reason.user_message(), "An error occurred. Please try again.");
        }
        other => panic!("expected failure, got {:?}", other),
    }

    // Fix the password and retry.
    for _ in 0..flow.credentials().password.len() {
        flow.pop_char(CredentialField::Password);
    }
    type_into(&mut flow, CredentialField::Password, "right-password");

    let attempt = flow.begin_submit().expect("retry accepted");
    let outcome = gateway.verify_login(&attempt.credentials).await;
    assert!(flow.complete_submit(attempt.seq, outcome).is_some());
    assert_eq!(gateway.verify_call_count(), 2);
}

#[tokio::test]
async fn test_forced_failure_reason_stays_generic_for_the_user() {
    let gateway = DemoGateway::with_demo_accounts();
    gateway.set_login_failure(Some(AuthFailureReason::AuthenticatorMismatch));
    let mut flow = filled_flow();

    let attempt = flow.begin_submit().expect("validated");
    let outcome = gateway.verify_login(&attempt.credentials).await;
    flow.complete_submit(attempt.seq, outcome);

    match flow.submission() {
        SubmissionState::Failed(reason) => {
            // The stored reason is specific, the surfaced message is not.
            assert_eq!(reason, &AuthFailureReason::AuthenticatorMismatch);
            assert_eq!(reason.user_message(), "An error occurred. Please try again.");
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_completion_from_previous_flow_cannot_touch_new_flow() {
    let gateway = DemoGateway::with_demo_accounts();
    let mut flow = filled_flow();

    // A request goes out, then the flow ends before the completion lands.
    let request = flow.begin_otp_request(OtpChannel::Email).expect("accepted");
    let outcome = gateway.identity_exists(request.channel, &request.identity).await;
    flow.reset();

    flow.complete_otp_request(request.channel, request.seq, outcome);

    let state = flow.channel(OtpChannel::Email);
    assert!(!state.requested);
    assert_eq!(state.seconds_remaining, 0);
}

#[tokio::test]
async fn test_cooldowns_tick_independently_per_channel() {
    let gateway = DemoGateway::with_demo_accounts();
    let mut flow = filled_flow();

    drive_otp_request(&mut flow, &gateway, OtpChannel::Email).await;
    for _ in 0..20 {
        flow.tick();
    }
    drive_otp_request(&mut flow, &gateway, OtpChannel::Phone).await;
    for _ in 0..20 {
        flow.tick();
    }

    assert_eq!(flow.channel(OtpChannel::Email).seconds_remaining, 20);
    assert_eq!(flow.channel(OtpChannel::Phone).seconds_remaining, 40);
}
