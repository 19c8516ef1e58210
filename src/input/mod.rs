//! Keyboard handling for the console.
//!
//! Keys mutate the application only through [`App`] and [`LoginFlow`]
//! methods; no flow state is touched directly here. Focus moves through a
//! ring that skips OTP rows while their channel has nothing outstanding.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Focus, Screen};
use crate::auth::channel::OtpChannel;
use crate::auth::credentials::CredentialField;
use crate::auth::flow::LoginFlow;

/// Handle one key press.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ctrl+C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        Screen::SignIn => handle_sign_in_key(app, key),
        Screen::Session => handle_session_key(app, key),
    }
}

fn handle_session_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('l') => app.sign_out(),
        _ => {}
    }
}

fn handle_sign_in_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Tab | KeyCode::Down => {
            step_focus(app, 1);
            app.mark_dirty();
        }
        KeyCode::BackTab | KeyCode::Up => {
            step_focus(app, -1);
            app.mark_dirty();
        }
        KeyCode::Enter => activate(app),
        KeyCode::Backspace => {
            if let Some(field) = edit_target(app.focus) {
                app.flow.pop_char(field);
                app.mark_dirty();
            }
        }
        KeyCode::Left if app.focus == Focus::CountryCode => {
            app.flow.cycle_country(-1);
            app.mark_dirty();
        }
        KeyCode::Right if app.focus == Focus::CountryCode => {
            app.flow.cycle_country(1);
            app.mark_dirty();
        }
        KeyCode::Char(' ') if app.focus == Focus::RememberMe => {
            app.flow.toggle_remember();
            app.mark_dirty();
        }
        KeyCode::Char(c) => {
            if let Some(field) = edit_target(app.focus) {
                app.flow.push_char(field, c);
                app.mark_dirty();
            }
        }
        _ => {}
    }
}

/// Enter on a button runs it; anywhere else it submits the form.
fn activate(app: &mut App) {
    match app.focus {
        Focus::SendEmailOtp => app.request_otp(OtpChannel::Email),
        Focus::SendPhoneOtp => app.request_otp(OtpChannel::Phone),
        Focus::CountryCode => {
            app.flow.cycle_country(1);
            app.mark_dirty();
        }
        Focus::RememberMe => {
            app.flow.toggle_remember();
            app.mark_dirty();
        }
        _ => app.submit(),
    }
}

/// The field a focus position edits, if any.
fn edit_target(focus: Focus) -> Option<CredentialField> {
    match focus {
        Focus::Email => Some(CredentialField::Email),
        Focus::PhoneNumber => Some(CredentialField::PhoneNumber),
        Focus::EmailOtp => Some(CredentialField::EmailOtp),
        Focus::PhoneOtp => Some(CredentialField::PhoneOtp),
        Focus::Password => Some(CredentialField::Password),
        Focus::AuthenticatorCode => Some(CredentialField::AuthenticatorCode),
        _ => None,
    }
}

/// Focusable elements in traversal order for the current flow state.
fn focus_ring(flow: &LoginFlow) -> Vec<Focus> {
    let mut ring = vec![Focus::Email, Focus::SendEmailOtp];
    if flow.channel(OtpChannel::Email).requested {
        ring.push(Focus::EmailOtp);
    }
    ring.extend([Focus::CountryCode, Focus::PhoneNumber, Focus::SendPhoneOtp]);
    if flow.channel(OtpChannel::Phone).requested {
        ring.push(Focus::PhoneOtp);
    }
    ring.extend([
        Focus::Password,
        Focus::AuthenticatorCode,
        Focus::RememberMe,
        Focus::Submit,
    ]);
    ring
}

fn step_focus(app: &mut App, delta: isize) {
    let ring = focus_ring(&app.flow);
    let idx = ring.iter().position(|f| *f == app.focus).unwrap_or(0);
    let next = (idx as isize + delta).rem_euclid(ring.len() as isize) as usize;
    app.focus = ring[next];
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::adapters::demo::DemoGateway;

    fn test_app() -> App {
        App::new(Arc::new(DemoGateway::with_demo_accounts()))
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_key(app, press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_typing_into_email_field() {
        let mut app = test_app();
        type_text(&mut app, "a@b.co");
        assert_eq!(app.flow.credentials().email, "a@b.co");
    }

    #[test]
    fn test_backspace_edits_focused_field() {
        let mut app = test_app();
        type_text(&mut app, "ab");
        handle_key(&mut app, press(KeyCode::Backspace));
        assert_eq!(app.flow.credentials().email, "a");
    }

    #[test]
    fn test_tab_skips_hidden_otp_rows() {
        let mut app = test_app();
        handle_key(&mut app, press(KeyCode::Tab));
        assert_eq!(app.focus, Focus::SendEmailOtp);
        handle_key(&mut app, press(KeyCode::Tab));
        // Email OTP row hidden: focus goes straight to the country code.
        assert_eq!(app.focus, Focus::CountryCode);
    }

    #[test]
    fn test_tab_visits_otp_row_once_requested() {
        let mut app = test_app();
        type_text(&mut app, "admin@test.com");
        let request = app
            .flow
            .begin_otp_request(OtpChannel::Email)
            .expect("accepted");
        app.flow
            .complete_otp_request(OtpChannel::Email, request.seq, Ok(true));

        handle_key(&mut app, press(KeyCode::Tab));
        handle_key(&mut app, press(KeyCode::Tab));
        assert_eq!(app.focus, Focus::EmailOtp);
    }

    #[test]
    fn test_back_tab_wraps_to_submit() {
        let mut app = test_app();
        handle_key(&mut app, press(KeyCode::BackTab));
        assert_eq!(app.focus, Focus::Submit);
    }

    #[test]
    fn test_country_code_cycles_with_arrows() {
        let mut app = test_app();
        app.focus = Focus::CountryCode;
        handle_key(&mut app, press(KeyCode::Right));
        assert_eq!(app.flow.credentials().country_code, "+44");
        handle_key(&mut app, press(KeyCode::Left));
        assert_eq!(app.flow.credentials().country_code, "+1");
    }

    #[test]
    fn test_space_toggles_remember_me() {
        let mut app = test_app();
        app.focus = Focus::RememberMe;
        handle_key(&mut app, press(KeyCode::Char(' ')));
        assert!(app.flow.credentials().remember_me);
        handle_key(&mut app, press(KeyCode::Char(' ')));
        assert!(!app.flow.credentials().remember_me);
    }

    #[test]
    fn test_escape_quits_sign_in_screen() {
        let mut app = test_app();
        handle_key(&mut app, press(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let mut app = test_app();
        app.screen = Screen::Session;
        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
    }

    #[test]
    fn test_session_screen_sign_out() {
        let mut app = test_app();
        app.screen = Screen::Session;
        handle_key(&mut app, press(KeyCode::Char('l')));
        assert_eq!(app.screen, Screen::SignIn);
    }

    #[tokio::test]
    async fn test_enter_on_send_button_starts_request() {
        let mut app = test_app();
        type_text(&mut app, "admin@test.com");
        app.focus = Focus::SendEmailOtp;

        handle_key(&mut app, press(KeyCode::Enter));

        assert!(app.flow.channel(OtpChannel::Email).in_flight);
    }

    #[tokio::test]
    async fn test_enter_on_field_submits_and_surfaces_errors() {
        let mut app = test_app();
        type_text(&mut app, "admin@test.com");

        handle_key(&mut app, press(KeyCode::Enter));

        // Invalid form: submission blocked, inline errors stored.
        assert!(app.flow.has_field_errors());
    }
}
