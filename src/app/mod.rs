//! Application state for the console.
//!
//! This module contains the core [`App`] struct and related types:
//! - [`Screen`] - which screen is currently displayed
//! - [`Focus`] - which sign-in form element has keyboard focus
//! - [`AppMessage`] - messages posted back by async gateway calls

mod actions;
mod handlers;
mod messages;

pub use messages::AppMessage;

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::auth::flow::{LoginFlow, SubmissionState};
use crate::traits::gateway::{IdentityGateway, Session};

/// Which screen is currently displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// The multi-factor sign-in form.
    SignIn,
    /// The post-login session summary.
    Session,
}

/// Which sign-in form element has keyboard focus.
///
/// The two OTP rows only join the focus ring while their channel has a
/// passcode outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Email,
    SendEmailOtp,
    EmailOtp,
    CountryCode,
    PhoneNumber,
    SendPhoneOtp,
    PhoneOtp,
    Password,
    AuthenticatorCode,
    RememberMe,
    Submit,
}

/// Main application state.
pub struct App {
    /// Flag to track if the app should quit.
    pub should_quit: bool,
    /// Current screen being displayed.
    pub screen: Screen,
    /// Focused form element on the sign-in screen.
    pub focus: Focus,
    /// The multi-factor login flow.
    pub flow: LoginFlow,
    /// Session granted by a successful verification.
    pub session: Option<Session>,
    /// Identity gateway shared with spawned tasks.
    pub gateway: Arc<dyn IdentityGateway>,
    /// Receiver for async gateway completions. Taken by the run loop.
    pub message_rx: Option<mpsc::UnboundedReceiver<AppMessage>>,
    /// Sender cloned into spawned tasks.
    pub message_tx: mpsc::UnboundedSender<AppMessage>,
    /// Tick counter for animations.
    pub tick_count: u64,
    /// Whether the next loop iteration should redraw.
    pub needs_redraw: bool,
}

impl App {
    pub fn new(gateway: Arc<dyn IdentityGateway>) -> Self {
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        Self {
            should_quit: false,
            screen: Screen::SignIn,
            focus: Focus::Email,
            flow: LoginFlow::new(),
            session: None,
            gateway,
            message_rx: Some(message_rx),
            message_tx,
            tick_count: 0,
            needs_redraw: true,
        }
    }

    /// One countdown tick: advance animations and channel cooldowns.
    pub fn tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
        let cooled = self.flow.tick();
        if cooled || matches!(self.flow.submission(), SubmissionState::Submitting) {
            self.needs_redraw = true;
        }
    }

    pub fn mark_dirty(&mut self) {
        self.needs_redraw = true;
    }

    /// Drop the session and start a fresh sign-in flow.
    pub fn sign_out(&mut self) {
        self.session = None;
        self.flow.reset();
        self.screen = Screen::SignIn;
        self.focus = Focus::Email;
        self.mark_dirty();
    }
}
